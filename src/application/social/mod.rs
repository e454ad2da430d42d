pub mod dto;
pub mod guards;
pub mod notices;
pub mod use_case;
