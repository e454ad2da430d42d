use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_COMMENT_LENGTH: usize = 2000;
// `validator` length bounds are typed as u64.
const MAX_COMMENT_LENGTH_U64: u64 = MAX_COMMENT_LENGTH as u64;

/// Trimmed, non-empty text of a comment, reply or edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentBody {
    #[validate(length(min = 1, max = MAX_COMMENT_LENGTH_U64))]
    pub content: String,
}

impl CommentBody {
    pub fn new(content: impl AsRef<str>) -> Result<Self, validator::ValidationErrors> {
        let body = Self {
            content: content.as_ref().trim().to_string(),
        };
        body.validate()?;
        Ok(body)
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}
