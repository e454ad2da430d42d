use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Server pagination metadata after the endpoint's adapter ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageMeta {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

impl PageMeta {
    pub fn has_more_after(&self, page: u32) -> bool {
        page < self.pages
    }
}

/// How a list endpoint reports its pagination.
///
/// The backend is not consistent here: most list endpoints answer with a
/// `pagination` block, while comment listings only report `totalComments`.
/// Each endpoint is bound to its shape explicitly; the two are never guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageShape {
    /// `{ success, data, pagination: { page, pages, total } }`
    Paginated,
    /// `{ success, data, totalComments }`
    CommentTotal,
}

impl PageShape {
    pub fn resolve<T>(self, envelope: &ListEnvelope<T>, request: PageRequest) -> Option<PageMeta> {
        match self {
            Self::Paginated => envelope.pagination,
            Self::CommentTotal => envelope.total_comments.map(|total| PageMeta {
                page: request.page,
                pages: pages_for(total, request.limit),
                total,
            }),
        }
    }
}

pub fn pages_for(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

/// Wire envelope for list endpoints, covering both [`PageShape`]s.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub pagination: Option<PageMeta>,
    pub total_comments: Option<u64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    /// Last page merged into the collection; 0 before the first load.
    pub page: u32,
    pub has_more: bool,
    pub loading_more: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 0,
            has_more: true,
            loading_more: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    LoadingMore,
    Exhausted,
}
