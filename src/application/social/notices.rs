use crate::domain::shared::identity::CompositeKey;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// A user-visible message about a mutation the server refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notice {
    MutationRejected {
        target: CompositeKey,
        action: &'static str,
        message: String,
    },
    SubmissionFailed {
        parent: CompositeKey,
        message: String,
    },
    LoadFailed {
        parent: CompositeKey,
        page: u32,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct NoticeBus {
    sender: Arc<broadcast::Sender<Notice>>,
}

impl NoticeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers. Nobody listening is not an error.
    pub fn publish(&self, notice: Notice) {
        let _ = self.sender.send(notice);
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(100)
    }
}
