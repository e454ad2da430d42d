use crate::domain::shared::identity::{CompositeKey, EntityId, EntityKind, Keyed};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Movie or TV listing entry used by the related-media rails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MediaItem {
    pub id: EntityId,
    pub title: String,
    pub media_type: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Keyed for MediaItem {
    fn key(&self) -> CompositeKey {
        CompositeKey::new(EntityKind::Media, self.id.clone())
    }

    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaQuery {
    Recommended,
    Similar,
}

impl MediaQuery {
    pub fn segment(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Similar => "similar",
        }
    }
}
