use crate::application::pagination::loader::merge_unique;
use crate::domain::shared::{identity::EntityId, pagination::PageRequest};
use crate::domain::social::media::{MediaItem, MediaQuery};
use crate::infrastructure::http::traits::{Backend, Outcome};
use futures_util::future::join;
use std::sync::Arc;
use tracing::{instrument, warn};

/// The "more like this" rail: recommended and similar titles, merged.
pub struct DiscoveryUseCase<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: Backend + ?Sized> DiscoveryUseCase<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Both queries run concurrently. Titles returned by both appear once,
    /// at the position of their first appearance; if one query fails the
    /// other's results are still served.
    #[instrument(skip(self), fields(media = %media))]
    pub async fn related(&self, media: &EntityId, request: PageRequest) -> Outcome<Vec<MediaItem>> {
        let (recommended, similar) = join(
            self.backend
                .fetch_media(media, MediaQuery::Recommended, request),
            self.backend.fetch_media(media, MediaQuery::Similar, request),
        )
        .await;

        match (recommended.into_data(), similar.into_data()) {
            (Ok(recommended), Ok(similar)) => {
                Outcome::ok(merge_unique(recommended.items, similar.items))
            }
            (Ok(page), Err(failure)) | (Err(failure), Ok(page)) => {
                warn!(failure = %failure, "one related-media query failed, serving the other");
                Outcome::ok(page.items)
            }
            (Err(failure), Err(_)) => Outcome {
                success: false,
                data: None,
                message: failure.message,
                failure: Some(failure.kind),
            },
        }
    }
}
