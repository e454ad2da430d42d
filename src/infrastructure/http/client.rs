use super::{
    errors::{classify, default_message},
    routes,
    traits::{Backend, FailureKind, Outcome},
};
use crate::config::Config;
use crate::domain::shared::{
    errors::DomainError,
    identity::{CompositeKey, EntityId, EntityKind},
    pagination::{ListEnvelope, Page, PageRequest, PageShape},
};
use crate::domain::social::{
    entity::VotableEntity,
    media::{MediaItem, MediaQuery},
    reactions::{VoteAction, VoteSummary},
    value_objects::CommentBody,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// [`Backend`] over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, DomainError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            DomainError::ValidationError(format!("invalid API base URL {}: {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::InfrastructureError(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, percent-encoding each as one
    /// path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, DomainError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(DomainError::ValidationError(format!(
                "path segment {:?} is not addressable",
                bad
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::ValidationError(format!(
                    "API base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn paged_url(&self, segments: &[&str], request: PageRequest) -> Result<Url, DomainError> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut()
            .append_pair("page", &request.page.to_string())
            .append_pair("limit", &request.limit.to_string());
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_body(
        &self,
        request: RequestBuilder,
    ) -> Result<(reqwest::StatusCode, Vec<u8>), FailureKind> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| classify(&e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| classify(&e))?;
        Ok((status, body.to_vec()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Outcome<T> {
        let (status, body) = match self.read_body(request).await {
            Ok(read) => read,
            Err(kind) => return Outcome::failed(kind, default_message(kind)),
        };

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) if status.is_success() && envelope.success => Outcome {
                success: true,
                data: envelope.data,
                message: envelope.message,
                failure: None,
            },
            Ok(envelope) => Outcome::failed(
                FailureKind::Server,
                envelope
                    .message
                    .unwrap_or_else(|| format!("server responded {}", status)),
            ),
            Err(_) if !status.is_success() => {
                Outcome::failed(FailureKind::Server, format!("server responded {}", status))
            }
            Err(err) => {
                debug!(decode_error = %err, "response body did not match envelope");
                Outcome::failed(FailureKind::Decode, default_message(FailureKind::Decode))
            }
        }
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        page: PageRequest,
        shape: PageShape,
    ) -> Outcome<Page<T>> {
        let (status, body) = match self.read_body(request).await {
            Ok(read) => read,
            Err(kind) => return Outcome::failed(kind, default_message(kind)),
        };

        let envelope = match serde_json::from_slice::<ListEnvelope<T>>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Outcome::failed(FailureKind::Server, format!("server responded {}", status));
            }
            Err(err) => {
                debug!(decode_error = %err, "list body did not match envelope");
                return Outcome::failed(FailureKind::Decode, default_message(FailureKind::Decode));
            }
        };

        if !status.is_success() || !envelope.success {
            let message = envelope
                .message
                .clone()
                .unwrap_or_else(|| format!("server responded {}", status));
            return Outcome::failed(FailureKind::Server, message);
        }

        match shape.resolve(&envelope, page) {
            Some(meta) => Outcome::ok(Page {
                items: envelope.data,
                meta,
            }),
            None => Outcome::failed(
                FailureKind::Decode,
                format!("missing pagination metadata for {:?} endpoint", shape),
            ),
        }
    }
}

/// The request could not be built, so nothing was sent.
fn invalid<T>(err: DomainError) -> Outcome<T> {
    Outcome::failed(FailureKind::InvalidRequest, err.to_string())
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self), fields(target = %target))]
    async fn vote(&self, target: &CompositeKey, action: VoteAction) -> Outcome<VoteSummary> {
        let url = match self.url(&routes::vote(target, action)) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send(self.client.post(url).json(&json!({ "action": action })))
            .await
    }

    #[instrument(skip(self, body), fields(parent = %parent, content_length = body.as_str().len()))]
    async fn submit(
        &self,
        parent: &CompositeKey,
        child_kind: EntityKind,
        body: &CommentBody,
    ) -> Outcome<VotableEntity> {
        let url = match self.url(&routes::submit(parent, child_kind)) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send(self.client.post(url).json(body)).await
    }

    #[instrument(skip(self, body), fields(target = %target))]
    async fn edit(&self, target: &CompositeKey, body: &CommentBody) -> Outcome<VotableEntity> {
        let url = match self.url(&routes::entity(target)) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send(self.client.put(url).json(body)).await
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn delete(&self, target: &CompositeKey) -> Outcome<()> {
        let url = match self.url(&routes::entity(target)) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send::<serde_json::Value>(self.client.delete(url))
            .await
            .map(|_| ())
    }

    #[instrument(skip(self), fields(parent = %parent))]
    async fn fetch_entities(
        &self,
        parent: &CompositeKey,
        child_kind: EntityKind,
        request: PageRequest,
        shape: PageShape,
    ) -> Outcome<Page<VotableEntity>> {
        let url = match self.paged_url(&routes::children(parent, child_kind), request) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send_list(self.client.get(url), request, shape).await
    }

    #[instrument(skip(self), fields(media = %media))]
    async fn fetch_media(
        &self,
        media: &EntityId,
        query: MediaQuery,
        request: PageRequest,
    ) -> Outcome<Page<MediaItem>> {
        let url = match self.paged_url(&routes::related_media(media, query), request) {
            Ok(url) => url,
            Err(err) => return invalid(err),
        };
        self.send_list(self.client.get(url), request, PageShape::Paginated)
            .await
    }
}
