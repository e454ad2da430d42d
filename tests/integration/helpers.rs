use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{delete, get, post},
};
use marquee::{
    application::social::{
        dto::ThreadConfig,
        notices::{Notice, NoticeBus},
        use_case::ThreadSession,
    },
    domain::shared::identity::{CompositeKey, EntityId, EntityKind},
    infrastructure::http::client::HttpBackend,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle};

pub const ACTING_USER: &str = "ana";
pub const CLIENT_TIMEOUT: Duration = Duration::from_millis(400);
const OFFLINE_DELAY: Duration = Duration::from_millis(1500);
const SLOW_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct StoredComment {
    pub id: String,
    pub kind: &'static str,
    pub content: String,
    pub likes: BTreeSet<String>,
    pub dislikes: BTreeSet<String>,
}

impl StoredComment {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "kind": self.kind,
            "user": "author",
            "content": self.content,
            "likes": self.likes,
            "dislikes": self.dislikes,
            "replyCount": 0,
            "createdAt": "2024-05-01T10:00:00Z",
        })
    }
}

#[derive(Debug, Default)]
pub struct ApiInner {
    pub comments: Vec<StoredComment>,
    pub replies: Vec<StoredComment>,
    pub next_id: usize,
    /// Mutating routes stall past the client timeout and persist nothing.
    pub offline: bool,
    /// Mutating routes answer after a short delay.
    pub slow: bool,
    pub reject_votes: bool,
    pub reject_deletes: bool,
    pub vote_calls: usize,
    pub last_authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct ApiState {
    pub inner: Arc<Mutex<ApiInner>>,
}

impl ApiState {
    pub fn update(&self, f: impl FnOnce(&mut ApiInner)) {
        f(&mut self.inner.lock().unwrap());
    }

    pub fn read<T>(&self, f: impl FnOnce(&ApiInner) -> T) -> T {
        f(&self.inner.lock().unwrap())
    }

    async fn stall(&self) -> bool {
        let (offline, slow) = self.read(|inner| (inner.offline, inner.slow));
        if offline {
            tokio::time::sleep(OFFLINE_DELAY).await;
            return true;
        }
        if slow {
            tokio::time::sleep(SLOW_DELAY).await;
        }
        false
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: ApiState,
    handle: JoinHandle<()>,
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seeded_state(comments: usize, replies: usize) -> ApiState {
    let state = ApiState::default();
    state.update(|inner| {
        inner.comments = (0..comments)
            .map(|i| StoredComment {
                id: format!("c{}", i),
                kind: "comment",
                content: format!("comment {}", i),
                likes: BTreeSet::new(),
                dislikes: BTreeSet::new(),
            })
            .collect();
        inner.replies = (0..replies)
            .map(|i| StoredComment {
                id: format!("r{}", i),
                kind: "reply",
                content: format!("reply {}", i),
                likes: BTreeSet::new(),
                dislikes: BTreeSet::new(),
            })
            .collect();
        inner.next_id = comments.max(replies);
    });
    state
}

pub async fn spawn_api(comments: usize, replies: usize) -> MockApi {
    let state = seeded_state(comments, replies);
    let app = Router::new()
        .route("/api/posts/{id}/comments", get(list_comments))
        .route("/api/posts/{id}/comment", post(add_comment))
        .route("/api/reviews/{id}/replies", get(list_replies))
        .route("/api/comments/{id}/{action}", post(vote_comment))
        .route("/api/comments/{id}", delete(delete_comment))
        .route("/api/media/{id}/{query}", get(related_media))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{}", addr),
        state,
        handle,
    }
}

pub fn backend(api: &MockApi, token: Option<&str>) -> Arc<HttpBackend> {
    Arc::new(
        HttpBackend::new(&api.base_url, token.map(str::to_string), CLIENT_TIMEOUT).unwrap(),
    )
}

pub type Session = ThreadSession<HttpBackend>;

pub fn session(
    backend: Arc<HttpBackend>,
    config: ThreadConfig,
) -> (Session, broadcast::Receiver<Notice>) {
    let notices = NoticeBus::new(16);
    let rx = notices.subscribe();
    (ThreadSession::new(backend, config, notices), rx)
}

pub fn post_comments(api: &MockApi, page_size: u32) -> (Session, broadcast::Receiver<Notice>) {
    session(
        backend(api, None),
        ThreadConfig::post_comments(
            CompositeKey::new(EntityKind::Post, EntityId::new("p1")),
            page_size,
        ),
    )
}

pub fn review_replies(api: &MockApi, page_size: u32) -> (Session, broadcast::Receiver<Notice>) {
    session(
        backend(api, None),
        ThreadConfig::review_replies(
            CompositeKey::new(EntityKind::Review, EntityId::new("rv1")),
            page_size,
        ),
    )
}

pub fn ids(session: &Session) -> Vec<String> {
    session
        .entries()
        .into_iter()
        .map(|e| e.id.as_str().to_string())
        .collect()
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: usize,
    limit: usize,
}

fn slice(items: &[StoredComment], query: &PageQuery) -> Vec<Value> {
    items
        .iter()
        .skip((query.page.max(1) - 1) * query.limit)
        .take(query.limit)
        .map(StoredComment::to_json)
        .collect()
}

async fn list_comments(
    State(state): State<ApiState>,
    Path(_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let (data, total) = state.read(|inner| (slice(&inner.comments, &query), inner.comments.len()));
    Json(json!({ "success": true, "data": data, "totalComments": total }))
}

async fn list_replies(
    State(state): State<ApiState>,
    Path(_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let (data, total) = state.read(|inner| (slice(&inner.replies, &query), inner.replies.len()));
    let pages = total.div_ceil(query.limit.max(1));
    Json(json!({
        "success": true,
        "data": data,
        "pagination": { "page": query.page, "pages": pages, "total": total },
    }))
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    content: String,
}

async fn add_comment(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<ContentBody>,
) -> (StatusCode, Json<Value>) {
    record_authorization(&state, &headers);
    if state.stall().await {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "success": false })));
    }
    let created = {
        let mut inner = state.inner.lock().unwrap();
        let id = format!("c{}", inner.next_id);
        inner.next_id += 1;
        let comment = StoredComment {
            id,
            kind: "comment",
            content: body.content,
            likes: BTreeSet::new(),
            dislikes: BTreeSet::new(),
        };
        inner.comments.push(comment.clone());
        comment
    };
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created.to_json() })),
    )
}

async fn vote_comment(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path((id, action)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    record_authorization(&state, &headers);
    state.update(|inner| inner.vote_calls += 1);
    if state.stall().await {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "success": false })));
    }

    let mut inner = state.inner.lock().unwrap();
    if inner.reject_votes {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Voting is closed" })),
        );
    }
    let Some(comment) = inner.comments.iter_mut().find(|c| c.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Comment not found" })),
        );
    };

    let user = ACTING_USER.to_string();
    let (mine, other) = if action == "like" {
        (&mut comment.likes, &mut comment.dislikes)
    } else {
        (&mut comment.dislikes, &mut comment.likes)
    };
    other.remove(&user);
    if !mine.remove(&user) {
        mine.insert(user.clone());
    }

    let summary = json!({
        "likes": comment.likes.len(),
        "dislikes": comment.dislikes.len(),
        "userLiked": comment.likes.contains(&user),
        "userDisliked": comment.dislikes.contains(&user),
    });
    (StatusCode::OK, Json(json!({ "success": true, "data": summary })))
}

async fn delete_comment(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if state.stall().await {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "success": false })));
    }
    let mut inner = state.inner.lock().unwrap();
    if inner.reject_deletes {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "message": "Only the author can delete" })),
        );
    }
    inner.comments.retain(|c| c.id != id);
    (StatusCode::OK, Json(json!({ "success": true, "message": "Deleted" })))
}

async fn related_media(Path((_id, query)): Path<(String, String)>) -> Json<Value> {
    let ids: &[&str] = if query == "recommended" {
        &["42", "7"]
    } else {
        &["42", "9", "11"]
    };
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "title": format!("Title {}", id), "mediaType": "movie" }))
        .collect();
    Json(json!({
        "success": true,
        "data": data,
        "pagination": { "page": 1, "pages": 1, "total": ids.len() },
    }))
}

fn record_authorization(state: &ApiState, headers: &HeaderMap) {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.update(|inner| inner.last_authorization = value);
}
