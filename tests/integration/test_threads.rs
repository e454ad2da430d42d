use super::helpers::{StoredComment, ids, post_comments, review_replies, spawn_api};
use marquee::{
    application::social::dto::LoadStatus,
    domain::shared::pagination::LoadState,
};
use std::collections::BTreeSet;

#[tokio::test]
async fn post_comments_page_through_to_exhaustion() {
    let api = spawn_api(25, 0).await;
    let (session, _notices) = post_comments(&api, 10);

    assert_eq!(
        session.load_first().await,
        LoadStatus::Loaded { page: 1, added: 10, has_more: true }
    );
    assert_eq!(session.total(), 25);

    assert_eq!(
        session.load_more().await,
        LoadStatus::Loaded { page: 2, added: 10, has_more: true }
    );
    assert_eq!(session.entries().len(), 20);

    assert_eq!(
        session.load_more().await,
        LoadStatus::Loaded { page: 3, added: 5, has_more: false }
    );
    assert_eq!(session.entries().len(), 25);
    assert_eq!(session.state(), LoadState::Exhausted);

    assert_eq!(session.load_more().await, LoadStatus::Skipped);
    assert_eq!(session.entries().len(), 25);
}

#[tokio::test]
async fn review_replies_read_the_pagination_block() {
    let api = spawn_api(0, 3).await;
    let (session, _notices) = review_replies(&api, 2);

    assert_eq!(
        session.load_first().await,
        LoadStatus::Loaded { page: 1, added: 2, has_more: true }
    );
    assert_eq!(
        session.load_more().await,
        LoadStatus::Loaded { page: 2, added: 1, has_more: false }
    );
    assert_eq!(ids(&session), ["r0", "r1", "r2"]);
    assert_eq!(session.total(), 3);
}

#[tokio::test]
async fn shifted_pages_do_not_duplicate_entries() {
    let api = spawn_api(25, 0).await;
    let (session, _notices) = post_comments(&api, 10);
    session.load_first().await;

    // A new comment lands at the head, pushing c9 onto page 2.
    api.state.update(|inner| {
        inner.comments.insert(
            0,
            StoredComment {
                id: "fresh".into(),
                kind: "comment",
                content: "new at the top".into(),
                likes: BTreeSet::new(),
                dislikes: BTreeSet::new(),
            },
        )
    });

    assert_eq!(
        session.load_more().await,
        LoadStatus::Loaded { page: 2, added: 9, has_more: true }
    );
    let loaded = ids(&session);
    assert_eq!(loaded.len(), 19);
    assert_eq!(loaded.iter().filter(|id| *id == "c9").count(), 1);
    assert_eq!(session.total(), 26);
}

#[tokio::test]
async fn refresh_replaces_accumulated_entries() {
    let api = spawn_api(25, 0).await;
    let (session, _notices) = post_comments(&api, 10);
    session.load_first().await;
    session.load_more().await;
    assert_eq!(session.entries().len(), 20);

    api.state.update(|inner| inner.comments.truncate(4));

    assert_eq!(
        session.refresh().await,
        LoadStatus::Loaded { page: 1, added: 4, has_more: false }
    );
    assert_eq!(ids(&session), ["c0", "c1", "c2", "c3"]);
    assert_eq!(session.cursor().page, 1);
}
