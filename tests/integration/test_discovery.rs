use super::helpers::{backend, spawn_api};
use marquee::{
    application::discovery::use_case::DiscoveryUseCase,
    domain::shared::{identity::EntityId, pagination::PageRequest},
};

#[tokio::test]
async fn related_titles_merge_recommended_and_similar() {
    let api = spawn_api(0, 0).await;
    let discovery = DiscoveryUseCase::new(backend(&api, None));

    let related = discovery
        .related(&EntityId::new("550"), PageRequest::default())
        .await
        .into_data()
        .expect("both queries succeed");

    let ids: Vec<_> = related.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["42", "7", "9", "11"]);
}
