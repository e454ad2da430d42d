use marquee::{
    application::{optimistic::applier, pagination::loader::merge_unique},
    domain::{
        shared::{
            identity::{EntityId, EntityKind, Keyed, UserId},
            pagination::{PageMeta, PageRequest},
        },
        social::{
            entity::VotableEntity,
            thread::{Placement, Thread},
            value_objects::{CommentBody, MAX_COMMENT_LENGTH},
        },
    },
};

fn entity(id: &str) -> VotableEntity {
    let mut entity = VotableEntity::placeholder(EntityKind::Comment, UserId::new("author"), id.into());
    entity.id = EntityId::new(id);
    entity
}

#[test]
fn page_request_defaults_to_first_page_of_ten() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.limit, 10);
}

#[test]
fn has_more_is_page_below_pages() {
    let meta = PageMeta { page: 2, pages: 3, total: 25 };
    assert!(meta.has_more_after(2));
    assert!(!meta.has_more_after(3));
}

#[test]
fn toggling_like_twice_restores_the_entity() {
    let user = UserId::new("ana");
    let original = entity("c1");
    let once = applier::toggle_like(&original, &user);
    assert_eq!(once.reactions.like_count(), 1);
    assert_eq!(applier::toggle_like(&once, &user), original);
}

#[test]
fn a_user_is_never_in_both_sets() {
    let user = UserId::new("ana");
    let liked = applier::toggle_like(&entity("c1"), &user);
    let disliked = applier::toggle_dislike(&liked, &user);
    assert!(!disliked.reactions.has_liked(&user));
    assert!(disliked.reactions.has_disliked(&user));
    assert_eq!(disliked.reactions.like_count() + disliked.reactions.dislike_count(), 1);
}

#[test]
fn placeholders_carry_temporary_ids() {
    let a = VotableEntity::placeholder(EntityKind::Reply, UserId::new("ana"), "hi".into());
    let b = VotableEntity::placeholder(EntityKind::Reply, UserId::new("ana"), "hi".into());
    assert!(a.is_placeholder());
    assert_ne!(a.id, b.id);
}

#[test]
fn reconcile_swaps_placeholder_in_place() {
    let mut thread = Thread::from_entries(vec![entity("c1"), entity("c2")], 2);
    let placeholder = VotableEntity::placeholder(EntityKind::Comment, UserId::new("ana"), "new".into());
    let temp = placeholder.id.clone();
    applier::insert_optimistic(&mut thread, placeholder, Placement::Prepend);

    applier::reconcile(&mut thread, &temp, entity("c9"));
    let ids: Vec<_> = thread.entries().iter().map(|e| e.id().as_str()).collect();
    assert_eq!(ids, ["c9", "c1", "c2"]);
}

#[test]
fn merged_listings_keep_one_entry_per_key() {
    let merged = merge_unique(vec![entity("42"), entity("7")], vec![entity("42"), entity("9")]);
    let keys: Vec<_> = merged.iter().map(Keyed::key).collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(merged[0].id.as_str(), "42");
}

#[test]
fn comment_body_enforces_length_bounds() {
    assert!(CommentBody::new("ok").is_ok());
    assert!(CommentBody::new("").is_err());
    assert!(CommentBody::new(" \n\t ").is_err());
    assert!(CommentBody::new("a".repeat(MAX_COMMENT_LENGTH)).is_ok());
    assert!(CommentBody::new("a".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
}

#[test]
fn entity_ids_reject_blank_and_oversized() {
    assert!(EntityId::parse("abc123").is_ok());
    assert!(EntityId::parse("").is_err());
    assert!(EntityId::parse(&"x".repeat(129)).is_err());
}
