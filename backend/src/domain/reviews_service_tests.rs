//! Tests for the review service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::access::{NOT_AUTHENTICATED, OWNER_OR_ADMIN_DENIED};
use crate::domain::ports::{MockAdRepository, MockReviewRepository, ReviewPersistenceError};
use crate::domain::test_support::{ad, admin, fixture_clock, fixture_timestamp, principal, review};
use crate::domain::{AdId, ErrorCode, UserId};

fn make_service(
    reviews: MockReviewRepository,
    ads: MockAdRepository,
) -> ReviewsService<MockReviewRepository, MockAdRepository> {
    ReviewsService::new(Arc::new(reviews), Arc::new(ads), fixture_clock())
}

fn draft(ad: i64) -> ReviewDraft {
    ReviewDraft {
        text: Some("as described".to_owned()),
        ad: Some(ad),
    }
}

#[tokio::test]
async fn create_sets_author_from_the_caller() {
    let mut ads = MockAdRepository::new();
    ads.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(ad(3, 1))));
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_create()
        .withf(|text, ad, author, created_at| {
            text.as_ref() == "as described"
                && *ad == AdId::new(3)
                && *author == UserId::new(2)
                && *created_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_, _, _, _| Ok(review(10, 3, 2)));
    let service = make_service(reviews, ads);

    let created = service
        .create_review(Some(&principal(2)), draft(3))
        .await
        .expect("review created");
    assert_eq!(created.author, Some(UserId::new(2)));
}

#[tokio::test]
async fn create_for_unknown_ad_is_a_field_error() {
    let mut ads = MockAdRepository::new();
    ads.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let mut reviews = MockReviewRepository::new();
    reviews.expect_create().times(0);
    let service = make_service(reviews, ads);

    let err = service
        .create_review(Some(&principal(2)), draft(99))
        .await
        .expect_err("unknown ad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let messages = err
        .field_errors()
        .and_then(|errors| errors.get("ad"))
        .expect("ad field error");
    assert_eq!(messages, &vec!["Invalid pk \"99\" - object does not exist.".to_owned()]);
}

#[tokio::test]
async fn racing_ad_deletion_maps_to_the_same_field_error() {
    let mut ads = MockAdRepository::new();
    ads.expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(ad(3, 1))));
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_create()
        .times(1)
        .return_once(|_, _, _, _| Err(ReviewPersistenceError::missing_ad(3_i64)));
    let service = make_service(reviews, ads);

    let err = service
        .create_review(Some(&principal(2)), draft(3))
        .await
        .expect_err("ad vanished");
    assert!(err.field_errors().is_some_and(|errors| errors.contains_key("ad")));
}

#[tokio::test]
async fn listing_requires_authentication() {
    let mut reviews = MockReviewRepository::new();
    reviews.expect_list().times(0);
    let service = make_service(reviews, MockAdRepository::new());

    let err = service.list_reviews(None).await.expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.detail(), NOT_AUTHENTICATED);
}

#[rstest]
#[case::author(principal(2), true)]
#[case::administrator(admin(9), true)]
#[case::stranger(principal(5), false)]
#[tokio::test]
async fn retrieve_is_limited_to_author_and_admins(
    #[case] caller: Principal,
    #[case] allowed: bool,
) {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(review(10, 3, 2))));
    let service = make_service(reviews, MockAdRepository::new());

    let result = service.get_review(Some(&caller), ReviewId::new(10)).await;
    match (allowed, result) {
        (true, Ok(found)) => assert_eq!(found.id, ReviewId::new(10)),
        (false, Err(err)) => {
            assert_eq!(err.code(), ErrorCode::Forbidden);
            assert_eq!(err.detail(), OWNER_OR_ADMIN_DENIED);
        }
        (true, Err(err)) => panic!("expected success, got {err:?}"),
        (false, Ok(found)) => panic!("expected denial, got {found:?}"),
    }
}

#[tokio::test]
async fn update_without_text_returns_the_stored_review() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(review(10, 3, 2))));
    reviews.expect_update_text().times(0);
    let service = make_service(reviews, MockAdRepository::new());

    let unchanged = service
        .update_review(Some(&principal(2)), ReviewId::new(10), ReviewPatch::default())
        .await
        .expect("noop update");
    assert_eq!(unchanged.text, "as described");
}

#[tokio::test]
async fn blank_replacement_text_is_rejected() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(review(10, 3, 2))));
    let service = make_service(reviews, MockAdRepository::new());

    let err = service
        .update_review(
            Some(&principal(2)),
            ReviewId::new(10),
            ReviewPatch {
                text: Some("   ".to_owned()),
            },
        )
        .await
        .expect_err("blank text");
    assert!(err.field_errors().is_some_and(|errors| errors.contains_key("text")));
}

#[tokio::test]
async fn stranger_cannot_delete() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(Some(review(10, 3, 2))));
    reviews.expect_delete().times(0);
    let service = make_service(reviews, MockAdRepository::new());

    let err = service
        .delete_review(Some(&principal(5)), ReviewId::new(10))
        .await
        .expect_err("stranger denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
