//! Policy table and decision coverage.

use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{AdId, Email, ErrorCode, ReviewId, UserRole};

fn principal(id: i64, is_admin: bool) -> Principal {
    Principal {
        id: UserId::new(id),
        email: Email::new(format!("user{id}@example.com")).expect("valid email"),
        is_admin,
    }
}

#[fixture]
fn author() -> Principal {
    principal(1, false)
}

#[fixture]
fn stranger() -> Principal {
    principal(2, false)
}

#[fixture]
fn admin() -> Principal {
    principal(3, true)
}

fn ad_by(author: Option<i64>) -> Ad {
    Ad {
        id: AdId::new(10),
        title: "phone".to_owned(),
        price: 10_000,
        description: None,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        author: author.map(UserId::new),
    }
}

fn review_by(author: i64) -> Review {
    Review {
        id: ReviewId::new(20),
        text: "great".to_owned(),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        ad: AdId::new(10),
        author: Some(UserId::new(author)),
    }
}

fn profile(id: i64) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        email: Email::new(format!("user{id}@example.com")).expect("valid email"),
        first_name: String::new(),
        last_name: String::new(),
        phone: None,
        role: UserRole::User,
        image: None,
        is_active: true,
    }
}

#[rstest]
#[case(ResourceKind::Ad, Operation::List, Policy::Open)]
#[case(ResourceKind::Ad, Operation::Retrieve, Policy::AuthenticatedOnly)]
#[case(ResourceKind::Ad, Operation::Create, Policy::AuthenticatedOnly)]
#[case(ResourceKind::Ad, Operation::Update, Policy::OwnerOrAdmin)]
#[case(ResourceKind::Ad, Operation::Delete, Policy::OwnerOrAdmin)]
#[case(ResourceKind::Review, Operation::List, Policy::AuthenticatedOnly)]
#[case(ResourceKind::Review, Operation::Retrieve, Policy::OwnerOrAdmin)]
#[case(ResourceKind::Review, Operation::Create, Policy::AuthenticatedOnly)]
#[case(ResourceKind::Review, Operation::Update, Policy::OwnerOrAdmin)]
#[case(ResourceKind::Review, Operation::Delete, Policy::OwnerOrAdmin)]
#[case(ResourceKind::UserProfile, Operation::List, Policy::AuthenticatedOnly)]
#[case(ResourceKind::UserProfile, Operation::Retrieve, Policy::SelfOnly)]
#[case(ResourceKind::UserProfile, Operation::Create, Policy::Open)]
#[case(ResourceKind::UserProfile, Operation::Update, Policy::SelfOnly)]
#[case(ResourceKind::UserProfile, Operation::Delete, Policy::SelfOnly)]
fn policy_table_matches_contract(
    #[case] resource: ResourceKind,
    #[case] operation: Operation,
    #[case] expected: Policy,
) {
    assert_eq!(policy_for(resource, operation), expected);
}

#[rstest]
#[case(ResourceKind::Ad, Operation::Retrieve)]
#[case(ResourceKind::Ad, Operation::Update)]
#[case(ResourceKind::Review, Operation::List)]
#[case(ResourceKind::Review, Operation::Retrieve)]
#[case(ResourceKind::UserProfile, Operation::Retrieve)]
#[case(ResourceKind::UserProfile, Operation::Delete)]
fn anonymous_callers_are_unauthenticated_never_forbidden(
    #[case] resource: ResourceKind,
    #[case] operation: Operation,
) {
    let err = authorize_request(resource, operation, None).expect_err("anonymous denied");
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let err = authorize_object(resource, operation, None, &profile(1))
        .expect_err("anonymous denied at object level");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(ResourceKind::Ad, Operation::List)]
#[case(ResourceKind::UserProfile, Operation::Create)]
fn open_operations_admit_anonymous_callers(
    #[case] resource: ResourceKind,
    #[case] operation: Operation,
) {
    assert_eq!(authorize_request(resource, operation, None), Ok(None));
}

#[rstest]
fn author_may_update_own_ad(author: Principal) {
    assert!(
        authorize_object(
            ResourceKind::Ad,
            Operation::Update,
            Some(&author),
            &ad_by(Some(1))
        )
        .is_ok()
    );
}

#[rstest]
fn administrator_may_delete_any_review(admin: Principal) {
    assert!(
        authorize_object(
            ResourceKind::Review,
            Operation::Delete,
            Some(&admin),
            &review_by(1)
        )
        .is_ok()
    );
}

#[rstest]
#[case(Operation::Update)]
#[case(Operation::Delete)]
fn stranger_is_forbidden_with_fixed_message(stranger: Principal, #[case] operation: Operation) {
    let err = authorize_object(ResourceKind::Ad, operation, Some(&stranger), &ad_by(Some(1)))
        .expect_err("stranger denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.detail(), OWNER_OR_ADMIN_DENIED);
}

#[rstest]
fn unowned_ad_is_owned_by_nobody(author: Principal) {
    let err = authorize_object(ResourceKind::Ad, Operation::Update, Some(&author), &ad_by(None))
        .expect_err("nobody owns it");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn stranger_cannot_read_someone_elses_review(stranger: Principal) {
    let err = authorize_object(
        ResourceKind::Review,
        Operation::Retrieve,
        Some(&stranger),
        &review_by(1),
    )
    .expect_err("stranger denied");
    assert_eq!(err.detail(), OWNER_OR_ADMIN_DENIED);
}

#[rstest]
fn profiles_are_self_only_without_admin_override(author: Principal, admin: Principal) {
    assert!(
        authorize_object(
            ResourceKind::UserProfile,
            Operation::Update,
            Some(&author),
            &profile(1)
        )
        .is_ok()
    );

    let err = authorize_object(
        ResourceKind::UserProfile,
        Operation::Update,
        Some(&admin),
        &profile(1),
    )
    .expect_err("admins get no override");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.detail(), PERMISSION_DENIED);
}

#[rstest]
fn authenticated_only_skips_object_checks(stranger: Principal) {
    assert!(
        authorize_object(
            ResourceKind::Ad,
            Operation::Retrieve,
            Some(&stranger),
            &ad_by(Some(1))
        )
        .is_ok()
    );
}

#[rstest]
fn require_principal_returns_the_caller(author: Principal) {
    let resolved = require_principal(ResourceKind::Ad, Operation::Create, Some(&author))
        .expect("authenticated");
    assert_eq!(resolved.id, author.id);
}

#[rstest]
fn role_check_reads_group_membership(admin: Principal, stranger: Principal) {
    assert!(is_administrator(&admin));
    assert!(!is_administrator(&stranger));
}
