//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    Ad, AdId, Email, PasswordHash, Principal, Review, ReviewId, UserAccount, UserId, UserProfile,
    UserRole,
};

pub(crate) const ADMIN_GROUP: &str = "Administrators";

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn email(id: i64) -> Email {
    Email::new(format!("user{id}@example.com")).expect("valid fixture email")
}

pub(crate) fn principal(id: i64) -> Principal {
    Principal {
        id: UserId::new(id),
        email: email(id),
        is_admin: false,
    }
}

pub(crate) fn admin(id: i64) -> Principal {
    Principal {
        is_admin: true,
        ..principal(id)
    }
}

pub(crate) fn ad(id: i64, author: i64) -> Ad {
    Ad {
        id: AdId::new(id),
        title: "phone".to_owned(),
        price: 10_000,
        description: None,
        created_at: fixture_timestamp(),
        author: Some(UserId::new(author)),
    }
}

pub(crate) fn review(id: i64, ad: i64, author: i64) -> Review {
    Review {
        id: ReviewId::new(id),
        text: "as described".to_owned(),
        created_at: fixture_timestamp(),
        ad: AdId::new(ad),
        author: Some(UserId::new(author)),
    }
}

pub(crate) fn profile(id: i64) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        email: email(id),
        first_name: String::new(),
        last_name: String::new(),
        phone: None,
        role: UserRole::User,
        image: None,
        is_active: true,
    }
}

pub(crate) fn account(id: i64, password_hash: PasswordHash) -> UserAccount {
    UserAccount {
        profile: profile(id),
        password_hash,
        reset_token: None,
        groups: Vec::new(),
    }
}
