//! In-process store backing every repository port.
//!
//! Used when no database URL is configured and by the HTTP test suites.
//! All tables sit behind one mutex so compound writes such as the
//! unique-email check or cascading deletes are atomic.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AdPersistenceError, AdRepository, ReviewPersistenceError, ReviewRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Ad, AdContent, AdFilter, AdId, AdSlice, Email, NewUser, PasswordHash, ResetToken, Review,
    ReviewId, ReviewText, UserAccount, UserChanges, UserId, UserProfile,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, UserAccount>,
    ads: BTreeMap<i64, Ad>,
    reviews: BTreeMap<i64, Review>,
    last_user_id: i64,
    last_ad_id: i64,
    last_review_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users.values().any(|account| {
            Some(account.id()) != except && account.profile.email.matches(email.as_ref())
        })
    }

    fn remove_ad(&mut self, id: i64) -> bool {
        self.reviews.retain(|_, review| review.ad.get() != id);
        self.ads.remove(&id).is_some()
    }
}

/// Shared handle to the in-memory tables. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables.lock().map_err(|_| POISONED.to_owned())
    }

    /// Add `id` to `group`, e.g. to bootstrap an administrator.
    /// Returns `false` for unknown users.
    pub fn add_user_to_group(&self, id: UserId, group: &str) -> bool {
        let Ok(mut tables) = self.lock() else {
            return false;
        };
        match tables.users.get_mut(&id.get()) {
            Some(account) => {
                if !account.in_group(group) {
                    account.groups.push(group.to_owned());
                }
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<UserAccount, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.email_taken(&user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        tables.last_user_id += 1;
        let id = tables.last_user_id;
        let account = UserAccount {
            profile: UserProfile {
                id: UserId::new(id),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                phone: user.phone.clone(),
                role: user.role,
                image: None,
                is_active: true,
            },
            password_hash: user.password_hash.clone(),
            reset_token: None,
            groups: Vec::new(),
        };
        tables.users.insert(id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(&id.get()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .find(|account| account.profile.email.matches(email.as_ref()))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserProfile>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .map(|account| account.profile.clone())
            .collect())
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let taken = changes
            .email
            .as_ref()
            .filter(|email| tables.email_taken(email, Some(id)));
        if let Some(email) = taken {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        let Some(account) = tables.users.get_mut(&id.get()) else {
            return Ok(None);
        };
        let profile = &mut account.profile;
        if let Some(email) = &changes.email {
            profile.email = email.clone();
        }
        if let Some(first_name) = &changes.first_name {
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &changes.last_name {
            profile.last_name.clone_from(last_name);
        }
        if let Some(phone) = &changes.phone {
            profile.phone.clone_from(phone);
        }
        if let Some(image) = &changes.image {
            profile.image.clone_from(image);
        }
        if let Some(hash) = &changes.password_hash {
            account.password_hash = hash.clone();
        }
        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.users.remove(&id.get()).is_none() {
            return Ok(false);
        }
        let authored: Vec<i64> = tables
            .ads
            .values()
            .filter(|ad| ad.author == Some(id))
            .map(|ad| ad.id.get())
            .collect();
        for ad in authored {
            tables.remove_ad(ad);
        }
        tables.reviews.retain(|_, review| review.author != Some(id));
        Ok(true)
    }

    async fn store_reset_token(
        &self,
        id: UserId,
        token: &ResetToken,
    ) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .get_mut(&id.get())
            .map(|account| account.reset_token = Some(token.clone()))
            .is_some())
    }

    async fn replace_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .get_mut(&id.get())
            .map(|account| account.password_hash = hash.clone())
            .is_some())
    }
}

#[async_trait]
impl AdRepository for InMemoryStore {
    async fn create(
        &self,
        content: &AdContent,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Ad, AdPersistenceError> {
        let mut tables = self.lock().map_err(AdPersistenceError::query)?;
        tables.last_ad_id += 1;
        let ad = Ad {
            id: AdId::new(tables.last_ad_id),
            title: content.title().to_owned(),
            price: content.price(),
            description: content.description().map(str::to_owned),
            created_at,
            author: Some(author),
        };
        tables.ads.insert(ad.id.get(), ad.clone());
        Ok(ad)
    }

    async fn find_by_id(&self, id: AdId) -> Result<Option<Ad>, AdPersistenceError> {
        let tables = self.lock().map_err(AdPersistenceError::query)?;
        Ok(tables.ads.get(&id.get()).cloned())
    }

    async fn list(
        &self,
        filter: &AdFilter,
        offset: u64,
        limit: u64,
    ) -> Result<AdSlice, AdPersistenceError> {
        let tables = self.lock().map_err(AdPersistenceError::query)?;
        let mut matching: Vec<&Ad> = tables
            .ads
            .values()
            .filter(|ad| filter.title.as_ref().is_none_or(|title| &ad.title == title))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let ads = matching.into_iter().skip(skip).take(take).cloned().collect();
        Ok(AdSlice { ads, total })
    }

    async fn update(
        &self,
        id: AdId,
        content: &AdContent,
    ) -> Result<Option<Ad>, AdPersistenceError> {
        let mut tables = self.lock().map_err(AdPersistenceError::query)?;
        Ok(tables.ads.get_mut(&id.get()).map(|ad| {
            ad.title = content.title().to_owned();
            ad.price = content.price();
            ad.description = content.description().map(str::to_owned);
            ad.clone()
        }))
    }

    async fn delete(&self, id: AdId) -> Result<bool, AdPersistenceError> {
        let mut tables = self.lock().map_err(AdPersistenceError::query)?;
        Ok(tables.remove_ad(id.get()))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(
        &self,
        text: &ReviewText,
        ad: AdId,
        author: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Review, ReviewPersistenceError> {
        let mut tables = self.lock().map_err(ReviewPersistenceError::query)?;
        if !tables.ads.contains_key(&ad.get()) {
            return Err(ReviewPersistenceError::missing_ad(ad.get()));
        }
        tables.last_review_id += 1;
        let review = Review {
            id: ReviewId::new(tables.last_review_id),
            text: text.as_ref().to_owned(),
            created_at,
            ad,
            author: Some(author),
        };
        tables.reviews.insert(review.id.get(), review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let tables = self.lock().map_err(ReviewPersistenceError::query)?;
        Ok(tables.reviews.get(&id.get()).cloned())
    }

    async fn list(&self) -> Result<Vec<Review>, ReviewPersistenceError> {
        let tables = self.lock().map_err(ReviewPersistenceError::query)?;
        Ok(tables.reviews.values().cloned().collect())
    }

    async fn update_text(
        &self,
        id: ReviewId,
        text: &ReviewText,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut tables = self.lock().map_err(ReviewPersistenceError::query)?;
        Ok(tables.reviews.get_mut(&id.get()).map(|review| {
            review.text = text.as_ref().to_owned();
            review.clone()
        }))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut tables = self.lock().map_err(ReviewPersistenceError::query)?;
        Ok(tables.reviews.remove(&id.get()).is_some())
    }

    async fn delete_for_ad(&self, ad: AdId) -> Result<u64, ReviewPersistenceError> {
        let mut tables = self.lock().map_err(ReviewPersistenceError::query)?;
        let before = tables.reviews.len();
        tables.reviews.retain(|_, review| review.ad != ad);
        Ok(u64::try_from(before - tables.reviews.len()).unwrap_or(u64::MAX))
    }
}
