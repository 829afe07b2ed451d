//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the mailer) are implemented by `outbound`
//! adapters. Driving ports are implemented by the domain services and called
//! by `inbound` handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod ad_repository;
mod ads_command;
mod ads_query;
mod login_service;
mod password_reset_command;
mod password_reset_mailer;
mod review_repository;
mod reviews_command;
mod reviews_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use ad_repository::MockAdRepository;
pub use ad_repository::{AdPersistenceError, AdRepository};
pub use ads_command::AdsCommand;
pub use ads_query::AdsQuery;
pub use login_service::LoginService;
pub use password_reset_command::PasswordResetCommand;
#[cfg(test)]
pub use password_reset_mailer::MockPasswordResetMailer;
pub use password_reset_mailer::{MailerError, PasswordResetMailer, ResetLinkMessage};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
pub use reviews_command::ReviewsCommand;
pub use reviews_query::ReviewsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::{Registration, UserUpdate, UsersCommand};
pub use users_query::UsersQuery;
