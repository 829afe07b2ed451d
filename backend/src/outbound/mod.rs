//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel.
//! - **memory**: an in-process store for development and tests.
//! - **mail**: password-reset delivery, logged or posted to a relay.
//!
//! Adapters only translate between domain types and their backing
//! infrastructure; no business rules live here.

pub mod mail;
pub mod memory;
pub mod persistence;
