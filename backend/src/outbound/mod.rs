//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **memory**: in-process repositories for development and tests
//! - **storage**: local directory store for uploaded audio
//! - **mail**: confirmation mail delivery
//! - **hashing**: bcrypt password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod hashing;
pub mod mail;
pub mod memory;
pub mod persistence;
pub mod storage;
