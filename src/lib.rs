//! # Aliro (credential service)
//!
//! `aliro` registers user identifiers with hashed passwords and authenticates
//! login attempts against the stored credentials.
//!
//! ## Credential model
//!
//! Each user is a single row: a unique `identifier` (username or email, the
//! service does not care which), a SHA-256 digest of the password rendered as
//! lowercase hex, and an immutable `created_at` timestamp. Records are created
//! exactly once at registration and never updated or deleted.
//!
//! ## Authentication
//!
//! Login computes the digest of the presented password and compares it against
//! the stored one. An unknown identifier and a wrong password produce the
//! identical `401` response, so the API never reveals which identifiers are
//! registered.
//!
//! ## Storage
//!
//! Credentials live in a single SQLite database accessed through a `sqlx`
//! pool. The `identifier` column carries a UNIQUE constraint, so a concurrent
//! duplicate registration surfaces as a detectable conflict instead of a
//! second row.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;
