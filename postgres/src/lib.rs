//! PostgreSQL support for tether
//!
//! This crate turns [`Value`](tether_core::Value)s into PostgreSQL literal text,
//! decodes simple-query column text back into values, and renders the fixed
//! statement shapes the repository and hydrator issue.

pub mod builder;
pub mod values;

pub use builder::{InsertStatement, JoinInsert};
pub use values::{EncodeError, decode, encode, literal};
