//! Domain model for accounts, notes and collaborations.
//!
//! # Responsibility
//! - Define identifiers and records shared by repositories and services.
//! - Own input validation rules that must run before storage is touched.
//!
//! # Invariants
//! - Identifiers are opaque strings; no code parses their structure.
//! - Public account views never carry password hashes.

pub mod account;
pub mod ids;
pub mod note;
pub mod validation;
