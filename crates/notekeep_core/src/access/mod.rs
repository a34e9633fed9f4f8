//! Note authorization chain.
//!
//! # Responsibility
//! - Decide whether an established identity may act on a note.
//! - Define the collaboration capability the decision depends on.
//!
//! # Invariants
//! - Existence is checked before permission: a missing note is `NotFound`
//!   for every actor.
//! - Owners are authorized without consulting the collaboration delegate.
//! - Decisions are recomputed per call; nothing is cached.

pub mod controller;
pub mod delegate;

pub use controller::{AccessController, AccessGrant, OwnershipLookup};
pub use delegate::{CollaborationAccess, CollaborationDelegate, DelegateFailure};
