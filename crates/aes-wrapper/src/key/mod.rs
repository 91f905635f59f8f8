//! Key and IV ownership for a cipher context.
//!
//! # Security invariants
//!
//! - Key bytes are overwritten with zeroes when a [`KeyMaterial`] is dropped.
//! - Neither key bytes nor IV bytes are ever printed by `Debug`, logged, or
//!   included in traces.

pub mod store;

pub use store::{InitVector, KeyMaterial, KeyState};
