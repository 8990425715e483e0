//! Entry composition model.
//!
//! # Responsibility
//! - Define the base content capability and its text/file sources.
//! - Provide stackable decorator layers (password gate, translations).
//! - Define persisted record shapes shared by the stores.
//!
//! # Invariants
//! - Every decorator owns exactly one inner `ContentSource`.
//! - Layers compose in any order and to any depth.

pub mod entry;
pub mod factory;
pub mod multilingual;
pub mod secret;
pub mod source;
