//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entry composition, persistence and file exchange into
//!   use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod journal_service;
