//! Shared domain types for botgen.
//!
//! This crate contains the types used across the bot creation form: the form
//! fields, uploaded files, per-session step state, the backend wire shapes,
//! user-facing notices, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, thiserror, secrecy.

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod notice;
pub mod session;
