//! Form orchestration for botgen.
//!
//! This crate defines the `BotBackend` port that the infrastructure layer
//! implements, and the `FormOrchestrator` that owns one form session and
//! drives the knowledge base, voice clone, and bot creation steps against it.
//! It depends only on `botgen-types` -- never on `botgen-infra` or any HTTP
//! crate.

pub mod backend;
pub mod orchestrator;
pub mod outcome;
