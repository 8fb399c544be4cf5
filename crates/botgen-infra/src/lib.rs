//! Infrastructure layer for botgen.
//!
//! Contains the reqwest implementation of the `BotBackend` port defined in
//! `botgen-core`, configuration loading (`config.toml` plus environment), and
//! reading upload files from disk.

pub mod config;
pub mod http;
pub mod upload;
