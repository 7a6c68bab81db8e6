//! Reelqueue - per-person film queues with TMDB metadata
//!
//! This library crate exposes the core functionality for integration testing.

pub mod bootstrap;
pub mod config;
pub mod enrichment;
pub mod metadata;
pub mod repository;
pub mod services;
