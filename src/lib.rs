//! Linkforge - URL shortener with analytics capture and AI enrichment
//!
//! Core pieces:
//! - `services::allocator`: collision-checked short-code allocation
//! - `services::redirect`: the hot redirect path (atomic click counting,
//!   detached analytics capture)
//! - `analytics`: visit enrichment off the critical path (user agent,
//!   geography, IP normalization)
//! - `ai`: best-effort link enrichment against an external inference
//!   endpoint, with hard timeouts and deterministic fallbacks
//! - `storage`: the abstract link store plus the in-memory backend
//! - `api`: actix-web handlers for redirect and link creation

pub mod ai;
pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
