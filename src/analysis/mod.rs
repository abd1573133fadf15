//! Scoring, feedback and result types
//!
//! Turns extracted metrics into the final analysis:
//! - Weighted score
//! - Ranked coaching findings
//! - Optional feedback rewriting
//! - Result types, metadata and persisted records

pub mod findings;
pub mod metadata;
pub mod presentation;
pub mod record;
pub mod result;
pub mod scoring;
