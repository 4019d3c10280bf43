//! Composite outbreak-risk scoring for geographic regions.
//!
//! The [`risk`] module holds the scoring, intervention and projection
//! engines together with the reference data they consume. The remaining
//! modules carry the service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod risk;
pub mod telemetry;
