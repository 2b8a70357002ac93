//! Eligibility and skill-match simulation engine for a campus placement portal.
//!
//! Everything under [`workflows::placement`] is pure, synchronous computation over
//! caller-supplied records. Fetching profiles, opportunities and application history
//! from the store is the caller's job, as is forwarding explanation requests.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
