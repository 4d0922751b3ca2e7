//! API data models
//!
//! This module contains data structures for the upstream fact-check search
//! API and for this service's own request/response bodies.

pub mod fact_check;
pub mod google;
