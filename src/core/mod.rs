//! Core application modules
//!
//! This module contains configuration, constants, logging, the fact-check
//! source abstraction and its implementations, and image enrichment.

pub mod config;
pub mod constants;
pub mod enricher;
pub mod logging;
pub mod source;
pub mod sources;
