//! Conversion between upstream and service data models

pub mod claim_converter;
