//! Data types for prospect discovery.

pub mod candidate;
pub mod config;
pub mod prospect;
pub mod request;
pub mod result;
