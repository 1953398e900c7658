//! CLI command implementations

pub mod config;
pub mod plan;
pub mod quiz;
pub mod serve;
pub mod summarize;
