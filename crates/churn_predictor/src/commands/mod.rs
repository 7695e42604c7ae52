//! CLI command implementations.

pub mod models;
pub mod promote;
pub mod schedule;
pub mod serve;
pub mod train;
