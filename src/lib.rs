//! # parmap
//!
//! Order-preserving parallel map over a fixed worker budget.
//!
//! ## Usage
//!
//! ```bash
//! parmap run [--workers N] [--size N] [--fail-at INDEX]
//! parmap bench [--workers N] [--size N] [--json]
//! parmap config
//! ```
//!
//! ## Modules
//!
//! - `mapper` - The parallel mapper: static partitioning, scoped workers, first-failure-wins propagation
//! - `config` - TOML configuration with `PARMAP_*` environment overrides
//! - `error` - Unified error type with numeric codes and exit codes
//! - `benchmark` - Sequential baseline versus parallel timing reports
//! - `transforms` - Sample pixel transforms used by the CLI
pub mod benchmark;
pub mod config;
pub mod error;
pub mod mapper;
pub mod transforms;

#[cfg(test)]
mod property_tests;

pub use error::{ParmapError, Result};
pub use mapper::{MapError, ParallelMapper, Partition};
