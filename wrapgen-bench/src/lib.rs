//! # wrapgen Bench
//!
//! Benchmarking utilities for wrapgen performance testing.

pub mod fixtures;
