//! facewarp-test - Regression test framework for facewarp
//!
//! Provides [`RegParams`], a lightweight accumulator for regression tests:
//! each comparison increments an index and records failures, and
//! [`RegParams::cleanup`] reports the outcome at the end of the test.
//!
//! # Usage
//!
//! ```
//! use facewarp_test::RegParams;
//!
//! let mut rp = RegParams::new("example");
//! rp.compare_values(4.0, 2.0 + 2.0, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! The [`fixtures`] module supplies synthetic rasters and landmark sets
//! shared by the regression tests.

mod params;

pub mod fixtures;

pub use params::RegParams;
