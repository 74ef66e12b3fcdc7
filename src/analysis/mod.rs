//! Analysis modules.
//!
//! The aggregator is the computational core; everything else in the crate
//! loads its inputs or renders its outputs.

pub mod aggregator;

pub use aggregator::*;
