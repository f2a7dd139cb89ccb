//! Fixed cost weights
//!
//! Weights are compile-time constants. They are not calibrated against
//! execution time and cannot be changed at runtime.

/// Base cost of every query clause
pub const QUERY_NODE_COST: u64 = 1;

/// Extra cost of a wildcard clause, on top of `QUERY_NODE_COST`
pub const WILDCARD_PENALTY: u64 = 20;

/// Base cost of every aggregation, whatever its kind
pub const AGGREGATION_NODE_COST: u64 = 5;
