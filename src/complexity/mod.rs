//! Complexity scoring for search requests
//!
//! Estimates the cost of a request before it runs, as a single integer.
//!
//! # Cost Model
//!
//! - Every query clause: 1
//! - Wildcard clause: +20
//! - Bool clause: + cost of every must, should and must_not clause
//! - Every aggregation: 5 + cost of its sub-aggregations
//!
//! The analyzer is a pure function of its inputs. It holds no state, performs
//! no I/O and never fails.

mod analyzer;
mod ast;
mod explain;
mod weights;

pub use analyzer::ComplexityAnalyzer;
pub use ast::{
    AggregationKind, AggregationNode, BoolQuery, LeafKind, LeafQuery, QueryNode, WildcardQuery,
};
pub use explain::ComplexityReport;
pub use weights::{AGGREGATION_NODE_COST, QUERY_NODE_COST, WILDCARD_PENALTY};
