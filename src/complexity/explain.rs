//! Complexity breakdown report
//!
//! Produces deterministic, human-readable explain output showing where the
//! score of a request comes from.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::analyzer::{children, wildcard_penalty};
use super::ast::{AggregationNode, QueryNode};
use super::weights::{AGGREGATION_NODE_COST, QUERY_NODE_COST};

/// Per-category breakdown of a complexity score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityReport {
    /// Query clauses of any kind
    pub query_nodes: u64,
    /// Bool clauses (subset of `query_nodes`)
    pub bool_nodes: u64,
    /// Wildcard clauses (subset of `query_nodes`)
    pub wildcard_nodes: u64,
    /// Aggregations at any depth
    pub aggregation_nodes: u64,
    /// Top-level aggregations
    pub aggregation_roots: u64,
    /// Deepest query nesting (0 without a query)
    pub max_query_depth: u64,
    /// Deepest aggregation nesting (0 without aggregations)
    pub max_aggregation_depth: u64,
    pub query_score: u64,
    pub aggregation_score: u64,
    /// Equals `ComplexityAnalyzer::calculate` on the same input
    pub total: u64,
}

impl ComplexityReport {
    /// Builds the report for a request
    pub fn build(query: Option<&QueryNode>, aggregations: &[AggregationNode]) -> Self {
        let mut report = Self::default();

        let mut pending: Vec<(&QueryNode, u64)> = query.into_iter().map(|q| (q, 1)).collect();
        while let Some((node, depth)) = pending.pop() {
            report.query_nodes += 1;
            report.max_query_depth = report.max_query_depth.max(depth);
            report.query_score += QUERY_NODE_COST;

            if matches!(node, QueryNode::Bool(_)) {
                report.bool_nodes += 1;
            }
            let penalty = wildcard_penalty(node);
            if penalty > 0 {
                report.wildcard_nodes += 1;
                report.query_score += penalty;
            }

            pending.extend(children(node).map(|child| (child, depth + 1)));
        }

        report.aggregation_roots = aggregations.len() as u64;
        let mut pending: Vec<(&AggregationNode, u64)> =
            aggregations.iter().map(|a| (a, 1)).collect();
        while let Some((node, depth)) = pending.pop() {
            report.aggregation_nodes += 1;
            report.max_aggregation_depth = report.max_aggregation_depth.max(depth);
            report.aggregation_score += AGGREGATION_NODE_COST;
            pending.extend(node.sub_aggregations.iter().map(|sub| (sub, depth + 1)));
        }

        report.total = report.query_score + report.aggregation_score;
        report
    }
}

impl fmt::Display for ComplexityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== COMPLEXITY ===")?;
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "Query Score: {}", self.query_score)?;
        writeln!(
            f,
            "  Clauses: {} (bool: {}, wildcard: {})",
            self.query_nodes, self.bool_nodes, self.wildcard_nodes
        )?;
        writeln!(f, "  Max Depth: {}", self.max_query_depth)?;
        writeln!(f, "Aggregation Score: {}", self.aggregation_score)?;
        writeln!(
            f,
            "  Aggregations: {} ({} top-level)",
            self.aggregation_nodes, self.aggregation_roots
        )?;
        writeln!(f, "  Max Depth: {}", self.max_aggregation_depth)?;
        Ok(())
    }
}
