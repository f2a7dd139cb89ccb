//! Complexity analyzer
//!
//! Walks a query tree and a list of aggregation trees and sums a fixed cost
//! per node:
//!
//! - every query clause costs `QUERY_NODE_COST`
//! - a wildcard clause adds `WILDCARD_PENALTY`
//! - a bool clause adds the cost of each must, should and must_not clause
//! - every aggregation costs `AGGREGATION_NODE_COST` plus its sub-aggregations
//!
//! The walk uses an explicit stack, so tree depth is bounded only by memory.

use super::ast::{AggregationNode, QueryNode};
use super::weights::{AGGREGATION_NODE_COST, QUERY_NODE_COST, WILDCARD_PENALTY};

/// Stateless complexity analyzer.
///
/// Same inputs → same score. Safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityAnalyzer;

impl ComplexityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Computes the total complexity of a search request.
    ///
    /// An absent query contributes 0, as does an empty aggregation list.
    pub fn calculate(&self, query: Option<&QueryNode>, aggregations: &[AggregationNode]) -> u64 {
        let mut complexity = self.query_complexity(query);
        for aggregation in aggregations {
            complexity += self.aggregation_complexity(Some(aggregation));
        }
        complexity
    }

    /// Computes the complexity of a query tree
    pub fn query_complexity(&self, query: Option<&QueryNode>) -> u64 {
        let mut pending: Vec<&QueryNode> = query.into_iter().collect();
        let mut score = 0;

        while let Some(node) = pending.pop() {
            score += QUERY_NODE_COST;
            // Both checks apply independently.
            pending.extend(children(node));
            score += wildcard_penalty(node);
        }

        score
    }

    /// Computes the complexity of an aggregation tree
    pub fn aggregation_complexity(&self, aggregation: Option<&AggregationNode>) -> u64 {
        let mut pending: Vec<&AggregationNode> = aggregation.into_iter().collect();
        let mut score = 0;

        while let Some(node) = pending.pop() {
            score += AGGREGATION_NODE_COST;
            pending.extend(node.sub_aggregations.iter());
        }

        score
    }
}

/// Direct child clauses of a query node. Only bool clauses have children.
pub(crate) fn children(node: &QueryNode) -> impl Iterator<Item = &QueryNode> {
    let clauses = match node {
        QueryNode::Bool(bool_query) => Some(bool_query.clauses()),
        QueryNode::Leaf(_) | QueryNode::Wildcard(_) => None,
    };
    clauses.into_iter().flatten()
}

/// Pattern-matching penalty of a single query node
pub(crate) fn wildcard_penalty(node: &QueryNode) -> u64 {
    match node {
        QueryNode::Wildcard(_) => WILDCARD_PENALTY,
        QueryNode::Leaf(_) | QueryNode::Bool(_) => 0,
    }
}
