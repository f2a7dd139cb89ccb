//! Query and aggregation trees consumed by the complexity analyzer
//!
//! The trees are built by the caller (usually the DSL decoder) and handed to
//! the analyzer read-only. Children are owned, so a tree is always finite and
//! acyclic.

use std::mem;

/// Concrete kind of a leaf query clause.
///
/// The analyzer never looks at this; it only exists so that callers and
/// explain output can tell leaves apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    Term,
    Terms,
    Match,
    MatchPhrase,
    MultiMatch,
    Range,
    Exists,
    Prefix,
    Fuzzy,
    Regexp,
    Ids,
    MatchAll,
    MatchNone,
    /// Any query kind not listed above
    Other(String),
}

impl LeafKind {
    /// Resolves a DSL kind name. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "term" => LeafKind::Term,
            "terms" => LeafKind::Terms,
            "match" => LeafKind::Match,
            "match_phrase" => LeafKind::MatchPhrase,
            "multi_match" => LeafKind::MultiMatch,
            "range" => LeafKind::Range,
            "exists" => LeafKind::Exists,
            "prefix" => LeafKind::Prefix,
            "fuzzy" => LeafKind::Fuzzy,
            "regexp" => LeafKind::Regexp,
            "ids" => LeafKind::Ids,
            "match_all" => LeafKind::MatchAll,
            "match_none" => LeafKind::MatchNone,
            other => LeafKind::Other(other.to_string()),
        }
    }

    /// Returns the DSL name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            LeafKind::Term => "term",
            LeafKind::Terms => "terms",
            LeafKind::Match => "match",
            LeafKind::MatchPhrase => "match_phrase",
            LeafKind::MultiMatch => "multi_match",
            LeafKind::Range => "range",
            LeafKind::Exists => "exists",
            LeafKind::Prefix => "prefix",
            LeafKind::Fuzzy => "fuzzy",
            LeafKind::Regexp => "regexp",
            LeafKind::Ids => "ids",
            LeafKind::MatchAll => "match_all",
            LeafKind::MatchNone => "match_none",
            LeafKind::Other(name) => name,
        }
    }
}

/// A childless query clause such as term, match or range
#[derive(Debug, Clone, PartialEq)]
pub struct LeafQuery {
    pub kind: LeafKind,
    /// Target field, when the clause names one
    pub field: Option<String>,
}

/// A wildcard pattern clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardQuery {
    pub field: String,
    pub pattern: String,
}

/// Boolean combinator over three ordered clause lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<QueryNode>,
    pub should: Vec<QueryNode>,
    pub must_not: Vec<QueryNode>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `must` clause
    pub fn must(mut self, query: QueryNode) -> Self {
        self.must.push(query);
        self
    }

    /// Adds a `should` clause
    pub fn should(mut self, query: QueryNode) -> Self {
        self.should.push(query);
        self
    }

    /// Adds a `must_not` clause
    pub fn must_not(mut self, query: QueryNode) -> Self {
        self.must_not.push(query);
        self
    }

    /// Iterates over all clauses: must, then should, then must_not
    pub fn clauses(&self) -> impl Iterator<Item = &QueryNode> {
        self.must
            .iter()
            .chain(self.should.iter())
            .chain(self.must_not.iter())
    }

    /// Total number of direct clauses
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }
}

// Children are unlinked onto a local stack so that dropping a deep tree does
// not recurse once per level.
impl Drop for BoolQuery {
    fn drop(&mut self) {
        let mut pending: Vec<QueryNode> = Vec::new();
        pending.append(&mut self.must);
        pending.append(&mut self.should);
        pending.append(&mut self.must_not);

        while let Some(node) = pending.pop() {
            if let QueryNode::Bool(mut inner) = node {
                pending.append(&mut inner.must);
                pending.append(&mut inner.should);
                pending.append(&mut inner.must_not);
            }
        }
    }
}

impl From<BoolQuery> for QueryNode {
    fn from(query: BoolQuery) -> Self {
        QueryNode::Bool(query)
    }
}

/// A node in the query expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Leaf(LeafQuery),
    Wildcard(WildcardQuery),
    Bool(BoolQuery),
}

impl QueryNode {
    /// Create a leaf clause of the given kind
    pub fn leaf(kind: LeafKind, field: impl Into<String>) -> Self {
        QueryNode::Leaf(LeafQuery {
            kind,
            field: Some(field.into()),
        })
    }

    /// Create a term clause
    pub fn term(field: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Term, field)
    }

    /// Create a match clause
    pub fn r#match(field: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Match, field)
    }

    /// Create a range clause
    pub fn range(field: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Range, field)
    }

    /// Create a match_all clause
    pub fn match_all() -> Self {
        QueryNode::Leaf(LeafQuery {
            kind: LeafKind::MatchAll,
            field: None,
        })
    }

    /// Create a wildcard clause
    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        QueryNode::Wildcard(WildcardQuery {
            field: field.into(),
            pattern: pattern.into(),
        })
    }

    /// Returns the DSL name of this clause
    pub fn kind_name(&self) -> &str {
        match self {
            QueryNode::Leaf(leaf) => leaf.kind.as_str(),
            QueryNode::Wildcard(_) => "wildcard",
            QueryNode::Bool(_) => "bool",
        }
    }
}

/// Concrete kind of an aggregation. Never affects the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationKind {
    Terms,
    Avg,
    Sum,
    Min,
    Max,
    Cardinality,
    ValueCount,
    Stats,
    Histogram,
    DateHistogram,
    Range,
    Filter,
    Filters,
    Nested,
    TopHits,
    Other(String),
}

impl AggregationKind {
    /// Resolves a DSL kind name. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "terms" => AggregationKind::Terms,
            "avg" => AggregationKind::Avg,
            "sum" => AggregationKind::Sum,
            "min" => AggregationKind::Min,
            "max" => AggregationKind::Max,
            "cardinality" => AggregationKind::Cardinality,
            "value_count" => AggregationKind::ValueCount,
            "stats" => AggregationKind::Stats,
            "histogram" => AggregationKind::Histogram,
            "date_histogram" => AggregationKind::DateHistogram,
            "range" => AggregationKind::Range,
            "filter" => AggregationKind::Filter,
            "filters" => AggregationKind::Filters,
            "nested" => AggregationKind::Nested,
            "top_hits" => AggregationKind::TopHits,
            other => AggregationKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AggregationKind::Terms => "terms",
            AggregationKind::Avg => "avg",
            AggregationKind::Sum => "sum",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::Cardinality => "cardinality",
            AggregationKind::ValueCount => "value_count",
            AggregationKind::Stats => "stats",
            AggregationKind::Histogram => "histogram",
            AggregationKind::DateHistogram => "date_histogram",
            AggregationKind::Range => "range",
            AggregationKind::Filter => "filter",
            AggregationKind::Filters => "filters",
            AggregationKind::Nested => "nested",
            AggregationKind::TopHits => "top_hits",
            AggregationKind::Other(name) => name,
        }
    }
}

/// A node in an aggregation tree
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationNode {
    /// Caller-chosen aggregation name
    pub name: String,
    pub kind: AggregationKind,
    pub sub_aggregations: Vec<AggregationNode>,
}

impl AggregationNode {
    /// Creates an aggregation without sub-aggregations
    pub fn new(name: impl Into<String>, kind: AggregationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sub_aggregations: Vec::new(),
        }
    }

    /// Adds a sub-aggregation
    pub fn with_sub_aggregation(mut self, sub: AggregationNode) -> Self {
        self.sub_aggregations.push(sub);
        self
    }
}

impl Drop for AggregationNode {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.sub_aggregations);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.sub_aggregations);
        }
    }
}
