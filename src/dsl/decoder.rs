//! Search body decoder
//!
//! Turns an Elasticsearch-style JSON search body into the trees the
//! complexity analyzer consumes.
//!
//! ```text
//! {
//!   "query": { "bool": { "must": [ { "term": { "user": "kimchy" } } ] } },
//!   "aggs":  { "by_tag": { "terms": { "field": "tag" }, "aggs": { ... } } }
//! }
//! ```

use serde_json::{Map, Value};

use crate::complexity::{
    AggregationKind, AggregationNode, BoolQuery, LeafKind, LeafQuery, QueryNode, WildcardQuery,
};

use super::errors::{DslError, DslResult};

/// A decoded search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: Option<QueryNode>,
    pub aggregations: Vec<AggregationNode>,
}

/// Decodes a full search body.
///
/// Keys other than `query`, `aggs` and `aggregations` (size, sort, ...) are
/// ignored.
pub fn decode_request(body: &Value) -> DslResult<SearchRequest> {
    let path = "$";
    let object = as_object(body, path)?;

    let query = object
        .get("query")
        .map(|q| decode_clause(q, &format!("{}.query", path)))
        .transpose()?;

    let aggregations = match sub_aggregations(object, path)? {
        Some((key, aggs)) => decode_aggregation_map(aggs, &format!("{}.{}", path, key))?,
        None => Vec::new(),
    };

    Ok(SearchRequest { query, aggregations })
}

/// Decodes a single query clause
pub fn decode_query(clause: &Value) -> DslResult<QueryNode> {
    decode_clause(clause, "$")
}

/// Decodes an aggregation map (`name -> aggregation body`)
pub fn decode_aggregations(aggs: &Value) -> DslResult<Vec<AggregationNode>> {
    decode_aggregation_map(aggs, "$")
}

fn decode_clause(clause: &Value, path: &str) -> DslResult<QueryNode> {
    let object = as_object(clause, path)?;
    let (kind, body) = single_entry(object, path)?;
    let body_path = format!("{}.{}", path, kind);

    match kind.as_str() {
        "bool" => decode_bool(body, &body_path).map(QueryNode::Bool),
        "wildcard" => decode_wildcard(body, &body_path).map(QueryNode::Wildcard),
        other => Ok(QueryNode::Leaf(LeafQuery {
            kind: LeafKind::from_name(other),
            field: leaf_field(body),
        })),
    }
}

fn decode_bool(body: &Value, path: &str) -> DslResult<BoolQuery> {
    let object = as_object(body, path)?;
    let mut query = BoolQuery::new();

    // `filter` clauses cost the same as `must` clauses.
    for key in ["must", "filter"] {
        if let Some(value) = object.get(key) {
            query.must.extend(decode_clause_list(value, key, path)?);
        }
    }
    if let Some(value) = object.get("should") {
        query.should = decode_clause_list(value, "should", path)?;
    }
    if let Some(value) = object.get("must_not") {
        query.must_not = decode_clause_list(value, "must_not", path)?;
    }

    Ok(query)
}

/// A bool occurrence holds either one clause or an array of clauses
fn decode_clause_list(value: &Value, key: &str, path: &str) -> DslResult<Vec<QueryNode>> {
    let list_path = format!("{}.{}", path, key);
    match value {
        Value::Object(_) => Ok(vec![decode_clause(value, &list_path)?]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_clause(item, &format!("{}[{}]", list_path, i)))
            .collect(),
        _ => Err(DslError::InvalidBoolClause {
            path: path.to_string(),
            key: key.to_string(),
        }),
    }
}

fn decode_wildcard(body: &Value, path: &str) -> DslResult<WildcardQuery> {
    let object = as_object(body, path)?;
    let (field, spec) = object
        .iter()
        .next()
        .ok_or_else(|| DslError::EmptyClause { path: path.to_string() })?;

    // Short form `{"field": "val*"}` or long form `{"field": {"value": "val*"}}`
    let pattern = match spec {
        Value::String(s) => s.clone(),
        Value::Object(params) => params
            .get("value")
            .or_else(|| params.get("wildcard"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    Ok(WildcardQuery {
        field: field.clone(),
        pattern,
    })
}

/// Best-effort field name of a leaf clause body
fn leaf_field(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    if let Some(field) = object.get("field").and_then(Value::as_str) {
        return Some(field.to_string());
    }
    if object.len() == 1 {
        return object.keys().next().cloned();
    }
    None
}

fn decode_aggregation_map(aggs: &Value, path: &str) -> DslResult<Vec<AggregationNode>> {
    let object = as_object(aggs, path)?;
    object
        .iter()
        .map(|(name, body)| decode_aggregation(name, body, &format!("{}.{}", path, name)))
        .collect()
}

fn decode_aggregation(name: &str, body: &Value, path: &str) -> DslResult<AggregationNode> {
    let object = as_object(body, path)?;

    let kinds: Vec<&String> = object
        .keys()
        .filter(|k| !matches!(k.as_str(), "aggs" | "aggregations" | "meta"))
        .collect();
    let kind = match kinds.as_slice() {
        [kind] => AggregationKind::from_name(kind),
        [] => return Err(DslError::MissingAggregationKind { path: path.to_string() }),
        many => {
            return Err(DslError::MultipleKinds {
                path: path.to_string(),
                kinds: join_keys(many.iter().copied()),
            })
        }
    };

    let sub_aggregations = match sub_aggregations(object, path)? {
        Some((key, subs)) => decode_aggregation_map(subs, &format!("{}.{}", path, key))?,
        None => Vec::new(),
    };

    Ok(AggregationNode {
        name: name.to_string(),
        kind,
        sub_aggregations,
    })
}

/// Looks up the `aggs` / `aggregations` entry of an object
fn sub_aggregations<'a>(
    object: &'a Map<String, Value>,
    path: &str,
) -> DslResult<Option<(&'static str, &'a Value)>> {
    match (object.get("aggs"), object.get("aggregations")) {
        (Some(_), Some(_)) => Err(DslError::DuplicateAggregationsKey { path: path.to_string() }),
        (Some(aggs), None) => Ok(Some(("aggs", aggs))),
        (None, Some(aggs)) => Ok(Some(("aggregations", aggs))),
        (None, None) => Ok(None),
    }
}

/// Returns the only entry of a clause object
fn single_entry<'a>(object: &'a Map<String, Value>, path: &str) -> DslResult<(&'a String, &'a Value)> {
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        (None, _) => Err(DslError::EmptyClause { path: path.to_string() }),
        (Some(_), Some(_)) => Err(DslError::MultipleKinds {
            path: path.to_string(),
            kinds: join_keys(object.keys()),
        }),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> DslResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| DslError::NotAnObject {
        path: path.to_string(),
        found: json_type(value),
    })
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_term_query() {
        let query = decode_query(&json!({ "term": { "user": "kimchy" } })).unwrap();
        assert_eq!(query, QueryNode::term("user"));
    }

    #[test]
    fn test_decode_wildcard_forms() {
        let short = decode_query(&json!({ "wildcard": { "field3": "val*" } })).unwrap();
        let long = decode_query(&json!({ "wildcard": { "field3": { "value": "val*" } } })).unwrap();

        assert_eq!(short, QueryNode::wildcard("field3", "val*"));
        assert_eq!(long, short);
    }

    #[test]
    fn test_decode_bool_single_and_array() {
        let query = decode_query(&json!({
            "bool": {
                "must": { "term": { "a": 1 } },
                "should": [ { "match": { "b": "x" } }, { "range": { "c": { "gte": 1 } } } ],
                "minimum_should_match": 1
            }
        }))
        .unwrap();

        match query {
            QueryNode::Bool(b) => {
                assert_eq!(b.must.len(), 1);
                assert_eq!(b.should.len(), 2);
                assert!(b.must_not.is_empty());
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_appended_to_must() {
        let query = decode_query(&json!({
            "bool": {
                "must": [ { "term": { "a": 1 } } ],
                "filter": [ { "term": { "b": 2 } } ]
            }
        }))
        .unwrap();

        match query {
            QueryNode::Bool(b) => assert_eq!(b.must.len(), 2),
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_field_extraction() {
        let exists = decode_query(&json!({ "exists": { "field": "email" } })).unwrap();
        assert_eq!(exists, QueryNode::leaf(LeafKind::Exists, "email"));

        let all = decode_query(&json!({ "match_all": {} })).unwrap();
        assert_eq!(all, QueryNode::match_all());
    }

    #[test]
    fn test_unknown_kind_is_leaf() {
        let query = decode_query(&json!({ "geo_distance": { "distance": "2km", "pin": [1, 2] } }))
            .unwrap();
        match query {
            QueryNode::Leaf(leaf) => {
                assert_eq!(leaf.kind, LeafKind::Other("geo_distance".into()));
                assert_eq!(leaf.field, None);
            }
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_clause_rejected() {
        let err = decode_query(&json!({})).unwrap_err();
        assert_eq!(err.code(), "QC_DSL_EMPTY_CLAUSE");
    }

    #[test]
    fn test_multiple_kinds_rejected() {
        let err = decode_query(&json!({ "term": { "a": 1 }, "match": { "b": 2 } })).unwrap_err();
        assert_eq!(err.code(), "QC_DSL_MULTIPLE_KINDS");
    }

    #[test]
    fn test_invalid_bool_clause_path() {
        let err = decode_query(&json!({ "bool": { "must": [ { "bool": { "should": "x" } } ] } }))
            .unwrap_err();
        assert_eq!(err.code(), "QC_DSL_INVALID_BOOL_CLAUSE");
        assert_eq!(err.path(), "$.bool.must[0].bool");
    }

    #[test]
    fn test_decode_nested_aggregations() {
        let aggs = decode_aggregations(&json!({
            "by_tag": {
                "terms": { "field": "tag" },
                "aggs": {
                    "avg_price": { "avg": { "field": "price" } },
                    "max_price": { "max": { "field": "price" } }
                }
            }
        }))
        .unwrap();

        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs[0].kind, AggregationKind::Terms);
        assert_eq!(aggs[0].sub_aggregations.len(), 2);
    }

    #[test]
    fn test_aggregation_without_kind_rejected() {
        let err = decode_aggregations(&json!({ "broken": { "meta": {} } })).unwrap_err();
        assert_eq!(err.code(), "QC_DSL_MISSING_AGGREGATION_KIND");
        assert_eq!(err.path(), "$.broken");
    }

    #[test]
    fn test_duplicate_aggregations_key_rejected() {
        let err = decode_request(&json!({ "aggs": {}, "aggregations": {} })).unwrap_err();
        assert_eq!(err.code(), "QC_DSL_DUPLICATE_AGGREGATIONS");
    }

    #[test]
    fn test_request_body_must_be_object() {
        let err = decode_request(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            DslError::NotAnObject {
                path: "$".into(),
                found: "array"
            }
        );
    }

    #[test]
    fn test_decode_request_without_query() {
        let request = decode_request(&json!({ "size": 0 })).unwrap();
        assert_eq!(request, SearchRequest::default());
    }
}
