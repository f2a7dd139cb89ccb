//! Search DSL decoding
//!
//! Builds query and aggregation trees from a JSON search body. Only the
//! structure matters here: field values, boosts and other parameters are
//! read where they name a field and otherwise ignored.

mod decoder;
mod errors;

pub use decoder::{decode_aggregations, decode_query, decode_request, SearchRequest};
pub use errors::{DslError, DslResult};
