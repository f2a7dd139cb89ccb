//! querycost - Complexity scoring for search requests
//!
//! Estimates how expensive a search request is before it runs, as a single
//! integer that callers compare against their own limits.

pub mod cli;
pub mod complexity;
pub mod dsl;
pub mod observability;
