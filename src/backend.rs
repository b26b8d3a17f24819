use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::Result;
use crate::model::SearchQuery;

/// Seam to the external job-search provider.
///
/// Implementations return the provider's payload as untrusted JSON;
/// the formatter owns all shape checking.
pub trait JobSearchBackend: Send + Sync {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<Value>>;
}
