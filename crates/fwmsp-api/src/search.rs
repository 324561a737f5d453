// Fan-out search across entity types.
//
// One independent sub-request per requested entity type, reusing each
// entity's list endpoint with a `query` parameter. Sub-requests may fail;
// the aggregator itself never does. Each failure is captured inline in
// that entity's slot and the remaining types are still fetched.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::client::MspClient;
use crate::types::{ListQuery, ListResponse, SearchEntity};

/// Outcome of one entity type's sub-request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum SearchOutcome {
    #[serde(rename_all = "camelCase")]
    Hits {
        count: u64,
        results: Vec<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_cursor: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Failed { error: String },
}

/// Combined result of a global search, keyed by entity type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub query: String,
    /// Total hits summed across successful entity types only.
    pub total: u64,
    pub results: BTreeMap<String, SearchOutcome>,
}

impl MspClient {
    /// Search one entity type's list endpoint, returning raw records.
    pub async fn search_entity(
        &self,
        entity: SearchEntity,
        query: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<ListResponse<Value>, crate::Error> {
        let params = ListQuery {
            query: Some(query.to_owned()),
            limit,
            cursor: cursor.map(str::to_owned),
            ..ListQuery::default()
        };
        // Raw JSON records: search results cross entity types and are
        // rendered generically downstream.
        self.get_with_params(entity.path(), &params.to_params())
            .await
    }

    /// Search every requested entity type, collecting partial successes
    /// and failures independently. Sub-requests run in sequence; the
    /// result map is keyed by entity type, so no ordering is observable.
    pub async fn search_all(
        &self,
        query: &str,
        types: &[SearchEntity],
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> SearchReport {
        let mut results = BTreeMap::new();
        let mut total: u64 = 0;

        for &entity in types {
            match self.search_entity(entity, query, limit, cursor).await {
                Ok(page) => {
                    let count = page
                        .count
                        .unwrap_or_else(|| u64::try_from(page.results.len()).unwrap_or(u64::MAX));
                    total += count;
                    results.insert(
                        entity.to_string(),
                        SearchOutcome::Hits {
                            count,
                            results: page.results,
                            next_cursor: page.next_cursor,
                        },
                    );
                }
                Err(e) => {
                    warn!("search sub-request for {entity} failed: {e}");
                    results.insert(
                        entity.to_string(),
                        SearchOutcome::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        SearchReport {
            query: query.to_owned(),
            total,
            results,
        }
    }
}
