use crate::{Error, Result, SearchEngine};
use log::debug;
use serde_json::Value;

/// The largest window the engine can serve with direct offset/limit access.
pub const MAX_RESULT_WINDOW: u64 = 10_000;

/// How a requested window will be fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPlan {
    /// Direct offset/limit access.
    Direct,

    /// Forward-only cursor walk from the start of the sorted match set.
    Scroll,
}

impl FetchPlan {
    /// Picks the fetch plan for a requested window.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat_elastic::FetchPlan;
    ///
    /// assert_eq!(FetchPlan::for_window(0, 10), FetchPlan::Direct);
    /// assert_eq!(FetchPlan::for_window(9999, 5), FetchPlan::Scroll);
    /// ```
    pub fn for_window(offset: u64, limit: u64) -> FetchPlan {
        if offset + limit > MAX_RESULT_WINDOW {
            FetchPlan::Scroll
        } else {
            FetchPlan::Direct
        }
    }
}

/// Fetches `[offset, offset + limit)` of the matched set, returning the raw
/// hits and the match count.
///
/// In scroll mode the reported count is `offset + returned` — an
/// approximation, since the walk stops as soon as the window is filled and a
/// true total is never computed.
pub(crate) async fn execute<E: SearchEngine>(
    engine: &E,
    index: &str,
    body: &Value,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Value>, u64)> {
    match FetchPlan::for_window(offset, limit) {
        FetchPlan::Direct => {
            let response = engine.search(index, body, offset, limit).await?;
            let matched = response
                .pointer("/hits/total/value")
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    Error::Query("malformed search response: missing hits.total.value".to_string())
                })?;
            let hits = response
                .pointer("/hits/hits")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Ok((hits, matched))
        }
        FetchPlan::Scroll => {
            debug!("window exceeds {MAX_RESULT_WINDOW}; walking a scroll cursor");
            let mut rows: Vec<Value> = Vec::new();
            let mut cursor: Option<String> = None;
            let mut skipped = 0;
            'walk: loop {
                let page = engine.scroll(index, body, cursor.as_deref()).await?;
                if page.hits.is_empty() {
                    break;
                }
                for hit in page.hits {
                    if skipped < offset {
                        skipped += 1;
                        continue;
                    }
                    if (rows.len() as u64) < limit {
                        rows.push(hit);
                    }
                    if rows.len() as u64 == limit {
                        break 'walk;
                    }
                }
                cursor = page.cursor;
                if cursor.is_none() {
                    break;
                }
            }
            let matched = offset + rows.len() as u64;
            Ok((rows, matched))
        }
    }
}
