// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-record retrieval.
//!
//! Notion search cannot filter by parent database or by relation value, so
//! records are found by paging through a workspace search and filtering each
//! batch locally:
//! 1. Search pages, newest edits first
//! 2. Keep pages whose parent is the run-record database
//! 3. Keep pages matching the caller's predicate (member, date present)
//! 4. Follow the cursor until exhausted, rate limited, or out of batches
//! 5. Re-sort by run date, newest first

use crate::error::AppError;
use crate::models::record::{has_date, member_of};
use crate::models::{Page, PageList, RunRecord};
use crate::services::notion::{DatabaseQuery, NotionClient, SearchQuery, MAX_PAGE_SIZE};
use crate::time_utils::parse_notion_date;
use futures_util::future::join_all;
use std::cmp::Reverse;
use std::future::Future;

/// Page size of the latest-records feed.
pub const LATEST_PAGE_SIZE: u32 = 10;

/// The Notion operations record and member retrieval depend on.
pub trait NotionSource {
    fn search_pages(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<PageList, AppError>> + Send;

    fn read_page(&self, page_id: &str) -> impl Future<Output = Result<Page, AppError>> + Send;

    fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> impl Future<Output = Result<PageList, AppError>> + Send;
}

impl NotionSource for NotionClient {
    fn search_pages(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<PageList, AppError>> + Send {
        NotionClient::search_pages(self, query)
    }

    fn read_page(&self, page_id: &str) -> impl Future<Output = Result<Page, AppError>> + Send {
        NotionClient::read_page(self, page_id)
    }

    fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> impl Future<Output = Result<PageList, AppError>> + Send {
        NotionClient::query_database(self, database_id, query)
    }
}

/// How far a search scan may go.
#[derive(Debug, Clone, Copy)]
pub struct ScanPlan {
    pub page_size: u32,
    pub max_batches: u32,
    pub follow_cursor: bool,
}

impl ScanPlan {
    /// Walk every search batch, up to `max_batches`.
    pub fn full(max_batches: u32) -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_batches: max_batches.max(1),
            follow_cursor: true,
        }
    }

    /// One small batch of the most recently edited pages.
    pub fn latest() -> Self {
        Self {
            page_size: LATEST_PAGE_SIZE,
            max_batches: 1,
            follow_cursor: false,
        }
    }
}

/// Search for pages of one database that satisfy `keep`.
///
/// A rate-limited batch ends the scan with whatever has matched so far;
/// any other failure aborts it.
pub async fn scan_database_pages<S, F>(
    source: &S,
    database_id: &str,
    plan: ScanPlan,
    mut keep: F,
) -> Result<Vec<Page>, AppError>
where
    S: NotionSource,
    F: FnMut(&Page) -> bool,
{
    let mut matched: Vec<Page> = Vec::new();
    let mut cursor: Option<String> = None;

    for batch in 1..=plan.max_batches {
        let query = SearchQuery::recently_edited(plan.page_size, cursor.take());
        let list = match source.search_pages(&query).await {
            Ok(list) => list,
            Err(e) if e.is_rate_limited() => {
                tracing::warn!(
                    batch,
                    found = matched.len(),
                    "Rate limited, returning records found so far"
                );
                return Ok(matched);
            }
            Err(e) => return Err(e),
        };

        let in_database: Vec<Page> = list
            .pages()
            .into_iter()
            .filter(|p| p.parent_database_id().as_deref() == Some(database_id))
            .collect();
        let in_database_count = in_database.len();
        let before = matched.len();
        matched.extend(in_database.into_iter().filter(|p| keep(p)));

        tracing::debug!(
            batch,
            results = list.results.len(),
            in_database = in_database_count,
            matched = matched.len() - before,
            total = matched.len(),
            "Search batch scanned"
        );

        if !plan.follow_cursor || !list.has_more {
            return Ok(matched);
        }
        match list.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                tracing::warn!(batch, "Search reported more results without a cursor");
                return Ok(matched);
            }
        }
    }

    tracing::warn!(
        max_batches = plan.max_batches,
        found = matched.len(),
        "Search batch limit reached, returning records found so far"
    );
    Ok(matched)
}

/// All dated records of one member, newest first.
pub async fn member_records<S: NotionSource>(
    source: &S,
    database_id: &str,
    member_id: &str,
    max_batches: u32,
) -> Result<Vec<RunRecord>, AppError> {
    let pages = scan_database_pages(source, database_id, ScanPlan::full(max_batches), |page| {
        has_date(page) && member_of(page).as_deref() == Some(member_id)
    })
    .await?;

    let mut records: Vec<RunRecord> = pages.iter().map(RunRecord::from_page).collect();
    sort_newest_first(&mut records);

    tracing::debug!(member_id, count = records.len(), "Member records collected");
    Ok(records)
}

/// The most recently edited dated records, re-read in full, newest run first.
///
/// Each match is re-fetched concurrently; a failed read drops that record
/// without affecting the others.
pub async fn latest_records<S: NotionSource + Sync>(
    source: &S,
    database_id: &str,
) -> Result<Vec<RunRecord>, AppError> {
    let matches = scan_database_pages(source, database_id, ScanPlan::latest(), has_date).await?;

    let reads = matches.iter().map(|page| async move {
        match source.read_page(&page.id).await {
            Ok(full) => Some(full),
            Err(e) => {
                tracing::warn!(page_id = %page.id, error = %e, "Page read failed, skipping");
                None
            }
        }
    });
    let pages = join_all(reads).await;

    let mut records: Vec<RunRecord> = pages
        .iter()
        .flatten()
        .filter(|page| has_date(page))
        .map(RunRecord::from_page_with_member)
        .collect();
    sort_newest_first(&mut records);
    Ok(records)
}

/// Order by run date descending; undated or unparsable records go last.
pub fn sort_newest_first(records: &mut [RunRecord]) {
    records.sort_by_cached_key(|r| Reverse(parse_notion_date(&r.date)));
}
