// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member directory: fetching the member database and ranking it.

use crate::error::AppError;
use crate::models::schema::member as props;
use crate::models::{LeaderboardEntry, Member, MemberSummary};
use crate::services::notion::{DatabaseQuery, PropertySort, SortDirection};
use crate::services::records::NotionSource;

/// Read every member page, following the query cursor up to `max_batches`.
pub async fn fetch_members<S: NotionSource>(
    source: &S,
    database_id: &str,
    sort_by_name: bool,
    max_batches: u32,
) -> Result<Vec<Member>, AppError> {
    let sorts = if sort_by_name {
        vec![PropertySort {
            property: props::NAME.to_string(),
            direction: SortDirection::Ascending,
        }]
    } else {
        Vec::new()
    };

    let mut members = Vec::new();
    let mut cursor = None;
    for batch in 1..=max_batches.max(1) {
        let query = DatabaseQuery {
            sorts: sorts.clone(),
            start_cursor: cursor.take(),
            ..Default::default()
        };
        let list = source.query_database(database_id, &query).await?;
        members.extend(list.pages().iter().map(Member::from_page));

        tracing::debug!(batch, total = members.len(), "Member batch fetched");

        match (list.has_more, list.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => return Ok(members),
        }
    }

    tracing::warn!(max_batches, "Member query batch limit reached");
    Ok(members)
}

/// Members who have run at least once, most runs first.
///
/// Ties keep the order Notion returned them in.
pub fn rank_leaderboard(members: Vec<Member>) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<LeaderboardEntry> = members
        .into_iter()
        .filter(|m| m.run_count > 0)
        .map(LeaderboardEntry::from)
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Member picker list, in the order Notion sorted it (by `Name`).
pub fn member_list(members: Vec<Member>) -> Vec<MemberSummary> {
    members.into_iter().map(MemberSummary::from).collect()
}
