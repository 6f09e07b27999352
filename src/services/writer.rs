// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-record creation with a same-day duplicate guard.
//!
//! The check and the write are two separate Notion calls, so two clients
//! saving the same day at the same moment can both succeed.

use crate::error::AppError;
use crate::models::NewRunRecord;
use crate::services::notion::{CreatedPage, DatabaseQuery, NotionClient, PageParent};

/// Writes run records into the run-record data source.
pub struct RecordWriter<'a> {
    client: &'a NotionClient,
    data_source_id: &'a str,
}

impl<'a> RecordWriter<'a> {
    pub fn new(client: &'a NotionClient, data_source_id: &'a str) -> Self {
        Self {
            client,
            data_source_id,
        }
    }

    /// Whether the member already has a record on this date.
    pub async fn has_duplicate(&self, record: &NewRunRecord) -> Result<bool, AppError> {
        let query = DatabaseQuery {
            filter: Some(record.duplicate_filter()),
            ..Default::default()
        };
        let existing = self
            .client
            .query_database(self.data_source_id, &query)
            .await?;
        Ok(!existing.results.is_empty())
    }

    /// Create the record unless one exists for the same member and day.
    ///
    /// `force` on the record skips the duplicate check.
    pub async fn save(&self, record: &NewRunRecord) -> Result<CreatedPage, AppError> {
        if !record.force && self.has_duplicate(record).await? {
            tracing::info!(
                member_id = %record.member_id,
                date = %record.date,
                "Duplicate run record rejected"
            );
            return Err(AppError::Duplicate);
        }

        let parent = PageParent::DataSourceId {
            data_source_id: self.data_source_id.to_string(),
        };
        let created = self
            .client
            .create_page(&parent, record.to_properties())
            .await
            .map_err(AppError::passthrough)?;

        tracing::info!(
            page_id = %created.id,
            member_id = %record.member_id,
            date = %record.date,
            forced = record.force,
            "Run record created"
        );
        Ok(created)
    }
}
