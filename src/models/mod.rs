// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod member;
pub mod notion;
pub mod record;
pub mod schema;

pub use member::{LeaderboardEntry, Member, MemberSummary};
pub use notion::{Page, PageList};
pub use record::{NewRunRecord, RunRecord};
