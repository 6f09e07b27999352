// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Property names of the club's Notion databases.

/// Member database.
pub mod member {
    pub const NAME: &str = "Name";
    pub const RUN_COUNT: &str = "누적 달린 횟수";
    pub const RUN_MINUTES: &str = "누적 달린 시간";
    pub const GROUP: &str = "그룹";
    pub const LOCATION: &str = "주활동";
    pub const GENERATION: &str = "기수";
}

/// Run-record database.
pub mod record {
    pub const TITLE: &str = "오늘의 한줄 제목/Story";
    /// Relation to the member page. The trailing backtick is part of the name.
    pub const MEMBER: &str = "이름`";
    pub const DATE: &str = "달린 날짜";
    pub const DURATION: &str = "달린 시간(분)";
    pub const LOCATION: &str = "달린 장소";
    pub const BEFORE: &str = "달리기 전 생각/느낌";
    pub const DURING: &str = "달리기 중 생각/느낌";
    pub const AFTER: &str = "달리기 후 생각/느낌";
}
