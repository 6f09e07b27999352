// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod members;
pub mod notion;
pub mod records;
pub mod writer;

pub use notion::NotionClient;
pub use records::NotionSource;
pub use writer::RecordWriter;
