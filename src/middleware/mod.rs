// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (method gate, CORS, security headers).

pub mod endpoint;
pub mod security;

pub use endpoint::{gate, Endpoint};
