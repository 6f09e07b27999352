// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-endpoint method gate and CORS headers.
//!
//! Every function endpoint accepts exactly one method plus `OPTIONS`.
//! Preflight requests get an empty 200, anything else a 405 JSON error.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The method an endpoint serves.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    allow_methods: &'static str,
}

impl Endpoint {
    pub const GET: Endpoint = Endpoint {
        method: Method::GET,
        allow_methods: "GET, OPTIONS",
    };

    pub const POST: Endpoint = Endpoint {
        method: Method::POST,
        allow_methods: "POST, OPTIONS",
    };
}

/// Answer preflight, reject other methods, and stamp CORS headers on everything.
pub async fn gate(State(endpoint): State<Endpoint>, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else if req.method() != endpoint.method {
        tracing::debug!(method = %req.method(), uri = %req.uri(), "Method not allowed");
        AppError::MethodNotAllowed.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(endpoint.allow_methods),
    );

    response
}
