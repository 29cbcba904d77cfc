//! Custom Axum extractors.
//!
//! Both wrap a stock extractor and route its rejection through
//! [`AppError`], so every client error carries the `{"error", "code"}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor whose rejections render as [`AppError`] bodies.
///
/// Malformed JSON, a missing `Content-Type` or an unparseable field all
/// become `400 {"error", "code"}` instead of Axum's plain-text defaults.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor; a non-numeric `{id}` is a JSON 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
