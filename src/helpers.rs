use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query,
    },
};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime};
use tracing::debug;

use crate::error::{RestErr, RestResult};

/// `2006-01-02 15:04:05` style stamp stored in the user timestamp columns.
pub fn date_string(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    // The format only holds numeric components, which cannot fail to render.
    at.format(&format).unwrap_or_default()
}

pub fn now_string() -> String {
    date_string(OffsetDateTime::now_utc())
}

/// `limit`/`offset` query pair; both are required.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> RestResult<Self> {
        if limit < 0 {
            return Err(RestErr::bad_request("limit should not be negative"));
        }
        if offset < 0 {
            return Err(RestErr::bad_request("offset should not be negative"));
        }
        Ok(Self { limit, offset })
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub result: &'static str,
}

impl SuccessResponse {
    pub fn success() -> Self {
        Self { result: "success" }
    }
}

pub fn int_param(name: &str, raw: Result<Path<i64>, PathRejection>) -> RestResult<i64> {
    match raw {
        Ok(Path(v)) if v < 0 => Err(RestErr::bad_request(format!(
            "{name} should not be negative"
        ))),
        Ok(Path(v)) => Ok(v),
        Err(e) => {
            debug!(param = name, error = %e, "invalid path parameter");
            Err(RestErr::bad_request(format!("{name} should be a number")))
        }
    }
}

pub fn pagination(raw: Result<Query<Pagination>, QueryRejection>) -> RestResult<Pagination> {
    match raw {
        Ok(Query(p)) => Pagination::new(p.limit, p.offset),
        Err(e) => {
            debug!(error = %e, "invalid pagination query");
            Err(RestErr::bad_request(
                "limit and offset are required and should be numbers",
            ))
        }
    }
}

pub fn json_body<T>(raw: Result<Json<T>, JsonRejection>) -> RestResult<T> {
    match raw {
        Ok(Json(v)) => Ok(v),
        Err(e) => {
            debug!(error = %e, "invalid json body");
            Err(RestErr::bad_request("invalid json body"))
        }
    }
}
