//! Request and response bodies of the HTTP API.
//!
//! Domain types ([`Template`](linepatch_core::Template),
//! [`FileTarget`](linepatch_core::FileTarget), ...) already serialise with
//! the camelCase field names the UI expects, so they are used directly.  The
//! types here only cover request envelopes and small response payloads.
//!
//! # `ApiResponse<T>` wrapper
//!
//! Every response body, success or failure, has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`, so the UI can
//! always read `success` before touching `data`.

use std::collections::BTreeMap;

use linepatch_core::ModificationTask;
use serde::{Deserialize, Serialize};

/// Unified response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Body of `POST /api/files/find-matches`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesRequest {
    pub file_path: String,
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// Body of `POST /api/apply`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default)]
    pub modifications: Vec<ModificationTask>,
}

/// Body of the per-template pre-check and apply routes: item id or name to
/// new value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesRequest {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Data of `POST /api/files/current-value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentValueDto {
    pub value: String,
}

/// Data of `DELETE /api/templates/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedDto {
    pub id: String,
}
