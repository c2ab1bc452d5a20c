//! Request boundary: parses submitted payloads, runs the pipeline against a
//! store, and wraps every outcome in a `{success, data | error}` envelope.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EvaluationError, Result};
use crate::evaluation::{self, EngineOptions};
use crate::models::{EvaluationRecord, EvaluationRequest};
use crate::store::{EvaluationStore, SearchField};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(err) => Envelope::failed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub evaluation_id: Uuid,
}

/// Parse errors are validation failures: they name the offending field or
/// question id as reported by serde.
pub fn parse_request(payload: &str) -> Result<EvaluationRequest> {
    serde_json::from_str(payload)
        .map_err(|err| EvaluationError::validation(format!("invalid request: {err}")))
}

pub async fn submit<S: EvaluationStore + ?Sized>(
    store: &S,
    payload: &str,
    options: &EngineOptions,
) -> Envelope<EvaluationRecord> {
    let outcome = async {
        let request = parse_request(payload)?;
        let record = evaluation::evaluate(&request, options)?;
        store.put(&record).await?;
        info!(evaluation_id = %record.evaluation_id, "evaluation submitted");
        Ok::<_, EvaluationError>(record)
    }
    .await;
    log_failure("submit", &outcome);
    outcome.into()
}

/// Scores without persisting.
pub fn preview(payload: &str, options: &EngineOptions) -> Envelope<EvaluationRecord> {
    let outcome = parse_request(payload).and_then(|request| evaluation::evaluate(&request, options));
    log_failure("preview", &outcome);
    outcome.into()
}

pub async fn fetch<S: EvaluationStore + ?Sized>(store: &S, id: Uuid) -> Envelope<EvaluationRecord> {
    let outcome = store.get(id).await;
    log_failure("fetch", &outcome);
    outcome.into()
}

pub async fn list<S: EvaluationStore + ?Sized>(
    store: &S,
    limit: usize,
    offset: usize,
) -> Envelope<Vec<EvaluationRecord>> {
    let outcome = store.list(limit, offset).await;
    log_failure("list", &outcome);
    outcome.into()
}

pub async fn search<S: EvaluationStore + ?Sized>(
    store: &S,
    query: &str,
    field: SearchField,
) -> Envelope<Vec<EvaluationRecord>> {
    let outcome = store.search(query, field).await;
    log_failure("search", &outcome);
    outcome.into()
}

pub async fn remove<S: EvaluationStore + ?Sized>(store: &S, id: Uuid) -> Envelope<Deleted> {
    let outcome = store
        .delete(id)
        .await
        .map(|_| Deleted { evaluation_id: id });
    log_failure("delete", &outcome);
    outcome.into()
}

fn log_failure<T>(operation: &str, outcome: &Result<T>) {
    if let Err(err) = outcome {
        warn!(operation, error = %err, "request failed");
    }
}
