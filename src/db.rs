use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{AipetQuestionId, KanoFeature, SusItem};
use crate::error::{EvaluationError, Result};
use crate::evaluation::{self, EngineOptions};
use crate::models::{EvaluationRecord, EvaluationRequest, ProjectInfo, RawKanoAnswer};
use crate::store::{EvaluationStore, SearchField};

const DEMO_EVALUATION_ID: &str = "6f1c2a9e-4b7d-4c3a-9e52-1d8b0f7a2c41";

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Evaluations persisted as JSONB alongside a few indexed summary columns.
#[derive(Debug, Clone)]
pub struct PgEvaluationStore {
    pool: PgPool,
}

impl PgEvaluationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ILIKE` pattern matching `query` anywhere, with wildcards in it escaped.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn search_sql(field: SearchField) -> &'static str {
    match field {
        SearchField::ProjectName => {
            r#"
            SELECT record FROM usability_eval.evaluations
            WHERE project_name ILIKE $1
            ORDER BY created_at DESC, id
            "#
        }
        SearchField::Description => {
            r#"
            SELECT record FROM usability_eval.evaluations
            WHERE coalesce(record->'project_info'->>'description', '') ILIKE $1
            ORDER BY created_at DESC, id
            "#
        }
        SearchField::All => {
            r#"
            SELECT record FROM usability_eval.evaluations
            WHERE concat_ws(' ',
                project_name,
                record->'project_info'->>'description',
                record->'project_info'->>'version',
                record->'project_info'->>'team') ILIKE $1
            ORDER BY created_at DESC, id
            "#
        }
    }
}

#[async_trait]
impl EvaluationStore for PgEvaluationStore {
    async fn put(&self, record: &EvaluationRecord) -> Result<Uuid> {
        let result = sqlx::query(
            r#"
            INSERT INTO usability_eval.evaluations
            (id, project_name, created_at, sus_score, overall_score, record)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.evaluation_id)
        .bind(&record.project_info.name)
        .bind(record.created_at)
        .bind(record.sus_evaluation.score)
        .bind(record.overall_assessment.overall_score)
        .bind(Json(record))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EvaluationError::validation(format!(
                "evaluation {} already exists",
                record.evaluation_id
            )));
        }
        debug!(evaluation_id = %record.evaluation_id, "stored evaluation");
        Ok(record.evaluation_id)
    }

    async fn get(&self, id: Uuid) -> Result<EvaluationRecord> {
        let row = sqlx::query("SELECT record FROM usability_eval.evaluations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(EvaluationError::NotFound(id))?;
        let Json(record): Json<EvaluationRecord> = row.try_get("record")?;
        Ok(record)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<EvaluationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT record FROM usability_eval.evaluations
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        decode_records(rows)
    }

    async fn search(&self, query: &str, field: SearchField) -> Result<Vec<EvaluationRecord>> {
        let rows = sqlx::query(search_sql(field))
            .bind(contains_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        debug!(?field, matches = rows.len(), "searched evaluations");
        decode_records(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM usability_eval.evaluations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(EvaluationError::NotFound(id));
        }
        info!(evaluation_id = %id, "deleted evaluation");
        Ok(())
    }
}

fn decode_records(rows: Vec<PgRow>) -> Result<Vec<EvaluationRecord>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Json(record): Json<EvaluationRecord> = row.try_get("record")?;
        records.push(record);
    }
    Ok(records)
}

fn demo_request() -> EvaluationRequest {
    let mut request = EvaluationRequest {
        project_info: ProjectInfo {
            name: "Meeting Notes Agent".to_string(),
            description: Some("Summarizes calls and drafts follow-up tasks".to_string()),
            version: Some("0.9.0".to_string()),
            team: Some("Productivity".to_string()),
        },
        ..EvaluationRequest::default()
    };

    let kano = [
        (KanoFeature::ResponseAccuracy, 2, 5),
        (KanoFeature::ResponseSpeed, 1, 4),
        (KanoFeature::ContextMemory, 1, 5),
        (KanoFeature::Personalization, 1, 3),
        (KanoFeature::MultiModal, 3, 3),
        (KanoFeature::PrivacyProtection, 2, 5),
        (KanoFeature::ErrorHandling, 3, 5),
        (KanoFeature::NaturalConversation, 1, 3),
    ];
    for (feature, functional, dysfunctional) in kano {
        request.kano_responses.insert(
            feature,
            RawKanoAnswer {
                functional: Some(functional),
                dysfunctional: Some(dysfunctional),
            },
        );
    }

    for (item, value) in SusItem::ALL.iter().zip([4, 2, 4, 1, 4, 2, 5, 2, 4, 2]) {
        request.sus_responses.insert(*item, value);
    }

    request.aipet_responses.insert(
        AipetQuestionId::E2,
        "Let me pin the action-item format I use for each team.".to_string(),
    );
    request.aipet_responses.insert(
        AipetQuestionId::T1,
        "Tell me which part of the transcript it was unsure about.".to_string(),
    );
    request
}

/// Inserts a single demo evaluation; reruns are no-ops.
pub async fn seed(pool: &PgPool, options: &EngineOptions) -> anyhow::Result<Uuid> {
    let mut record = evaluation::evaluate(&demo_request(), options)?;
    record.evaluation_id = Uuid::parse_str(DEMO_EVALUATION_ID)?;

    match PgEvaluationStore::new(pool.clone()).put(&record).await {
        Ok(_) => info!(evaluation_id = %record.evaluation_id, "seeded demo evaluation"),
        Err(err) if err.is_validation() => {
            debug!(evaluation_id = %record.evaluation_id, "demo evaluation already present")
        }
        Err(err) => return Err(err.into()),
    }
    Ok(record.evaluation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_request_scores_cleanly() {
        let record = evaluation::evaluate(&demo_request(), &EngineOptions::default()).unwrap();
        assert_eq!(record.sus_evaluation.score, 80.0);
        let aipet = record.aipet_evaluation.unwrap();
        assert_eq!(aipet.answered_questions, 2);
        assert!(aipet.ignored_responses.is_empty());
    }

    #[test]
    fn search_patterns_escape_wildcards() {
        assert_eq!(contains_pattern("notes"), "%notes%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn demo_id_is_valid() {
        assert!(Uuid::parse_str(DEMO_EVALUATION_ID).is_ok());
    }
}
