//! Persistence seam for scored evaluations.
//!
//! Records are write-once: a store only ever inserts, reads, lists and
//! deletes whole records.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EvaluationError, Result};
use crate::models::{EvaluationRecord, ProjectInfo};

/// Which project fields a search matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchField {
    #[default]
    ProjectName,
    Description,
    All,
}

impl SearchField {
    /// Case-insensitive substring match over the selected fields.
    pub fn matches(&self, project: &ProjectInfo, query: &str) -> bool {
        let needle = query.to_lowercase();
        let haystack = match self {
            SearchField::ProjectName => project.name.clone(),
            SearchField::Description => project.description.clone().unwrap_or_default(),
            SearchField::All => [
                Some(project.name.as_str()),
                project.description.as_deref(),
                project.version.as_deref(),
                project.team.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
        };
        haystack.to_lowercase().contains(&needle)
    }
}

impl FromStr for SearchField {
    type Err = EvaluationError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "project-name" | "project_name" | "name" => Ok(SearchField::ProjectName),
            "description" => Ok(SearchField::Description),
            "all" => Ok(SearchField::All),
            other => Err(EvaluationError::validation(format!(
                "unknown search field '{other}'"
            ))),
        }
    }
}

fn newest_first(a: &EvaluationRecord, b: &EvaluationRecord) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.evaluation_id.cmp(&b.evaluation_id))
}

#[async_trait]
pub trait EvaluationStore: Send + Sync {
    async fn put(&self, record: &EvaluationRecord) -> Result<Uuid>;

    async fn get(&self, id: Uuid) -> Result<EvaluationRecord>;

    /// Newest first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<EvaluationRecord>>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Newest first; an empty query matches every record.
    async fn search(&self, query: &str, field: SearchField) -> Result<Vec<EvaluationRecord>>;
}

/// Keeps records in a map guarded by an async lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<Uuid, EvaluationRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl EvaluationStore for MemoryStore {
    async fn put(&self, record: &EvaluationRecord) -> Result<Uuid> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.evaluation_id) {
            return Err(EvaluationError::validation(format!(
                "evaluation {} already exists",
                record.evaluation_id
            )));
        }
        records.insert(record.evaluation_id, record.clone());
        Ok(record.evaluation_id)
    }

    async fn get(&self, id: Uuid) -> Result<EvaluationRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(EvaluationError::NotFound(id))
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<EvaluationRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<&EvaluationRecord> = records.values().collect();
        all.sort_by(|a, b| newest_first(a, b));
        Ok(all.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn search(&self, query: &str, field: SearchField) -> Result<Vec<EvaluationRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<EvaluationRecord> = records
            .values()
            .filter(|record| field.matches(&record.project_info, query))
            .cloned()
            .collect();
        found.sort_by(newest_first);
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(EvaluationError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{KanoFeature, SusItem};
    use crate::evaluation::{self, EngineOptions};
    use crate::models::{EvaluationRequest, ProjectInfo, RawKanoAnswer};
    use chrono::Duration;

    fn request(name: &str) -> EvaluationRequest {
        let mut request = EvaluationRequest {
            project_info: ProjectInfo {
                name: name.to_string(),
                ..ProjectInfo::default()
            },
            ..EvaluationRequest::default()
        };
        request.kano_responses.insert(
            KanoFeature::ContextMemory,
            RawKanoAnswer {
                functional: Some(1),
                dysfunctional: Some(5),
            },
        );
        for item in SusItem::ALL {
            request.sus_responses.insert(item, 3);
        }
        request
    }

    fn record(name: &str, age_days: i64) -> EvaluationRecord {
        let mut record = evaluation::evaluate(&request(name), &EngineOptions::default()).unwrap();
        record.created_at -= Duration::days(age_days);
        record
    }

    #[tokio::test]
    async fn put_then_get_returns_same_record() {
        let store = MemoryStore::new();
        let saved = record("Docs Agent", 0);
        let id = store.put(&saved).await.unwrap();
        assert_eq!(id, saved.evaluation_id);
        assert_eq!(store.get(id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn duplicate_put_is_rejected() {
        let store = MemoryStore::new();
        let saved = record("Docs Agent", 0);
        store.put(&saved).await.unwrap();
        assert!(store.put(&saved).await.unwrap_err().is_validation());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let store = MemoryStore::new();
        for (name, age) in [("old", 3), ("newest", 0), ("middle", 1)] {
            store.put(&record(name, age)).await.unwrap();
        }

        let names: Vec<String> = store
            .list(10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.project_info.name)
            .collect();
        assert_eq!(names, vec!["newest", "middle", "old"]);

        let page = store.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].project_info.name, "middle");
        assert!(store.list(5, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_case_insensitively_newest_first() {
        let store = MemoryStore::new();
        let mut older = record("Support Copilot", 2);
        older.project_info.description = Some("Answers billing tickets".to_string());
        let mut newer = record("Billing Assistant", 0);
        newer.project_info.team = Some("Payments".to_string());
        store.put(&older).await.unwrap();
        store.put(&newer).await.unwrap();
        store.put(&record("Docs Agent", 1)).await.unwrap();

        let by_name = store.search("billing", SearchField::ProjectName).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].project_info.name, "Billing Assistant");

        let by_description = store.search("BILLING", SearchField::Description).await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].project_info.name, "Support Copilot");

        let names: Vec<String> = store
            .search("billing", SearchField::All)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.project_info.name)
            .collect();
        assert_eq!(names, vec!["Billing Assistant", "Support Copilot"]);

        let team = store.search("payments", SearchField::All).await.unwrap();
        assert_eq!(team.len(), 1);
        assert!(store.search("payments", SearchField::ProjectName).await.unwrap().is_empty());
        assert_eq!(store.search("", SearchField::ProjectName).await.unwrap().len(), 3);
    }

    #[test]
    fn search_field_parses_from_cli_strings() {
        assert_eq!("project-name".parse::<SearchField>().unwrap(), SearchField::ProjectName);
        assert_eq!(" All ".parse::<SearchField>().unwrap(), SearchField::All);
        assert!("team".parse::<SearchField>().unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.get(id).await.unwrap_err().is_not_found());
        assert!(store.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryStore::new();
        let id = store.put(&record("Docs Agent", 0)).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.get(id).await.unwrap_err().is_not_found());
        assert_eq!(store.len().await, 0);
    }
}
