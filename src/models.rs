use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{AipetDimension, AipetQuestionId, KanoFeature, SusItem};
use crate::error::EvaluationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KanoCategory {
    #[serde(rename = "Must-be")]
    MustBe,
    #[serde(rename = "One-dimensional")]
    OneDimensional,
    Attractive,
    Indifferent,
    Reverse,
    Questionable,
}

impl KanoCategory {
    pub const ALL: [KanoCategory; 6] = [
        KanoCategory::MustBe,
        KanoCategory::OneDimensional,
        KanoCategory::Attractive,
        KanoCategory::Indifferent,
        KanoCategory::Reverse,
        KanoCategory::Questionable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KanoCategory::MustBe => "Must-be",
            KanoCategory::OneDimensional => "One-dimensional",
            KanoCategory::Attractive => "Attractive",
            KanoCategory::Indifferent => "Indifferent",
            KanoCategory::Reverse => "Reverse",
            KanoCategory::Questionable => "Questionable",
        }
    }
}

/// One side of a Kano pair on the five-point answer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum KanoAnswer {
    Like = 1,
    MustBe = 2,
    Neutral = 3,
    LiveWith = 4,
    Dislike = 5,
}

impl KanoAnswer {
    pub const ALL: [KanoAnswer; 5] = [
        KanoAnswer::Like,
        KanoAnswer::MustBe,
        KanoAnswer::Neutral,
        KanoAnswer::LiveWith,
        KanoAnswer::Dislike,
    ];

    /// Zero-based row/column in the evaluation table.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for KanoAnswer {
    type Error = EvaluationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(KanoAnswer::Like),
            2 => Ok(KanoAnswer::MustBe),
            3 => Ok(KanoAnswer::Neutral),
            4 => Ok(KanoAnswer::LiveWith),
            5 => Ok(KanoAnswer::Dislike),
            other => Err(EvaluationError::validation(format!(
                "Kano answer must be between 1 and 5, got {other}"
            ))),
        }
    }
}

impl From<KanoAnswer> for u8 {
    fn from(answer: KanoAnswer) -> Self {
        answer as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KanoPair {
    pub functional: KanoAnswer,
    pub dysfunctional: KanoAnswer,
}

impl KanoPair {
    pub fn new(functional: KanoAnswer, dysfunctional: KanoAnswer) -> Self {
        Self {
            functional,
            dysfunctional,
        }
    }

    pub fn try_new(functional: u8, dysfunctional: u8) -> Result<Self, EvaluationError> {
        Ok(Self::new(
            KanoAnswer::try_from(functional)?,
            KanoAnswer::try_from(dysfunctional)?,
        ))
    }

    pub fn has_neutral(&self) -> bool {
        self.functional == KanoAnswer::Neutral || self.dysfunctional == KanoAnswer::Neutral
    }
}

/// A Kano pair exactly as submitted; either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKanoAnswer {
    #[serde(default)]
    pub functional: Option<u8>,
    #[serde(default)]
    pub dysfunctional: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KanoResult {
    pub category: KanoCategory,
    pub satisfaction_impact: f64,
    pub dissatisfaction_impact: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityFeatures {
    pub must_be_features: Vec<KanoFeature>,
    pub one_dimensional_features: Vec<KanoFeature>,
    pub attractive_features: Vec<KanoFeature>,
    pub by_category: BTreeMap<KanoCategory, Vec<KanoFeature>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanoSummary {
    pub category_counts: BTreeMap<KanoCategory, usize>,
    pub category_percentages: BTreeMap<KanoCategory, f64>,
    pub total_questions: usize,
    pub average_satisfaction_impact: f64,
    pub average_dissatisfaction_impact: f64,
    pub priority_features: PriorityFeatures,
}

impl KanoSummary {
    pub fn percentage(&self, category: KanoCategory) -> f64 {
        self.category_percentages
            .get(&category)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn features(&self, category: KanoCategory) -> &[KanoFeature] {
        self.priority_features
            .by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanoRecommendation {
    pub priority: Priority,
    pub category: String,
    pub feature_id: KanoFeature,
    pub feature: String,
    pub description: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanoEvaluation {
    pub results: BTreeMap<KanoFeature, KanoResult>,
    pub summary: KanoSummary,
    pub recommendations: Vec<KanoRecommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SusGrade {
    A,
    B,
    C,
    D,
    F,
}

impl SusGrade {
    pub const ALL: [SusGrade; 5] = [SusGrade::A, SusGrade::B, SusGrade::C, SusGrade::D, SusGrade::F];

    pub fn label(&self) -> &'static str {
        match self {
            SusGrade::A => "A",
            SusGrade::B => "B",
            SusGrade::C => "C",
            SusGrade::D => "D",
            SusGrade::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Acceptability {
    #[serde(rename = "Not Acceptable")]
    NotAcceptable,
    Marginal,
    Acceptable,
}

impl Acceptability {
    pub fn label(&self) -> &'static str {
        match self {
            Acceptability::NotAcceptable => "Not Acceptable",
            Acceptability::Marginal => "Marginal",
            Acceptability::Acceptable => "Acceptable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performance {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question: String,
    pub response: u8,
    pub normalized_score: u8,
    pub performance: Performance,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub item: SusItem,
    pub priority: Priority,
    pub area: String,
    pub current_score: u8,
    pub suggestion: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub your_score: f64,
    pub industry_average: f64,
    pub difference_from_average: f64,
    pub percentile: f64,
    pub benchmark_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SusDetailedAnalysis {
    pub question_analysis: BTreeMap<SusItem, QuestionAnalysis>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub benchmark_comparison: BenchmarkComparison,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SusEvaluation {
    pub score: f64,
    pub grade: SusGrade,
    pub percentile: f64,
    pub adjective_rating: String,
    pub acceptability: Acceptability,
    pub detailed_analysis: SusDetailedAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionCoverage {
    pub name: String,
    pub answered: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Neutral,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AipetAnalysis {
    pub eligible_questions: Vec<AipetQuestionId>,
    pub answered_questions: usize,
    pub completion_rate: f64,
    pub dimension_coverage: BTreeMap<AipetDimension, DimensionCoverage>,
    pub insights: Vec<Insight>,
    pub warnings: Vec<String>,
    pub ignored_responses: Vec<AipetQuestionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionSource {
    Kano,
    Sus,
    Aipet,
    Overall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAction {
    pub priority: Priority,
    pub source: ActionSource,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub overall_score: f64,
    pub maturity_level: String,
    pub key_strengths: Vec<String>,
    pub critical_issues: Vec<String>,
    pub priority_actions: Vec<PriorityAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// Everything a respondent submits for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationRequest {
    pub project_info: ProjectInfo,
    pub kano_responses: BTreeMap<KanoFeature, RawKanoAnswer>,
    pub sus_responses: BTreeMap<SusItem, u8>,
    #[serde(default)]
    pub aipet_responses: BTreeMap<AipetQuestionId, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluation_id: Uuid,
    pub project_info: ProjectInfo,
    pub created_at: DateTime<Utc>,
    pub kano_evaluation: KanoEvaluation,
    pub sus_evaluation: SusEvaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aipet_evaluation: Option<AipetAnalysis>,
    pub overall_assessment: OverallAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationStatistics {
    pub total_evaluations: usize,
    pub average_sus_score: f64,
    pub grade_distribution: BTreeMap<SusGrade, CategoryShare>,
    pub kano_category_distribution: BTreeMap<KanoCategory, CategoryShare>,
    pub evaluation_trend: Vec<MonthlyCount>,
}
