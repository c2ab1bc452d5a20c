use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::aipet;
use crate::assessment::{self, AssessmentWeights};
use crate::catalog::{AipetQuestionId, KanoFeature, SusItem};
use crate::error::{EvaluationError, Result};
use crate::kano::{self, CoefficientScheme};
use crate::models::{
    EvaluationRecord, EvaluationRequest, KanoEvaluation, KanoPair, ProjectInfo,
};
use crate::sus::{self, PercentileModel};

/// Scoring knobs that are chosen by configuration rather than fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineOptions {
    pub coefficients: CoefficientScheme,
    pub percentile: PercentileModel,
    pub weights: AssessmentWeights,
}

/// A request that passed every boundary check and can be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub project_info: ProjectInfo,
    pub kano: BTreeMap<KanoFeature, KanoPair>,
    pub sus: BTreeMap<SusItem, u8>,
    pub aipet: BTreeMap<AipetQuestionId, String>,
}

pub fn validate(request: &EvaluationRequest) -> Result<ValidatedRequest> {
    let name = request.project_info.name.trim();
    if name.is_empty() {
        return Err(EvaluationError::validation("project name is required"));
    }

    if request.kano_responses.is_empty() {
        return Err(EvaluationError::validation(
            "at least one Kano question must be answered",
        ));
    }
    let mut kano = BTreeMap::new();
    for (feature, answer) in &request.kano_responses {
        let (Some(functional), Some(dysfunctional)) = (answer.functional, answer.dysfunctional)
        else {
            return Err(EvaluationError::validation(format!(
                "Kano question {} needs both a functional and a dysfunctional answer",
                feature.id()
            )));
        };
        let pair = KanoPair::try_new(functional, dysfunctional).map_err(|err| {
            EvaluationError::validation(format!("Kano question {}: {err}", feature.id()))
        })?;
        kano.insert(*feature, pair);
    }

    let missing: Vec<&str> = SusItem::ALL
        .iter()
        .filter(|item| !request.sus_responses.contains_key(*item))
        .map(|item| item.id())
        .collect();
    if !missing.is_empty() {
        return Err(EvaluationError::validation(format!(
            "all SUS questions must be answered, missing: {}",
            missing.join(", ")
        )));
    }
    if let Some((item, value)) = request
        .sus_responses
        .iter()
        .find(|(_, value)| !(1..=5).contains(*value))
    {
        return Err(EvaluationError::validation(format!(
            "SUS answer for {} must be between 1 and 5, got {value}",
            item.id()
        )));
    }

    let mut project_info = request.project_info.clone();
    project_info.name = name.to_string();

    Ok(ValidatedRequest {
        project_info,
        kano,
        sus: request.sus_responses.clone(),
        aipet: request.aipet_responses.clone(),
    })
}

/// Scores a validated request into a complete, immutable record.
pub fn score(request: &ValidatedRequest, options: &EngineOptions) -> Result<EvaluationRecord> {
    let results = kano::analyze_responses(&request.kano, options.coefficients);
    let summary = kano::summarize(&results)?;
    let recommendations = kano::recommendations(&summary);

    let sus_evaluation = sus::evaluate(&request.sus, options.percentile)?;

    let aipet_evaluation = if request.aipet.is_empty() {
        None
    } else {
        Some(aipet::analyze(&request.aipet, &request.kano))
    };

    let overall_assessment = assessment::compose(
        &summary,
        &recommendations,
        &sus_evaluation,
        aipet_evaluation.as_ref(),
        options.weights,
    );

    Ok(EvaluationRecord {
        evaluation_id: Uuid::new_v4(),
        project_info: request.project_info.clone(),
        created_at: Utc::now(),
        kano_evaluation: KanoEvaluation {
            results,
            summary,
            recommendations,
        },
        sus_evaluation,
        aipet_evaluation,
        overall_assessment,
    })
}

pub fn evaluate(request: &EvaluationRequest, options: &EngineOptions) -> Result<EvaluationRecord> {
    let validated = validate(request)?;
    let record = score(&validated, options)?;
    info!(
        evaluation_id = %record.evaluation_id,
        project = %record.project_info.name,
        sus_score = record.sus_evaluation.score,
        overall_score = record.overall_assessment.overall_score,
        "evaluation scored"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KanoCategory, RawKanoAnswer, SusGrade};

    fn raw(functional: u8, dysfunctional: u8) -> RawKanoAnswer {
        RawKanoAnswer {
            functional: Some(functional),
            dysfunctional: Some(dysfunctional),
        }
    }

    fn sample_request() -> EvaluationRequest {
        let mut request = EvaluationRequest {
            project_info: ProjectInfo {
                name: "Interview Copilot".to_string(),
                version: Some("1.2".to_string()),
                ..ProjectInfo::default()
            },
            ..EvaluationRequest::default()
        };
        request
            .kano_responses
            .insert(KanoFeature::ResponseAccuracy, raw(2, 5));
        request
            .kano_responses
            .insert(KanoFeature::ResponseSpeed, raw(1, 5));
        request
            .kano_responses
            .insert(KanoFeature::PrivacyProtection, raw(3, 5));
        request
            .kano_responses
            .insert(KanoFeature::Personalization, raw(1, 3));
        for (item, value) in SusItem::ALL.iter().zip([4, 2, 4, 2, 4, 2, 4, 2, 4, 2]) {
            request.sus_responses.insert(*item, value);
        }
        request
    }

    #[test]
    fn scores_complete_request() {
        let record = evaluate(&sample_request(), &EngineOptions::default()).unwrap();
        assert_eq!(record.project_info.name, "Interview Copilot");
        assert_eq!(record.sus_evaluation.score, 75.0);
        assert_eq!(record.sus_evaluation.grade, SusGrade::C);
        assert_eq!(record.kano_evaluation.summary.total_questions, 4);
        assert_eq!(
            record.kano_evaluation.results[&KanoFeature::ResponseAccuracy].category,
            KanoCategory::MustBe
        );
        assert!(record.aipet_evaluation.is_none());
        assert!(record.overall_assessment.overall_score > 0.0);
    }

    #[test]
    fn aipet_runs_when_follow_up_present() {
        let mut request = sample_request();
        request.aipet_responses.insert(
            AipetQuestionId::P1,
            "Ask every time it wants to read my resume.".to_string(),
        );
        let record = evaluate(&request, &EngineOptions::default()).unwrap();
        let aipet = record.aipet_evaluation.unwrap();
        assert_eq!(aipet.eligible_questions.len(), 3);
        assert_eq!(aipet.answered_questions, 1);
    }

    #[test]
    fn blank_project_name_is_rejected() {
        let mut request = sample_request();
        request.project_info.name = "   ".to_string();
        let err = evaluate(&request, &EngineOptions::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("project name"));
    }

    #[test]
    fn incomplete_kano_pair_is_rejected() {
        let mut request = sample_request();
        request.kano_responses.insert(
            KanoFeature::MultiModal,
            RawKanoAnswer {
                functional: Some(2),
                dysfunctional: None,
            },
        );
        let err = evaluate(&request, &EngineOptions::default()).unwrap_err();
        assert!(err.to_string().contains("multi_modal"));
    }

    #[test]
    fn out_of_range_kano_answer_is_rejected() {
        let mut request = sample_request();
        request
            .kano_responses
            .insert(KanoFeature::MultiModal, raw(6, 1));
        assert!(evaluate(&request, &EngineOptions::default())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn empty_kano_is_rejected() {
        let mut request = sample_request();
        request.kano_responses.clear();
        assert!(evaluate(&request, &EngineOptions::default())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn missing_sus_answer_is_rejected() {
        let mut request = sample_request();
        request.sus_responses.remove(&SusItem::Q10);
        let err = evaluate(&request, &EngineOptions::default()).unwrap_err();
        assert!(err.to_string().contains("q10"));
    }

    #[test]
    fn each_submission_gets_a_fresh_id() {
        let request = sample_request();
        let first = evaluate(&request, &EngineOptions::default()).unwrap();
        let second = evaluate(&request, &EngineOptions::default()).unwrap();
        assert_ne!(first.evaluation_id, second.evaluation_id);
        assert_eq!(first.kano_evaluation, second.kano_evaluation);
    }
}
