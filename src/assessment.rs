use tracing::debug;

use crate::error::{EvaluationError, Result};
use crate::models::{
    Acceptability, ActionSource, AipetAnalysis, KanoCategory, KanoRecommendation, KanoSummary,
    OverallAssessment, Priority, PriorityAction, SusEvaluation,
};

const MAX_KEY_STRENGTHS: usize = 8;
const MAX_PRIORITY_ACTIONS: usize = 5;
const UNACCEPTABLE_SUS: f64 = 51.0;

const MATURITY_LEVELS: [(f64, &str); 4] = [
    (85.0, "Excellent - Market Leading"),
    (75.0, "Good - Competitive"),
    (65.0, "Average - Needs Improvement"),
    (55.0, "Poor - Requires Optimization"),
];

/// Blend of SUS score and Kano health in the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentWeights {
    pub sus: f64,
    pub kano: f64,
}

impl Default for AssessmentWeights {
    fn default() -> Self {
        Self { sus: 0.5, kano: 0.5 }
    }
}

impl AssessmentWeights {
    pub fn from_sus_weight(sus: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&sus) {
            return Err(EvaluationError::validation(format!(
                "SUS weight must be between 0 and 1, got {sus}"
            )));
        }
        Ok(Self {
            sus,
            kano: 1.0 - sus,
        })
    }

    fn normalized(&self) -> (f64, f64) {
        let total = self.sus + self.kano;
        if total <= 0.0 {
            (0.5, 0.5)
        } else {
            (self.sus / total, self.kano / total)
        }
    }
}

fn category_weight(category: KanoCategory) -> f64 {
    match category {
        KanoCategory::OneDimensional | KanoCategory::MustBe | KanoCategory::Attractive => 1.0,
        KanoCategory::Indifferent | KanoCategory::Questionable => 0.5,
        KanoCategory::Reverse => 0.0,
    }
}

/// Kano health on a 0-100 scale from the category distribution.
pub fn kano_health(summary: &KanoSummary) -> f64 {
    KanoCategory::ALL
        .iter()
        .map(|category| summary.percentage(*category) * category_weight(*category))
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

pub fn maturity_level(overall_score: f64) -> &'static str {
    MATURITY_LEVELS
        .iter()
        .find(|(floor, _)| overall_score >= *floor)
        .map(|(_, label)| *label)
        .unwrap_or("Very Poor - Critical Issues")
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Strengths are drawn in turn from SUS, Kano and AIPET so that no single
/// source fills every slot before the cap.
fn key_strengths(
    summary: &KanoSummary,
    sus: &SusEvaluation,
    aipet: Option<&AipetAnalysis>,
) -> Vec<String> {
    let mut from_sus = Vec::new();
    if sus.score >= 80.0 {
        from_sus.push("High user satisfaction".to_string());
    }
    from_sus.extend(sus.detailed_analysis.strengths.iter().cloned());

    let from_kano: Vec<String> = summary
        .priority_features
        .attractive_features
        .iter()
        .map(|feature| format!("Delivers attractive quality: {}", feature.title()))
        .chain(
            summary
                .priority_features
                .one_dimensional_features
                .iter()
                .map(|feature| format!("Strong expected performance: {}", feature.title())),
        )
        .collect();

    let mut from_aipet = Vec::new();
    if let Some(aipet) = aipet {
        if aipet.completion_rate >= 75.0 {
            from_aipet.push("High engagement with agentive UX feedback".to_string());
        }
        let well_covered = aipet
            .dimension_coverage
            .values()
            .filter(|data| data.total > 0 && data.percentage >= 75.0)
            .count();
        if well_covered >= 3 {
            from_aipet.push("Strong user feedback across multiple AIPET dimensions".to_string());
        }
    }

    let sources = [from_sus, from_kano, from_aipet];
    let longest = sources.iter().map(Vec::len).max().unwrap_or(0);
    let mut strengths = Vec::new();
    for index in 0..longest {
        for source in &sources {
            if strengths.len() == MAX_KEY_STRENGTHS {
                return strengths;
            }
            if let Some(label) = source.get(index) {
                push_unique(&mut strengths, label.clone());
            }
        }
    }
    strengths
}

fn critical_issues(summary: &KanoSummary, sus: &SusEvaluation) -> Vec<String> {
    let mut issues = Vec::new();

    if sus.score < UNACCEPTABLE_SUS {
        push_unique(
            &mut issues,
            format!("Usability below the acceptable threshold (SUS {:.1})", sus.score),
        );
    }
    if sus.score < 60.0 {
        push_unique(&mut issues, "Severely insufficient usability".to_string());
    }
    // Policy: Must-be features are reported as unmet whenever SUS acceptability
    // falls short of Acceptable; an acceptable SUS treats them as delivered.
    if sus.acceptability != Acceptability::Acceptable {
        for feature in &summary.priority_features.must_be_features {
            push_unique(
                &mut issues,
                format!("Unmet basic requirement: {}", feature.title()),
            );
        }
    }
    if summary.percentage(KanoCategory::MustBe) > 50.0 {
        push_unique(&mut issues, "Too many unmet basic requirements".to_string());
    }
    if summary.average_dissatisfaction_impact > 0.6 {
        push_unique(&mut issues, "High risk of user dissatisfaction".to_string());
    }

    issues
}

fn priority_actions(
    summary: &KanoSummary,
    recommendations: &[KanoRecommendation],
    sus: &SusEvaluation,
    aipet: Option<&AipetAnalysis>,
) -> Vec<PriorityAction> {
    let mut actions: Vec<PriorityAction> = Vec::new();

    if sus.score < 70.0 {
        actions.push(PriorityAction {
            priority: Priority::High,
            source: ActionSource::Overall,
            action: "Immediately improve system usability".to_string(),
        });
    }
    if summary.percentage(KanoCategory::MustBe) > 40.0 {
        actions.push(PriorityAction {
            priority: Priority::High,
            source: ActionSource::Overall,
            action: "Prioritize meeting basic requirements".to_string(),
        });
    }
    for recommendation in recommendations {
        actions.push(PriorityAction {
            priority: recommendation.priority,
            source: ActionSource::Kano,
            action: format!("{}: {}", recommendation.feature, recommendation.action),
        });
    }
    for suggestion in &sus.detailed_analysis.improvement_suggestions {
        actions.push(PriorityAction {
            priority: suggestion.priority,
            source: ActionSource::Sus,
            action: format!("{}: {}", suggestion.area, suggestion.suggestion),
        });
    }
    if summary.percentage(KanoCategory::OneDimensional) > 30.0 {
        actions.push(PriorityAction {
            priority: Priority::Medium,
            source: ActionSource::Overall,
            action: "Enhance performance of expected features".to_string(),
        });
    }
    if aipet.map(|a| a.completion_rate >= 50.0).unwrap_or(false) {
        actions.push(PriorityAction {
            priority: Priority::Low,
            source: ActionSource::Aipet,
            action: "Use the open-ended feedback to apply AIPET framework recommendations"
                .to_string(),
        });
    }

    let mut unique: Vec<PriorityAction> = Vec::new();
    for action in actions {
        if !unique.iter().any(|existing| existing.action == action.action) {
            unique.push(action);
        }
    }
    unique.sort_by_key(|action| action.priority);
    unique.truncate(MAX_PRIORITY_ACTIONS);
    unique
}

pub fn compose(
    summary: &KanoSummary,
    recommendations: &[KanoRecommendation],
    sus: &SusEvaluation,
    aipet: Option<&AipetAnalysis>,
    weights: AssessmentWeights,
) -> OverallAssessment {
    let (sus_weight, kano_weight) = weights.normalized();
    let health = kano_health(summary);
    let overall_score = (sus.score * sus_weight + health * kano_weight).clamp(0.0, 100.0);
    let maturity = maturity_level(overall_score);
    debug!(overall_score, kano_health = health, maturity, "composed overall assessment");

    OverallAssessment {
        overall_score,
        maturity_level: maturity.to_string(),
        key_strengths: key_strengths(summary, sus, aipet),
        critical_issues: critical_issues(summary, sus),
        priority_actions: priority_actions(summary, recommendations, sus, aipet),
    }
}
