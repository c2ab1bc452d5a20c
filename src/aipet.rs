//! Analysis of the optional open-ended AIPET follow-up.
//!
//! A follow-up question only counts when the Kano feature it hangs off was
//! answered neutrally on either side of the pair; everything else the
//! respondent typed is kept out of the coverage numbers.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{AipetDimension, AipetQuestionId, KanoFeature};
use crate::models::{AipetAnalysis, DimensionCoverage, Insight, InsightKind, KanoPair};

const LONG_RESPONSE_CHARS: usize = 2000;
const SHORT_RESPONSE_CHARS: usize = 10;

fn is_answered(text: Option<&String>) -> bool {
    text.map(|value| !value.trim().is_empty()).unwrap_or(false)
}

pub fn eligible_questions(kano: &BTreeMap<KanoFeature, KanoPair>) -> Vec<AipetQuestionId> {
    AipetQuestionId::ALL
        .iter()
        .copied()
        .filter(|id| {
            kano.get(&id.trigger())
                .map(KanoPair::has_neutral)
                .unwrap_or(false)
        })
        .collect()
}

pub fn response_warnings(responses: &BTreeMap<AipetQuestionId, String>) -> Vec<String> {
    let mut warnings = Vec::new();
    for (id, text) in responses {
        let length = text.trim().chars().count();
        if length > LONG_RESPONSE_CHARS {
            warnings.push(format!(
                "Response to {id:?} is quite long ({length} characters). Consider being more concise."
            ));
        } else if length > 0 && length < SHORT_RESPONSE_CHARS {
            warnings.push(format!(
                "Response to {id:?} seems quite brief. Consider providing more detail if possible."
            ));
        }
    }
    warnings
}

pub fn analyze(
    responses: &BTreeMap<AipetQuestionId, String>,
    kano: &BTreeMap<KanoFeature, KanoPair>,
) -> AipetAnalysis {
    let eligible_questions = eligible_questions(kano);
    let answered: Vec<AipetQuestionId> = eligible_questions
        .iter()
        .copied()
        .filter(|id| is_answered(responses.get(id)))
        .collect();
    let ignored_responses: Vec<AipetQuestionId> = responses
        .keys()
        .copied()
        .filter(|id| !eligible_questions.contains(id))
        .collect();

    let completion_rate = if eligible_questions.is_empty() {
        0.0
    } else {
        answered.len() as f64 / eligible_questions.len() as f64 * 100.0
    };

    let dimension_coverage: BTreeMap<AipetDimension, DimensionCoverage> = AipetDimension::ALL
        .iter()
        .map(|dimension| {
            let total = eligible_questions
                .iter()
                .filter(|id| id.dimension() == *dimension)
                .count();
            let answered = answered
                .iter()
                .filter(|id| id.dimension() == *dimension)
                .count();
            let percentage = if total > 0 {
                answered as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            (
                *dimension,
                DimensionCoverage {
                    name: dimension.name().to_string(),
                    answered,
                    total,
                    percentage,
                },
            )
        })
        .collect();

    let insights = if completion_rate > 0.0 {
        insights(completion_rate, &dimension_coverage)
    } else {
        Vec::new()
    };

    debug!(
        eligible = eligible_questions.len(),
        answered = answered.len(),
        completion_rate,
        "analyzed AIPET follow-up"
    );

    AipetAnalysis {
        eligible_questions,
        answered_questions: answered.len(),
        completion_rate,
        dimension_coverage,
        insights,
        warnings: response_warnings(responses),
        ignored_responses,
    }
}

fn insights(
    completion_rate: f64,
    coverage: &BTreeMap<AipetDimension, DimensionCoverage>,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let engagement = if completion_rate >= 80.0 {
        Insight {
            kind: InsightKind::Positive,
            title: "High Engagement".to_string(),
            description: format!(
                "Excellent participation with {completion_rate:.0}% of the follow-up answered. This feedback gives a detailed view of the agent experience."
            ),
        }
    } else if completion_rate >= 50.0 {
        Insight {
            kind: InsightKind::Neutral,
            title: "Moderate Engagement".to_string(),
            description: format!(
                "Good participation with {completion_rate:.0}% of the follow-up answered. Answering the remaining questions would sharpen the findings."
            ),
        }
    } else {
        Insight {
            kind: InsightKind::Suggestion,
            title: "Low Participation".to_string(),
            description: format!(
                "Only {completion_rate:.0}% of the follow-up was answered. Additional answers would help explain the neutral Kano responses."
            ),
        }
    };
    insights.push(engagement);

    for data in coverage.values().filter(|data| data.total > 0) {
        let name = &data.name;
        let insight = if data.answered == data.total {
            Insight {
                kind: InsightKind::Positive,
                title: format!("{name} Fully Covered"),
                description: format!(
                    "Every {name} follow-up was answered, giving solid qualitative input for this dimension."
                ),
            }
        } else if data.answered > 0 {
            Insight {
                kind: InsightKind::Neutral,
                title: format!("{name} Partially Covered"),
                description: format!(
                    "{} of {} {name} follow-ups were answered.",
                    data.answered, data.total
                ),
            }
        } else {
            Insight {
                kind: InsightKind::Suggestion,
                title: format!("Revisit {name}"),
                description: format!(
                    "No {name} follow-up was answered. Consider revisiting these questions to explain the neutral responses."
                ),
            }
        };
        insights.push(insight);
    }

    insights
}
