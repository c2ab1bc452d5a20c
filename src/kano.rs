use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::KanoFeature;
use crate::error::{EvaluationError, Result};
use crate::models::{
    KanoAnswer, KanoCategory, KanoPair, KanoRecommendation, KanoResult, KanoSummary, Priority,
    PriorityFeatures,
};

use crate::models::KanoCategory::{
    Attractive as A, Indifferent as I, MustBe as M, OneDimensional as O, Questionable as Q,
    Reverse as R,
};

/// Canonical Kano evaluation table, rows functional, columns dysfunctional,
/// both ordered like, must-be, neutral, live-with, dislike.
const EVALUATION_TABLE: [[KanoCategory; 5]; 5] = [
    [Q, A, A, A, O],
    [R, I, I, I, M],
    [R, I, I, I, M],
    [R, I, I, I, M],
    [R, R, R, R, Q],
];

pub fn classify(pair: KanoPair) -> KanoCategory {
    EVALUATION_TABLE[pair.functional.index()][pair.dysfunctional.index()]
}

/// How a single respondent's pair is turned into satisfaction and
/// dissatisfaction coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoefficientScheme {
    /// Better/worse coefficients with a single respondent in the denominator.
    #[default]
    Category,
    /// Coefficients scaled by how strongly each side of the pair was answered.
    AnswerWeighted,
}

impl CoefficientScheme {
    pub fn impacts(&self, pair: KanoPair, category: KanoCategory) -> (f64, f64) {
        match self {
            CoefficientScheme::Category => match category {
                KanoCategory::Attractive => (1.0, 0.0),
                KanoCategory::OneDimensional => (1.0, 1.0),
                KanoCategory::MustBe => (0.0, 1.0),
                KanoCategory::Indifferent
                | KanoCategory::Reverse
                | KanoCategory::Questionable => (0.0, 0.0),
            },
            CoefficientScheme::AnswerWeighted => {
                let better: f64 = match pair.functional {
                    KanoAnswer::Like | KanoAnswer::MustBe => 1.0,
                    KanoAnswer::Neutral => 0.5,
                    KanoAnswer::LiveWith | KanoAnswer::Dislike => 0.0,
                };
                let worse: f64 = match pair.dysfunctional {
                    KanoAnswer::LiveWith | KanoAnswer::Dislike => 1.0,
                    KanoAnswer::Neutral => 0.5,
                    KanoAnswer::Like | KanoAnswer::MustBe => 0.0,
                };
                let satisfaction_weight: f64 = match category {
                    KanoCategory::Attractive => 1.0,
                    KanoCategory::OneDimensional => 0.8,
                    KanoCategory::MustBe => 0.2,
                    _ => 0.0,
                };
                let dissatisfaction_weight: f64 = match category {
                    KanoCategory::MustBe => 1.0,
                    KanoCategory::OneDimensional => 0.8,
                    KanoCategory::Attractive => 0.2,
                    _ => 0.0,
                };
                (
                    (better * satisfaction_weight).clamp(0.0, 1.0),
                    (worse * dissatisfaction_weight).clamp(0.0, 1.0),
                )
            }
        }
    }
}

impl FromStr for CoefficientScheme {
    type Err = EvaluationError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(CoefficientScheme::Category),
            "answer-weighted" | "answer_weighted" => Ok(CoefficientScheme::AnswerWeighted),
            other => Err(EvaluationError::validation(format!(
                "unknown coefficient scheme '{other}'"
            ))),
        }
    }
}

pub fn evaluate_pair(pair: KanoPair, scheme: CoefficientScheme) -> KanoResult {
    let category = classify(pair);
    let (satisfaction_impact, dissatisfaction_impact) = scheme.impacts(pair, category);
    KanoResult {
        category,
        satisfaction_impact,
        dissatisfaction_impact,
    }
}

pub fn analyze_responses(
    responses: &BTreeMap<KanoFeature, KanoPair>,
    scheme: CoefficientScheme,
) -> BTreeMap<KanoFeature, KanoResult> {
    responses
        .iter()
        .map(|(feature, pair)| {
            let result = evaluate_pair(*pair, scheme);
            debug!(feature = feature.id(), category = result.category.label(), "classified kano pair");
            (*feature, result)
        })
        .collect()
}

fn ranking_key(category: KanoCategory, result: &KanoResult) -> f64 {
    match category {
        KanoCategory::MustBe => result.dissatisfaction_impact,
        KanoCategory::Attractive => result.satisfaction_impact,
        KanoCategory::OneDimensional => result.satisfaction_impact + result.dissatisfaction_impact,
        _ => 0.0,
    }
}

fn ranked_features(
    results: &BTreeMap<KanoFeature, KanoResult>,
    category: KanoCategory,
) -> Vec<KanoFeature> {
    let mut features: Vec<(KanoFeature, f64)> = results
        .iter()
        .filter(|(_, result)| result.category == category)
        .map(|(feature, result)| (*feature, ranking_key(category, result)))
        .collect();
    // sort_by is stable, so ties keep catalog order
    features.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    features.into_iter().map(|(feature, _)| feature).collect()
}

pub fn summarize(results: &BTreeMap<KanoFeature, KanoResult>) -> Result<KanoSummary> {
    let total_questions = results.len();
    if total_questions == 0 {
        return Err(EvaluationError::validation(
            "at least one Kano question must be answered",
        ));
    }

    let mut category_counts: BTreeMap<KanoCategory, usize> =
        KanoCategory::ALL.iter().map(|category| (*category, 0)).collect();
    for result in results.values() {
        *category_counts.entry(result.category).or_insert(0) += 1;
    }

    let category_percentages = category_counts
        .iter()
        .map(|(category, count)| (*category, *count as f64 / total_questions as f64 * 100.0))
        .collect();

    let average_satisfaction_impact = results
        .values()
        .map(|result| result.satisfaction_impact)
        .sum::<f64>()
        / total_questions as f64;
    let average_dissatisfaction_impact = results
        .values()
        .map(|result| result.dissatisfaction_impact)
        .sum::<f64>()
        / total_questions as f64;

    let by_category: BTreeMap<KanoCategory, Vec<KanoFeature>> = KanoCategory::ALL
        .iter()
        .map(|category| (*category, ranked_features(results, *category)))
        .collect();

    let priority_features = PriorityFeatures {
        must_be_features: by_category[&KanoCategory::MustBe].clone(),
        one_dimensional_features: by_category[&KanoCategory::OneDimensional].clone(),
        attractive_features: by_category[&KanoCategory::Attractive].clone(),
        by_category,
    };

    Ok(KanoSummary {
        category_counts,
        category_percentages,
        total_questions,
        average_satisfaction_impact,
        average_dissatisfaction_impact,
        priority_features,
    })
}

/// One recommendation per category present, highest priority first.
pub fn recommendations(summary: &KanoSummary) -> Vec<KanoRecommendation> {
    let plans = [
        (KanoCategory::MustBe, Priority::High),
        (KanoCategory::OneDimensional, Priority::Medium),
        (KanoCategory::Attractive, Priority::Low),
        (KanoCategory::Indifferent, Priority::Low),
    ];

    let mut recommendations = Vec::new();
    for (category, priority) in plans {
        let Some(feature) = summary.features(category).first().copied() else {
            continue;
        };
        let title = feature.title();
        let (category_name, description, action) = match category {
            KanoCategory::MustBe => (
                "Must-be Needs",
                format!(
                    "Users consider {title} a basic requirement; its stability and reliability must come first."
                ),
                "Improve immediately and guarantee reliable delivery",
            ),
            KanoCategory::OneDimensional => (
                "One-dimensional Needs",
                format!("Improving {title} directly raises user satisfaction."),
                "Continuously optimize performance and user experience",
            ),
            KanoCategory::Attractive => (
                "Attractive Needs",
                format!("{title} is a feature that can create user delight."),
                "Invest in development when resources allow",
            ),
            _ => (
                "Indifferent Needs",
                format!("Users are largely indifferent to {title}."),
                "Keep investment minimal and revisit after core needs are met",
            ),
        };
        recommendations.push(KanoRecommendation {
            priority,
            category: category_name.to_string(),
            feature_id: feature,
            feature: title.to_string(),
            description,
            action: action.to_string(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pair(functional: u8, dysfunctional: u8) -> KanoPair {
        KanoPair::try_new(functional, dysfunctional).unwrap()
    }

    #[test]
    fn table_matches_canonical_cells() {
        let expected = [
            ((1, 1), Q),
            ((1, 2), A),
            ((1, 3), A),
            ((1, 4), A),
            ((1, 5), O),
            ((2, 1), R),
            ((2, 2), I),
            ((2, 4), I),
            ((2, 5), M),
            ((3, 1), R),
            ((3, 3), I),
            ((3, 5), M),
            ((4, 1), R),
            ((4, 4), I),
            ((4, 5), M),
            ((5, 1), R),
            ((5, 2), R),
            ((5, 4), R),
            ((5, 5), Q),
        ];
        for ((functional, dysfunctional), category) in expected {
            assert_eq!(
                classify(pair(functional, dysfunctional)),
                category,
                "({functional}, {dysfunctional})"
            );
        }
    }

    #[test]
    fn table_is_total() {
        let mut seen = 0;
        for functional in KanoAnswer::ALL {
            for dysfunctional in KanoAnswer::ALL {
                let category = classify(KanoPair::new(functional, dysfunctional));
                assert!(KanoCategory::ALL.contains(&category));
                seen += 1;
            }
        }
        assert_eq!(seen, 25);
    }

    #[test]
    fn must_be_pair_has_full_dissatisfaction() {
        for scheme in [CoefficientScheme::Category, CoefficientScheme::AnswerWeighted] {
            let result = evaluate_pair(pair(2, 5), scheme);
            assert_eq!(result.category, KanoCategory::MustBe);
            assert_eq!(result.dissatisfaction_impact, 1.0);
            assert!(result.satisfaction_impact <= 0.2);
        }
    }

    #[test]
    fn category_scheme_is_degenerate() {
        let scheme = CoefficientScheme::Category;
        assert_eq!(evaluate_pair(pair(1, 3), scheme).satisfaction_impact, 1.0);
        assert_eq!(evaluate_pair(pair(1, 3), scheme).dissatisfaction_impact, 0.0);
        let one_dimensional = evaluate_pair(pair(1, 5), scheme);
        assert_eq!(
            (one_dimensional.satisfaction_impact, one_dimensional.dissatisfaction_impact),
            (1.0, 1.0)
        );
        let indifferent = evaluate_pair(pair(3, 3), scheme);
        assert_eq!(
            (indifferent.satisfaction_impact, indifferent.dissatisfaction_impact),
            (0.0, 0.0)
        );
    }

    #[test]
    fn answer_weighted_stays_in_unit_range() {
        for functional in KanoAnswer::ALL {
            for dysfunctional in KanoAnswer::ALL {
                let result = evaluate_pair(
                    KanoPair::new(functional, dysfunctional),
                    CoefficientScheme::AnswerWeighted,
                );
                assert!((0.0..=1.0).contains(&result.satisfaction_impact));
                assert!((0.0..=1.0).contains(&result.dissatisfaction_impact));
            }
        }
    }

    #[test]
    fn answer_weighted_scales_by_answer_strength() {
        let scheme = CoefficientScheme::AnswerWeighted;
        let one_dimensional = evaluate_pair(pair(1, 5), scheme);
        assert!((one_dimensional.satisfaction_impact - 0.8).abs() < 1e-9);
        assert!((one_dimensional.dissatisfaction_impact - 0.8).abs() < 1e-9);

        let neutral_must_be = evaluate_pair(pair(3, 5), scheme);
        assert_eq!(neutral_must_be.category, KanoCategory::MustBe);
        assert!((neutral_must_be.satisfaction_impact - 0.1).abs() < 1e-9);
        assert_eq!(neutral_must_be.dissatisfaction_impact, 1.0);
    }

    #[test]
    fn classification_is_repeatable() {
        let first = evaluate_pair(pair(4, 5), CoefficientScheme::default());
        let second = evaluate_pair(pair(4, 5), CoefficientScheme::default());
        assert_eq!(first, second);
    }

    #[test]
    fn scheme_parses_from_config_strings() {
        assert_eq!(
            "answer-weighted".parse::<CoefficientScheme>().unwrap(),
            CoefficientScheme::AnswerWeighted
        );
        assert_eq!(
            " Category ".parse::<CoefficientScheme>().unwrap(),
            CoefficientScheme::Category
        );
        assert!("cs-ds".parse::<CoefficientScheme>().is_err());
    }

    #[test]
    fn empty_results_fail_validation() {
        let err = summarize(&BTreeMap::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn summary_counts_and_ranks_features() {
        let mut responses = BTreeMap::new();
        responses.insert(KanoFeature::ResponseAccuracy, pair(2, 5));
        responses.insert(KanoFeature::ResponseSpeed, pair(1, 5));
        responses.insert(KanoFeature::NaturalConversation, pair(1, 4));
        responses.insert(KanoFeature::ContextMemory, pair(4, 5));
        let results = analyze_responses(&responses, CoefficientScheme::Category);
        let summary = summarize(&results).unwrap();

        assert_eq!(summary.total_questions, 4);
        assert_eq!(summary.category_counts[&KanoCategory::MustBe], 2);
        assert_eq!(summary.category_counts[&KanoCategory::Reverse], 0);
        assert_eq!(summary.category_counts.values().sum::<usize>(), 4);
        assert_eq!(summary.percentage(KanoCategory::MustBe), 50.0);
        assert_eq!(
            summary.priority_features.must_be_features,
            vec![KanoFeature::ResponseAccuracy, KanoFeature::ContextMemory]
        );
        assert_eq!(
            summary.priority_features.attractive_features,
            vec![KanoFeature::NaturalConversation]
        );
        assert!((summary.average_satisfaction_impact - 0.5).abs() < 1e-9);
        assert!((summary.average_dissatisfaction_impact - 0.75).abs() < 1e-9);
    }

    #[test]
    fn recommendations_follow_priority_order() {
        let mut responses = BTreeMap::new();
        responses.insert(KanoFeature::MultiModal, pair(1, 3));
        responses.insert(KanoFeature::PrivacyProtection, pair(2, 5));
        responses.insert(KanoFeature::ResponseSpeed, pair(3, 3));
        responses.insert(KanoFeature::ErrorHandling, pair(1, 5));
        let summary = summarize(&analyze_responses(&responses, CoefficientScheme::Category)).unwrap();
        let recommendations = recommendations(&summary);

        let categories: Vec<&str> = recommendations.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(
            categories,
            vec![
                "Must-be Needs",
                "One-dimensional Needs",
                "Attractive Needs",
                "Indifferent Needs"
            ]
        );
        assert_eq!(recommendations[0].priority, Priority::High);
        assert_eq!(recommendations[0].feature, "Privacy Protection");
    }

    #[test]
    fn no_recommendations_for_reverse_only() {
        let mut responses = BTreeMap::new();
        responses.insert(KanoFeature::MultiModal, pair(5, 1));
        let summary = summarize(&analyze_responses(&responses, CoefficientScheme::Category)).unwrap();
        assert!(recommendations(&summary).is_empty());
    }

    fn any_pair() -> impl Strategy<Value = KanoPair> {
        (1u8..=5, 1u8..=5).prop_map(|(f, d)| KanoPair::try_new(f, d).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_percentages_sum_to_hundred(pairs in proptest::collection::vec(any_pair(), 1..=10)) {
            let responses: BTreeMap<KanoFeature, KanoPair> = KanoFeature::ALL
                .iter()
                .copied()
                .zip(pairs)
                .collect();
            let summary = summarize(&analyze_responses(&responses, CoefficientScheme::Category)).unwrap();
            let total: f64 = summary.category_percentages.values().sum();
            prop_assert!((total - 100.0).abs() < 0.01);
            prop_assert_eq!(summary.category_counts.values().sum::<usize>(), responses.len());
        }
    }
}
