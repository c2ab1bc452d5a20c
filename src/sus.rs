use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::SusItem;
use crate::error::{EvaluationError, Result};
use crate::models::{
    Acceptability, BenchmarkComparison, ImprovementSuggestion, Performance, Priority,
    QuestionAnalysis, SusDetailedAnalysis, SusEvaluation, SusGrade,
};

pub const INDUSTRY_AVERAGE: f64 = 68.0;
pub const INDUSTRY_STD_DEV: f64 = 12.5;

/// Normalized item scores at or below this are treated as problem areas.
const WEAKNESS_THRESHOLD: u8 = 1;
const STRENGTH_THRESHOLD: u8 = 3;

/// Sauro-Lewis curved grading scale as (score, percentile) anchors.
const NORMATIVE_ANCHORS: [(f64, f64); 12] = [
    (0.0, 0.0),
    (51.7, 15.0),
    (62.7, 35.0),
    (65.0, 41.0),
    (71.1, 60.0),
    (72.6, 65.0),
    (74.1, 70.0),
    (77.2, 80.0),
    (78.9, 85.0),
    (80.8, 90.0),
    (84.1, 96.0),
    (100.0, 100.0),
];

const ADJECTIVE_SCALE: [(f64, &str); 7] = [
    (92.0, "Best Imaginable"),
    (85.0, "Excellent"),
    (72.0, "Good"),
    (52.0, "OK"),
    (39.0, "Poor"),
    (25.0, "Awful"),
    (0.0, "Worst Imaginable"),
];

/// Maps a SUS score onto a percentile of the industry distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentileModel {
    /// Normal approximation around the industry mean.
    #[default]
    Normal,
    /// Linear interpolation over the curved grading scale.
    Normative,
}

impl PercentileModel {
    pub fn percentile(&self, score: f64) -> f64 {
        let score = score.clamp(0.0, 100.0);
        let percentile = match self {
            PercentileModel::Normal => {
                normal_cdf((score - INDUSTRY_AVERAGE) / INDUSTRY_STD_DEV) * 100.0
            }
            PercentileModel::Normative => interpolate(&NORMATIVE_ANCHORS, score),
        };
        percentile.clamp(0.0, 100.0)
    }
}

impl FromStr for PercentileModel {
    type Err = EvaluationError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(PercentileModel::Normal),
            "normative" => Ok(PercentileModel::Normative),
            other => Err(EvaluationError::validation(format!(
                "unknown percentile model '{other}'"
            ))),
        }
    }
}

fn interpolate(anchors: &[(f64, f64)], x: f64) -> f64 {
    for window in anchors.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x <= x1 {
            return y0 + (x - x0) / (x1 - x0) * (y1 - y0);
        }
    }
    anchors.last().map(|(_, y)| *y).unwrap_or(100.0)
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn normalized_score(item: SusItem, response: u8) -> u8 {
    if item.is_positive() {
        response.saturating_sub(1)
    } else {
        5u8.saturating_sub(response)
    }
}

pub fn grade_for(score: f64) -> SusGrade {
    if score >= 90.0 {
        SusGrade::A
    } else if score >= 80.0 {
        SusGrade::B
    } else if score >= 70.0 {
        SusGrade::C
    } else if score >= 60.0 {
        SusGrade::D
    } else {
        SusGrade::F
    }
}

pub fn adjective_rating(score: f64) -> &'static str {
    ADJECTIVE_SCALE
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, label)| *label)
        .unwrap_or("Worst Imaginable")
}

pub fn acceptability(score: f64) -> Acceptability {
    if score >= 71.0 {
        Acceptability::Acceptable
    } else if score >= 51.0 {
        Acceptability::Marginal
    } else {
        Acceptability::NotAcceptable
    }
}

fn validate(responses: &BTreeMap<SusItem, u8>) -> Result<()> {
    if responses.len() != SusItem::ALL.len() {
        let missing: Vec<&str> = SusItem::ALL
            .iter()
            .filter(|item| !responses.contains_key(*item))
            .map(|item| item.id())
            .collect();
        return Err(EvaluationError::validation(format!(
            "SUS questionnaire requires all {} answers, missing: {}",
            SusItem::ALL.len(),
            missing.join(", ")
        )));
    }
    for (item, response) in responses {
        if !(1..=5).contains(response) {
            return Err(EvaluationError::validation(format!(
                "SUS answer for {} must be between 1 and 5, got {}",
                item.id(),
                response
            )));
        }
    }
    Ok(())
}

pub fn sus_score(responses: &BTreeMap<SusItem, u8>) -> Result<f64> {
    validate(responses)?;
    let total: u32 = responses
        .iter()
        .map(|(item, response)| normalized_score(*item, *response) as u32)
        .sum();
    Ok((total as f64 * 2.5).clamp(0.0, 100.0))
}

pub fn analyze_questions(responses: &BTreeMap<SusItem, u8>) -> BTreeMap<SusItem, QuestionAnalysis> {
    responses
        .iter()
        .map(|(item, response)| {
            let normalized = normalized_score(*item, *response);
            let performance = match normalized {
                3.. => Performance::Excellent,
                2 => Performance::Good,
                1 => Performance::Fair,
                _ => Performance::Poor,
            };
            (
                *item,
                QuestionAnalysis {
                    question: item.text().to_string(),
                    response: *response,
                    normalized_score: normalized,
                    performance,
                    is_positive: item.is_positive(),
                },
            )
        })
        .collect()
}

pub fn improvement_suggestions(
    analysis: &BTreeMap<SusItem, QuestionAnalysis>,
) -> Vec<ImprovementSuggestion> {
    analysis
        .iter()
        .filter(|(_, data)| data.normalized_score <= WEAKNESS_THRESHOLD)
        .map(|(item, data)| ImprovementSuggestion {
            item: *item,
            priority: if data.normalized_score == 0 {
                Priority::High
            } else {
                Priority::Medium
            },
            area: item.area().to_string(),
            current_score: data.normalized_score,
            suggestion: item.suggestion().to_string(),
            question: data.question.clone(),
        })
        .collect()
}

pub fn compare_with_benchmark(score: f64, model: PercentileModel) -> BenchmarkComparison {
    let percentile = model.percentile(score);
    let benchmark_category = if percentile >= 90.0 {
        "Top 10%"
    } else if percentile >= 75.0 {
        "Top 25%"
    } else if percentile >= 50.0 {
        "Above Average (Top 50%)"
    } else if percentile >= 25.0 {
        "Below Average (Bottom 50%)"
    } else {
        "Bottom 25%"
    };

    BenchmarkComparison {
        your_score: score,
        industry_average: INDUSTRY_AVERAGE,
        difference_from_average: score - INDUSTRY_AVERAGE,
        percentile,
        benchmark_category: benchmark_category.to_string(),
    }
}

pub fn detailed_analysis(
    responses: &BTreeMap<SusItem, u8>,
    score: f64,
    model: PercentileModel,
) -> SusDetailedAnalysis {
    let question_analysis = analyze_questions(responses);
    let improvement_suggestions = improvement_suggestions(&question_analysis);
    let strengths = question_analysis
        .iter()
        .filter(|(_, data)| data.normalized_score >= STRENGTH_THRESHOLD)
        .map(|(item, _)| item.strength_label().to_string())
        .collect();
    let weaknesses = question_analysis
        .iter()
        .filter(|(_, data)| data.normalized_score <= WEAKNESS_THRESHOLD)
        .map(|(item, _)| item.weakness_label().to_string())
        .collect();

    SusDetailedAnalysis {
        question_analysis,
        improvement_suggestions,
        benchmark_comparison: compare_with_benchmark(score, model),
        strengths,
        weaknesses,
    }
}

pub fn evaluate(responses: &BTreeMap<SusItem, u8>, model: PercentileModel) -> Result<SusEvaluation> {
    let score = sus_score(responses)?;
    let grade = grade_for(score);
    debug!(score, grade = grade.label(), "scored SUS responses");

    Ok(SusEvaluation {
        score,
        grade,
        percentile: model.percentile(score),
        adjective_rating: adjective_rating(score).to_string(),
        acceptability: acceptability(score),
        detailed_analysis: detailed_analysis(responses, score, model),
    })
}
