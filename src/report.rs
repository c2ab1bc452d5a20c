use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::models::{
    CategoryShare, EvaluationRecord, EvaluationStatistics, KanoCategory, MonthlyCount, SusGrade,
};

fn share(count: usize, total: usize) -> CategoryShare {
    CategoryShare {
        count,
        percentage: if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        },
    }
}

pub fn summarize_records(records: &[EvaluationRecord]) -> EvaluationStatistics {
    let total = records.len();
    let average_sus_score = if total == 0 {
        0.0
    } else {
        records.iter().map(|r| r.sus_evaluation.score).sum::<f64>() / total as f64
    };

    let mut grades: BTreeMap<SusGrade, usize> = BTreeMap::new();
    let mut categories: BTreeMap<KanoCategory, usize> = BTreeMap::new();
    let mut months: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        *grades.entry(record.sus_evaluation.grade).or_default() += 1;
        for result in record.kano_evaluation.results.values() {
            *categories.entry(result.category).or_default() += 1;
        }
        *months
            .entry(record.created_at.format("%Y-%m").to_string())
            .or_default() += 1;
    }

    let classified: usize = categories.values().sum();

    EvaluationStatistics {
        total_evaluations: total,
        average_sus_score,
        grade_distribution: SusGrade::ALL
            .iter()
            .map(|grade| (*grade, share(grades.get(grade).copied().unwrap_or(0), total)))
            .collect(),
        kano_category_distribution: KanoCategory::ALL
            .iter()
            .map(|category| {
                (
                    *category,
                    share(categories.get(category).copied().unwrap_or(0), classified),
                )
            })
            .collect(),
        evaluation_trend: months
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect(),
    }
}

pub fn build_report(record: &EvaluationRecord) -> String {
    let sus = &record.sus_evaluation;
    let kano = &record.kano_evaluation;
    let overall = &record.overall_assessment;
    let mut output = String::new();

    let _ = writeln!(output, "# Usability Evaluation: {}", record.project_info.name);
    let _ = writeln!(
        output,
        "Evaluation {} created {}",
        record.evaluation_id,
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(version) = &record.project_info.version {
        let _ = writeln!(output, "Version: {version}");
    }
    if let Some(team) = &record.project_info.team {
        let _ = writeln!(output, "Team: {team}");
    }
    if let Some(description) = &record.project_info.description {
        let _ = writeln!(output);
        let _ = writeln!(output, "{description}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall");
    let _ = writeln!(
        output,
        "Score {:.1} ({})",
        overall.overall_score, overall.maturity_level
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "### Key Strengths");
    if overall.key_strengths.is_empty() {
        let _ = writeln!(output, "No standout strengths identified.");
    } else {
        for strength in &overall.key_strengths {
            let _ = writeln!(output, "- {strength}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### Critical Issues");
    if overall.critical_issues.is_empty() {
        let _ = writeln!(output, "No critical issues.");
    } else {
        for issue in &overall.critical_issues {
            let _ = writeln!(output, "- {issue}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### Priority Actions");
    if overall.priority_actions.is_empty() {
        let _ = writeln!(output, "Nothing to action.");
    } else {
        for (index, action) in overall.priority_actions.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. [{}] {}",
                index + 1,
                action.priority.label(),
                action.action
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## System Usability Scale");
    let _ = writeln!(
        output,
        "Score {:.1}, grade {}, {} ({})",
        sus.score,
        sus.grade.label(),
        sus.adjective_rating,
        sus.acceptability.label()
    );
    let benchmark = &sus.detailed_analysis.benchmark_comparison;
    let _ = writeln!(
        output,
        "{:.0}th percentile, {:+.1} against the industry average of {:.0} ({})",
        sus.percentile,
        benchmark.difference_from_average,
        benchmark.industry_average,
        benchmark.benchmark_category
    );
    let suggestions = &sus.detailed_analysis.improvement_suggestions;
    if !suggestions.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "### Improvement Suggestions");
        for suggestion in suggestions {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                suggestion.priority.label(),
                suggestion.area,
                suggestion.suggestion
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Kano Analysis");
    let _ = writeln!(
        output,
        "{} features classified, average satisfaction {:.2}, average dissatisfaction {:.2}",
        kano.summary.total_questions,
        kano.summary.average_satisfaction_impact,
        kano.summary.average_dissatisfaction_impact
    );
    for category in KanoCategory::ALL {
        let count = kano
            .summary
            .category_counts
            .get(&category)
            .copied()
            .unwrap_or(0);
        if count == 0 {
            continue;
        }
        let features: Vec<&str> = kano
            .summary
            .features(category)
            .iter()
            .map(|feature| feature.title())
            .collect();
        let _ = writeln!(
            output,
            "- {}: {} ({:.0}%) {}",
            category.label(),
            count,
            kano.summary.percentage(category),
            features.join(", ")
        );
    }

    if !kano.recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "### Recommendations");
        for recommendation in &kano.recommendations {
            let _ = writeln!(
                output,
                "- [{}] {}: {}",
                recommendation.priority.label(),
                recommendation.feature,
                recommendation.action
            );
        }
    }

    if let Some(aipet) = &record.aipet_evaluation {
        let _ = writeln!(output);
        let _ = writeln!(output, "## AIPET Follow-up");
        let _ = writeln!(
            output,
            "{} of {} eligible questions answered ({:.0}%)",
            aipet.answered_questions,
            aipet.eligible_questions.len(),
            aipet.completion_rate
        );
        for (dimension, coverage) in &aipet.dimension_coverage {
            if coverage.total == 0 {
                continue;
            }
            let _ = writeln!(
                output,
                "- [{}] {}: {} of {} answered",
                dimension.code(),
                coverage.name,
                coverage.answered,
                coverage.total
            );
        }
        for insight in &aipet.insights {
            let _ = writeln!(output, "- {}: {}", insight.title, insight.description);
        }
        for warning in &aipet.warnings {
            let _ = writeln!(output, "- Note: {warning}");
        }
    }

    output
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    evaluation_id: String,
    project_name: &'a str,
    version: &'a str,
    team: &'a str,
    created_at: String,
    sus_score: f64,
    sus_grade: &'static str,
    acceptability: &'static str,
    kano_features: usize,
    must_be_pct: f64,
    one_dimensional_pct: f64,
    attractive_pct: f64,
    aipet_completion: Option<f64>,
    overall_score: f64,
    maturity_level: &'a str,
}

pub fn write_csv(records: &[EvaluationRecord], path: &Path) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        let summary = &record.kano_evaluation.summary;
        writer.serialize(CsvRow {
            evaluation_id: record.evaluation_id.to_string(),
            project_name: &record.project_info.name,
            version: record.project_info.version.as_deref().unwrap_or(""),
            team: record.project_info.team.as_deref().unwrap_or(""),
            created_at: record.created_at.to_rfc3339(),
            sus_score: record.sus_evaluation.score,
            sus_grade: record.sus_evaluation.grade.label(),
            acceptability: record.sus_evaluation.acceptability.label(),
            kano_features: summary.total_questions,
            must_be_pct: summary.percentage(KanoCategory::MustBe),
            one_dimensional_pct: summary.percentage(KanoCategory::OneDimensional),
            attractive_pct: summary.percentage(KanoCategory::Attractive),
            aipet_completion: record.aipet_evaluation.as_ref().map(|a| a.completion_rate),
            overall_score: record.overall_assessment.overall_score,
            maturity_level: &record.overall_assessment.maturity_level,
        })?;
    }
    writer.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AipetQuestionId, KanoFeature, SusItem};
    use crate::evaluation::{self, EngineOptions};
    use crate::models::{EvaluationRequest, ProjectInfo, RawKanoAnswer};
    use chrono::{TimeZone, Utc};

    fn request(name: &str, sus_answer: u8) -> EvaluationRequest {
        let mut request = EvaluationRequest {
            project_info: ProjectInfo {
                name: name.to_string(),
                version: Some("2.0".to_string()),
                ..ProjectInfo::default()
            },
            ..EvaluationRequest::default()
        };
        request.kano_responses.insert(
            KanoFeature::ResponseAccuracy,
            RawKanoAnswer {
                functional: Some(2),
                dysfunctional: Some(5),
            },
        );
        request.kano_responses.insert(
            KanoFeature::Personalization,
            RawKanoAnswer {
                functional: Some(1),
                dysfunctional: Some(3),
            },
        );
        for item in SusItem::ALL {
            let value = if item.is_positive() {
                sus_answer
            } else {
                6 - sus_answer
            };
            request.sus_responses.insert(item, value);
        }
        request.aipet_responses.insert(
            AipetQuestionId::E2,
            "Remember which airline I prefer.".to_string(),
        );
        request
    }

    fn scored(request: &EvaluationRequest, month: u32) -> EvaluationRecord {
        let mut record = evaluation::evaluate(request, &EngineOptions::default()).unwrap();
        record.created_at = Utc.with_ymd_and_hms(2026, month, 10, 9, 0, 0).unwrap();
        record
    }

    fn record(name: &str, sus_answer: u8, month: u32) -> EvaluationRecord {
        scored(&request(name, sus_answer), month)
    }

    #[test]
    fn report_covers_every_section() {
        let report = build_report(&record("Trip Agent", 4, 3));
        assert!(report.starts_with("# Usability Evaluation: Trip Agent"));
        assert!(report.contains("Version: 2.0"));
        assert!(report.contains("## Overall"));
        assert!(report.contains("## System Usability Scale"));
        assert!(report.contains("Score 75.0, grade C, Good (Acceptable)"));
        assert!(report.contains("- Must-be: 1 (50%) Response Accuracy"));
        assert!(report.contains("## AIPET Follow-up"));
        assert!(report.contains("1 of 1 eligible questions answered (100%)"));
        assert!(report.contains("- [E] Experience: 1 of 1 answered"));
        assert!(!report.contains("[T] Trust"));
    }

    #[test]
    fn report_skips_missing_aipet() {
        let mut without_follow_up = request("Trip Agent", 4);
        without_follow_up.aipet_responses.clear();
        let saved = scored(&without_follow_up, 3);
        assert!(saved.aipet_evaluation.is_none());
        assert!(!build_report(&saved).contains("AIPET"));
    }

    #[test]
    fn statistics_aggregate_across_records() {
        let records = vec![
            record("A", 5, 1),
            record("B", 4, 1),
            record("C", 2, 2),
        ];
        let stats = summarize_records(&records);
        assert_eq!(stats.total_evaluations, 3);
        assert!((stats.average_sus_score - (100.0 + 75.0 + 25.0) / 3.0).abs() < 1e-9);
        assert_eq!(stats.grade_distribution[&SusGrade::A].count, 1);
        assert_eq!(stats.grade_distribution[&SusGrade::C].count, 1);
        assert_eq!(stats.grade_distribution[&SusGrade::F].count, 1);
        assert_eq!(stats.grade_distribution[&SusGrade::B].count, 0);

        let must_be = &stats.kano_category_distribution[&KanoCategory::MustBe];
        assert_eq!(must_be.count, 3);
        assert_eq!(must_be.percentage, 50.0);

        assert_eq!(
            stats.evaluation_trend,
            vec![
                MonthlyCount {
                    month: "2026-01".to_string(),
                    count: 2
                },
                MonthlyCount {
                    month: "2026-02".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn statistics_of_nothing_are_zero() {
        let stats = summarize_records(&[]);
        assert_eq!(stats.total_evaluations, 0);
        assert_eq!(stats.average_sus_score, 0.0);
        assert!(stats.evaluation_trend.is_empty());
        assert!(stats
            .grade_distribution
            .values()
            .all(|share| share.count == 0 && share.percentage == 0.0));
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluations.csv");
        let written = write_csv(&[record("A", 5, 1), record("B", 2, 2)], &path).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("evaluation_id,project_name,version,team,created_at,sus_score"));
        assert!(lines[1].contains(",A,2.0,,"));
        assert!(lines[2].contains("Not Acceptable"));
    }
}
