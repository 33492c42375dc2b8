//! Serialized payload shapes for the report endpoints. Construction from
//! the raw aggregate rows applies the presentation rules in `format`:
//! 1-decimal rounding and NULL-to-zero coalescing.

use serde::Serialize;

use crate::reports::aggregate::{AveragesRow, CountsRow, GroupRow, MetricRow};
use crate::reports::format::{coalesce_round, relative_change, round1, signed_percent};

/// Team-overview comparison row: `{name, team, average}`.
#[derive(Debug, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub team: f64,
    pub average: f64,
}

impl ComparisonRow {
    pub fn from_metric(row: &MetricRow) -> Self {
        Self {
            name: row.name.clone(),
            team: coalesce_round(row.team),
            average: coalesce_round(row.average),
        }
    }
}

/// Radar-chart row for the benchmark skill view: `{subject, teamAvg, benchmark}`.
#[derive(Debug, Serialize)]
pub struct SkillRow {
    pub subject: String,
    #[serde(rename = "teamAvg")]
    pub team_avg: f64,
    pub benchmark: f64,
}

impl SkillRow {
    pub fn from_metric(row: &MetricRow) -> Self {
        Self {
            subject: row.name.clone(),
            team_avg: coalesce_round(row.team),
            benchmark: coalesce_round(row.average),
        }
    }
}

/// Grouped and trend rows share the `{name, team, industry}` shape.
#[derive(Debug, Serialize)]
pub struct GroupPoint {
    pub name: String,
    pub team: f64,
    pub industry: f64,
}

impl GroupPoint {
    pub fn from_group(row: &GroupRow) -> Self {
        Self {
            name: row.name.clone(),
            team: coalesce_round(row.team),
            industry: coalesce_round(row.industry),
        }
    }
}

/// Detail benchmark table row with the formatted difference column.
#[derive(Debug, Serialize)]
pub struct BenchmarkRow {
    pub metric: String,
    #[serde(rename = "teamAverage")]
    pub team_average: f64,
    #[serde(rename = "industryBenchmark")]
    pub industry_benchmark: f64,
    pub difference: String,
}

impl BenchmarkRow {
    pub fn from_metric(row: &MetricRow) -> Self {
        let team = coalesce_round(row.team);
        let benchmark = coalesce_round(row.average);
        Self {
            metric: row.name.clone(),
            team_average: team,
            industry_benchmark: benchmark,
            difference: signed_percent(team - benchmark),
        }
    }

    /// "Simulations Completed" compares raw counts, so the difference is the
    /// relative change rather than an absolute score delta.
    pub fn from_counts(counts: &CountsRow) -> Self {
        let team = counts.team as f64;
        let benchmark = counts.benchmark as f64;
        Self {
            metric: "Simulations Completed".to_string(),
            team_average: team,
            industry_benchmark: benchmark,
            difference: signed_percent(relative_change(team, benchmark)),
        }
    }
}

/// Adoption benchmark row keyed by level.
#[derive(Debug, Serialize)]
pub struct AdoptionBenchmarkRow {
    #[serde(rename = "type")]
    pub adoption_type: String,
    #[serde(rename = "teamAverage")]
    pub team_average: f64,
    #[serde(rename = "industryBenchmark")]
    pub industry_benchmark: f64,
    pub difference: String,
}

impl AdoptionBenchmarkRow {
    pub fn from_group(row: &GroupRow) -> Self {
        let team = coalesce_round(row.team);
        let benchmark = coalesce_round(row.industry);
        Self {
            adoption_type: row.name.clone(),
            team_average: team,
            industry_benchmark: benchmark,
            difference: signed_percent(team - benchmark),
        }
    }
}

/// Situation benchmark row keyed by scenario type.
#[derive(Debug, Serialize)]
pub struct SituationBenchmarkRow {
    pub situation: String,
    #[serde(rename = "teamAverage")]
    pub team_average: f64,
    #[serde(rename = "industryBenchmark")]
    pub industry_benchmark: f64,
    pub difference: String,
}

impl SituationBenchmarkRow {
    pub fn from_group(row: &GroupRow) -> Self {
        let team = coalesce_round(row.team);
        let benchmark = coalesce_round(row.industry);
        Self {
            situation: row.name.clone(),
            team_average: team,
            industry_benchmark: benchmark,
            difference: signed_percent(team - benchmark),
        }
    }
}

/// One named mean in the accuracy/fluency metric lists.
#[derive(Debug, Serialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(name: String, score: f64) -> Self {
        Self {
            name,
            score: round1(score),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessRates {
    pub introduction: f64,
    pub rapport: f64,
    #[serde(rename = "creatingInterest")]
    pub creating_interest: f64,
    pub probing: f64,
    #[serde(rename = "productKnowledge")]
    pub product_knowledge: f64,
}

#[derive(Debug, Serialize)]
pub struct TeamAverages {
    pub overall: f64,
    pub simulations: i64,
    #[serde(rename = "totalAccuracy")]
    pub total_accuracy: f64,
    #[serde(rename = "successRates")]
    pub success_rates: SuccessRates,
    #[serde(rename = "availableProducts")]
    pub available_products: Vec<String>,
}

impl TeamAverages {
    pub fn from_row(row: &AveragesRow, available_products: Vec<String>) -> Self {
        Self {
            overall: coalesce_round(row.overall),
            simulations: row.simulations,
            total_accuracy: coalesce_round(row.total_accuracy),
            success_rates: SuccessRates {
                introduction: coalesce_round(row.introduction),
                rapport: coalesce_round(row.rapport),
                creating_interest: coalesce_round(row.creating_interest),
                probing: coalesce_round(row.probing),
                product_knowledge: coalesce_round(row.product_knowledge),
            },
            available_products,
        }
    }
}

/// Distinct filter values offered to the UI; products are scoped to the
/// requesting team when one is selected.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub teams: Vec<String>,
    pub products: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationCount {
    pub team: i64,
    pub benchmark: i64,
    pub difference: String,
}

impl SimulationCount {
    pub fn from_counts(counts: &CountsRow) -> Self {
        Self {
            team: counts.team,
            benchmark: counts.benchmark,
            difference: signed_percent(relative_change(counts.team as f64, counts.benchmark as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_difference_matches_rounded_columns() {
        let row = MetricRow {
            name: "Introduction".to_string(),
            team: Some(70.04),
            average: Some(50.0),
        };
        let benchmark = BenchmarkRow::from_metric(&row);
        assert_eq!(benchmark.team_average, 70.0);
        assert_eq!(benchmark.industry_benchmark, 50.0);
        assert_eq!(benchmark.difference, "+20.0%");
    }

    #[test]
    fn null_aggregates_render_zero_not_null() {
        let row = MetricRow {
            name: "Rapport".to_string(),
            team: None,
            average: Some(61.23),
        };
        let comparison = ComparisonRow::from_metric(&row);
        assert_eq!(comparison.team, 0.0);
        assert_eq!(comparison.average, 61.2);
    }

    #[test]
    fn simulation_count_uses_relative_change() {
        let counts = CountsRow {
            team: 75,
            benchmark: 60,
        };
        let view = SimulationCount::from_counts(&counts);
        assert_eq!(view.difference, "+25.0%");
    }

    #[test]
    fn zero_benchmark_count_does_not_divide() {
        let counts = CountsRow {
            team: 10,
            benchmark: 0,
        };
        let view = SimulationCount::from_counts(&counts);
        assert_eq!(view.difference, "+0.0%");
    }
}
