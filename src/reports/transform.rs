//! Maps raw `call_sim_scoring` rows into the flat view models the report
//! endpoints serve. Nested score trees are walked defensively: a missing
//! intermediate node behaves like an empty object and a missing leaf score
//! reads as 0.

use chrono::{DateTime, Utc};
use diesel::sql_types::{Double, Integer, Jsonb, Text, Timestamptz};
use diesel::QueryableByName;
use serde::Serialize;
use serde_json::Value;

/// Raw row shape shared by the record-level endpoints.
#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScoringRecord {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub simulation_id: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub user_id: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub product_id: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub specialty: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub situation: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub adoption_continuum: Option<String>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Jsonb>)]
    pub accuracy: Option<Value>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Jsonb>)]
    pub conversation_data: Option<Value>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Double>)]
    pub overall_score: Option<f64>,
    #[diesel(sql_type = diesel::sql_types::Nullable<Timestamptz>)]
    pub created_at: Option<DateTime<Utc>>,
}

/// First letter uppercased, everything else unchanged. Empty stays empty.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Walks `tree` along `path` and reads the terminal value as a number.
/// Missing nodes and non-numeric leaves read as 0.
pub fn leaf_score(tree: Option<&Value>, path: &[&str]) -> f64 {
    let mut node = tree;
    for key in path {
        node = node.and_then(|v| v.get(key));
    }
    node.and_then(Value::as_f64).unwrap_or(0.0)
}

fn leaf_text(tree: Option<&Value>, path: &[&str]) -> Option<String> {
    let mut node = tree;
    for key in path {
        node = node.and_then(|v| v.get(key));
    }
    node.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Maps a categorical evaluation outcome from `conversation_data` to a
/// score: `success` is 100, anything else (including a missing entry) is 0.
pub fn result_score(conversation: Option<&Value>, skill: &str) -> f64 {
    let result = conversation
        .and_then(|v| v.get("analysis"))
        .and_then(|v| v.get("evaluation_criteria_results"))
        .and_then(|v| v.get(skill))
        .and_then(|v| v.get("result"))
        .and_then(Value::as_str);
    match result {
        Some("success") => 100.0,
        _ => 0.0,
    }
}

/// `"Month DD, YYYY"`. A record without a timestamp yields `None` rather
/// than a fabricated processing time, so identical input always produces
/// identical output.
pub fn format_date(created_at: Option<DateTime<Utc>>) -> Option<String> {
    created_at.map(|ts| ts.format("%B %d, %Y").to_string())
}

/// Flat list-view row sourced from the `accuracy` score tree.
#[derive(Debug, Serialize)]
pub struct SimulationView {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "adoptionLevel")]
    pub adoption_level: String,
    pub situation: String,
    pub product: String,
    pub specialty: String,
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    pub introduction: f64,
    pub rapport: f64,
    pub interest: f64,
    pub probing: f64,
    #[serde(rename = "productKnowledge")]
    pub product_knowledge: f64,
}

impl SimulationView {
    pub fn from_record(record: &ScoringRecord) -> Self {
        let scores = record.accuracy.as_ref().and_then(|v| v.get("scores"));
        Self {
            id: record.id,
            user_id: record.user_id.clone(),
            date: format_date(record.created_at),
            adoption_level: capitalize(record.adoption_continuum.as_deref().unwrap_or("naive")),
            situation: capitalize(record.situation.as_deref().unwrap_or("")),
            product: record.product_id.clone().unwrap_or_default(),
            specialty: capitalize(record.specialty.as_deref().unwrap_or("")),
            overall_score: leaf_score(scores, &["total", "score"]),
            introduction: leaf_score(scores, &["introduction", "score"]),
            rapport: leaf_score(scores, &["rapport", "score"]),
            interest: leaf_score(scores, &["creatingInterest", "score"]),
            probing: leaf_score(scores, &["probing", "score"]),
            product_knowledge: leaf_score(scores, &["productKnowledge", "score"]),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricScore {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunMetrics {
    pub introduction: MetricScore,
    pub rapport: MetricScore,
    #[serde(rename = "creatingInterest")]
    pub creating_interest: MetricScore,
    pub probing: MetricScore,
    #[serde(rename = "productKnowledge")]
    pub product_knowledge: MetricScore,
    pub strategy: MetricScore,
    pub closing: MetricScore,
    pub disc: MetricScore,
    pub traits: MetricScore,
    #[serde(rename = "adoptionContinuum")]
    pub adoption_continuum: MetricScore,
}

/// Detailed single-run view: every accuracy metric, with reviewer feedback
/// where the scoring pipeline attaches it.
#[derive(Debug, Serialize)]
pub struct RunView {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "adoptionLevel")]
    pub adoption_level: String,
    pub situation: String,
    pub product: String,
    pub specialty: String,
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    pub metrics: RunMetrics,
}

impl RunView {
    pub fn from_record(record: &ScoringRecord) -> Self {
        let scores = record.accuracy.as_ref().and_then(|v| v.get("scores"));
        let plain = |key: &str| MetricScore {
            score: leaf_score(scores, &[key, "score"]),
            feedback: None,
        };
        let with_feedback = |key: &str| MetricScore {
            score: leaf_score(scores, &[key, "score"]),
            feedback: leaf_text(scores, &[key, "feedback"]),
        };
        Self {
            id: record.id,
            user_id: record.user_id.clone(),
            date: format_date(record.created_at),
            adoption_level: capitalize(record.adoption_continuum.as_deref().unwrap_or("naive")),
            situation: capitalize(record.situation.as_deref().unwrap_or("")),
            product: record.product_id.clone().unwrap_or_default(),
            specialty: capitalize(record.specialty.as_deref().unwrap_or("")),
            overall_score: leaf_score(scores, &["total", "score"]),
            metrics: RunMetrics {
                introduction: plain("introduction"),
                rapport: plain("rapport"),
                creating_interest: plain("creatingInterest"),
                probing: plain("probing"),
                product_knowledge: plain("productKnowledge"),
                strategy: plain("strategy"),
                closing: plain("closing"),
                disc: with_feedback("disc"),
                traits: with_feedback("traits"),
                adoption_continuum: with_feedback("adoptionContinuum"),
            },
        }
    }
}

/// Sample view sourced from `conversation_data` evaluation outcomes instead
/// of the accuracy tree; categorical results map to 100/0.
#[derive(Debug, Serialize)]
pub struct EvaluationView {
    pub id: i32,
    #[serde(rename = "simulationId")]
    pub simulation_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "adoptionLevel")]
    pub adoption_level: String,
    pub situation: String,
    pub specialty: String,
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    pub introduction: f64,
    pub rapport: f64,
    pub interest: f64,
    pub probing: f64,
    #[serde(rename = "productKnowledge")]
    pub product_knowledge: f64,
}

impl EvaluationView {
    pub fn from_record(record: &ScoringRecord) -> Self {
        let conversation = record.conversation_data.as_ref();
        Self {
            id: record.id,
            simulation_id: record.simulation_id.clone(),
            user_id: record.user_id.clone(),
            date: format_date(record.created_at),
            adoption_level: capitalize(record.adoption_continuum.as_deref().unwrap_or("naive")),
            situation: capitalize(record.situation.as_deref().unwrap_or("")),
            specialty: capitalize(record.specialty.as_deref().unwrap_or("")),
            overall_score: record.overall_score.unwrap_or(0.0),
            introduction: result_score(conversation, "introduction"),
            rapport: result_score(conversation, "rapport"),
            interest: result_score(conversation, "creating_interest"),
            probing: result_score(conversation, "probing"),
            product_knowledge: result_score(conversation, "product_knowledge"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(accuracy: Option<Value>, conversation: Option<Value>) -> ScoringRecord {
        ScoringRecord {
            id: 7,
            simulation_id: Some("sim-41".to_string()),
            user_id: Some("u-9".to_string()),
            product_id: Some("Besophil".to_string()),
            specialty: Some("cardiology".to_string()),
            situation: Some("counter call".to_string()),
            adoption_continuum: Some("trialing".to_string()),
            accuracy,
            conversation_data: conversation,
            overall_score: Some(61.5),
            created_at: Utc.with_ymd_and_hms(2025, 4, 8, 12, 0, 0).single(),
        }
    }

    #[test]
    fn capitalize_leaves_rest_unchanged() {
        assert_eq!(capitalize("counter call"), "Counter call");
        assert_eq!(capitalize("ELF"), "ELF");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn missing_nodes_default_to_zero() {
        let r = record(Some(json!({"scores": {"rapport": {"score": 72}}})), None);
        let view = SimulationView::from_record(&r);
        assert_eq!(view.rapport, 72.0);
        assert_eq!(view.introduction, 0.0);
        assert_eq!(view.overall_score, 0.0);
    }

    #[test]
    fn null_accuracy_yields_all_zero_scores() {
        let view = SimulationView::from_record(&record(None, None));
        assert_eq!(view.introduction, 0.0);
        assert_eq!(view.product_knowledge, 0.0);
    }

    #[test]
    fn date_renders_month_day_year() {
        let view = SimulationView::from_record(&record(None, None));
        assert_eq!(view.date.as_deref(), Some("April 08, 2025"));
    }

    #[test]
    fn missing_timestamp_is_null_not_now() {
        let mut r = record(None, None);
        r.created_at = None;
        let view = SimulationView::from_record(&r);
        assert!(view.date.is_none());
    }

    #[test]
    fn categorical_fields_capitalize() {
        let view = SimulationView::from_record(&record(None, None));
        assert_eq!(view.situation, "Counter call");
        assert_eq!(view.specialty, "Cardiology");
        assert_eq!(view.adoption_level, "Trialing");
    }

    #[test]
    fn missing_adoption_level_defaults_to_naive() {
        let mut r = record(None, None);
        r.adoption_continuum = None;
        let view = SimulationView::from_record(&r);
        assert_eq!(view.adoption_level, "Naive");
    }

    #[test]
    fn evaluation_results_map_to_hundred_or_zero() {
        let conversation = json!({
            "analysis": {
                "evaluation_criteria_results": {
                    "introduction": {"result": "success"},
                    "rapport": {"result": "failure"},
                    "probing": {}
                }
            }
        });
        let view = EvaluationView::from_record(&record(None, Some(conversation)));
        assert_eq!(view.introduction, 100.0);
        assert_eq!(view.rapport, 0.0);
        assert_eq!(view.probing, 0.0);
        assert_eq!(view.interest, 0.0);
        assert_eq!(view.overall_score, 61.5);
    }

    #[test]
    fn run_view_carries_feedback_only_where_present() {
        let accuracy = json!({
            "scores": {
                "disc": {"score": 55, "feedback": "Match the customer's pace."},
                "traits": {"score": 60},
                "introduction": {"score": 80}
            }
        });
        let view = RunView::from_record(&record(Some(accuracy), None));
        assert_eq!(view.metrics.disc.score, 55.0);
        assert_eq!(
            view.metrics.disc.feedback.as_deref(),
            Some("Match the customer's pace.")
        );
        assert!(view.metrics.traits.feedback.is_none());
        assert!(view.metrics.introduction.feedback.is_none());
        assert_eq!(view.metrics.introduction.score, 80.0);
    }
}
