//! Record-level endpoints: the transformed simulation list, single-run
//! detail, the assessment status lookup, and the soft delete. Identifier
//! validation happens before any query executes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

use crate::reports::aggregate::bound_query;
use crate::reports::error::ReportsError;
use crate::reports::filters::{render_conditions, ReportFilters, ReportQuery};
use crate::reports::transform::{EvaluationView, RunView, ScoringRecord, SimulationView};
use crate::shared::schema::call_sim_scoring::dsl;
use crate::shared::state::AppState;

const RECORD_COLUMNS: &str = "id, simulation_id, user_id, product_id, specialty, situation, \
                              adoption_continuum, accuracy, conversation_data, overall_score, \
                              created_at";

fn fetch_records(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<Vec<ScoringRecord>> {
    let (conditions, binds) = render_conditions(&filters.team_predicates(), 1);
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM call_sim_scoring \
         WHERE NOT is_deleted{conditions} ORDER BY created_at DESC"
    );
    bound_query(sql, binds).load::<ScoringRecord>(conn)
}

/// GET /simulation-data - transformed record list
pub async fn handle_simulation_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let records = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        fetch_records(&mut conn, &filters).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let data: Vec<SimulationView> = records.iter().map(SimulationView::from_record).collect();
    Ok(Json(serde_json::json!({ "simulationData": data })))
}

/// GET /call-sim-sample-data - one record with conversation-derived scores
pub async fn handle_sample_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();

    let record = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM call_sim_scoring \
             WHERE NOT is_deleted ORDER BY RANDOM() LIMIT 1"
        );
        diesel::sql_query(sql)
            .get_result::<ScoringRecord>(&mut conn)
            .optional()
            .map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(record) = record else {
        return Err(ReportsError::NotFound("No sample data found".to_string()));
    };
    Ok(Json(serde_json::json!({
        "sampleData": EvaluationView::from_record(&record)
    })))
}

/// GET /simulation-run/:id - single transformed record
pub async fn handle_simulation_run(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let run_id: i32 = run_id
        .parse()
        .map_err(|_| ReportsError::Validation("Invalid simulation ID format".to_string()))?;
    let pool = state.conn.clone();

    let record = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM call_sim_scoring \
             WHERE NOT is_deleted AND id = $1"
        );
        diesel::sql_query(sql)
            .bind::<diesel::sql_types::Integer, _>(run_id)
            .get_result::<ScoringRecord>(&mut conn)
            .optional()
            .map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(record) = record else {
        return Err(ReportsError::NotFound("Simulation not found".to_string()));
    };
    Ok(Json(serde_json::json!({
        "simulationData": RunView::from_record(&record)
    })))
}

/// GET /:simulation_id/status - assessment status lookup
pub async fn handle_assessment_status(
    State(state): State<Arc<AppState>>,
    Path(simulation_id): Path<String>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    if simulation_id.is_empty() || !simulation_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReportsError::Validation(
            "Invalid simulation ID format".to_string(),
        ));
    }
    let pool = state.conn.clone();

    let row = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        dsl::call_sim_scoring
            .filter(dsl::simulation_id.eq(simulation_id))
            .select((dsl::id, dsl::simulation_id, dsl::assessment_status))
            .first::<(i32, Option<String>, Option<String>)>(&mut conn)
            .optional()
            .map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some((id, simulation_id, status)) = row else {
        return Err(ReportsError::NotFound("Assessment not found".to_string()));
    };
    Ok(Json(serde_json::json!({
        "id": id,
        "simulation_id": simulation_id,
        "status": status,
    })))
}

/// DELETE /id/:id - soft delete, refused for TESTING-mode records
pub async fn handle_delete_assessment(
    State(state): State<Arc<AppState>>,
    Path(assessment_id): Path<String>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let assessment_id: i32 = assessment_id
        .parse()
        .map_err(|_| ReportsError::Validation("Invalid assessment ID format".to_string()))?;
    let pool = state.conn.clone();

    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;

        let row = dsl::call_sim_scoring
            .filter(dsl::id.eq(assessment_id))
            .select((dsl::id, dsl::mode))
            .first::<(i32, Option<String>)>(&mut conn)
            .optional()
            .map_err(ReportsError::database)?;

        let Some((_, mode)) = row else {
            return Err(ReportsError::NotFound("Assessment not found".to_string()));
        };
        // The mode check happens before the update so a TESTING record is
        // never mutated, not even transiently.
        if mode.as_deref() == Some("TESTING") {
            return Err(ReportsError::Forbidden(
                "Cannot delete assessment with TESTING mode".to_string(),
            ));
        }

        diesel::update(dsl::call_sim_scoring.filter(dsl::id.eq(assessment_id)))
            .set(dsl::is_deleted.eq(true))
            .execute(&mut conn)
            .map_err(ReportsError::database)?;
        Ok(())
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    Ok(Json(serde_json::json!({
        "message": "Assessment deleted successfully",
        "id": assessment_id,
    })))
}
