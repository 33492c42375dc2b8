//! Team-overview endpoints. Every view applies the mode-aware filter set
//! (`team`, `product`, `mode`) and runs its database work on the blocking
//! pool with a scoped connection checkout.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::reports::aggregate::{self, Grouping};
use crate::reports::error::ReportsError;
use crate::reports::filters::{ReportFilters, ReportQuery};
use crate::reports::types::{
    ComparisonRow, GroupPoint, ScoreEntry, SimulationCount, TeamAverages,
};
use crate::shared::state::AppState;

/// GET /team-overview - all five overview views in one payload
pub async fn handle_all_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;

        let averages = aggregate::team_averages(&mut conn, &filters)
            .map_err(ReportsError::database)?;
        let Some(averages) = averages else {
            return Ok::<_, ReportsError>(None);
        };
        let products = aggregate::available_products(&mut conn, filters.team.as_deref())
            .map_err(ReportsError::database)?;
        let comparison = aggregate::skill_comparison(&mut conn, &filters, false)
            .map_err(ReportsError::database)?;
        let trend = aggregate::monthly_trend(&mut conn, &filters)
            .map_err(ReportsError::database)?;
        let adoption = aggregate::group_comparison(&mut conn, &filters, Grouping::Adoption)
            .map_err(ReportsError::database)?;
        let situation = aggregate::group_comparison(&mut conn, &filters, Grouping::Situation)
            .map_err(ReportsError::database)?;

        let comparison: Vec<ComparisonRow> = comparison
            .unwrap_or_default()
            .iter()
            .map(ComparisonRow::from_metric)
            .collect();
        let trend: Vec<GroupPoint> = trend
            .unwrap_or_default()
            .iter()
            .map(GroupPoint::from_group)
            .collect();
        let adoption: Vec<GroupPoint> = adoption
            .unwrap_or_default()
            .iter()
            .map(GroupPoint::from_group)
            .collect();
        let situation: Vec<GroupPoint> = situation
            .unwrap_or_default()
            .iter()
            .map(GroupPoint::from_group)
            .collect();

        Ok(Some(serde_json::json!({
            "teamAverages": TeamAverages::from_row(&averages, products),
            "teamComparisonData": comparison,
            "teamTrendData": trend,
            "adoptionData": adoption,
            "situationData": situation,
        })))
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(payload) = result else {
        return Err(ReportsError::no_data());
    };
    Ok(Json(payload))
}

/// GET /team-overview/averages
pub async fn handle_averages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let row = aggregate::team_averages(&mut conn, &filters)
            .map_err(ReportsError::database)?;
        let Some(row) = row else {
            return Ok::<_, ReportsError>(None);
        };
        let products = aggregate::available_products(&mut conn, filters.team.as_deref())
            .map_err(ReportsError::database)?;
        Ok(Some(TeamAverages::from_row(&row, products)))
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(averages) = result else {
        return Err(ReportsError::no_data());
    };
    Ok(Json(serde_json::json!({ "teamAverages": averages })))
}

/// GET /team-overview/comparison
pub async fn handle_comparison(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let rows = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::skill_comparison(&mut conn, &filters, false).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(rows) = rows else {
        return Err(ReportsError::no_data());
    };
    let data: Vec<ComparisonRow> = rows.iter().map(ComparisonRow::from_metric).collect();
    Ok(Json(serde_json::json!({ "teamComparisonData": data })))
}

/// GET /team-overview/trend
pub async fn handle_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let rows = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::monthly_trend(&mut conn, &filters).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(rows) = rows else {
        return Err(ReportsError::no_data());
    };
    let data: Vec<GroupPoint> = rows.iter().map(GroupPoint::from_group).collect();
    Ok(Json(serde_json::json!({ "teamTrendData": data })))
}

/// GET /team-overview/adoption
pub async fn handle_adoption(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let data = grouped_view(state, query, Grouping::Adoption).await?;
    Ok(Json(serde_json::json!({ "adoptionData": data })))
}

/// GET /team-overview/situation
pub async fn handle_situation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let data = grouped_view(state, query, Grouping::Situation).await?;
    Ok(Json(serde_json::json!({ "situationData": data })))
}

async fn grouped_view(
    state: Arc<AppState>,
    query: ReportQuery,
    grouping: Grouping,
) -> Result<Vec<GroupPoint>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let rows = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::group_comparison(&mut conn, &filters, grouping).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(rows) = rows else {
        return Err(ReportsError::no_data());
    };
    Ok(rows.iter().map(GroupPoint::from_group).collect())
}

/// GET /team-overview/accuracy
pub async fn handle_accuracy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let entries = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::accuracy_metrics(&mut conn, &filters).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(entries) = entries else {
        return Err(ReportsError::no_data());
    };
    let data: Vec<ScoreEntry> = entries
        .into_iter()
        .map(|(name, score)| ScoreEntry::new(name, score))
        .collect();
    Ok(Json(serde_json::json!({ "accuracyData": data })))
}

/// GET /team-overview/fluency
pub async fn handle_fluency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let entries = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::fluency_metrics(&mut conn, &filters).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let Some(entries) = entries else {
        return Err(ReportsError::no_data());
    };
    let data: Vec<ScoreEntry> = entries
        .into_iter()
        .map(|(name, score)| ScoreEntry::new(name, score))
        .collect();
    Ok(Json(serde_json::json!({ "fluencyData": data })))
}

/// GET /team-overview/simulation-count
pub async fn handle_simulation_count(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = ReportFilters::from_query(&query);

    let counts = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        aggregate::simulation_counts(&mut conn, &filters).map_err(ReportsError::database)
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    Ok(Json(serde_json::json!({
        "simulationCount": SimulationCount::from_counts(&counts)
    })))
}
