//! Industry-benchmark endpoints. These honor the `team` and `product`
//! filters; the benchmark population excludes the requesting team when one
//! is selected. An empty aggregate renders as an empty data array alongside
//! the filter options rather than an error, so a fresh UI load always has
//! dropdowns to offer.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::reports::aggregate::{self, Grouping};
use crate::reports::error::ReportsError;
use crate::reports::filters::{ReportFilters, ReportQuery};
use crate::reports::types::{
    AdoptionBenchmarkRow, BenchmarkRow, FilterOptions, SituationBenchmarkRow, SkillRow,
};
use crate::shared::state::AppState;

/// Benchmark views ignore the overview-only filters.
fn benchmark_filters(query: &ReportQuery) -> ReportFilters {
    let parsed = ReportFilters::from_query(query);
    ReportFilters {
        team: parsed.team,
        product: parsed.product,
        ..Default::default()
    }
}

fn filter_options(
    conn: &mut diesel::PgConnection,
    filters: &ReportFilters,
) -> Result<FilterOptions, ReportsError> {
    let teams = aggregate::distinct_teams(conn).map_err(ReportsError::database)?;
    let products = aggregate::available_products(conn, filters.team.as_deref())
        .map_err(ReportsError::database)?;
    Ok(FilterOptions { teams, products })
}

/// GET /industry-benchmarks - per-skill team vs benchmark means
pub async fn handle_skill_comparison(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = benchmark_filters(&query);

    let (rows, options) = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let rows = aggregate::skill_comparison(&mut conn, &filters, false)
            .map_err(ReportsError::database)?;
        let options = filter_options(&mut conn, &filters)?;
        Ok::<_, ReportsError>((rows, options))
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let data: Vec<SkillRow> = rows
        .unwrap_or_default()
        .iter()
        .map(SkillRow::from_metric)
        .collect();
    Ok(Json(serde_json::json!({
        "skillData": data,
        "filterOptions": options,
    })))
}

/// GET /industry-benchmarks/detail - benchmark table over the extended
/// metric set, led by Overall Score and Simulations Completed
pub async fn handle_detail(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let pool = state.conn.clone();
    let filters = benchmark_filters(&query);

    let (rows, counts, options) = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let rows = aggregate::skill_comparison(&mut conn, &filters, true)
            .map_err(ReportsError::database)?;
        let counts =
            aggregate::simulation_counts(&mut conn, &filters).map_err(ReportsError::database)?;
        let options = filter_options(&mut conn, &filters)?;
        Ok::<_, ReportsError>((rows, counts, options))
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))??;

    let mut data: Vec<BenchmarkRow> = Vec::new();
    if let Some(rows) = rows {
        for row in &rows {
            let mut benchmark = BenchmarkRow::from_metric(row);
            if benchmark.metric == "Overall" {
                benchmark.metric = "Overall Score".to_string();
                data.push(benchmark);
                data.push(BenchmarkRow::from_counts(&counts));
            } else {
                data.push(benchmark);
            }
        }
    }
    Ok(Json(serde_json::json!({
        "benchmarkData": data,
        "filterOptions": options,
    })))
}

/// GET /industry-benchmarks/adoption
pub async fn handle_adoption(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let (rows, options) = grouped_benchmark(state, &query, Grouping::Adoption).await?;
    let data: Vec<AdoptionBenchmarkRow> = rows
        .iter()
        .map(AdoptionBenchmarkRow::from_group)
        .collect();
    Ok(Json(serde_json::json!({
        "adoptionData": data,
        "filterOptions": options,
    })))
}

/// GET /industry-benchmarks/situation
pub async fn handle_situation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ReportsError> {
    let (rows, options) = grouped_benchmark(state, &query, Grouping::Situation).await?;
    let data: Vec<SituationBenchmarkRow> = rows
        .iter()
        .map(SituationBenchmarkRow::from_group)
        .collect();
    Ok(Json(serde_json::json!({
        "situationData": data,
        "filterOptions": options,
    })))
}

async fn grouped_benchmark(
    state: Arc<AppState>,
    query: &ReportQuery,
    grouping: Grouping,
) -> Result<(Vec<aggregate::GroupRow>, FilterOptions), ReportsError> {
    let pool = state.conn.clone();
    let filters = benchmark_filters(query);

    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ReportsError::connection)?;
        let rows = aggregate::group_comparison(&mut conn, &filters, grouping)
            .map_err(ReportsError::database)?;
        let options = filter_options(&mut conn, &filters)?;
        Ok::<_, ReportsError>((rows.unwrap_or_default(), options))
    })
    .await
    .map_err(|e| ReportsError::Internal(e.to_string()))?
}
