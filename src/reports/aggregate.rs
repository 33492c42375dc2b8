//! Benchmark and comparison queries over `call_sim_scoring`.
//!
//! Every view is built from two subsets of the same filtered scope: the
//! requesting team's records and the "industry" population, which excludes
//! the team when one is selected and is the whole scope otherwise. The SQL
//! is composed from fixed fragments plus the predicate builder in
//! `filters`; caller-supplied values only ever travel as bind parameters.

use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use diesel::{PgConnection, QueryResult, QueryableByName, RunQueryDsl};

use crate::reports::filters::{render_conditions, ReportFilters};

/// One scored dimension of the accuracy tree.
#[derive(Debug)]
pub struct Metric {
    pub label: &'static str,
    pub column: &'static str,
    pub key: &'static str,
}

/// The five skills every comparison view reports. "Overall" is derived from
/// these: the per-record mean, null unless all five are present.
pub const CORE_METRICS: [Metric; 5] = [
    Metric {
        label: "Introduction",
        column: "introduction",
        key: "introduction",
    },
    Metric {
        label: "Rapport",
        column: "rapport",
        key: "rapport",
    },
    Metric {
        label: "Creating Interest",
        column: "creating_interest",
        key: "creatingInterest",
    },
    Metric {
        label: "Probing",
        column: "probing",
        key: "probing",
    },
    Metric {
        label: "Product Knowledge",
        column: "product_knowledge",
        key: "productKnowledge",
    },
];

/// Additional dimensions reported by the detail benchmark view.
pub const EXTENDED_METRICS: [Metric; 5] = [
    Metric {
        label: "Strategy",
        column: "strategy",
        key: "strategy",
    },
    Metric {
        label: "Closing",
        column: "closing",
        key: "closing",
    },
    Metric {
        label: "DISC",
        column: "disc",
        key: "disc",
    },
    Metric {
        label: "Traits",
        column: "traits",
        key: "traits",
    },
    Metric {
        label: "Adoption Continuum",
        column: "adoption",
        key: "adoptionContinuum",
    },
];

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MetricRow {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Nullable<Double>)]
    pub team: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub average: Option<f64>,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Nullable<Double>)]
    pub team: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub industry: Option<f64>,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AveragesRow {
    #[diesel(sql_type = Nullable<Double>)]
    pub overall: Option<f64>,
    #[diesel(sql_type = BigInt)]
    pub simulations: i64,
    #[diesel(sql_type = Nullable<Double>)]
    pub introduction: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub rapport: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub creating_interest: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub probing: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub product_knowledge: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub total_accuracy: Option<f64>,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CountsRow {
    #[diesel(sql_type = BigInt)]
    pub team: i64,
    #[diesel(sql_type = BigInt)]
    pub benchmark: i64,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct TextRow {
    #[diesel(sql_type = Text)]
    value: String,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct AccuracyRow {
    #[diesel(sql_type = BigInt)]
    simulations: i64,
    #[diesel(sql_type = Nullable<Double>)]
    disc: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    total: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    traits: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    closing: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    probing: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    rapport: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    strategy: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    introduction: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    creating_interest: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    product_knowledge: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    adoption_continuum: Option<f64>,
}

#[derive(Debug, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct FluencyRow {
    #[diesel(sql_type = BigInt)]
    simulations: i64,
    #[diesel(sql_type = Nullable<Double>)]
    wpm: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    total: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pauses: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    filler_words: Option<f64>,
}

/// Dimension the grouped comparison views aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Situation,
    Adoption,
}

impl Grouping {
    fn column(self) -> &'static str {
        match self {
            Self::Situation => "situation",
            Self::Adoption => "adoption_continuum",
        }
    }

    /// Adoption levels carry a fixed ordinal rank, unknown values last;
    /// situations fall back to the alphabetical tiebreak.
    fn rank_expr(self) -> &'static str {
        match self {
            Self::Situation => "1",
            Self::Adoption => {
                "CASE t.grp \
                 WHEN 'Naive' THEN 1 \
                 WHEN 'Aware' THEN 2 \
                 WHEN 'Trialing' THEN 3 \
                 WHEN 'Adopter' THEN 4 \
                 WHEN 'Advocate' THEN 5 \
                 ELSE 6 END"
            }
        }
    }
}

pub(crate) fn bound_query(sql: String, binds: Vec<String>) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    let mut query = diesel::sql_query(sql).into_boxed();
    for value in binds {
        query = query.bind::<Text, _>(value);
    }
    query
}

fn metric_set(extended: bool) -> Vec<&'static Metric> {
    let mut metrics: Vec<&Metric> = CORE_METRICS.iter().collect();
    if extended {
        metrics.extend(EXTENDED_METRICS.iter());
    }
    metrics
}

/// `CAST(accuracy->'scores'->'<key>'->>'score' AS FLOAT) AS <column>` for
/// each metric. Keys come from the compile-time metric tables above.
fn score_projection(metrics: &[&Metric]) -> String {
    metrics
        .iter()
        .map(|m| {
            format!(
                "CAST(accuracy->'scores'->'{}'->>'score' AS FLOAT) AS {}",
                m.key, m.column
            )
        })
        .collect::<Vec<_>>()
        .join(",\n        ")
}

/// Per-record mean of the core five skills. SQL null propagation makes the
/// whole expression null when any skill is missing, which is exactly the
/// "only records where all five are present" rule.
fn overall_expr(prefix: &str) -> String {
    let sum = CORE_METRICS
        .iter()
        .map(|m| format!("{prefix}{}", m.column))
        .collect::<Vec<_>>()
        .join(" + ");
    format!("({sum}) / 5")
}

fn averages_sql(filters: &ReportFilters) -> (String, Vec<String>) {
    let (conditions, binds) = render_conditions(&filters.team_predicates(), 1);
    let success_rates = [
        ("introduction", "introduction"),
        ("rapport", "rapport"),
        ("creating_interest", "creating_interest"),
        ("probing", "probing"),
        ("product_knowledge", "product_knowledge"),
    ]
    .iter()
    .map(|(column, key)| {
        format!(
            "AVG(CASE WHEN conversation_data->'analysis'->'evaluation_criteria_results'\
             ->'{key}'->>'result' = 'success' THEN 100.0 ELSE 0.0 END)::float8 AS {column}"
        )
    })
    .collect::<Vec<_>>()
    .join(",\n    ");

    let sql = format!(
        "SELECT
    AVG(overall_score)::float8 AS overall,
    COUNT(*) AS simulations,
    {success_rates},
    AVG(CAST(accuracy->'scores'->'total'->>'score' AS FLOAT))::float8 AS total_accuracy
FROM call_sim_scoring
WHERE NOT is_deleted{conditions}"
    );
    (sql, binds)
}

fn comparison_sql(filters: &ReportFilters, extended: bool) -> (String, Vec<String>) {
    let metrics = metric_set(extended);
    let (population_conditions, population_binds) =
        render_conditions(&filters.population_predicates(), 1);
    let (team_conditions, team_binds) =
        render_conditions(&filters.team_predicates(), 1 + population_binds.len());

    let projection = score_projection(&metrics);
    let overall = overall_expr("");
    let benchmark_averages = metrics
        .iter()
        .map(|m| format!("AVG({col})::float8 AS {col}", col = m.column))
        .collect::<Vec<_>>()
        .join(",\n        ");

    let mut branches = String::new();
    for (index, metric) in metrics.iter().enumerate() {
        branches.push_str(&format!(
            "    UNION ALL
    SELECT {ord} AS ord, '{label}' AS name,
        (SELECT AVG({col})::float8 FROM team_scores) AS team,
        (SELECT {col} FROM benchmarks) AS average
",
            ord = index + 1,
            label = metric.label,
            col = metric.column,
        ));
    }

    let sql = format!(
        "WITH population AS (
    SELECT
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL{population_conditions}
),
benchmarks AS (
    SELECT
        AVG({overall})::float8 AS overall,
        {benchmark_averages}
    FROM population
),
team_scores AS (
    SELECT
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL{team_conditions}
)
SELECT name, team, average FROM (
    SELECT 0 AS ord, 'Overall' AS name,
        (SELECT AVG({overall})::float8 FROM team_scores) AS team,
        (SELECT overall FROM benchmarks) AS average
{branches}) metric_rows
ORDER BY ord"
    );

    let mut binds = population_binds;
    binds.extend(team_binds);
    (sql, binds)
}

fn grouped_sql(filters: &ReportFilters, grouping: Grouping) -> (String, Vec<String>) {
    let metrics = metric_set(false);
    let (population_conditions, population_binds) =
        render_conditions(&filters.population_predicates(), 1);
    let (team_conditions, team_binds) =
        render_conditions(&filters.team_predicates(), 1 + population_binds.len());

    let projection = score_projection(&metrics);
    let overall = overall_expr("");
    let overall_t = overall_expr("t.");
    let column = grouping.column();
    let rank = grouping.rank_expr();

    let sql = format!(
        "WITH population AS (
    SELECT INITCAP({column}) AS grp,
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL
    AND {column} IS NOT NULL{population_conditions}
),
benchmarks AS (
    SELECT grp, AVG({overall})::float8 AS industry
    FROM population
    GROUP BY grp
),
team_scores AS (
    SELECT INITCAP({column}) AS grp,
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL
    AND {column} IS NOT NULL{team_conditions}
)
SELECT name, team, industry FROM (
    SELECT 0 AS ord, 0 AS rank, 'Overall' AS name,
        (SELECT AVG({overall})::float8 FROM team_scores) AS team,
        (SELECT AVG({overall})::float8 FROM population) AS industry
    UNION ALL
    SELECT 1 AS ord, {rank} AS rank, t.grp AS name,
        AVG({overall_t})::float8 AS team,
        b.industry AS industry
    FROM team_scores t
    JOIN benchmarks b ON t.grp = b.grp
    GROUP BY t.grp, b.industry
) grouped
ORDER BY ord, rank, name"
    );

    let mut binds = population_binds;
    binds.extend(team_binds);
    (sql, binds)
}

fn trend_sql(filters: &ReportFilters) -> (String, Vec<String>) {
    let metrics = metric_set(false);
    let (population_conditions, population_binds) =
        render_conditions(&filters.population_predicates(), 1);
    let (team_conditions, team_binds) =
        render_conditions(&filters.team_predicates(), 1 + population_binds.len());

    let projection = score_projection(&metrics);
    let overall = overall_expr("");
    let overall_t = overall_expr("t.");

    let sql = format!(
        "WITH population AS (
    SELECT DATE_TRUNC('month', created_at) AS month,
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL
    AND created_at >= NOW() - INTERVAL '12 months'{population_conditions}
),
benchmarks AS (
    SELECT month, AVG({overall})::float8 AS industry
    FROM population
    GROUP BY month
),
team_scores AS (
    SELECT DATE_TRUNC('month', created_at) AS month,
        {projection}
    FROM call_sim_scoring
    WHERE NOT is_deleted
    AND accuracy IS NOT NULL
    AND created_at >= NOW() - INTERVAL '12 months'{team_conditions}
)
SELECT TO_CHAR(t.month, 'Mon YYYY') AS name,
    AVG({overall_t})::float8 AS team,
    b.industry AS industry
FROM team_scores t
JOIN benchmarks b ON t.month = b.month
GROUP BY t.month, b.industry
ORDER BY t.month"
    );

    let mut binds = population_binds;
    binds.extend(team_binds);
    (sql, binds)
}

fn counts_sql(filters: &ReportFilters) -> (String, Vec<String>) {
    let (team_conditions, team_binds) = render_conditions(&filters.team_predicates(), 1);
    let (population_conditions, population_binds) =
        render_conditions(&filters.population_predicates(), 1 + team_binds.len());

    let sql = format!(
        "SELECT
    (SELECT COUNT(*) FROM call_sim_scoring WHERE NOT is_deleted{team_conditions}) AS team,
    (SELECT COUNT(*) FROM call_sim_scoring WHERE NOT is_deleted{population_conditions}) AS benchmark"
    );

    let mut binds = team_binds;
    binds.extend(population_binds);
    (sql, binds)
}

fn accuracy_sql(filters: &ReportFilters) -> (String, Vec<String>) {
    let (conditions, binds) = render_conditions(&filters.team_predicates(), 1);
    let columns = [
        ("disc", "disc"),
        ("total", "total"),
        ("traits", "traits"),
        ("closing", "closing"),
        ("probing", "probing"),
        ("rapport", "rapport"),
        ("strategy", "strategy"),
        ("introduction", "introduction"),
        ("creating_interest", "creatingInterest"),
        ("product_knowledge", "productKnowledge"),
        ("adoption_continuum", "adoptionContinuum"),
    ]
    .iter()
    .map(|(column, key)| {
        format!("AVG(CAST(accuracy->'scores'->'{key}'->>'score' AS FLOAT))::float8 AS {column}")
    })
    .collect::<Vec<_>>()
    .join(",\n    ");

    let sql = format!(
        "SELECT
    COUNT(*) AS simulations,
    {columns}
FROM call_sim_scoring
WHERE NOT is_deleted
AND accuracy IS NOT NULL{conditions}"
    );
    (sql, binds)
}

fn fluency_sql(filters: &ReportFilters) -> (String, Vec<String>) {
    let (conditions, binds) = render_conditions(&filters.team_predicates(), 1);
    let columns = [
        ("wpm", "wpm"),
        ("total", "total"),
        ("pauses", "pauses"),
        ("filler_words", "fillerWords"),
    ]
    .iter()
    .map(|(column, key)| {
        format!("AVG(CAST(fluency->'scores'->>'{key}' AS FLOAT))::float8 AS {column}")
    })
    .collect::<Vec<_>>()
    .join(",\n    ");

    let sql = format!(
        "SELECT
    COUNT(*) AS simulations,
    {columns}
FROM call_sim_scoring
WHERE NOT is_deleted
AND fluency IS NOT NULL{conditions}"
    );
    (sql, binds)
}

/// Overall mean, simulation count, conversation success rates, and mean
/// total accuracy for the filtered team scope. `None` when nothing matched.
pub fn team_averages(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<Option<AveragesRow>> {
    let (sql, binds) = averages_sql(filters);
    let row = bound_query(sql, binds).get_result::<AveragesRow>(conn)?;
    if row.simulations == 0 {
        return Ok(None);
    }
    Ok(Some(row))
}

/// Team mean vs population benchmark for each metric, "Overall" first.
/// `None` when the team scope holds no scores for any metric.
pub fn skill_comparison(
    conn: &mut PgConnection,
    filters: &ReportFilters,
    extended: bool,
) -> QueryResult<Option<Vec<MetricRow>>> {
    let (sql, binds) = comparison_sql(filters, extended);
    let rows = bound_query(sql, binds).load::<MetricRow>(conn)?;
    if rows.iter().all(|row| row.team.is_none()) {
        return Ok(None);
    }
    Ok(Some(rows))
}

/// Team vs population means per group, preceded by the all-group "Overall"
/// row. Group rows only exist where the population has the same group.
pub fn group_comparison(
    conn: &mut PgConnection,
    filters: &ReportFilters,
    grouping: Grouping,
) -> QueryResult<Option<Vec<GroupRow>>> {
    let (sql, binds) = grouped_sql(filters, grouping);
    let rows = bound_query(sql, binds).load::<GroupRow>(conn)?;
    if rows.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(rows))
}

/// Monthly team-vs-population means over the trailing 12 months.
pub fn monthly_trend(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<Option<Vec<GroupRow>>> {
    let (sql, binds) = trend_sql(filters);
    let rows = bound_query(sql, binds).load::<GroupRow>(conn)?;
    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(rows))
}

/// Team and population record counts under the same base predicates.
pub fn simulation_counts(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<CountsRow> {
    let (sql, binds) = counts_sql(filters);
    bound_query(sql, binds).get_result::<CountsRow>(conn)
}

/// Mean of every accuracy metric over the filtered scope, nulls coalesced
/// to 0 and sorted by score descending.
pub fn accuracy_metrics(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<Option<Vec<(String, f64)>>> {
    let (sql, binds) = accuracy_sql(filters);
    let row = bound_query(sql, binds).get_result::<AccuracyRow>(conn)?;
    if row.simulations == 0 {
        return Ok(None);
    }
    let mut entries = vec![
        ("disc".to_string(), row.disc.unwrap_or(0.0)),
        ("total".to_string(), row.total.unwrap_or(0.0)),
        ("traits".to_string(), row.traits.unwrap_or(0.0)),
        ("closing".to_string(), row.closing.unwrap_or(0.0)),
        ("probing".to_string(), row.probing.unwrap_or(0.0)),
        ("rapport".to_string(), row.rapport.unwrap_or(0.0)),
        ("strategy".to_string(), row.strategy.unwrap_or(0.0)),
        ("introduction".to_string(), row.introduction.unwrap_or(0.0)),
        (
            "creatingInterest".to_string(),
            row.creating_interest.unwrap_or(0.0),
        ),
        (
            "productKnowledge".to_string(),
            row.product_knowledge.unwrap_or(0.0),
        ),
        (
            "adoptionContinuum".to_string(),
            row.adoption_continuum.unwrap_or(0.0),
        ),
    ];
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(Some(entries))
}

/// Mean of every fluency metric over the filtered scope, sorted descending.
pub fn fluency_metrics(
    conn: &mut PgConnection,
    filters: &ReportFilters,
) -> QueryResult<Option<Vec<(String, f64)>>> {
    let (sql, binds) = fluency_sql(filters);
    let row = bound_query(sql, binds).get_result::<FluencyRow>(conn)?;
    if row.simulations == 0 {
        return Ok(None);
    }
    let mut entries = vec![
        ("wpm".to_string(), row.wpm.unwrap_or(0.0)),
        ("total".to_string(), row.total.unwrap_or(0.0)),
        ("pauses".to_string(), row.pauses.unwrap_or(0.0)),
        ("fillerWords".to_string(), row.filler_words.unwrap_or(0.0)),
    ];
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(Some(entries))
}

/// Distinct products recorded for the requesting team, or for the whole
/// table when no team is selected.
pub fn available_products(
    conn: &mut PgConnection,
    team: Option<&str>,
) -> QueryResult<Vec<String>> {
    let mut sql = String::from(
        "SELECT DISTINCT product_id AS value FROM call_sim_scoring \
         WHERE NOT is_deleted AND product_id IS NOT NULL",
    );
    let mut binds = Vec::new();
    if let Some(team) = team {
        sql.push_str(" AND team_id::text = $1");
        binds.push(team.to_string());
    }
    sql.push_str(" ORDER BY value");
    let rows = bound_query(sql, binds).load::<TextRow>(conn)?;
    Ok(rows.into_iter().map(|row| row.value).collect())
}

/// Distinct team ids present in the table.
pub fn distinct_teams(conn: &mut PgConnection) -> QueryResult<Vec<String>> {
    let sql = "SELECT DISTINCT team_id::text AS value FROM call_sim_scoring \
               WHERE NOT is_deleted AND team_id IS NOT NULL ORDER BY value";
    let rows = diesel::sql_query(sql).load::<TextRow>(conn)?;
    Ok(rows.into_iter().map(|row| row.value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::filters::ReportQuery;

    fn filters(team: Option<&str>, product: Option<&str>) -> ReportFilters {
        ReportFilters::from_query(&ReportQuery {
            team: team.map(str::to_owned),
            product: product.map(str::to_owned),
            ..Default::default()
        })
    }

    #[test]
    fn population_excludes_selected_team() {
        let (sql, binds) = comparison_sql(&filters(Some("Alpha"), None), false);
        assert!(sql.contains("team_id::text <> $1"));
        assert!(sql.contains("team_id::text = $2"));
        assert_eq!(binds, vec!["Alpha".to_string(), "Alpha".to_string()]);
    }

    #[test]
    fn population_is_unfiltered_without_team() {
        let (sql, binds) = comparison_sql(&filters(None, None), false);
        assert!(!sql.contains("team_id"));
        assert!(binds.is_empty());
    }

    #[test]
    fn shared_predicates_apply_to_both_subsets() {
        let (sql, binds) = comparison_sql(&filters(Some("Alpha"), Some("ELF")), false);
        assert!(sql.contains("product_id = $1"));
        assert!(sql.contains("team_id::text <> $2"));
        assert!(sql.contains("product_id = $3"));
        assert!(sql.contains("team_id::text = $4"));
        assert_eq!(binds, vec!["ELF", "Alpha", "ELF", "Alpha"]);
    }

    #[test]
    fn comparison_unions_follow_declared_metric_order() {
        let (sql, _) = comparison_sql(&filters(None, None), true);
        let overall = sql.find("'Overall'").unwrap();
        let introduction = sql.find("'Introduction'").unwrap();
        let adoption = sql.find("'Adoption Continuum'").unwrap();
        assert!(overall < introduction);
        assert!(introduction < adoption);
        assert!(sql.contains("ORDER BY ord"));
    }

    #[test]
    fn core_set_has_no_extended_metrics() {
        let (sql, _) = comparison_sql(&filters(None, None), false);
        assert!(!sql.contains("'Strategy'"));
        assert!(!sql.contains("'DISC'"));
    }

    #[test]
    fn averages_count_includes_null_accuracy_records() {
        let (sql, _) = averages_sql(&filters(Some("Alpha"), None));
        assert!(sql.contains("COUNT(*) AS simulations"));
        assert!(!sql.contains("accuracy IS NOT NULL"));
    }

    #[test]
    fn averages_success_rates_use_conversation_keys() {
        let (sql, _) = averages_sql(&filters(None, None));
        assert!(sql.contains("->'creating_interest'->>'result'"));
        assert!(sql.contains("->'product_knowledge'->>'result'"));
        assert!(sql.contains("= 'success' THEN 100.0 ELSE 0.0"));
    }

    #[test]
    fn adoption_rows_rank_by_fixed_order() {
        let (sql, _) = grouped_sql(&filters(Some("Alpha"), None), Grouping::Adoption);
        assert!(sql.contains("WHEN 'Naive' THEN 1"));
        assert!(sql.contains("WHEN 'Advocate' THEN 5"));
        assert!(sql.contains("ELSE 6"));
        assert!(sql.contains("ORDER BY ord, rank, name"));
    }

    #[test]
    fn situation_rows_fall_back_to_name_order() {
        let (sql, _) = grouped_sql(&filters(Some("Alpha"), None), Grouping::Situation);
        assert!(!sql.contains("WHEN 'Naive'"));
        assert!(sql.contains("INITCAP(situation)"));
    }

    #[test]
    fn trend_is_bounded_to_trailing_year() {
        let (sql, _) = trend_sql(&filters(Some("Alpha"), None));
        assert_eq!(sql.matches("INTERVAL '12 months'").count(), 2);
        assert!(sql.contains("TO_CHAR(t.month, 'Mon YYYY')"));
        assert!(sql.contains("ORDER BY t.month"));
    }

    #[test]
    fn counts_bind_team_then_population() {
        let (sql, binds) = counts_sql(&filters(Some("Alpha"), Some("ELF")));
        assert!(sql.contains("team_id::text = $2"));
        assert!(sql.contains("team_id::text <> $4"));
        assert_eq!(binds, vec!["ELF", "Alpha", "ELF", "Alpha"]);
    }

    #[test]
    fn overall_requires_all_core_skills() {
        let expr = overall_expr("");
        assert_eq!(
            expr,
            "(introduction + rapport + creating_interest + probing + product_knowledge) / 5"
        );
    }

    #[test]
    fn fluency_reads_camel_case_keys() {
        let (sql, _) = fluency_sql(&filters(None, None));
        assert!(sql.contains("fluency->'scores'->>'fillerWords'"));
        assert!(sql.contains("fluency IS NOT NULL"));
    }
}
