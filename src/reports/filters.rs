use serde::Deserialize;

/// The literal query value that means "no constraint". The UI sends it for
/// every unselected dropdown, so it must never be matched against the table.
pub const WILDCARD: &str = "all";

/// Raw query-string parameters accepted by the report endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub team: Option<String>,
    pub product: Option<String>,
    pub mode: Option<String>,
    pub specialty: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Normalized filter set. `None` means unconstrained: absent, empty, and the
/// `"all"` sentinel all collapse to `None` for the categorical filters.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub team: Option<String>,
    pub product: Option<String>,
    pub mode: Option<String>,
    pub specialty: Option<String>,
    pub user_id: Option<String>,
}

fn normalize(raw: Option<&str>) -> Option<String> {
    raw.filter(|v| !v.is_empty() && *v != WILDCARD)
        .map(str::to_owned)
}

impl ReportFilters {
    pub fn from_query(query: &ReportQuery) -> Self {
        Self {
            team: normalize(query.team.as_deref()),
            product: normalize(query.product.as_deref()),
            mode: normalize(query.mode.as_deref()),
            specialty: normalize(query.specialty.as_deref()),
            // A user id is an identifier, not a category; no wildcard sentinel.
            user_id: query.user_id.clone().filter(|v| !v.is_empty()),
        }
    }

    /// Predicates shared by the team and population subsets (everything
    /// except the team constraint).
    pub fn base_predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(product) = &self.product {
            predicates.push(Predicate::new("product_id", "=", product.clone()));
        }
        if let Some(mode) = &self.mode {
            predicates.push(Predicate::new("mode", "=", mode.clone()));
        }
        if let Some(specialty) = &self.specialty {
            predicates.push(Predicate::case_insensitive("specialty", "=", specialty.clone()));
        }
        if let Some(user_id) = &self.user_id {
            predicates.push(Predicate::new("user_id", "=", user_id.clone()));
        }
        predicates
    }

    /// Base predicates plus the team constraint, when a team is selected.
    pub fn team_predicates(&self) -> Vec<Predicate> {
        let mut predicates = self.base_predicates();
        if let Some(team) = &self.team {
            predicates.push(Predicate::new("team_id::text", "=", team.clone()));
        }
        predicates
    }

    /// Base predicates plus the team exclusion: the benchmark population is
    /// everything outside the requesting team, or the whole table when no
    /// team is selected.
    pub fn population_predicates(&self) -> Vec<Predicate> {
        let mut predicates = self.base_predicates();
        if let Some(team) = &self.team {
            predicates.push(Predicate::new("team_id::text", "<>", team.clone()));
        }
        predicates
    }
}

/// One parameterized comparison. The column and operator come from a fixed
/// vocabulary; only the value is caller-supplied, and it always travels as a
/// bind parameter.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: &'static str,
    pub operator: &'static str,
    pub value: String,
    fold_case: bool,
}

impl Predicate {
    pub fn new(column: &'static str, operator: &'static str, value: String) -> Self {
        Self {
            column,
            operator,
            value,
            fold_case: false,
        }
    }

    pub fn case_insensitive(column: &'static str, operator: &'static str, value: String) -> Self {
        Self {
            column,
            operator,
            value,
            fold_case: true,
        }
    }

    fn render(&self, placeholder: usize) -> String {
        if self.fold_case {
            format!(
                "LOWER({}) {} LOWER(${})",
                self.column, self.operator, placeholder
            )
        } else {
            format!("{} {} ${}", self.column, self.operator, placeholder)
        }
    }
}

/// Renders predicates as `AND`-prefixed fragments for appending to an
/// existing WHERE clause, numbering placeholders from `start` (1-based).
/// Returns the fragment string and the ordered bind values.
pub fn render_conditions(predicates: &[Predicate], start: usize) -> (String, Vec<String>) {
    let mut sql = String::new();
    let mut binds = Vec::with_capacity(predicates.len());
    for (offset, predicate) in predicates.iter().enumerate() {
        sql.push_str(" AND ");
        sql.push_str(&predicate.render(start + offset));
        binds.push(predicate.value.clone());
    }
    (sql, binds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(team: &str, product: &str) -> ReportQuery {
        ReportQuery {
            team: Some(team.to_string()),
            product: Some(product.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn wildcard_and_empty_mean_unconstrained() {
        let filters = ReportFilters::from_query(&query("all", ""));
        assert!(filters.team.is_none());
        assert!(filters.product.is_none());
        assert!(filters.base_predicates().is_empty());
    }

    #[test]
    fn wildcard_is_case_sensitive() {
        // "All" is a legitimate team name; only the lowercase sentinel is magic.
        let filters = ReportFilters::from_query(&query("All", "all"));
        assert_eq!(filters.team.as_deref(), Some("All"));
    }

    #[test]
    fn population_excludes_team_only_when_selected() {
        let filters = ReportFilters::from_query(&query("Alpha", "all"));
        let population = filters.population_predicates();
        assert_eq!(population.len(), 1);
        assert_eq!(population[0].operator, "<>");

        let unfiltered = ReportFilters::from_query(&query("all", "all"));
        assert!(unfiltered.population_predicates().is_empty());
    }

    #[test]
    fn team_and_population_share_base_predicates() {
        let q = ReportQuery {
            team: Some("Alpha".to_string()),
            product: Some("Besophil".to_string()),
            mode: Some("LIVE".to_string()),
            ..Default::default()
        };
        let filters = ReportFilters::from_query(&q);
        let team = filters.team_predicates();
        let population = filters.population_predicates();
        assert_eq!(team.len(), 3);
        assert_eq!(population.len(), 3);
        // Only the team constraint differs.
        assert_eq!(team[0].column, population[0].column);
        assert_eq!(team[1].column, population[1].column);
        assert_eq!(team[2].operator, "=");
        assert_eq!(population[2].operator, "<>");
    }

    #[test]
    fn specialty_comparison_folds_case() {
        let q = ReportQuery {
            specialty: Some("Cardiology".to_string()),
            ..Default::default()
        };
        let filters = ReportFilters::from_query(&q);
        let (sql, binds) = render_conditions(&filters.base_predicates(), 1);
        assert_eq!(sql, " AND LOWER(specialty) = LOWER($1)");
        assert_eq!(binds, vec!["Cardiology".to_string()]);
    }

    #[test]
    fn placeholders_number_from_caller_start() {
        let q = ReportQuery {
            team: Some("Alpha".to_string()),
            product: Some("ELF".to_string()),
            ..Default::default()
        };
        let filters = ReportFilters::from_query(&q);
        let (sql, binds) = render_conditions(&filters.team_predicates(), 3);
        assert_eq!(sql, " AND product_id = $3 AND team_id::text = $4");
        assert_eq!(binds, vec!["ELF".to_string(), "Alpha".to_string()]);
    }

    #[test]
    fn user_id_has_no_wildcard() {
        let q = ReportQuery {
            user_id: Some("all".to_string()),
            ..Default::default()
        };
        let filters = ReportFilters::from_query(&q);
        assert_eq!(filters.user_id.as_deref(), Some("all"));
    }
}
