//! Numeric presentation rules shared by every report payload: one decimal
//! place everywhere, SQL NULL aggregates become 0.0, and differences render
//! as signed percentage strings.

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn coalesce_round(value: Option<f64>) -> f64 {
    round1(value.unwrap_or(0.0))
}

/// `"+X.X%"` for differences >= 0, `"X.X%"` for negative ones (the value
/// already carries its minus sign).
pub fn signed_percent(difference: f64) -> String {
    let rounded = round1(difference);
    if rounded >= 0.0 {
        // abs() normalizes -0.0 so a vanishing negative never prints "+-0.0%".
        format!("+{:.1}%", rounded.abs())
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Relative change `((team - benchmark) / benchmark) * 100`, defined as 0
/// when the benchmark is 0 so a missing population never divides by zero.
pub fn relative_change(team: f64, benchmark: f64) -> f64 {
    if benchmark == 0.0 {
        0.0
    } else {
        (team - benchmark) / benchmark * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round1(70.0), 70.0);
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(66.64), 66.6);
    }

    #[test]
    fn null_aggregates_become_zero() {
        assert_eq!(coalesce_round(None), 0.0);
        assert_eq!(coalesce_round(Some(49.97)), 50.0);
    }

    #[test]
    fn sign_follows_team_minus_benchmark() {
        assert_eq!(signed_percent(20.0), "+20.0%");
        assert_eq!(signed_percent(0.0), "+0.0%");
        assert_eq!(signed_percent(-5.26), "-5.3%");
    }

    #[test]
    fn vanishing_negative_difference_is_positive_zero() {
        assert_eq!(signed_percent(-0.04), "+0.0%");
    }

    #[test]
    fn relative_change_guards_zero_benchmark() {
        assert_eq!(relative_change(82.0, 0.0), 0.0);
        assert_eq!(relative_change(75.0, 60.0), 25.0);
        assert_eq!(relative_change(45.0, 60.0), -25.0);
    }
}
