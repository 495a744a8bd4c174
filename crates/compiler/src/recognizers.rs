//! One pure recognizer per filter category. Each scans already-lowercased
//! text and emits at most one clause (categories may emit several).
//!
//! Token scans are plain substring checks. That makes "high confidence"
//! also fire the income recognizer on "high", and "suburban" fire the
//! location recognizer on both "urban" and "suburban". Both behaviors are
//! intentional and relied on downstream.

use regex::Regex;
use std::sync::OnceLock;

use planner_store::filter::{Clause, CmpOp};
use planner_store::schema::Column;

const INCOME_LEVELS: [&str; 4] = ["low", "medium", "high", "affluent"];
const LOCATION_TYPES: [&str; 3] = ["urban", "suburban", "rural"];
const AGE_BINS: [&str; 5] = ["18-24", "25-34", "35-44", "45-54", "55-64"];
const RECENCY_BUCKETS: [&str; 3] = ["7_days", "30_days", "90_days"];
const CATEGORIES: [&str; 4] = [
    "demo_age",
    "demo_income",
    "demo_location",
    "demo_education",
];
const CONFIDENCE_LEVELS: [&str; 3] = ["high", "medium", "low"];

const ADULT_AGE_FLOOR: i64 = 18;

fn age_over_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:age.*over|over the age of)\s*(\d+)").unwrap())
}

fn recency_lower_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:recency\s*)?(at least|>=|>|more than)\s*(\d+)\s*days").unwrap()
    })
}

fn recency_upper_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:recency\s*)?(at most|<=|<|less than)\s*(\d+)\s*days").unwrap()
    })
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(cpm|estreach)\s*(>=|<=|>|<)\s*([0-9]+)").unwrap())
}

/// Income levels mentioned anywhere in the text, unless "all income"
/// opts out.
pub fn income(text: &str) -> Option<Clause> {
    let found: Vec<String> = INCOME_LEVELS
        .iter()
        .filter(|lvl| text.contains(**lvl))
        .map(|lvl| lvl.to_string())
        .collect();
    if found.is_empty() || text.contains("all income") {
        return None;
    }
    Some(Clause::AnyOf {
        column: Column::IncomeLevel,
        values: found,
    })
}

/// Location types mentioned anywhere in the text, unless "all locations"
/// opts out.
pub fn location(text: &str) -> Option<Clause> {
    let found: Vec<String> = LOCATION_TYPES
        .iter()
        .filter(|loc| text.contains(**loc))
        .map(|loc| loc.to_string())
        .collect();
    if found.is_empty() || text.contains("all locations") {
        return None;
    }
    Some(Clause::AnyOf {
        column: Column::LocationType,
        values: found,
    })
}

/// Age filter, first phrasing wins: "over N" lower bound, then "adult",
/// then literal bins. "all ages" suppresses the whole category.
pub fn age(text: &str) -> Option<Clause> {
    if text.contains("all ages") {
        return None;
    }
    if let Some(caps) = age_over_re().captures(text) {
        let floor: i64 = caps[1].parse().ok()?;
        return Some(Clause::Compare {
            column: Column::AgeRange,
            op: CmpOp::Ge,
            threshold: floor,
        });
    }
    if text.contains("adult") {
        return Some(Clause::Compare {
            column: Column::AgeRange,
            op: CmpOp::Ge,
            threshold: ADULT_AGE_FLOOR,
        });
    }
    let found: Vec<String> = AGE_BINS
        .iter()
        .filter(|bin| text.contains(**bin))
        .map(|bin| bin.to_string())
        .collect();
    if found.is_empty() {
        return None;
    }
    Some(Clause::AnyOf {
        column: Column::AgeRange,
        values: found,
    })
}

/// Recency filter. Lower-bound phrasings take priority over upper-bound
/// ones; literal buckets only apply when neither comparison matches.
/// "more than" maps to >=, not >.
pub fn recency(text: &str) -> Option<Clause> {
    if let Some(caps) = recency_lower_re().captures(text) {
        let op = match &caps[1] {
            "at least" | ">=" | "more than" => CmpOp::Ge,
            _ => CmpOp::Gt,
        };
        let days: i64 = caps[2].parse().ok()?;
        return Some(Clause::Compare {
            column: Column::Recency,
            op,
            threshold: days,
        });
    }
    if let Some(caps) = recency_upper_re().captures(text) {
        let op = match &caps[1] {
            "at most" | "<=" | "less than" => CmpOp::Le,
            _ => CmpOp::Lt,
        };
        let days: i64 = caps[2].parse().ok()?;
        return Some(Clause::Compare {
            column: Column::Recency,
            op,
            threshold: days,
        });
    }
    RECENCY_BUCKETS
        .iter()
        .find(|bucket| text.contains(**bucket))
        .map(|bucket| Clause::Equals {
            column: Column::Recency,
            value: bucket.to_string(),
        })
}

/// Explicit comparison against the cpm or estReach column. At most one
/// per compilation; the first match wins.
pub fn numeric_comparison(text: &str) -> Option<Clause> {
    let caps = numeric_re().captures(text)?;
    let column = match &caps[1] {
        "cpm" => Column::Cpm,
        _ => Column::EstReach,
    };
    let op = match &caps[2] {
        ">=" => CmpOp::Ge,
        "<=" => CmpOp::Le,
        ">" => CmpOp::Gt,
        _ => CmpOp::Lt,
    };
    let threshold: i64 = caps[3].parse().ok()?;
    Some(Clause::Compare {
        column,
        op,
        threshold,
    })
}

/// One equality clause per taxonomy category named in the text. Several
/// at once AND together into an unsatisfiable filter; that is the
/// established behavior, not collapsed into an OR.
pub fn categories(text: &str) -> Vec<Clause> {
    CATEGORIES
        .iter()
        .filter(|cat| text.contains(**cat))
        .map(|cat| Clause::Equals {
            column: Column::Category,
            value: cat.to_string(),
        })
        .collect()
}

/// First "<level> confidence" literal found, scanned high to low.
pub fn confidence(text: &str) -> Option<Clause> {
    CONFIDENCE_LEVELS
        .iter()
        .find(|lvl| text.contains(&format!("{lvl} confidence")))
        .map(|lvl| Clause::Equals {
            column: Column::Confidence,
            value: lvl.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_of_values(clause: &Clause) -> Vec<String> {
        match clause {
            Clause::AnyOf { values, .. } => values.clone(),
            other => panic!("expected AnyOf, got {other:?}"),
        }
    }

    #[test]
    fn test_income_collects_levels_in_scan_order() {
        let clause = income("affluent or low households").unwrap();
        assert_eq!(any_of_values(&clause), vec!["low", "affluent"]);
    }

    #[test]
    fn test_income_all_income_opts_out() {
        assert_eq!(income("all income levels, even low"), None);
    }

    #[test]
    fn test_income_fires_on_high_inside_high_confidence() {
        let clause = income("high confidence segments").unwrap();
        assert_eq!(any_of_values(&clause), vec!["high"]);
    }

    #[test]
    fn test_location_suburban_matches_urban_too() {
        let clause = location("suburban shoppers").unwrap();
        assert_eq!(any_of_values(&clause), vec!["urban", "suburban"]);
    }

    #[test]
    fn test_location_all_locations_opts_out() {
        assert_eq!(location("rural across all locations"), None);
    }

    #[test]
    fn test_age_all_ages_suppresses_everything() {
        assert_eq!(age("all ages over 30"), None);
    }

    #[test]
    fn test_age_over_phrasings() {
        let expected = Clause::Compare {
            column: Column::AgeRange,
            op: CmpOp::Ge,
            threshold: 30,
        };
        assert_eq!(age("ages over 30").unwrap(), expected);
        assert_eq!(age("over the age of 30").unwrap(), expected);
    }

    #[test]
    fn test_age_adult_means_eighteen_and_up() {
        assert_eq!(
            age("adults only").unwrap(),
            Clause::Compare {
                column: Column::AgeRange,
                op: CmpOp::Ge,
                threshold: 18,
            }
        );
    }

    #[test]
    fn test_age_over_beats_adult_and_bins() {
        assert_eq!(
            age("adult users with ages over 55, maybe 18-24").unwrap(),
            Clause::Compare {
                column: Column::AgeRange,
                op: CmpOp::Ge,
                threshold: 55,
            }
        );
    }

    #[test]
    fn test_age_bins_collect() {
        let clause = age("18-24 or 35-44").unwrap();
        assert_eq!(any_of_values(&clause), vec!["18-24", "35-44"]);
    }

    #[test]
    fn test_recency_lower_bound_wins_over_upper() {
        assert_eq!(
            recency("at least 7 days but at most 90 days").unwrap(),
            Clause::Compare {
                column: Column::Recency,
                op: CmpOp::Ge,
                threshold: 7,
            }
        );
    }

    #[test]
    fn test_recency_more_than_maps_to_gte() {
        assert_eq!(
            recency("more than 30 days").unwrap(),
            Clause::Compare {
                column: Column::Recency,
                op: CmpOp::Ge,
                threshold: 30,
            }
        );
    }

    #[test]
    fn test_recency_bare_gt_stays_strict() {
        assert_eq!(
            recency("recency > 30 days").unwrap(),
            Clause::Compare {
                column: Column::Recency,
                op: CmpOp::Gt,
                threshold: 30,
            }
        );
    }

    #[test]
    fn test_recency_less_than_maps_to_lte() {
        assert_eq!(
            recency("less than 90 days").unwrap(),
            Clause::Compare {
                column: Column::Recency,
                op: CmpOp::Le,
                threshold: 90,
            }
        );
    }

    #[test]
    fn test_recency_first_bucket_wins() {
        assert_eq!(
            recency("30_days or 90_days").unwrap(),
            Clause::Equals {
                column: Column::Recency,
                value: "30_days".into(),
            }
        );
        assert_eq!(
            recency("90_days or 7_days").unwrap(),
            Clause::Equals {
                column: Column::Recency,
                value: "7_days".into(),
            }
        );
    }

    #[test]
    fn test_recency_absent() {
        assert_eq!(recency("suburban families"), None);
    }

    #[test]
    fn test_numeric_cpm_and_estreach() {
        assert_eq!(
            numeric_comparison("cpm > 20").unwrap(),
            Clause::Compare {
                column: Column::Cpm,
                op: CmpOp::Gt,
                threshold: 20,
            }
        );
        assert_eq!(
            numeric_comparison("estreach >= 50000").unwrap(),
            Clause::Compare {
                column: Column::EstReach,
                op: CmpOp::Ge,
                threshold: 50000,
            }
        );
    }

    #[test]
    fn test_numeric_only_first_match() {
        assert_eq!(
            numeric_comparison("cpm < 10 and estreach > 1000").unwrap(),
            Clause::Compare {
                column: Column::Cpm,
                op: CmpOp::Lt,
                threshold: 10,
            }
        );
    }

    #[test]
    fn test_categories_emit_one_clause_each() {
        let clauses = categories("demo_age and demo_income");
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0],
            Clause::Equals {
                column: Column::Category,
                value: "demo_age".into(),
            }
        );
        assert_eq!(
            clauses[1],
            Clause::Equals {
                column: Column::Category,
                value: "demo_income".into(),
            }
        );
    }

    #[test]
    fn test_confidence_requires_adjacent_literal() {
        assert_eq!(confidence("high quality, some confidence"), None);
        assert_eq!(
            confidence("medium confidence").unwrap(),
            Clause::Equals {
                column: Column::Confidence,
                value: "medium".into(),
            }
        );
    }

    #[test]
    fn test_confidence_scans_high_to_low() {
        assert_eq!(
            confidence("low confidence or high confidence").unwrap(),
            Clause::Equals {
                column: Column::Confidence,
                value: "high".into(),
            }
        );
    }
}
