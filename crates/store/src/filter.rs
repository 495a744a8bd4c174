//! Structured filter expressions over the segment table, rendered to
//! parameterized SQL.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::schema::{self, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// One conjunct of a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// `column = value`.
    Equals { column: Column, value: String },
    /// OR of equalities over one column. `values` must be non-empty.
    AnyOf { column: Column, values: Vec<String> },
    /// Numeric comparison; on leading-int columns the stored text is
    /// reduced to its integer prefix first.
    Compare {
        column: Column,
        op: CmpOp,
        threshold: i64,
    },
}

/// Ordered conjunction of clauses plus an optional result cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    clauses: Vec<Clause>,
    limit: Option<usize>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(&mut self, clause: Clause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render to a parameterized SELECT over every column. String and
    /// integer operands are bound as parameters; the cap is a literal.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", schema::select_list(), schema::TABLE);
        let mut conds: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for clause in &self.clauses {
            match clause {
                Clause::Equals { column, value } => {
                    conds.push(format!("{} = ?", column.as_sql()));
                    params.push(Value::Text(value.clone()));
                }
                Clause::AnyOf { column, values } => {
                    let ors = values
                        .iter()
                        .map(|_| format!("{} = ?", column.as_sql()))
                        .collect::<Vec<_>>()
                        .join(" OR ");
                    conds.push(format!("({ors})"));
                    params.extend(values.iter().cloned().map(Value::Text));
                }
                Clause::Compare {
                    column,
                    op,
                    threshold,
                } => {
                    let lhs = if column.compares_on_leading_int() {
                        format!("leading_int({})", column.as_sql())
                    } else {
                        column.as_sql().to_string()
                    };
                    conds.push(format!("{} {} ?", lhs, op.as_sql()));
                    params.push(Value::Integer(*threshold));
                }
            }
        }

        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_string());
        }

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_selects_everything() {
        let (sql, params) = FilterExpression::new().to_sql();
        assert!(sql.starts_with("SELECT name, iconName"));
        assert!(sql.ends_with("FROM segments"));
        assert!(!sql.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_equals_clause_binds_value() {
        let mut filter = FilterExpression::new();
        filter.and(Clause::Equals {
            column: Column::Recency,
            value: "30_days".into(),
        });
        let (sql, params) = filter.to_sql();
        assert!(sql.ends_with("WHERE recency = ?"));
        assert_eq!(params, vec![Value::Text("30_days".into())]);
    }

    #[test]
    fn test_any_of_renders_parenthesized_ors() {
        let mut filter = FilterExpression::new();
        filter.and(Clause::AnyOf {
            column: Column::IncomeLevel,
            values: vec!["low".into(), "medium".into()],
        });
        let (sql, params) = filter.to_sql();
        assert!(sql.contains("(income_level = ? OR income_level = ?)"));
        assert_eq!(
            params,
            vec![Value::Text("low".into()), Value::Text("medium".into())]
        );
    }

    #[test]
    fn test_compare_uses_leading_int_on_age_and_recency() {
        let mut filter = FilterExpression::new();
        filter.and(Clause::Compare {
            column: Column::AgeRange,
            op: CmpOp::Ge,
            threshold: 18,
        });
        filter.and(Clause::Compare {
            column: Column::Recency,
            op: CmpOp::Le,
            threshold: 30,
        });
        let (sql, params) = filter.to_sql();
        assert!(sql.contains("leading_int(age_range) >= ?"));
        assert!(sql.contains("leading_int(recency) <= ?"));
        assert_eq!(params, vec![Value::Integer(18), Value::Integer(30)]);
    }

    #[test]
    fn test_compare_on_plain_numeric_column() {
        let mut filter = FilterExpression::new();
        filter.and(Clause::Compare {
            column: Column::Cpm,
            op: CmpOp::Gt,
            threshold: 20,
        });
        let (sql, _) = filter.to_sql();
        assert!(sql.contains("cpm > ?"));
        assert!(!sql.contains("leading_int(cpm)"));
    }

    #[test]
    fn test_clauses_join_with_and_in_insertion_order() {
        let mut filter = FilterExpression::new();
        filter.and(Clause::Equals {
            column: Column::Category,
            value: "demo_age".into(),
        });
        filter.and(Clause::Equals {
            column: Column::Confidence,
            value: "high".into(),
        });
        let (sql, _) = filter.to_sql();
        assert!(sql.contains("category = ? AND confidence = ?"));
    }

    #[test]
    fn test_limit_is_rendered_literal() {
        let mut filter = FilterExpression::new();
        filter.set_limit(Some(13));
        let (sql, params) = filter.to_sql();
        assert!(sql.ends_with("LIMIT 13"));
        assert!(params.is_empty());
    }
}
