//! Turns one free-text query into a `FilterExpression` by folding the
//! recognizers in fixed priority order.

use planner_store::filter::FilterExpression;

use crate::recognizers;

/// Result cap applied unless the text contains the substring "all".
pub const DEFAULT_RESULT_CAP: usize = 13;

/// Compile free text into a filter expression. Pure and deterministic;
/// unrecognized text compiles to an unfiltered (but still capped) select.
pub fn compile(text: &str) -> FilterExpression {
    let normalized = text.to_lowercase();
    let mut filter = FilterExpression::new();

    if let Some(clause) = recognizers::income(&normalized) {
        filter.and(clause);
    }
    if let Some(clause) = recognizers::location(&normalized) {
        filter.and(clause);
    }
    if let Some(clause) = recognizers::age(&normalized) {
        filter.and(clause);
    }
    if let Some(clause) = recognizers::recency(&normalized) {
        filter.and(clause);
    }
    if let Some(clause) = recognizers::numeric_comparison(&normalized) {
        filter.and(clause);
    }
    for clause in recognizers::categories(&normalized) {
        filter.and(clause);
    }
    if let Some(clause) = recognizers::confidence(&normalized) {
        filter.and(clause);
    }

    // Any occurrence of "all", even inside a longer word, lifts the cap.
    if !normalized.contains("all") {
        filter.set_limit(Some(DEFAULT_RESULT_CAP));
    }

    filter
}
