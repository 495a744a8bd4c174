//! Agent-facing query tool: compiles free text, runs it against the
//! store, and never raises across the boundary.

use tracing::{debug, error, info};
use uuid::Uuid;

use planner_core::error::PlannerResult;
use planner_core::types::SegmentRecord;
use planner_store::SegmentStore;

use crate::compiler::compile;

/// Prefix of every diagnostic string returned by [`SegmentQueryTool::invoke`].
pub const ERROR_PREFIX: &str = "Error executing segment query: ";

pub struct SegmentQueryTool {
    store: SegmentStore,
}

impl SegmentQueryTool {
    /// Published tool name for the upstream agent harness.
    pub const NAME: &'static str = "SegmentQueryTool";

    /// Published tool description: the queryable columns plus example
    /// phrasings.
    pub const DESCRIPTION: &'static str = "\
SQL-backed lookup of audience segments. The segments table has columns:
  name, iconName, identityGraphName, taxonomyId, datasetIds, quality_score,
  recency, size, age_range, income_level, location_type, category,
  confidence, estReach, cpm, cpmCap, programmaticMediaPct,
  advertiserDirectPct, dataSource, metadata, segmentId.

You can ask things like:
  \"Give me segments with age_range 18-24 and recency 30_days\"
  \"Show high-quality rural segments\"
  \"List all segments with CPM > 20\"

The tool compiles the query to SELECT ... FROM segments WHERE ... and
returns the matching rows as JSON.";

    pub fn new(store: SegmentStore) -> Self {
        Self { store }
    }

    /// Compile the text and execute it against the store.
    pub fn compile_and_run(&self, text: &str) -> PlannerResult<Vec<SegmentRecord>> {
        let query_id = Uuid::new_v4();
        let filter = compile(text);
        debug!(
            %query_id,
            clauses = filter.clauses().len(),
            capped = filter.limit().is_some(),
            "Compiled segment filter"
        );
        let rows = self.store.query(&filter)?;
        info!(%query_id, rows = rows.len(), "Segment query answered");
        Ok(rows)
    }

    /// Run one query for the agent harness. Always returns a string:
    /// a pretty JSON array of rows, or a single diagnostic line starting
    /// with [`ERROR_PREFIX`].
    pub fn invoke(&self, text: &str) -> String {
        metrics::counter!("tool.invocations").increment(1);
        let rows = match self.compile_and_run(text) {
            Ok(rows) => rows,
            Err(e) => {
                metrics::counter!("tool.errors").increment(1);
                error!(error = %e, "Segment query failed");
                return format!("{ERROR_PREFIX}{e}");
            }
        };
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => json,
            Err(e) => {
                metrics::counter!("tool.errors").increment(1);
                error!(error = %e, "Could not serialize segment rows");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }
}
