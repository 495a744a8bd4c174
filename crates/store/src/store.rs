//! Explicit handle over the single-file segment store. A connection is
//! opened per call and dropped at scope exit.

use chrono::Utc;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use planner_core::error::{PlannerError, PlannerResult};
use planner_core::types::{LoadReport, RawSegment, RowWarning, SegmentRecord};

use crate::filter::FilterExpression;
use crate::schema;

#[derive(Debug, Clone)]
pub struct SegmentStore {
    path: PathBuf,
}

impl SegmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the segment table with the given dataset entries. The drop,
    /// create, and inserts run in one transaction. Entries that cannot be
    /// decoded or inserted are skipped and reported, never fatal.
    pub fn load(&self, entries: &[serde_json::Value]) -> PlannerResult<LoadReport> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(store_err)?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", schema::TABLE), [])
            .map_err(store_err)?;
        tx.execute(&schema::create_table_sql(), [])
            .map_err(store_err)?;

        let mut inserted = 0usize;
        let mut skipped: Vec<RowWarning> = Vec::new();
        {
            let mut stmt = tx.prepare(&schema::insert_sql()).map_err(store_err)?;
            for entry in entries {
                let raw: RawSegment = match serde_json::from_value(entry.clone()) {
                    Ok(raw) => raw,
                    Err(e) => {
                        let name = entry
                            .get("name")
                            .and_then(|v| v.as_str())
                            .map(String::from);
                        warn!(
                            segment = name.as_deref().unwrap_or("<unnamed>"),
                            error = %e,
                            "Could not decode segment entry"
                        );
                        skipped.push(RowWarning {
                            name,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

                let name = raw.name.clone();
                let Some(record) = raw.into_record() else {
                    warn!(
                        segment = name.as_deref().unwrap_or("<unnamed>"),
                        "Segment entry has no segmentId"
                    );
                    skipped.push(RowWarning {
                        name,
                        reason: "missing segmentId".into(),
                    });
                    continue;
                };

                match stmt.execute(rusqlite::params![
                    record.name,
                    record.icon_name,
                    record.identity_graph_name,
                    record.taxonomy_id,
                    record.dataset_ids,
                    record.quality_score,
                    record.recency,
                    record.size,
                    record.age_range,
                    record.income_level,
                    record.location_type,
                    record.category,
                    record.confidence,
                    record.est_reach,
                    record.cpm,
                    record.cpm_cap,
                    record.programmatic_media_pct,
                    record.advertiser_direct_pct,
                    record.data_source,
                    record.metadata,
                    record.segment_id,
                ]) {
                    Ok(_) => inserted += 1,
                    Err(e) => {
                        warn!(
                            segment = record.name.as_deref().unwrap_or("<unnamed>"),
                            error = %e,
                            "Could not insert segment"
                        );
                        skipped.push(RowWarning {
                            name: record.name.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        tx.commit().map_err(store_err)?;

        metrics::counter!("store.rows_inserted").increment(inserted as u64);
        metrics::counter!("store.rows_skipped").increment(skipped.len() as u64);
        info!(
            inserted,
            total = entries.len(),
            skipped = skipped.len(),
            path = %self.path.display(),
            "Segment store loaded"
        );

        Ok(LoadReport {
            total: entries.len(),
            inserted,
            skipped,
            loaded_at: Utc::now(),
        })
    }

    /// Execute a filter expression and return the matching rows. Fails
    /// with `StoreNotInitialized` until a load has created the table.
    pub fn query(&self, filter: &FilterExpression) -> PlannerResult<Vec<SegmentRecord>> {
        if !self.path.exists() {
            return Err(PlannerError::StoreNotInitialized(format!(
                "no store at {}; run the load step first",
                self.path.display()
            )));
        }

        let conn = self.connect()?;
        let table: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [schema::TABLE],
                |row| row.get(0),
            )
            .optional()
            .map_err(store_err)?;
        if table.is_none() {
            return Err(PlannerError::StoreNotInitialized(format!(
                "store at {} has no {} table; run the load step first",
                self.path.display(),
                schema::TABLE
            )));
        }

        let (sql, params) = filter.to_sql();
        debug!(sql = %sql, params = params.len(), "Executing segment query");

        let mut stmt = conn.prepare(&sql).map_err(store_err)?;
        let rows = stmt
            .query_map(params_from_iter(params), record_from_row)
            .map_err(store_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err)?;

        metrics::counter!("store.queries").increment(1);
        info!(rows = rows.len(), "Segment query executed");
        Ok(rows)
    }

    fn connect(&self) -> PlannerResult<Connection> {
        let conn = Connection::open(&self.path).map_err(store_err)?;
        register_functions(&conn).map_err(store_err)?;
        Ok(conn)
    }
}

fn store_err(e: rusqlite::Error) -> PlannerError {
    PlannerError::Store(e.to_string())
}

fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "leading_int",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.as_deref().and_then(leading_int))
        },
    )
}

/// Integer prefix of the stored text ("35-44" → 35, "30_days" → 30).
/// `None` when the text does not begin with a digit.
fn leading_int(text: &str) -> Option<i64> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// Column order follows `schema::Column::ALL`.
fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SegmentRecord> {
    Ok(SegmentRecord {
        name: row.get(0)?,
        icon_name: row.get(1)?,
        identity_graph_name: row.get(2)?,
        taxonomy_id: row.get(3)?,
        dataset_ids: row.get(4)?,
        quality_score: row.get(5)?,
        recency: row.get(6)?,
        size: row.get(7)?,
        age_range: row.get(8)?,
        income_level: row.get(9)?,
        location_type: row.get(10)?,
        category: row.get(11)?,
        confidence: row.get(12)?,
        est_reach: row.get(13)?,
        cpm: row.get(14)?,
        cpm_cap: row.get(15)?,
        programmatic_media_pct: row.get(16)?,
        advertiser_direct_pct: row.get(17)?,
        data_source: row.get(18)?,
        metadata: row.get(19)?,
        segment_id: row.get(20)?,
    })
}
