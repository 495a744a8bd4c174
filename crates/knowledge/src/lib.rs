//! Renders segment dataset entries into labeled text chunks for
//! retrieval-augmented agent context.

use std::path::{Path, PathBuf};
use tracing::debug;

use planner_core::error::PlannerResult;
use planner_core::types::RawSegment;
use planner_store::loader::read_dataset;

/// One retrieval chunk, keyed by segment name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentChunk {
    pub name: String,
    pub content: String,
}

/// Reads the segment dataset and renders one chunk per named segment,
/// in dataset order.
pub struct SegmentKnowledgeSource {
    dataset_path: PathBuf,
}

impl SegmentKnowledgeSource {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Load and render all chunks. Nameless or undecodable entries are
    /// skipped.
    pub fn load_chunks(&self) -> PlannerResult<Vec<SegmentChunk>> {
        let entries = read_dataset(&self.dataset_path)?;
        let mut chunks = Vec::new();
        for entry in entries {
            let raw: RawSegment = match serde_json::from_value(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(error = %e, "Skipping undecodable segment entry");
                    continue;
                }
            };
            let Some(name) = raw.name.clone() else {
                debug!("Skipping nameless segment entry");
                continue;
            };
            chunks.push(SegmentChunk {
                name,
                content: format_segment(&raw),
            });
        }
        debug!(
            chunks = chunks.len(),
            dataset = %self.dataset_path.display(),
            "Loaded segment knowledge chunks"
        );
        Ok(chunks)
    }
}

/// Labeled description of one segment; absent values render as "unknown".
pub fn format_segment(seg: &RawSegment) -> String {
    let demographics = seg.demographics.clone().unwrap_or_default();
    let filters = seg
        .segment_criteria
        .clone()
        .and_then(|c| c.filters)
        .unwrap_or_default();
    let taxonomy = seg.taxonomy_attributes.clone().unwrap_or_default();

    format!(
        "Name: {}\n\
         Taxonomy: {}\n\
         Graph: {}\n\
         Age Range: {}\n\
         Income Level: {}\n\
         Location Type: {}\n\
         Recency: {}\n\
         Quality Score: {}\n\
         CPM: {}\n\
         Confidence: {}\n\
         Estimated Reach: {}\n\
         Data Source: {}",
        text(&seg.name),
        text(&seg.taxonomy_id),
        text(&seg.identity_graph_name),
        text(&demographics.age_range),
        text(&demographics.income_level),
        text(&demographics.location_type),
        text(&filters.recency),
        text(&filters.quality_score),
        float(seg.cpm),
        text(&taxonomy.confidence),
        int(seg.est_reach),
        text(&seg.data_source),
    )
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

fn float(value: Option<f64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn int(value: Option<i64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}
