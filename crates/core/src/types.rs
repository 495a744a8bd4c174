use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audience segment as it appears in the source dataset: nested
/// demographic, criteria, and taxonomy sub-objects around a handful of
/// top-level attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub name: Option<String>,
    pub logo: Option<Logo>,
    pub identity_graph_name: Option<String>,
    pub taxonomy_id: Option<String>,
    pub segment_criteria: Option<SegmentCriteria>,
    pub size: Option<i64>,
    pub demographics: Option<Demographics>,
    pub taxonomy_attributes: Option<TaxonomyAttributes>,
    pub est_reach: Option<i64>,
    pub cpm: Option<f64>,
    pub cpm_cap: Option<f64>,
    pub programmatic_media_pct: Option<f64>,
    pub advertiser_direct_pct: Option<f64>,
    pub data_source: Option<String>,
    pub metadata: Option<String>,
    pub segment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logo {
    pub metadata: Option<LogoMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoMetadata {
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentCriteria {
    pub dataset_ids: Option<Vec<String>>,
    pub filters: Option<CriteriaFilters>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CriteriaFilters {
    pub quality_score: Option<String>,
    pub recency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
    pub age_range: Option<String>,
    pub income_level: Option<String>,
    pub location_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyAttributes {
    pub category: Option<String>,
    pub confidence: Option<String>,
}

/// One flat row of the segment store. Field order matches the store's
/// column order; serialized names match the store's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub name: Option<String>,
    #[serde(rename = "iconName")]
    pub icon_name: Option<String>,
    #[serde(rename = "identityGraphName")]
    pub identity_graph_name: Option<String>,
    #[serde(rename = "taxonomyId")]
    pub taxonomy_id: Option<String>,
    /// Comma-joined dataset ids; empty when the source entry has none.
    #[serde(rename = "datasetIds")]
    pub dataset_ids: String,
    pub quality_score: Option<String>,
    pub recency: Option<String>,
    pub size: Option<i64>,
    pub age_range: Option<String>,
    pub income_level: Option<String>,
    pub location_type: Option<String>,
    pub category: Option<String>,
    pub confidence: Option<String>,
    #[serde(rename = "estReach")]
    pub est_reach: Option<i64>,
    pub cpm: Option<f64>,
    #[serde(rename = "cpmCap")]
    pub cpm_cap: Option<f64>,
    #[serde(rename = "programmaticMediaPct")]
    pub programmatic_media_pct: Option<f64>,
    #[serde(rename = "advertiserDirectPct")]
    pub advertiser_direct_pct: Option<f64>,
    #[serde(rename = "dataSource")]
    pub data_source: Option<String>,
    pub metadata: Option<String>,
    #[serde(rename = "segmentId")]
    pub segment_id: String,
}

impl RawSegment {
    /// Flatten the nested dataset shape into one store row.
    /// Returns `None` when the entry has no `segmentId`.
    pub fn into_record(self) -> Option<SegmentRecord> {
        let segment_id = self.segment_id?;

        let SegmentCriteria {
            dataset_ids,
            filters,
        } = self.segment_criteria.unwrap_or_default();
        let filters = filters.unwrap_or_default();
        let demographics = self.demographics.unwrap_or_default();
        let taxonomy = self.taxonomy_attributes.unwrap_or_default();
        let icon_name = self.logo.and_then(|l| l.metadata).and_then(|m| m.icon_name);

        Some(SegmentRecord {
            name: self.name,
            icon_name,
            identity_graph_name: self.identity_graph_name,
            taxonomy_id: self.taxonomy_id,
            dataset_ids: dataset_ids.unwrap_or_default().join(","),
            quality_score: filters.quality_score,
            recency: filters.recency,
            size: self.size,
            age_range: demographics.age_range,
            income_level: demographics.income_level,
            location_type: demographics.location_type,
            category: taxonomy.category,
            confidence: taxonomy.confidence,
            est_reach: self.est_reach,
            cpm: self.cpm,
            cpm_cap: self.cpm_cap,
            programmatic_media_pct: self.programmatic_media_pct,
            advertiser_direct_pct: self.advertiser_direct_pct,
            data_source: self.data_source,
            metadata: self.metadata,
            segment_id,
        })
    }
}

/// Outcome of one bulk load into the segment store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub total: usize,
    pub inserted: usize,
    pub skipped: Vec<RowWarning>,
    pub loaded_at: DateTime<Utc>,
}

/// One dataset entry that could not be stored. Row-level problems are
/// warnings, never load failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowWarning {
    pub name: Option<String>,
    pub reason: String,
}
