//! Layout of the `segments` table: column names, SQL types, and which
//! columns compare on their leading-integer prefix.

use serde::{Deserialize, Serialize};

/// Name of the single segment table.
pub const TABLE: &str = "segments";

/// Columns of the `segments` table, in stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "iconName")]
    IconName,
    #[serde(rename = "identityGraphName")]
    IdentityGraphName,
    #[serde(rename = "taxonomyId")]
    TaxonomyId,
    #[serde(rename = "datasetIds")]
    DatasetIds,
    #[serde(rename = "quality_score")]
    QualityScore,
    #[serde(rename = "recency")]
    Recency,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "age_range")]
    AgeRange,
    #[serde(rename = "income_level")]
    IncomeLevel,
    #[serde(rename = "location_type")]
    LocationType,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "confidence")]
    Confidence,
    #[serde(rename = "estReach")]
    EstReach,
    #[serde(rename = "cpm")]
    Cpm,
    #[serde(rename = "cpmCap")]
    CpmCap,
    #[serde(rename = "programmaticMediaPct")]
    ProgrammaticMediaPct,
    #[serde(rename = "advertiserDirectPct")]
    AdvertiserDirectPct,
    #[serde(rename = "dataSource")]
    DataSource,
    #[serde(rename = "metadata")]
    Metadata,
    #[serde(rename = "segmentId")]
    SegmentId,
}

impl Column {
    pub const ALL: [Column; 21] = [
        Column::Name,
        Column::IconName,
        Column::IdentityGraphName,
        Column::TaxonomyId,
        Column::DatasetIds,
        Column::QualityScore,
        Column::Recency,
        Column::Size,
        Column::AgeRange,
        Column::IncomeLevel,
        Column::LocationType,
        Column::Category,
        Column::Confidence,
        Column::EstReach,
        Column::Cpm,
        Column::CpmCap,
        Column::ProgrammaticMediaPct,
        Column::AdvertiserDirectPct,
        Column::DataSource,
        Column::Metadata,
        Column::SegmentId,
    ];

    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::IconName => "iconName",
            Column::IdentityGraphName => "identityGraphName",
            Column::TaxonomyId => "taxonomyId",
            Column::DatasetIds => "datasetIds",
            Column::QualityScore => "quality_score",
            Column::Recency => "recency",
            Column::Size => "size",
            Column::AgeRange => "age_range",
            Column::IncomeLevel => "income_level",
            Column::LocationType => "location_type",
            Column::Category => "category",
            Column::Confidence => "confidence",
            Column::EstReach => "estReach",
            Column::Cpm => "cpm",
            Column::CpmCap => "cpmCap",
            Column::ProgrammaticMediaPct => "programmaticMediaPct",
            Column::AdvertiserDirectPct => "advertiserDirectPct",
            Column::DataSource => "dataSource",
            Column::Metadata => "metadata",
            Column::SegmentId => "segmentId",
        }
    }

    pub fn sql_type(&self) -> &'static str {
        match self {
            Column::Size | Column::EstReach => "BIGINT",
            Column::Cpm
            | Column::CpmCap
            | Column::ProgrammaticMediaPct
            | Column::AdvertiserDirectPct => "DOUBLE",
            _ => "TEXT",
        }
    }

    /// Columns whose numeric comparisons read the leading integer of the
    /// stored text ("35-44" compares as 35, "30_days" as 30).
    pub fn compares_on_leading_int(&self) -> bool {
        matches!(self, Column::AgeRange | Column::Recency)
    }
}

/// `CREATE TABLE` statement for the segment table.
pub fn create_table_sql() -> String {
    let columns = Column::ALL
        .iter()
        .map(|col| {
            if *col == Column::SegmentId {
                format!("{} {} PRIMARY KEY", col.as_sql(), col.sql_type())
            } else {
                format!("{} {}", col.as_sql(), col.sql_type())
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {TABLE} ({columns})")
}

/// Explicit SELECT list in stored column order.
pub fn select_list() -> String {
    Column::ALL
        .iter()
        .map(Column::as_sql)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameterized INSERT statement covering every column.
pub fn insert_sql() -> String {
    let placeholders = vec!["?"; Column::ALL.len()].join(", ");
    format!(
        "INSERT INTO {TABLE} ({}) VALUES ({placeholders})",
        select_list()
    )
}
