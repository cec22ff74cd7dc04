use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TradeError;
use crate::schema::flow;

/// Per-dataset ingestion and labeling configuration.
///
/// One pipeline serves every commodity dataset; everything source-specific
/// (file name, column naming, flow labels, display units) lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Stable key used by the page selector, e.g. "pet".
    pub key: String,
    /// Heading used for the map title and table caption.
    pub title: String,
    /// CSV file name, resolved against the model's base path.
    pub filename: String,
    /// Source column name -> canonical column name.
    pub columns: HashMap<String, String>,
    /// Source flow label -> canonical flow label ("Import" / "Export").
    /// Sources that already use the canonical labels may leave this empty.
    pub flow_labels: Vec<(String, String)>,
    /// Display unit for quantities, e.g. "kg".
    pub quantity_unit: String,
    /// Display unit for monetary values, e.g. "1000 USD".
    pub value_unit: String,
}

impl DatasetConfig {
    /// WITS PET-resin export sheet. Quantities in kg, values in 1000 USD.
    pub fn pet_resin() -> Self {
        Self {
            key: "pet".to_string(),
            title: "PET Trade Balance".to_string(),
            filename: "Allcountries_export_WITS.csv".to_string(),
            columns: [
                ("Reporter", "country"),
                ("Partner", "partner"),
                ("TradeFlow", "flow"),
                ("Quantity", "quantity"),
                ("Trade Value 1000USD", "value"),
            ]
            .iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect(),
            flow_labels: Vec::new(),
            quantity_unit: "kg".to_string(),
            value_unit: "1000 USD".to_string(),
        }
    }

    /// WITS HS-code-5407 totals sheet. Flow labels come in as
    /// "Gross Imports" / "Gross Exports".
    pub fn hs_5407() -> Self {
        Self {
            key: "hs5407".to_string(),
            title: "Trade Balance - HS 5407".to_string(),
            filename: "total_5407.csv".to_string(),
            columns: [
                ("ReporterName", "country"),
                ("PartnerName", "partner"),
                ("TradeFlowName", "flow"),
                ("Quantity", "quantity"),
                ("TradeValue in 1000 USD", "value"),
            ]
            .iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect(),
            flow_labels: vec![
                ("Gross Imports".to_string(), flow::IMPORT.to_string()),
                ("Gross Exports".to_string(), flow::EXPORT.to_string()),
            ],
            quantity_unit: "kg".to_string(),
            value_unit: "1000 USD".to_string(),
        }
    }

    /// Load a list of dataset configs from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Vec<Self>, TradeError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
