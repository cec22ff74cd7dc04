use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use polars::prelude::*;

use crate::config::DatasetConfig;
use crate::error::TradeError;
use crate::flows;
use crate::geo::{CoordinateLookup, StaticCoordinates};
use crate::pipeline;
use crate::schema::{flow, record};
use crate::views::{self, Dashboard};

/// Top-of-stack model: owns the dataset configuration, the memoized record
/// tables, and the coordinate lookup.
///
/// All state the original dashboard kept at module level is constructor
/// injected here; nothing is loaded before first use. Record tables are
/// memoized for the process lifetime and dropped only through `invalidate`.
pub struct TradeModel {
    base_path: PathBuf,
    configs: Vec<DatasetConfig>,
    tables: HashMap<String, DataFrame>,
    lookup: Box<dyn CoordinateLookup>,
}

impl TradeModel {
    pub fn new(
        base_path: impl Into<PathBuf>,
        configs: Vec<DatasetConfig>,
        lookup: Box<dyn CoordinateLookup>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            configs,
            tables: HashMap::new(),
            lookup,
        }
    }

    /// Model preloaded with the two WITS commodity datasets and the
    /// built-in coordinate table.
    pub fn with_builtin_datasets(base_path: impl Into<PathBuf>) -> Self {
        Self::new(
            base_path,
            vec![DatasetConfig::pet_resin(), DatasetConfig::hs_5407()],
            Box::new(StaticCoordinates::new()),
        )
    }

    /// Dataset keys, in configuration order, for the page selector.
    pub fn datasets(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.key.as_str()).collect()
    }

    /// Load (or return the memoized) record table for a dataset.
    pub fn load(&mut self, dataset: &str) -> Result<&DataFrame, TradeError> {
        if !self.tables.contains_key(dataset) {
            let config = self.config(dataset)?.clone();
            let df = self.read_records(&config)?;
            log::info!(
                "loaded dataset '{}': {} records from {}",
                dataset,
                df.height(),
                config.filename
            );
            self.tables.insert(dataset.to_string(), df);
        }
        Ok(self.tables.get(dataset).unwrap())
    }

    /// Drop one memoized table; the next `load` rereads the file.
    pub fn invalidate(&mut self, dataset: &str) {
        self.tables.remove(dataset);
    }

    /// Drop every memoized table.
    pub fn invalidate_all(&mut self) {
        self.tables.clear();
    }

    /// Sorted distinct reporting countries, for the country multi-select.
    pub fn countries(&mut self, dataset: &str) -> Result<Vec<String>, TradeError> {
        let df = self.load(dataset)?;
        let names: BTreeSet<String> = df
            .column(record::COUNTRY)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Full recomputation for one selection.
    ///
    /// An empty selection is a valid "nothing to show" state and returns
    /// `Ok(None)` without touching any data.
    pub fn dashboard(
        &mut self,
        dataset: &str,
        selected: &[String],
    ) -> Result<Option<Dashboard>, TradeError> {
        if selected.is_empty() {
            return Ok(None);
        }

        let config = self.config(dataset)?.clone();
        let records = self.load(dataset)?.clone();

        let merged = pipeline::compute_balances(&records, selected)?;
        let balances =
            pipeline::extract_balances(&merged, self.lookup.as_mut(), &config.quantity_unit)?;

        let map = views::build_map_view(&balances, selected, self.lookup.as_mut(), &config.title);
        let flow_diagram = flows::build_flow_diagram(
            &balances,
            selected,
            flows::TOP_FLOWS,
            &config.quantity_unit,
        );
        let ranked = pipeline::rank_partners(&balances, pipeline::TOP_PARTNERS);
        let table = views::build_summary_table(
            &ranked,
            pipeline::TOP_PARTNERS,
            &config.quantity_unit,
            &config.value_unit,
        );

        Ok(Some(Dashboard {
            map,
            flows: flow_diagram,
            table,
        }))
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl TradeModel {
    fn config(&self, dataset: &str) -> Result<&DatasetConfig, TradeError> {
        self.configs
            .iter()
            .find(|c| c.key == dataset)
            .ok_or_else(|| TradeError::UnknownDataset(dataset.to_string()))
    }

    /// Read a dataset CSV with all columns as String dtype, normalize
    /// column names and flow labels, drop invalid records, and cast the
    /// measure columns to Float64.
    ///
    /// A record with a missing partner, quantity, or value, or a flow
    /// outside {Import, Export} after label normalization, is dropped
    /// silently. Zero quantities are present values and are kept.
    fn read_records(&self, config: &DatasetConfig) -> Result<DataFrame, TradeError> {
        let path = self.base_path.join(&config.filename);
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path))?
            .finish()?;

        // Trim whitespace from column names
        let trimmed: Vec<String> = df
            .get_column_names_str()
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        df.set_column_names(trimmed.as_slice())?;

        // Source column names -> canonical schema
        if !config.columns.is_empty() {
            let old: Vec<&str> = config.columns.keys().map(|s| s.as_str()).collect();
            let new: Vec<&str> = config.columns.values().map(|s| s.as_str()).collect();
            df = df.lazy().rename(old, new, true).collect()?;
        }

        Self::require_columns(&df, &record::ALL)?;

        // Canonical flow labels, e.g. "Gross Imports" -> "Import"
        let mut flow_expr = col(record::FLOW);
        for (source, canonical) in &config.flow_labels {
            flow_expr = when(col(record::FLOW).eq(lit(source.as_str())))
                .then(lit(canonical.as_str()))
                .otherwise(flow_expr);
        }

        let known_flows = Series::new("flows".into(), vec![flow::IMPORT, flow::EXPORT]);

        let before = df.height();
        let df = df
            .lazy()
            .with_columns([
                flow_expr.alias(record::FLOW),
                col(record::QUANTITY)
                    .str()
                    .strip_chars(lit(" \t\r\n"))
                    .cast(DataType::Float64),
                col(record::VALUE)
                    .str()
                    .strip_chars(lit(" \t\r\n"))
                    .cast(DataType::Float64),
            ])
            .filter(
                col(record::PARTNER)
                    .is_not_null()
                    .and(col(record::QUANTITY).is_not_null())
                    .and(col(record::VALUE).is_not_null())
                    .and(col(record::FLOW).is_in(lit(known_flows), false)),
            )
            .collect()?;

        let dropped = before - df.height();
        if dropped > 0 {
            log::debug!(
                "dropped {} invalid records while loading {}",
                dropped,
                config.filename
            );
        }
        Ok(df)
    }

    fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), TradeError> {
        for &name in required {
            if df.column(name).is_err() {
                return Err(TradeError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }
}
