use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::error::TradeError;
use crate::model::TradeModel;
use crate::schema;

/// Python-facing dashboard model: a thin wrapper around `TradeModel` with
/// JSON view output for the Streamlit front end.
#[pyclass]
pub struct DashboardModel {
    inner: TradeModel,
}

#[pymethods]
impl DashboardModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            inner: TradeModel::with_builtin_datasets(base_path),
        }
    }

    /// Dataset keys for the page selector.
    fn datasets(&self) -> Vec<String> {
        self.inner
            .datasets()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Normalized record table for a dataset.
    fn load(&mut self, dataset: &str) -> PyResult<PyDataFrame> {
        let df = self.inner.load(dataset)?;
        Ok(PyDataFrame(df.clone()))
    }

    /// Sorted reporting countries for the country multi-select.
    fn countries(&mut self, dataset: &str) -> PyResult<Vec<String>> {
        Ok(self.inner.countries(dataset)?)
    }

    /// Map, flow diagram, and ranked table for one selection, serialized
    /// as one JSON document. Returns None for an empty selection.
    fn dashboard_json(
        &mut self,
        dataset: &str,
        selected: Vec<String>,
    ) -> PyResult<Option<String>> {
        match self.inner.dashboard(dataset, &selected)? {
            Some(dashboard) => {
                let json =
                    serde_json::to_string(&dashboard).map_err(TradeError::from)?;
                Ok(Some(json))
            }
            None => Ok(None),
        }
    }

    /// Drop the memoized table for a dataset; the next call rereads it.
    fn invalidate(&mut self, dataset: &str) {
        self.inner.invalidate(dataset);
    }
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Record
    let record = PyModule::new(m.py(), "record")?;
    record.add("COUNTRY", schema::record::COUNTRY)?;
    record.add("PARTNER", schema::record::PARTNER)?;
    record.add("FLOW", schema::record::FLOW)?;
    record.add("QUANTITY", schema::record::QUANTITY)?;
    record.add("VALUE", schema::record::VALUE)?;
    m.add_submodule(&record)?;

    // Flow
    let flow = PyModule::new(m.py(), "flow")?;
    flow.add("IMPORT", schema::flow::IMPORT)?;
    flow.add("EXPORT", schema::flow::EXPORT)?;
    m.add_submodule(&flow)?;

    // Balance
    let balance = PyModule::new(m.py(), "balance")?;
    balance.add("IMPORT_QUANTITY", schema::balance::IMPORT_QUANTITY)?;
    balance.add("EXPORT_QUANTITY", schema::balance::EXPORT_QUANTITY)?;
    balance.add("IMPORT_VALUE", schema::balance::IMPORT_VALUE)?;
    balance.add("EXPORT_VALUE", schema::balance::EXPORT_VALUE)?;
    balance.add("BALANCE", schema::balance::BALANCE)?;
    balance.add("DIRECTION", schema::balance::DIRECTION)?;
    balance.add("TOTAL_TRADE", schema::balance::TOTAL_TRADE)?;
    m.add_submodule(&balance)?;

    // Direction
    let direction = PyModule::new(m.py(), "direction")?;
    direction.add("EXPORT_SURPLUS", schema::direction::EXPORT_SURPLUS)?;
    direction.add("IMPORT_SURPLUS", schema::direction::IMPORT_SURPLUS)?;
    direction.add("BALANCED", schema::direction::BALANCED)?;
    m.add_submodule(&direction)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DashboardModel>()?;
    add_schema_exports(m)?;
    Ok(())
}
