// File: src/python_bind.rs
use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::VerCalcConfig;
use crate::io::input::CoilRecord;
use crate::processing::aneurysm::Axis;
use crate::processing::coil_list::{SelectedCoil, VerSummary};
use crate::processing::custom::CustomCoilInput;
use crate::session::VerSession;

#[pyclass(name = "CoilRecord")]
#[derive(Debug, Clone)]
pub struct PyCoilRecord {
    #[pyo3(get, set)]
    pub id: u64,
    #[pyo3(get, set)]
    pub manufacturer: String,
    #[pyo3(get, set)]
    pub coil_name: String,
    #[pyo3(get, set)]
    pub primary_diameter_inch: f64,
    #[pyo3(get, set)]
    pub primary_diameter_mm: f64,
    #[pyo3(get, set)]
    pub secondary_diameter_mm: f64,
    #[pyo3(get, set)]
    pub length_cm: f64,
    #[pyo3(get, set)]
    pub volume_mm3: f64,
    #[pyo3(get, set)]
    pub min_catheter_lumen_inch: f64,
    #[pyo3(get, set)]
    pub is_azur_series: bool,
    #[pyo3(get, set)]
    pub azur_primary_diameter_inch: Option<f64>,
    #[pyo3(get, set)]
    pub azur_primary_diameter_mm: Option<f64>,
    #[pyo3(get, set)]
    pub azur_volume_mm3: Option<f64>,
    #[pyo3(get, set)]
    pub swelling_ratio: Option<f64>,
}

#[pymethods]
impl PyCoilRecord {
    #[new]
    #[pyo3(signature = (
        id,
        manufacturer,
        coil_name,
        primary_diameter_inch,
        primary_diameter_mm,
        secondary_diameter_mm,
        length_cm,
        volume_mm3,
        min_catheter_lumen_inch = 0.0,
        is_azur_series = false,
        azur_primary_diameter_inch = None,
        azur_primary_diameter_mm = None,
        azur_volume_mm3 = None,
        swelling_ratio = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: u64,
        manufacturer: String,
        coil_name: String,
        primary_diameter_inch: f64,
        primary_diameter_mm: f64,
        secondary_diameter_mm: f64,
        length_cm: f64,
        volume_mm3: f64,
        min_catheter_lumen_inch: f64,
        is_azur_series: bool,
        azur_primary_diameter_inch: Option<f64>,
        azur_primary_diameter_mm: Option<f64>,
        azur_volume_mm3: Option<f64>,
        swelling_ratio: Option<f64>,
    ) -> Self {
        Self {
            id,
            manufacturer,
            coil_name,
            primary_diameter_inch,
            primary_diameter_mm,
            secondary_diameter_mm,
            length_cm,
            volume_mm3,
            min_catheter_lumen_inch,
            is_azur_series,
            azur_primary_diameter_inch,
            azur_primary_diameter_mm,
            azur_volume_mm3,
            swelling_ratio,
        }
    }

    /// Swelling-adjusted volume used for the VER.
    fn effective_volume(&self) -> f64 {
        CoilRecord::from(self).effective_volume()
    }

    fn __repr__(&self) -> String {
        format!(
            "CoilRecord(id={}, {} {}, {:.1}mm x {:.1}cm, volume={:.2})",
            self.id,
            self.manufacturer,
            self.coil_name,
            self.secondary_diameter_mm,
            self.length_cm,
            self.volume_mm3
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

impl From<&CoilRecord> for PyCoilRecord {
    fn from(coil: &CoilRecord) -> Self {
        Self {
            id: coil.id,
            manufacturer: coil.manufacturer.clone(),
            coil_name: coil.coil_name.clone(),
            primary_diameter_inch: coil.primary_diameter_inch,
            primary_diameter_mm: coil.primary_diameter_mm,
            secondary_diameter_mm: coil.secondary_diameter_mm,
            length_cm: coil.length_cm,
            volume_mm3: coil.volume_mm3,
            min_catheter_lumen_inch: coil.min_catheter_lumen_inch,
            is_azur_series: coil.is_azur_series,
            azur_primary_diameter_inch: coil.azur_primary_diameter_inch,
            azur_primary_diameter_mm: coil.azur_primary_diameter_mm,
            azur_volume_mm3: coil.azur_volume_mm3,
            swelling_ratio: coil.swelling_ratio,
        }
    }
}

impl From<&PyCoilRecord> for CoilRecord {
    fn from(coil: &PyCoilRecord) -> Self {
        Self {
            id: coil.id,
            manufacturer: coil.manufacturer.clone(),
            coil_name: coil.coil_name.clone(),
            primary_diameter_inch: coil.primary_diameter_inch,
            primary_diameter_mm: coil.primary_diameter_mm,
            secondary_diameter_mm: coil.secondary_diameter_mm,
            length_cm: coil.length_cm,
            volume_mm3: coil.volume_mm3,
            min_catheter_lumen_inch: coil.min_catheter_lumen_inch,
            is_azur_series: coil.is_azur_series,
            azur_primary_diameter_inch: coil.azur_primary_diameter_inch,
            azur_primary_diameter_mm: coil.azur_primary_diameter_mm,
            azur_volume_mm3: coil.azur_volume_mm3,
            swelling_ratio: coil.swelling_ratio,
        }
    }
}

#[pyclass(name = "SelectedCoil")]
#[derive(Debug, Clone)]
pub struct PySelectedCoil {
    #[pyo3(get)]
    pub coil: PyCoilRecord,
    #[pyo3(get)]
    pub quantity: u32,
    #[pyo3(get)]
    pub order: u32,
}

#[pymethods]
impl PySelectedCoil {
    fn __repr__(&self) -> String {
        format!(
            "SelectedCoil(#{} {} x{})",
            self.order, self.coil.coil_name, self.quantity
        )
    }
}

impl From<&SelectedCoil> for PySelectedCoil {
    fn from(entry: &SelectedCoil) -> Self {
        Self {
            coil: (&entry.coil).into(),
            quantity: entry.quantity,
            order: entry.order,
        }
    }
}

#[pyclass(name = "VerSummary")]
#[derive(Debug, Clone)]
pub struct PyVerSummary {
    #[pyo3(get)]
    pub aneurysm_volume: f64,
    #[pyo3(get)]
    pub total_effective_volume: f64,
    #[pyo3(get)]
    pub total_pre_swelling_volume: f64,
    #[pyo3(get)]
    pub has_swelling_series: bool,
    #[pyo3(get)]
    pub entry_count: usize,
    #[pyo3(get)]
    pub total_quantity: u64,
    #[pyo3(get)]
    pub ver: Option<f64>,
    #[pyo3(get)]
    pub pre_swelling_ver: Option<f64>,
    #[pyo3(get)]
    pub progress_percent: Option<f64>,
}

#[pymethods]
impl PyVerSummary {
    fn __repr__(&self) -> String {
        match self.ver {
            Some(ver) => format!(
                "VerSummary(coils={}, volume={:.1} mm³, VER={:.1}%)",
                self.total_quantity, self.total_effective_volume, ver
            ),
            None => format!(
                "VerSummary(coils={}, volume={:.1} mm³)",
                self.total_quantity, self.total_effective_volume
            ),
        }
    }
}

impl From<VerSummary> for PyVerSummary {
    fn from(summary: VerSummary) -> Self {
        Self {
            progress_percent: summary.progress_percent(),
            aneurysm_volume: summary.aneurysm_volume,
            total_effective_volume: summary.total_effective_volume,
            total_pre_swelling_volume: summary.total_pre_swelling_volume,
            has_swelling_series: summary.has_swelling_series,
            entry_count: summary.entry_count,
            total_quantity: summary.total_quantity,
            ver: summary.ver,
            pre_swelling_ver: summary.pre_swelling_ver,
        }
    }
}

fn parse_axis(axis: &str) -> PyResult<Axis> {
    match axis.to_ascii_lowercase().as_str() {
        "x" => Ok(Axis::X),
        "y" => Ok(Axis::Y),
        "z" => Ok(Axis::Z),
        other => Err(PyValueError::new_err(format!("unknown axis '{}', expected x, y or z", other))),
    }
}

fn runtime_err(e: impl std::fmt::Display) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

fn index_err(index: usize) -> PyErr {
    PyIndexError::new_err(format!("no entry at index {}", index))
}

/// Python handle on a [`VerSession`].
#[pyclass(name = "VerSession", unsendable)]
pub struct PyVerSession {
    inner: VerSession,
}

#[pymethods]
impl PyVerSession {
    #[new]
    #[pyo3(signature = (catalog_dir = "data", export_dir = "."))]
    fn new(catalog_dir: &str, export_dir: &str) -> Self {
        let config = VerCalcConfig {
            catalog_dir: catalog_dir.into(),
            export_dir: export_dir.into(),
            ..VerCalcConfig::default()
        };
        Self {
            inner: VerSession::from_config(&config),
        }
    }

    #[staticmethod]
    fn from_config(path: &str) -> PyResult<Self> {
        let config = VerCalcConfig::load(path).map_err(runtime_err)?;
        Ok(Self {
            inner: VerSession::from_config(&config),
        })
    }

    fn set_diameter(&mut self, axis: &str, value: &str) -> PyResult<()> {
        self.inner.set_diameter(parse_axis(axis)?, value);
        Ok(())
    }

    fn set_manual_volume(&mut self, value: &str) {
        self.inner.set_manual_volume(value);
    }

    #[getter]
    fn aneurysm_volume(&self) -> f64 {
        self.inner.aneurysm_volume()
    }

    #[getter]
    fn is_manual_volume(&self) -> bool {
        self.inner.aneurysm().is_manual()
    }

    fn load_manufacturers(&mut self) -> PyResult<Vec<String>> {
        self.inner
            .browser_mut()
            .load_manufacturers()
            .map(|names| names.to_vec())
            .map_err(runtime_err)
    }

    fn select_manufacturer(&mut self, name: &str) -> PyResult<()> {
        self.inner.browser_mut().select_manufacturer(name).map_err(runtime_err)
    }

    fn poll_catalog(&mut self) -> bool {
        self.inner.browser_mut().poll_catalog()
    }

    fn wait_catalog(&mut self) -> bool {
        self.inner.browser_mut().wait_catalog()
    }

    fn product_series(&self) -> Vec<String> {
        self.inner.browser().product_series().to_vec()
    }

    #[pyo3(signature = (series = None))]
    fn select_series(&mut self, series: Option<&str>) {
        self.inner.browser_mut().select_series(series);
    }

    /// Candidates as ``(record, plot_x, plot_y)`` tuples.
    fn candidates(&self) -> Vec<(PyCoilRecord, f64, f64)> {
        self.inner
            .browser()
            .candidates()
            .iter()
            .map(|c| ((&c.record).into(), c.plot_x, c.plot_y))
            .collect()
    }

    /// ``((x_min, x_max), (y_min, y_max))``
    fn axis_domain(&self) -> ((f64, f64), (f64, f64)) {
        let domain = self.inner.browser().domain();
        (domain.x, domain.y)
    }

    /// ``(ver, post_swelling_ver)`` of one candidate.
    fn candidate_ver(&self, index: usize) -> PyResult<(Option<f64>, Option<f64>)> {
        let preview = self.inner.candidate_preview(index).ok_or_else(|| index_err(index))?;
        Ok((preview.ver, preview.post_swelling_ver))
    }

    fn select_candidate(&mut self, index: usize) -> Option<PyCoilRecord> {
        self.inner.browser_mut().select_candidate(index).map(PyCoilRecord::from)
    }

    fn add_coil(&mut self, coil: PyRef<'_, PyCoilRecord>) -> PySelectedCoil {
        self.inner.add_coil(CoilRecord::from(&*coil)).into()
    }

    fn add_selected_candidate(&mut self) -> Option<PySelectedCoil> {
        self.inner.add_selected_candidate().map(PySelectedCoil::from)
    }

    fn add_candidate(&mut self, index: usize) -> PyResult<PySelectedCoil> {
        self.inner
            .add_candidate(index)
            .map(PySelectedCoil::from)
            .ok_or_else(|| index_err(index))
    }

    fn set_custom_input(&mut self, primary_diameter_inch: &str, secondary_diameter_mm: &str, length_cm: &str) {
        *self.inner.browser_mut().custom_input_mut() =
            CustomCoilInput::new(primary_diameter_inch, secondary_diameter_mm, length_cm);
    }

    /// ``(coil_name, volume_mm3, ver)`` for a valid custom form, else ``None``.
    fn custom_preview(&self) -> Option<(String, f64, Option<f64>)> {
        let name = self.inner.browser().custom_input().validate()?.coil_name();
        let preview = self.inner.custom_preview()?;
        Some((name, preview.volume, preview.ver))
    }

    fn add_custom_coil(&mut self) -> Option<PySelectedCoil> {
        self.inner.add_custom_coil().map(PySelectedCoil::from)
    }

    fn remove_entry(&mut self, index: usize) -> PyResult<PySelectedCoil> {
        self.inner
            .remove_entry(index)
            .map(|entry| PySelectedCoil::from(&entry))
            .ok_or_else(|| index_err(index))
    }

    fn change_quantity(&mut self, index: usize, delta: i64) -> PyResult<()> {
        if self.inner.change_quantity(index, delta) {
            Ok(())
        } else {
            Err(index_err(index))
        }
    }

    fn clear_all(&mut self) {
        self.inner.clear_all();
    }

    fn entries(&self) -> Vec<PySelectedCoil> {
        self.inner.entries().into_iter().map(PySelectedCoil::from).collect()
    }

    fn summary(&self) -> PyVerSummary {
        self.inner.summary().into()
    }

    fn export_csv(&self) -> PyResult<String> {
        self.inner.export_csv().map_err(runtime_err)
    }

    /// Writes the CSV file and returns its path.
    #[pyo3(signature = (output_dir = None))]
    fn export(&self, output_dir: Option<&str>) -> PyResult<String> {
        let path = match output_dir {
            Some(dir) => self.inner.export_to_dir(dir),
            None => self.inner.export(),
        }
        .map_err(runtime_err)?;
        Ok(path.display().to_string())
    }

    fn __repr__(&self) -> String {
        format!(
            "VerSession(aneurysm={:.1} mm³, entries={})",
            self.inner.aneurysm_volume(),
            self.inner.selection().len()
        )
    }
}
