use crate::error::{Result, VerCalcError};
use crate::io::catalog::{load_manufacturers, CatalogLoader, CatalogResponse};
use crate::io::input::{product_series, CoilRecord};
use crate::processing::chart::{apply_jitter, AxisDomain, PlottedCoil};
use crate::processing::custom::{CustomCoilInput, CUSTOM_MANUFACTURER};
use crate::processing::volumes::volume_ratio;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManufacturerChoice {
    Catalog(String),
    Custom,
}

/// Per-coil VER preview shown while browsing candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePreview {
    pub volume: f64,
    pub post_swelling_volume: Option<f64>,
    /// Base-volume VER, or the single per-coil VER for non-swelling coils.
    pub ver: Option<f64>,
    pub post_swelling_ver: Option<f64>,
}

impl CandidatePreview {
    pub fn for_coil(coil: &CoilRecord, aneurysm_volume: f64) -> Self {
        let post_swelling_volume = coil.swelling_volume();
        Self {
            volume: coil.volume_mm3,
            post_swelling_volume,
            ver: volume_ratio(coil.volume_mm3, aneurysm_volume),
            post_swelling_ver: post_swelling_volume.and_then(|v| volume_ratio(v, aneurysm_volume)),
        }
    }
}

/// Manufacturer/series/candidate selection over the coil catalog.
pub struct CatalogBrowser {
    loader: CatalogLoader,
    manufacturers: Vec<String>,
    selected_manufacturer: Option<ManufacturerChoice>,
    coils: Vec<CoilRecord>,
    product_series: Vec<String>,
    selected_series: Option<String>,
    candidates: Vec<PlottedCoil>,
    domain: AxisDomain,
    selected_coil: Option<CoilRecord>,
    custom_input: CustomCoilInput,
}

impl CatalogBrowser {
    pub fn new(loader: CatalogLoader) -> Self {
        Self {
            loader,
            manufacturers: Vec::new(),
            selected_manufacturer: None,
            coils: Vec::new(),
            product_series: Vec::new(),
            selected_series: None,
            candidates: Vec::new(),
            domain: AxisDomain::default(),
            selected_coil: None,
            custom_input: CustomCoilInput::default(),
        }
    }

    /// Reads the manufacturer list from the master database. On failure the
    /// list stays empty and the error is returned after being logged.
    pub fn load_manufacturers(&mut self) -> Result<&[String]> {
        match load_manufacturers(self.loader.source()) {
            Ok(manufacturers) => {
                tracing::info!(count = manufacturers.len(), "loaded manufacturers");
                self.manufacturers = manufacturers;
                Ok(&self.manufacturers)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load manufacturers");
                self.manufacturers.clear();
                Err(e)
            }
        }
    }

    pub fn manufacturers(&self) -> &[String] {
        &self.manufacturers
    }

    pub fn selected_manufacturer(&self) -> Option<&ManufacturerChoice> {
        self.selected_manufacturer.as_ref()
    }

    pub fn is_custom(&self) -> bool {
        self.selected_manufacturer == Some(ManufacturerChoice::Custom)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Switches manufacturer. Catalog manufacturers are fetched in the
    /// background; the custom entry only clears the candidate state and an
    /// empty name clears the selection.
    pub fn select_manufacturer(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            self.clear_manufacturer();
            return Ok(());
        }
        if name == CUSTOM_MANUFACTURER {
            self.loader.invalidate();
            self.reset_candidates();
            self.selected_manufacturer = Some(ManufacturerChoice::Custom);
            return Ok(());
        }
        if !self.manufacturers.is_empty() && !self.manufacturers.iter().any(|m| m == name) {
            return Err(VerCalcError::UnknownManufacturer(name.to_string()));
        }

        self.reset_candidates();
        self.selected_manufacturer = Some(ManufacturerChoice::Catalog(name.to_string()));
        let generation = self.loader.request(name);
        tracing::debug!(manufacturer = name, generation, "requested catalog");
        Ok(())
    }

    pub fn clear_manufacturer(&mut self) {
        self.loader.invalidate();
        self.reset_candidates();
        self.selected_manufacturer = None;
    }

    /// Applies a finished fetch, if any. Returns whether the state changed.
    pub fn poll_catalog(&mut self) -> bool {
        match self.loader.poll() {
            Some(response) => {
                self.apply(response);
                true
            }
            None => false,
        }
    }

    /// Blocks until the latest fetch resolves and applies it.
    pub fn wait_catalog(&mut self) -> bool {
        match self.loader.wait() {
            Some(response) => {
                self.apply(response);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, response: CatalogResponse) {
        self.reset_candidates();
        match response.result {
            Ok(coils) => {
                tracing::info!(
                    manufacturer = %response.manufacturer,
                    count = coils.len(),
                    "loaded manufacturer catalog"
                );
                self.product_series = product_series(&coils);
                self.coils = coils;
            }
            Err(e) => {
                tracing::warn!(
                    manufacturer = %response.manufacturer,
                    error = %e,
                    "failed to load manufacturer catalog"
                );
            }
        }
    }

    fn reset_candidates(&mut self) {
        self.coils.clear();
        self.product_series.clear();
        self.selected_series = None;
        self.selected_coil = None;
        self.refresh_candidates();
    }

    pub fn coils(&self) -> &[CoilRecord] {
        &self.coils
    }

    pub fn product_series(&self) -> &[String] {
        &self.product_series
    }

    pub fn selected_series(&self) -> Option<&str> {
        self.selected_series.as_deref()
    }

    /// Narrows the candidates to one product series; `None` shows nothing.
    pub fn select_series(&mut self, series: Option<&str>) {
        self.selected_series = series.map(str::to_string);
        self.refresh_candidates();
    }

    fn refresh_candidates(&mut self) {
        let filtered: Vec<CoilRecord> = match &self.selected_series {
            Some(series) => self
                .coils
                .iter()
                .filter(|coil| &coil.coil_name == series)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        self.domain = AxisDomain::from_coils(&filtered);
        self.candidates = apply_jitter(&filtered);
    }

    pub fn candidates(&self) -> &[PlottedCoil] {
        &self.candidates
    }

    pub fn domain(&self) -> AxisDomain {
        self.domain
    }

    pub fn select_candidate(&mut self, index: usize) -> Option<&CoilRecord> {
        let record = self.candidates.get(index)?.record.clone();
        self.selected_coil = Some(record);
        self.selected_coil.as_ref()
    }

    pub fn selected_coil(&self) -> Option<&CoilRecord> {
        self.selected_coil.as_ref()
    }

    pub fn custom_input(&self) -> &CustomCoilInput {
        &self.custom_input
    }

    pub fn custom_input_mut(&mut self) -> &mut CustomCoilInput {
        &mut self.custom_input
    }
}
