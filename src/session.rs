use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::VerCalcConfig;
use crate::error::Result;
use crate::io::catalog::{CatalogLoader, CatalogSource, DirCatalogSource};
use crate::io::input::CoilRecord;
use crate::io::output::{build_csv, write_export, EXPORT_PREFIX};
use crate::processing::aneurysm::{AneurysmGeometry, Axis};
use crate::processing::browser::{CandidatePreview, CatalogBrowser};
use crate::processing::coil_list::{SelectedCoil, SelectedCoilList, VerSummary};

// Custom coils get ids far above any catalog position.
const CUSTOM_ID_BASE: u64 = 1 << 32;

/// Owns all state of one coil-planning session: the aneurysm, the catalog
/// browser and the selected-coil list. Views hold a handle to this object
/// instead of sharing globals.
pub struct VerSession {
    aneurysm: AneurysmGeometry,
    selection: SelectedCoilList,
    browser: CatalogBrowser,
    next_custom_id: u64,
    export_dir: PathBuf,
    export_prefix: String,
}

impl VerSession {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            aneurysm: AneurysmGeometry::new(),
            selection: SelectedCoilList::new(),
            browser: CatalogBrowser::new(CatalogLoader::new(source)),
            next_custom_id: CUSTOM_ID_BASE,
            export_dir: PathBuf::from("."),
            export_prefix: EXPORT_PREFIX.to_string(),
        }
    }

    pub fn from_config(config: &VerCalcConfig) -> Self {
        let source = DirCatalogSource::with_master_file(&config.catalog_dir, config.master_file.clone());
        let mut session = Self::new(Arc::new(source));
        session.export_dir = config.export_dir.clone();
        session.export_prefix = config.export_prefix.clone();
        session
    }

    // aneurysm

    pub fn aneurysm(&self) -> &AneurysmGeometry {
        &self.aneurysm
    }

    pub fn set_diameter(&mut self, axis: Axis, text: &str) {
        self.aneurysm.set_diameter(axis, text);
    }

    pub fn set_manual_volume(&mut self, text: &str) {
        self.aneurysm.set_manual_volume(text);
    }

    /// Current aneurysm volume in mm³, `0.0` while unavailable.
    pub fn aneurysm_volume(&self) -> f64 {
        self.aneurysm.volume_or_zero()
    }

    // catalog

    pub fn browser(&self) -> &CatalogBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut CatalogBrowser {
        &mut self.browser
    }

    pub fn candidate_preview(&self, index: usize) -> Option<CandidatePreview> {
        let candidate = self.browser.candidates().get(index)?;
        Some(CandidatePreview::for_coil(&candidate.record, self.aneurysm_volume()))
    }

    /// Live preview of the custom form: cylinder volume and per-coil VER.
    /// `None` until every field holds a positive number.
    pub fn custom_preview(&self) -> Option<CandidatePreview> {
        let spec = self.browser.custom_input().validate()?;
        Some(CandidatePreview::for_coil(&spec.into_record(0), self.aneurysm_volume()))
    }

    // selection

    pub fn add_coil(&mut self, coil: CoilRecord) -> &SelectedCoil {
        self.selection.add_coil(coil)
    }

    /// Adds the coil currently selected in the browser.
    pub fn add_selected_candidate(&mut self) -> Option<&SelectedCoil> {
        let coil = self.browser.selected_coil()?.clone();
        Some(self.selection.add_coil(coil))
    }

    /// Selects and adds the candidate at `index` in one step (double click).
    pub fn add_candidate(&mut self, index: usize) -> Option<&SelectedCoil> {
        let coil = self.browser.select_candidate(index)?.clone();
        Some(self.selection.add_coil(coil))
    }

    /// Adds the coil described by the custom form and clears the form.
    /// Invalid input adds nothing.
    pub fn add_custom_coil(&mut self) -> Option<&SelectedCoil> {
        let spec = self.browser.custom_input().validate()?;
        let id = self.next_custom_id;
        self.next_custom_id += 1;
        self.browser.custom_input_mut().clear();
        Some(self.selection.add_coil(spec.into_record(id)))
    }

    pub fn remove_entry(&mut self, display_index: usize) -> Option<SelectedCoil> {
        self.selection.remove_entry(display_index)
    }

    pub fn change_quantity(&mut self, display_index: usize, delta: i64) -> bool {
        self.selection.change_quantity(display_index, delta)
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all();
    }

    pub fn selection(&self) -> &SelectedCoilList {
        &self.selection
    }

    pub fn entries(&self) -> Vec<&SelectedCoil> {
        self.selection.display_entries()
    }

    pub fn summary(&self) -> VerSummary {
        self.selection.summary(self.aneurysm_volume())
    }

    // export

    pub fn export_csv(&self) -> Result<String> {
        build_csv(&self.selection, self.aneurysm_volume())
    }

    /// Writes the sheet into the configured export directory.
    pub fn export(&self) -> anyhow::Result<PathBuf> {
        self.export_to_dir(&self.export_dir)
    }

    pub fn export_to_dir(&self, output_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        write_export(output_dir, &self.export_prefix, &self.selection, self.aneurysm_volume())
    }
}
