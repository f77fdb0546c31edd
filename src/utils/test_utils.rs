use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::error::{Result, VerCalcError};
use crate::io::catalog::CatalogSource;
use crate::io::input::CoilRecord;

/// Creates a non-swelling Kaneka coil with a 0.010" primary wire.
pub fn plain_coil(id: u64, name: &str, secondary_mm: f64, length_cm: f64, volume_mm3: f64) -> CoilRecord {
    CoilRecord {
        id,
        manufacturer: "Kaneka".to_string(),
        coil_name: name.to_string(),
        primary_diameter_inch: 0.010,
        primary_diameter_mm: 0.254,
        secondary_diameter_mm: secondary_mm,
        length_cm,
        volume_mm3,
        min_catheter_lumen_inch: 0.0165,
        is_azur_series: false,
        azur_primary_diameter_inch: None,
        azur_primary_diameter_mm: None,
        azur_volume_mm3: None,
        swelling_ratio: None,
    }
}

/// Creates a swelling Terumo coil with a 0.018" primary wire.
pub fn azur_coil(
    id: u64,
    name: &str,
    secondary_mm: f64,
    length_cm: f64,
    volume_mm3: f64,
    azur_volume_mm3: f64,
) -> CoilRecord {
    CoilRecord {
        id,
        manufacturer: "Terumo".to_string(),
        coil_name: name.to_string(),
        primary_diameter_inch: 0.018,
        primary_diameter_mm: 0.4572,
        secondary_diameter_mm: secondary_mm,
        length_cm,
        volume_mm3,
        min_catheter_lumen_inch: 0.021,
        is_azur_series: true,
        azur_primary_diameter_inch: Some(0.027),
        azur_primary_diameter_mm: Some(0.6858),
        azur_volume_mm3: Some(azur_volume_mm3),
        swelling_ratio: Some(azur_volume_mm3 / volume_mm3),
    }
}

/// Five Kaneka coils: two share a chart position, one is a swelling coil.
pub fn sample_catalog_json() -> &'static str {
    r#"[
  {"manufacturer": "Kaneka", "coil_name": "ED Coil 10", "primary_diameter_inch": 0.010, "primary_diameter_mm": 0.254,
   "secondary_diameter_mm": 2.0, "length_cm": 4.0, "volume_mm3": 2.03, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false},
  {"id": 77, "manufacturer": "Kaneka", "coil_name": "ED Coil 10", "primary_diameter_inch": 0.010, "primary_diameter_mm": 0.254,
   "secondary_diameter_mm": 2.0, "length_cm": 4.0, "volume_mm3": 2.03, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false,
   "shape": "helical"},
  {"manufacturer": "Kaneka", "coil_name": "ED Coil 14", "primary_diameter_inch": 0.014, "primary_diameter_mm": 0.3556,
   "secondary_diameter_mm": 3.0, "length_cm": 6.0, "volume_mm3": 5.96, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false},
  {"manufacturer": "Kaneka", "coil_name": "AZUR CX 18", "primary_diameter_inch": 0.018, "primary_diameter_mm": 0.4572,
   "secondary_diameter_mm": 4.0, "length_cm": 10.0, "volume_mm3": 3.1, "min_catheter_lumen_inch": 0.021, "is_azur_series": true,
   "azur_primary_diameter_inch": 0.027, "azur_primary_diameter_mm": 0.6858, "azur_volume_mm3": 9.8, "swelling_ratio": 3.16},
  {"manufacturer": "Kaneka", "coil_name": "ED Coil 10", "primary_diameter_inch": 0.010, "primary_diameter_mm": 0.254,
   "secondary_diameter_mm": 6.0, "length_cm": 15.0, "volume_mm3": 7.6, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false,
   "azur_volume_mm3": null}
]"#
}

pub fn stryker_catalog_json() -> &'static str {
    r#"[
  {"manufacturer": "Stryker", "coil_name": "Target 360 Soft", "primary_diameter_inch": 0.010, "primary_diameter_mm": 0.254,
   "secondary_diameter_mm": 5.0, "length_cm": 15.0, "volume_mm3": 7.6, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false},
  {"manufacturer": "Stryker", "coil_name": "Target 360 Soft", "primary_diameter_inch": 0.010, "primary_diameter_mm": 0.254,
   "secondary_diameter_mm": 6.0, "length_cm": 20.0, "volume_mm3": 10.13, "min_catheter_lumen_inch": 0.0165, "is_azur_series": false}
]"#
}

/// Master database listing Stryker, Kaneka (twice) and balt.
pub fn sample_master_json() -> &'static str {
    r#"[
  {"manufacturer": "Stryker", "coil_name": "Target 360 Soft"},
  {"manufacturer": "Kaneka", "coil_name": "ED Coil 10"},
  {"manufacturer": "balt", "coil_name": "Optima"},
  {"manufacturer": "Kaneka", "coil_name": "ED Coil 14"}
]"#
}

/// In-memory catalog with optional per-file latency.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    master: String,
    catalogs: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl StaticCatalogSource {
    /// Kaneka and Stryker catalogs; balt is listed but has no file.
    pub fn sample() -> Self {
        Self {
            master: sample_master_json().to_string(),
            ..Self::default()
        }
        .with_catalog("kaneka_new", sample_catalog_json())
        .with_catalog("stryker_new", stryker_catalog_json())
    }

    pub fn with_catalog(mut self, file_stem: &str, json: &str) -> Self {
        self.catalogs.insert(file_stem.to_string(), json.to_string());
        self
    }

    pub fn with_delay(mut self, file_stem: &str, delay: Duration) -> Self {
        self.delays.insert(file_stem.to_string(), delay);
        self
    }
}

impl CatalogSource for StaticCatalogSource {
    fn read_master(&self) -> Result<Vec<u8>> {
        Ok(self.master.clone().into_bytes())
    }

    fn read_manufacturer(&self, file_stem: &str) -> Result<Vec<u8>> {
        if let Some(delay) = self.delays.get(file_stem) {
            thread::sleep(*delay);
        }
        self.catalogs
            .get(file_stem)
            .map(|json| json.clone().into_bytes())
            .ok_or_else(|| {
                VerCalcError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{}.json not found", file_stem),
                ))
            })
    }
}
