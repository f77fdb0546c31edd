use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::{Result, VerCalcError};
use crate::utils::utils::collapse_whitespace;

/// One coil product as published in a manufacturer catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoilRecord {
    #[serde(default)]
    pub id: u64,
    pub manufacturer: String,
    pub coil_name: String,
    pub primary_diameter_inch: f64,
    pub primary_diameter_mm: f64,
    pub secondary_diameter_mm: f64,
    pub length_cm: f64,
    pub volume_mm3: f64,
    #[serde(default)]
    pub min_catheter_lumen_inch: f64,
    #[serde(default)]
    pub is_azur_series: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azur_primary_diameter_inch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azur_primary_diameter_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azur_volume_mm3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swelling_ratio: Option<f64>,
}

impl CoilRecord {
    /// Post-swelling volume, only for swelling coils that publish one.
    pub fn swelling_volume(&self) -> Option<f64> {
        if !self.is_azur_series {
            return None;
        }
        self.azur_volume_mm3.filter(|v| *v != 0.0)
    }

    /// Volume that actually fills the aneurysm once the coil has settled.
    pub fn effective_volume(&self) -> f64 {
        self.swelling_volume().unwrap_or(self.volume_mm3)
    }
}

#[derive(Debug, Deserialize)]
struct MasterEntry {
    manufacturer: String,
}

fn expect_array(bytes: &[u8]) -> Result<Vec<Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(items) => Ok(items),
        other => Err(VerCalcError::InvalidCatalog(format!(
            "expected array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parses a manufacturer catalog file. Ids are reassigned from the
/// position in the file, starting at 1.
pub fn parse_coil_array(bytes: &[u8]) -> Result<Vec<CoilRecord>> {
    let items = expect_array(bytes)?;
    let mut coils = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut coil: CoilRecord = serde_json::from_value(item)?;
        coil.id = index as u64 + 1;
        coils.push(coil);
    }
    Ok(coils)
}

/// Unique manufacturer names of the master database, sorted case-insensitively.
pub fn parse_manufacturers(bytes: &[u8]) -> Result<Vec<String>> {
    let items = expect_array(bytes)?;
    let mut seen = HashSet::new();
    let mut manufacturers = Vec::new();
    for item in items {
        let entry: MasterEntry = serde_json::from_value(item)?;
        if seen.insert(entry.manufacturer.clone()) {
            manufacturers.push(entry.manufacturer);
        }
    }
    manufacturers.sort_by_cached_key(|name| name.to_lowercase());
    Ok(manufacturers)
}

/// Catalog file stem for a manufacturer, e.g. `"Micro Vention"` -> `"micro_vention_new"`.
pub fn manufacturer_file_stem(manufacturer: &str) -> String {
    format!("{}_new", collapse_whitespace(&manufacturer.to_lowercase(), '_'))
}

/// Unique coil names in order of first appearance.
pub fn product_series(coils: &[CoilRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    coils
        .iter()
        .filter(|coil| seen.insert(coil.coil_name.as_str()))
        .map(|coil| coil.coil_name.clone())
        .collect()
}
