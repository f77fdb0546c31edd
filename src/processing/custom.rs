use crate::io::input::CoilRecord;
use crate::processing::volumes::{cylinder_volume, parse_dimension, MM_PER_INCH};
use crate::utils::utils::to_fixed;

pub const CUSTOM_MANUFACTURER: &str = "カスタム";

/// Raw text of the custom coil form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCoilInput {
    /// inch
    pub primary_diameter: String,
    /// mm
    pub secondary_diameter: String,
    /// cm
    pub length: String,
}

/// A fully validated custom coil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomCoilSpec {
    pub primary_diameter_inch: f64,
    pub secondary_diameter_mm: f64,
    pub length_cm: f64,
}

impl CustomCoilInput {
    pub fn new(primary_diameter: &str, secondary_diameter: &str, length: &str) -> Self {
        Self {
            primary_diameter: primary_diameter.to_string(),
            secondary_diameter: secondary_diameter.to_string(),
            length: length.to_string(),
        }
    }

    pub fn validate(&self) -> Option<CustomCoilSpec> {
        Some(CustomCoilSpec {
            primary_diameter_inch: parse_dimension(&self.primary_diameter)?,
            secondary_diameter_mm: parse_dimension(&self.secondary_diameter)?,
            length_cm: parse_dimension(&self.length)?,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl CustomCoilSpec {
    /// `カスタム-0014` for a 0.014" wire.
    pub fn coil_name(&self) -> String {
        let thousandths = to_fixed(self.primary_diameter_inch * 1000.0, 0);
        format!("{}-{:0>4}", CUSTOM_MANUFACTURER, thousandths)
    }

    pub fn volume(&self) -> f64 {
        cylinder_volume(self.primary_diameter_inch, self.length_cm).unwrap_or(0.0)
    }

    pub fn into_record(self, id: u64) -> CoilRecord {
        CoilRecord {
            id,
            manufacturer: CUSTOM_MANUFACTURER.to_string(),
            coil_name: self.coil_name(),
            primary_diameter_inch: self.primary_diameter_inch,
            primary_diameter_mm: self.primary_diameter_inch * MM_PER_INCH,
            secondary_diameter_mm: self.secondary_diameter_mm,
            length_cm: self.length_cm,
            volume_mm3: self.volume(),
            min_catheter_lumen_inch: self.primary_diameter_inch,
            is_azur_series: false,
            azur_primary_diameter_inch: None,
            azur_primary_diameter_mm: None,
            azur_volume_mm3: None,
            swelling_ratio: None,
        }
    }
}
