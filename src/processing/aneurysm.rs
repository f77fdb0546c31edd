use crate::processing::volumes::{ellipsoid_volume, parse_dimension};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Which input currently defines the aneurysm volume.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VolumeMode {
    /// Computed from the three axis diameters.
    #[default]
    Derived,
    /// Typed in directly; `None` while the typed text is not a valid volume.
    Manual { volume: Option<f64> },
}

/// Aneurysm dimensions as entered by the user.
///
/// A manually typed volume overrides the ellipsoid estimate until any
/// diameter is edited again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AneurysmGeometry {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    mode: VolumeMode,
}

impl AneurysmGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diameters(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.x, self.y, self.z)
    }

    pub fn mode(&self) -> VolumeMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.mode, VolumeMode::Manual { .. })
    }

    pub fn set_diameter(&mut self, axis: Axis, text: &str) {
        self.set_diameter_value(axis, parse_dimension(text));
    }

    pub fn set_diameter_value(&mut self, axis: Axis, value: Option<f64>) {
        let slot = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *slot = value.filter(|v| v.is_finite() && *v > 0.0);
        if self.is_manual() {
            tracing::debug!(?axis, "diameter edited, reverting to derived volume");
        }
        self.mode = VolumeMode::Derived;
    }

    pub fn set_manual_volume(&mut self, text: &str) {
        self.set_manual_volume_value(parse_dimension(text));
    }

    pub fn set_manual_volume_value(&mut self, volume: Option<f64>) {
        self.mode = VolumeMode::Manual {
            volume: volume.filter(|v| v.is_finite() && *v > 0.0),
        };
    }

    /// Ellipsoid volume of the current diameters, regardless of mode.
    pub fn derived_volume(&self) -> Option<f64> {
        ellipsoid_volume(self.x?, self.y?, self.z?)
    }

    /// The authoritative volume, if one is available.
    pub fn volume(&self) -> Option<f64> {
        match self.mode {
            VolumeMode::Derived => self.derived_volume(),
            VolumeMode::Manual { volume } => volume,
        }
    }

    /// Volume as handed to the VER computations: `0.0` when unavailable.
    pub fn volume_or_zero(&self) -> f64 {
        self.volume().unwrap_or(0.0)
    }
}
