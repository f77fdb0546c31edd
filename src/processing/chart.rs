use std::collections::HashMap;
use std::f64::consts::PI;

use crate::io::input::CoilRecord;

/// Offset radius, in axis units, used to pull apart coils that share a position.
pub const JITTER_AMOUNT: f64 = 0.1;

/// Scatter chart bounds: secondary diameter (mm) on x, length (cm) on y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Default for AxisDomain {
    fn default() -> Self {
        Self {
            x: (0.0, 10.0),
            y: (0.0, 50.0),
        }
    }
}

impl AxisDomain {
    /// Rounded bounds around the stored (never the jittered) coordinates.
    pub fn from_coils(coils: &[CoilRecord]) -> Self {
        if coils.is_empty() {
            return Self::default();
        }

        let (min_d, max_d) = min_max(coils.iter().map(|c| c.secondary_diameter_mm));
        let x_min = (min_d.floor() - if min_d > 5.0 { 1.0 } else { 0.0 }).max(0.0);
        let x_max = max_d.ceil() + if max_d < 10.0 { 1.0 } else { 2.0 };

        let (min_l, max_l) = min_max(coils.iter().map(|c| c.length_cm));
        let y_min = ((min_l / 5.0).floor() * 5.0 - if min_l > 10.0 { 5.0 } else { 0.0 }).max(0.0);
        let y_max = (max_l / 5.0).ceil() * 5.0 + if max_l < 20.0 { 5.0 } else { 10.0 };

        Self {
            x: (x_min, x_max),
            y: (y_min, y_max),
        }
    }

    pub fn x_tick_count(&self) -> usize {
        ((self.x.1 - self.x.0 + 1.0).min(10.0)).max(0.0) as usize
    }

    pub fn y_tick_count(&self) -> usize {
        (((self.y.1 - self.y.0) / 5.0 + 1.0).min(10.0)).max(0.0) as usize
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// A candidate coil together with where it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedCoil {
    pub record: CoilRecord,
    pub plot_x: f64,
    pub plot_y: f64,
}

impl PlottedCoil {
    pub fn is_jittered(&self) -> bool {
        self.plot_x != self.record.secondary_diameter_mm || self.plot_y != self.record.length_cm
    }
}

// -0.0 and 0.0 must land in the same group
fn position_key(coil: &CoilRecord) -> (u64, u64) {
    ((coil.secondary_diameter_mm + 0.0).to_bits(), (coil.length_cm + 0.0).to_bits())
}

/// Spreads coils sharing an identical (diameter, length) position evenly on
/// a small circle around it. Singletons keep their stored coordinates.
pub fn apply_jitter(coils: &[CoilRecord]) -> Vec<PlottedCoil> {
    let mut groups: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (index, coil) in coils.iter().enumerate() {
        groups.entry(position_key(coil)).or_default().push(index);
    }

    let mut plotted: Vec<PlottedCoil> = coils
        .iter()
        .map(|coil| PlottedCoil {
            record: coil.clone(),
            plot_x: coil.secondary_diameter_mm,
            plot_y: coil.length_cm,
        })
        .collect();

    for members in groups.values().filter(|members| members.len() > 1) {
        let n = members.len() as f64;
        for (i, &index) in members.iter().enumerate() {
            let angle = i as f64 / n * 2.0 * PI;
            let point = &mut plotted[index];
            point.plot_x = point.record.secondary_diameter_mm + angle.cos() * JITTER_AMOUNT;
            point.plot_y = point.record.length_cm + angle.sin() * JITTER_AMOUNT;
        }
    }
    plotted
}
