//! Volume Embolization Ratio (VER) engine for aneurysm coil planning.
//!
//! The VER is the inserted coil volume divided by the aneurysm volume, in
//! percent. [`session::VerSession`] ties together the aneurysm geometry, the
//! manufacturer catalog and the list of selected coils, and renders the CSV
//! sheet handed to the clinician.

pub mod config;
pub mod error;
pub mod io;
pub mod processing;
pub mod session;
mod utils;

#[cfg(feature = "python")]
mod python_bind;

pub use config::VerCalcConfig;
pub use error::{Result, VerCalcError};
pub use io::input::CoilRecord;
pub use processing::aneurysm::{AneurysmGeometry, Axis, VolumeMode};
pub use processing::coil_list::{SelectedCoil, SelectedCoilList, VerSummary};
pub use processing::volumes::{cylinder_volume, ellipsoid_volume};
pub use session::VerSession;

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use python_bind::{PyCoilRecord, PySelectedCoil, PyVerSession, PyVerSummary};

/// Ellipsoid volume (mm³) from three axis diameters (mm); ``None`` for invalid input.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "ellipsoid_volume")]
fn ellipsoid_volume_py(x: f64, y: f64, z: f64) -> Option<f64> {
    ellipsoid_volume(x, y, z)
}

/// Cylinder volume (mm³) of a coil wire from its primary diameter (inch) and length (cm).
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "cylinder_volume")]
fn cylinder_volume_py(primary_diameter_inch: f64, length_cm: f64) -> Option<f64> {
    cylinder_volume(primary_diameter_inch, length_cm)
}

/// This is the module importable from Python:
///
/// ```python
/// import vercalc
/// session = vercalc.VerSession("public/data")
/// session.set_diameter("x", "6.2")
/// session.select_manufacturer("Kaneka")
/// session.wait_catalog()
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn vercalc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(ellipsoid_volume_py, m)?)?;
    m.add_function(wrap_pyfunction!(cylinder_volume_py, m)?)?;

    m.add_class::<PyCoilRecord>()?;
    m.add_class::<PySelectedCoil>()?;
    m.add_class::<PyVerSummary>()?;
    m.add_class::<PyVerSession>()?;
    Ok(())
}
