pub mod aneurysm;
pub mod browser;
pub mod chart;
pub mod coil_list;
pub mod custom;
pub mod volumes;
