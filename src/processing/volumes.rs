use std::f64::consts::PI;

pub const MM_PER_INCH: f64 = 25.4;
pub const MM_PER_CM: f64 = 10.0;

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Parses a user-typed dimension. Empty, non-numeric, non-finite and
/// non-positive input all mean "not available".
pub fn parse_dimension(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| positive(*v))
}

/// Volume of an ellipsoid given its three axis diameters in mm.
///
/// V = 4/3 · π · a · b · c with a, b, c the semi-axes.
pub fn ellipsoid_volume(x: f64, y: f64, z: f64) -> Option<f64> {
    if !(positive(x) && positive(y) && positive(z)) {
        return None;
    }
    Some(4.0 / 3.0 * PI * (x / 2.0) * (y / 2.0) * (z / 2.0))
}

/// Volume in mm³ of a straight coil wire approximated as a cylinder.
pub fn cylinder_volume(primary_diameter_inch: f64, length_cm: f64) -> Option<f64> {
    if !(positive(primary_diameter_inch) && positive(length_cm)) {
        return None;
    }
    let radius_mm = primary_diameter_inch * MM_PER_INCH / 2.0;
    let length_mm = length_cm * MM_PER_CM;
    Some(PI * radius_mm.powi(2) * length_mm)
}

/// Share of the aneurysm filled by `coil_volume`, in percent.
pub fn volume_ratio(coil_volume: f64, aneurysm_volume: f64) -> Option<f64> {
    (aneurysm_volume > 0.0).then(|| coil_volume / aneurysm_volume * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ellipsoid_volume_sphere() {
        let v = ellipsoid_volume(10.0, 10.0, 10.0).unwrap();
        assert_relative_eq!(v, 4.0 / 3.0 * PI * 125.0, epsilon = 1e-9);
        assert_relative_eq!(v, 523.599, epsilon = 1e-3);
    }

    #[test]
    fn test_ellipsoid_volume_is_symmetric() {
        let (a, b, c) = (3.2, 5.7, 4.1);
        let reference = ellipsoid_volume(a, b, c).unwrap();
        for (x, y, z) in [(a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)] {
            assert_relative_eq!(ellipsoid_volume(x, y, z).unwrap(), reference, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ellipsoid_volume_rejects_invalid_axes() {
        assert!(ellipsoid_volume(0.0, 5.0, 5.0).is_none());
        assert!(ellipsoid_volume(5.0, -1.0, 5.0).is_none());
        assert!(ellipsoid_volume(5.0, 5.0, f64::NAN).is_none());
        assert!(ellipsoid_volume(f64::INFINITY, 5.0, 5.0).is_none());
    }

    #[test]
    fn test_cylinder_volume() {
        let v = cylinder_volume(0.014, 6.0).unwrap();
        let expected = PI * (0.014 * 25.4 / 2.0_f64).powi(2) * 60.0;
        assert_relative_eq!(v, expected, epsilon = 1e-12);
        assert_relative_eq!(v, 5.9589, epsilon = 1e-4);
    }

    #[test]
    fn test_cylinder_volume_rejects_invalid_input() {
        assert!(cylinder_volume(0.0, 6.0).is_none());
        assert!(cylinder_volume(0.014, -2.0).is_none());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension(" 4.5 "), Some(4.5));
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("abc"), None);
        assert_eq!(parse_dimension("0"), None);
        assert_eq!(parse_dimension("-3"), None);
        assert_eq!(parse_dimension("inf"), None);
        assert_eq!(parse_dimension("NaN"), None);
    }

    #[test]
    fn test_volume_ratio() {
        assert_relative_eq!(volume_ratio(25.0, 100.0).unwrap(), 25.0);
        assert!(volume_ratio(25.0, 0.0).is_none());
    }
}
