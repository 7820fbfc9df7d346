/// Parse a coordinate cell as decimal degrees.
///
/// Returns `None` for empty, non-numeric and non-finite values.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a float the way it appears in the exported geometry text.
///
/// Shortest round-trip digits, with integral values keeping a trailing `.0`.
///
/// # Examples
/// ```
/// use ndvi_importer::utils::coordinates::format_coordinate;
///
/// assert_eq!(format_coordinate(-179.875), "-179.875");
/// assert_eq!(format_coordinate(10.0), "10.0");
/// ```
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Build a WKT point, longitude first
pub fn wkt_point(longitude: f64, latitude: f64) -> String {
    format!(
        "POINT({} {})",
        format_coordinate(longitude),
        format_coordinate(latitude)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("51.5074"), Some(51.5074));
        assert_eq!(parse_coordinate(" -0.1278 "), Some(-0.1278));
        assert_eq!(parse_coordinate("10"), Some(10.0));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("north"), None);
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate("inf"), None);
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(-179.875), "-179.875");
        assert_eq!(format_coordinate(89.875), "89.875");
        assert_eq!(format_coordinate(0.0), "0.0");
        assert_eq!(format_coordinate(-45.0), "-45.0");
        assert_eq!(format_coordinate(0.1), "0.1");
    }

    #[test]
    fn test_wkt_point_is_longitude_first() {
        assert_eq!(wkt_point(-0.1278, 51.5074), "POINT(-0.1278 51.5074)");
        assert_eq!(wkt_point(120.0, -30.5), "POINT(120.0 -30.5)");
    }
}
