/// Web Mercator projection helpers
///
/// World pixel space is 256 * 2^zoom pixels wide, origin at the top-left
/// corner (lat 85.05°, lng -180°), the same layout slippy-map tiles use.
use std::f64::consts::PI;

use crate::state::data::Coordinate;

pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Mercator world
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Width (and height) of the world in pixels at `zoom`
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project a coordinate to world pixels at `zoom`
pub fn project(coordinate: Coordinate, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (coordinate.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`]. Longitude wraps, latitude is clamped.
pub fn unproject(x: f64, y: f64, zoom: u8) -> Coordinate {
    let size = world_size(zoom);

    let mut lng = x / size * 360.0 - 180.0;
    lng = (lng + 180.0).rem_euclid(360.0) - 180.0;

    let n = PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();

    Coordinate::new(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_world_center() {
        let (x, y) = project(Coordinate::new(0.0, 0.0), 1);
        assert!((x - 256.0).abs() < 1e-9);
        assert!((y - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let kampala = Coordinate::new(0.3476, 32.5825);
        let (x, y) = project(kampala, 13);
        let back = unproject(x, y, 13);

        assert!((back.lat - kampala.lat).abs() < 1e-9);
        assert!((back.lng - kampala.lng).abs() < 1e-9);
    }
}
