use itertools::Itertools;

/// WGS84 semi-major axis. Every distance and area in this workspace is
/// computed on a sphere of this radius, which puts one degree of arc at the
/// equator at roughly 111 319.5 m.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A closed ring needs at least three vertices to enclose anything.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Areas at or below this magnitude (one square millimeter) are reported as
/// exactly zero. Collinear or repeated vertices leave a floating point residue
/// in the shoelace sum that must not be mistaken for a real area.
pub const AREA_EPSILON_M2: f64 = 1e-6;

/// Largest sine of the angle between two projected vertex offsets for which
/// the vertices still count as lying on one line.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Wraps a longitude difference into `[-180, 180)`.
pub fn wrap_longitude_delta(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = to_radians(wrap_longitude_delta(longitude_2 - longitude_1));

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Area in square meters of the ring through `vertices` (latitude, longitude
/// in degrees), closed from the last vertex back to the first.
///
/// The vertices are projected onto the plane tangent at the first vertex
/// (equirectangular, longitudes scaled by the cosine of the mean latitude)
/// and measured with the shoelace formula.
///
/// # Accuracy
///
/// The flat-earth projection is good to well under one percent for plots of
/// a few tens of hectares. The error grows with the north-south extent of the
/// ring and close to the poles; use [`spherical_polygon_area`] for larger
/// regions.
///
/// A self-intersecting ring yields the magnitude of its signed area, so lobes
/// with opposite orientation cancel each other.
///
/// # Panics
///
/// Panics if fewer than [`MIN_POLYGON_POINTS`] vertices are given.
pub fn local_projection_area(vertices: &[(f64, f64)]) -> f64 {
    assert!(
        vertices.len() >= MIN_POLYGON_POINTS,
        "polygon area needs at least {} vertices, got {}",
        MIN_POLYGON_POINTS,
        vertices.len()
    );

    let projected = project(vertices);
    if is_collinear(&projected) {
        return 0.0;
    }

    let twice_signed_area = projected
        .iter()
        .circular_tuple_windows()
        .map(|(&(x1, y1), &(x2, y2))| x1 * y2 - x2 * y1)
        .sum::<f64>();

    snap_to_zero((twice_signed_area / 2.0).abs())
}

/// Area in square meters of the ring through `vertices` (latitude, longitude
/// in degrees) on a sphere of radius [`EARTH_RADIUS_M`], using the spherical
/// excess approximation `R²/2 · Σ (λᵢ₊₁ − λᵢ₋₁) · sin φᵢ`.
///
/// Holds up for large rings where [`local_projection_area`] drifts, at the
/// cost of losing significant digits on very small plots. The formula bends
/// straight lines in latitude/longitude, so rings whose vertices all lie on
/// one line are reported as exactly zero before it is applied.
///
/// # Panics
///
/// Panics if fewer than [`MIN_POLYGON_POINTS`] vertices are given.
pub fn spherical_polygon_area(vertices: &[(f64, f64)]) -> f64 {
    assert!(
        vertices.len() >= MIN_POLYGON_POINTS,
        "polygon area needs at least {} vertices, got {}",
        MIN_POLYGON_POINTS,
        vertices.len()
    );

    if is_collinear(&project(vertices)) {
        return 0.0;
    }

    // (previous, current, next) around the closed ring
    let excess = vertices
        .iter()
        .circular_tuple_windows()
        .map(|(&(_, prev_lon), &(lat, _), &(_, next_lon))| {
            to_radians(wrap_longitude_delta(next_lon - prev_lon))
                * to_radians(lat).sin()
        })
        .sum::<f64>();

    snap_to_zero((excess * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs())
}

/// Equirectangular projection onto the plane tangent at the first vertex, in
/// meters. Longitudes are scaled by the cosine of the mean latitude.
fn project(vertices: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let Some(&(origin_lat, origin_lon)) = vertices.first() else {
        return Vec::new();
    };
    let mean_lat = vertices.iter().map(|(lat, _)| lat).sum::<f64>()
        / vertices.len() as f64;
    let lon_scale = EARTH_RADIUS_M * to_radians(mean_lat).cos();

    vertices
        .iter()
        .map(|&(lat, lon)| {
            let x = lon_scale * to_radians(wrap_longitude_delta(lon - origin_lon));
            let y = EARTH_RADIUS_M * to_radians(lat - origin_lat);
            (x, y)
        })
        .collect()
}

/// Whether all projected vertices lie on one line through the origin, which
/// includes rings made of a single repeated position.
fn is_collinear(projected: &[(f64, f64)]) -> bool {
    let Some(&(dx, dy)) = projected.iter().find(|&&(x, y)| x != 0.0 || y != 0.0) else {
        return true;
    };
    let direction = dx.hypot(dy);
    projected.iter().all(|&(x, y)| {
        (dx * y - dy * x).abs() <= COLLINEAR_TOLERANCE * direction * x.hypot(y)
    })
}

fn snap_to_zero(area: f64) -> f64 {
    if area <= AREA_EPSILON_M2 {
        0.0
    } else {
        area
    }
}
