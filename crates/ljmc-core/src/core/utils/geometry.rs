use nalgebra::Vector3;

/// Minimum-image convention for a displacement in box units.
#[inline]
pub fn minimum_image(d: &Vector3<f64>) -> Vector3<f64> {
    d - d.map(f64::round)
}

/// Wraps a position in box units into the half-open unit cell `[-0.5, 0.5)`.
#[inline]
pub fn wrap_into_box(r: &Vector3<f64>) -> Vector3<f64> {
    r.map(wrap_coordinate)
}

#[inline]
fn wrap_coordinate(x: f64) -> f64 {
    let wrapped = x - (x + 0.5).floor();
    // Rounding in `x + 0.5` can land just outside the interval.
    if wrapped >= 0.5 {
        wrapped - 1.0
    } else if wrapped < -0.5 {
        wrapped + 1.0
    } else {
        wrapped
    }
}

pub fn to_box_units(r: &Vector3<f64>, box_length: f64) -> Vector3<f64> {
    r / box_length
}

pub fn to_physical_units(r: &Vector3<f64>, box_length: f64) -> Vector3<f64> {
    r * box_length
}
