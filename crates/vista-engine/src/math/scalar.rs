/// Constrains `value` to `[lower, upper]`.
///
/// Evaluates as `max(lower, min(upper, value))`:
/// - infinite bounds leave that side unconstrained
/// - a NaN `value` is returned unchanged
/// - if `lower > upper`, `lower` wins
///
/// Unlike `f64::clamp`, this never panics on inverted or NaN bounds.
#[inline]
pub fn clamp<T: PartialOrd + Copy>(value: T, lower: T, upper: T) -> T {
    let capped = if value > upper { upper } else { value };
    if capped < lower { lower } else { capped }
}

/// Step function: `0.0` when `value < edge`, otherwise `1.0`.
#[inline]
pub fn step<T: PartialOrd>(edge: T, value: T) -> f64 {
    if value < edge { 0.0 } else { 1.0 }
}
