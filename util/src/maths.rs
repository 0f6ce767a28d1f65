//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Limit a value to the range `[min, max]`.
///
/// Returns the limited value and `true` if the value had to be limited. A NaN
/// value is passed through unlimited.
pub fn clamp<T>(value: T, min: T, max: T) -> (T, bool)
where
    T: Float
{
    if value > max {
        (max, true)
    }
    else if value < min {
        (min, true)
    }
    else {
        (value, false)
    }
}

/// Move `value` towards zero by `step`, stopping at zero.
pub fn decay_to_zero<T>(value: T, step: T) -> T
where
    T: Float
{
    if value.abs() <= step {
        T::zero()
    }
    else {
        value - step * value.signum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((-1f64, 1f64), (-100f64, 100f64), 0.5), 50.0);
        assert_eq!(lin_map((0f64, 10f64), (10f64, 0f64), 2.0), 8.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.5f64, -1.0, 1.0), (0.5, false));
        assert_eq!(clamp(1.5f64, -1.0, 1.0), (1.0, true));
        assert_eq!(clamp(-3.0f64, -1.0, 1.0), (-1.0, true));
        assert_eq!(clamp(1.0f64, -1.0, 1.0), (1.0, false));
    }

    #[test]
    fn test_decay_to_zero() {
        assert_eq!(decay_to_zero(5.0f64, 2.0), 3.0);
        assert_eq!(decay_to_zero(-5.0f64, 2.0), -3.0);
        assert_eq!(decay_to_zero(1.0f64, 2.0), 0.0);
    }
}
