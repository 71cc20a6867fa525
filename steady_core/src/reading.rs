//! Numeric reading types accepted by the stabilizer.

use core::fmt::Debug;
use core::ops::Sub;

/// An ordered, subtractable sample value.
///
/// `Default` doubles as the "no reading" sentinel unless a filter is
/// configured with an explicit one.
pub trait Reading: Copy + PartialOrd + Default + Debug + Sub<Output = Self> {
    /// Absolute difference between two readings.
    ///
    /// Computed from ordering plus the type's own subtraction so unsigned
    /// types never go negative. Integer impls saturate at the type bounds.
    fn distance(self, other: Self) -> Self;

    /// False for values that do not compare equal to themselves (NaN).
    #[inline]
    fn is_comparable(self) -> bool {
        self.partial_cmp(&self).is_some()
    }
}

macro_rules! impl_reading_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Reading for $t {
                #[inline]
                fn distance(self, other: Self) -> Self {
                    if self >= other {
                        self.saturating_sub(other)
                    } else {
                        other.saturating_sub(self)
                    }
                }
            }
        )*
    };
}

macro_rules! impl_reading_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Reading for $t {
                #[inline]
                fn distance(self, other: Self) -> Self {
                    let diff = self - other;
                    if diff < 0.0 { -diff } else { diff }
                }
            }
        )*
    };
}

impl_reading_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_reading_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_distance_is_symmetric() {
        assert_eq!(3u8.distance(10), 7);
        assert_eq!(10u8.distance(3), 7);
        assert_eq!(0u32.distance(0), 0);
    }

    #[test]
    fn signed_distance_saturates() {
        assert_eq!((-1i32).distance(1), 2);
        assert_eq!(i32::MIN.distance(i32::MAX), i32::MAX);
        assert_eq!(i8::MAX.distance(i8::MIN), i8::MAX);
    }

    #[test]
    fn float_distance_and_nan() {
        assert!((72.5f32.distance(70.0) - 2.5).abs() < f32::EPSILON);
        assert!((70.0f64.distance(72.5) - 2.5).abs() < f64::EPSILON);
        assert!(f32::NAN.distance(1.0).is_nan());
        assert!(!f32::NAN.is_comparable());
        assert!(1.0f32.is_comparable());
        assert!(5i32.is_comparable());
    }
}
