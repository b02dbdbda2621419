//! Integer helpers for window placement and bound derivation.

/// Returns `ceil(n / 2)`.
#[inline]
pub(crate) fn ceil_half(n: usize) -> usize {
    n.div_ceil(2)
}

/// Returns `ceil(factor * n)` for a finite, non-negative factor.
#[inline]
pub(crate) fn ceil_scaled(factor: f64, n: usize) -> usize {
    let scaled = (factor * n as f64).ceil();
    if scaled <= 0.0 {
        0
    } else {
        scaled as usize
    }
}

/// Maps a zigzag step index to a signed offset: `0, 1, -1, 2, -2, ...`.
#[inline]
pub(crate) fn zigzag(step: usize) -> isize {
    let magnitude = step.div_ceil(2) as isize;
    if step % 2 == 1 {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::{ceil_half, ceil_scaled, zigzag};

    #[test]
    fn ceil_half_rounds_up_odd_values() {
        assert_eq!(ceil_half(0), 0);
        assert_eq!(ceil_half(1), 1);
        assert_eq!(ceil_half(4), 2);
        assert_eq!(ceil_half(7), 4);
    }

    #[test]
    fn ceil_scaled_matches_exact_products() {
        assert_eq!(ceil_scaled(1.0, 17), 17);
        assert_eq!(ceil_scaled(0.5, 17), 9);
        assert_eq!(ceil_scaled(0.0, 17), 0);
        assert_eq!(ceil_scaled(0.1, 1080), 108);
        assert_eq!(ceil_scaled(0.09, 300), 27);
        assert_eq!(ceil_scaled(0.09, 600), 54);
        assert_eq!(ceil_scaled(0.09, 1100), 99);
    }

    #[test]
    fn zigzag_alternates_without_negative_zero() {
        let seq: Vec<isize> = (0..7).map(zigzag).collect();
        assert_eq!(seq, vec![0, 1, -1, 2, -2, 3, -3]);
    }
}
