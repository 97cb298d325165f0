pub mod vec;

pub use vec::*;

/// Clamp `v` into `[lo, hi]`.
///
/// NaN input passes through unchanged; callers that need a guaranteed range
/// must filter it first.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::clamp;

    #[test]
    fn clamps_both_bounds() {
        assert_eq!(clamp(-3.0, 1.0, 5.0), 1.0);
        assert_eq!(clamp(9.0, 1.0, 5.0), 5.0);
        assert_eq!(clamp(2.5, 1.0, 5.0), 2.5);
    }
}
