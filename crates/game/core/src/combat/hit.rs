//! Hit chance and accuracy calculations.

use crate::config::HitParams;

/// Calculate hit chance based on accuracy vs evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = accuracy / (accuracy + evasion)
/// clamped to [min, max]
/// ```
///
/// When both sides are zero the upper bound is used.
pub fn hit_chance(accuracy: f64, evasion: f64, params: &HitParams) -> f64 {
    let accuracy = accuracy.max(0.0);
    let total = accuracy + evasion.max(0.0);
    if total <= 0.0 {
        return params.max_chance;
    }
    (accuracy / total).clamp(params.min_chance, params.max_chance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_is_clamped_to_band() {
        let params = HitParams::default();
        assert_eq!(hit_chance(200.0, 0.0, &params), 0.95);
        assert_eq!(hit_chance(1.0, 1_000.0, &params), 0.05);
        assert_eq!(hit_chance(100.0, 100.0, &params), 0.5);
        assert_eq!(hit_chance(0.0, 0.0, &params), 0.95);
    }
}
