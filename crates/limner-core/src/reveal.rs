use crate::config::GameConfig;

/// Zoom factor for the puzzle image after `attempts_used` guesses.
///
/// `reveal_boost` is a continuous progress hint in `[0, 1]` that lets an
/// animation ease toward the next step; it never affects gameplay. A
/// finished puzzle always shows the full image (`1.0`).
pub fn compute_zoom(
    attempts_used: u32,
    max_attempts: u32,
    finished: bool,
    reveal_boost: f64,
    config: &GameConfig,
) -> f64 {
    if finished || max_attempts == 0 {
        return 1.0;
    }
    let boost = if reveal_boost.is_finite() {
        reveal_boost.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let normalized = ((f64::from(attempts_used) + boost) / f64::from(max_attempts)).min(1.0);
    let eased = (1.0 - normalized).powf(config.reveal_easing_exponent);
    (1.0 + eased * (config.max_zoom - 1.0)).max(1.0)
}

/// Fraction of the image revealed, `0.0` (tightest crop) to `1.0` (full).
pub fn reveal_fraction(zoom: f64, config: &GameConfig) -> f64 {
    if config.max_zoom <= 1.0 {
        return 1.0;
    }
    (1.0 - (zoom - 1.0) / (config.max_zoom - 1.0)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(attempts: u32, finished: bool) -> f64 {
        compute_zoom(attempts, 5, finished, 0.0, &GameConfig::default())
    }

    #[test]
    fn starts_at_max_zoom() {
        assert!((zoom(0, false) - 4.8).abs() < 1e-9);
    }

    #[test]
    fn non_increasing_in_attempts() {
        let mut prev = f64::INFINITY;
        for attempts in 0..=7 {
            let z = zoom(attempts, false);
            assert!(z <= prev, "zoom rose at {attempts}: {z} > {prev}");
            assert!(z >= 1.0);
            prev = z;
        }
    }

    #[test]
    fn finished_snaps_to_full_image() {
        for attempts in 0..=5 {
            assert_eq!(zoom(attempts, true), 1.0);
        }
    }

    #[test]
    fn unfinished_before_budget_is_zoomed() {
        for attempts in 0..5 {
            assert!(zoom(attempts, false) > 1.0);
        }
    }

    #[test]
    fn easing_reveals_more_late() {
        let first_step = zoom(0, false) - zoom(1, false);
        let last_step = zoom(3, false) - zoom(4, false);
        assert!(last_step > first_step);
    }

    #[test]
    fn boost_is_clamped() {
        let c = GameConfig::default();
        let base = compute_zoom(2, 5, false, 0.0, &c);
        let boosted = compute_zoom(2, 5, false, 0.5, &c);
        assert!(boosted < base);
        assert_eq!(
            compute_zoom(2, 5, false, 7.0, &c),
            compute_zoom(3, 5, false, 0.0, &c)
        );
        assert_eq!(compute_zoom(2, 5, false, f64::NAN, &c), base);
    }

    #[test]
    fn zero_budget_is_full_image() {
        assert_eq!(compute_zoom(0, 0, false, 0.0, &GameConfig::default()), 1.0);
    }

    #[test]
    fn fraction_spans_unit_interval() {
        let c = GameConfig::default();
        assert_eq!(reveal_fraction(4.8, &c), 0.0);
        assert_eq!(reveal_fraction(1.0, &c), 1.0);
    }
}
