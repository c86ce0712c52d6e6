//! Fall speed and playfield geometry.

use crate::error::EngineError;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;
pub const DEFAULT_LEVEL: u8 = 3;

/// Seconds a word takes to fall from the top line to the ground at level 1.
pub const SLOWEST_FALL_SECS: f64 = 14.0;
/// Same, at level 10.
pub const FASTEST_FALL_SECS: f64 = 3.5;
/// Curve exponent: low levels change gently, high levels ramp faster.
pub const FALL_CURVE_EXPONENT: f64 = 1.6;

/// Clamp an arbitrary level into the playable range.
pub fn clamp_level(level: u8) -> u8 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Fall duration in seconds for `level`, interpolated on a power curve.
pub fn fall_duration_secs(level: u8) -> f64 {
    let t = f64::from(clamp_level(level) - MIN_LEVEL) / f64::from(MAX_LEVEL - MIN_LEVEL);
    SLOWEST_FALL_SECS - (SLOWEST_FALL_SECS - FASTEST_FALL_SECS) * t.powf(FALL_CURVE_EXPONENT)
}

/// Drawable area. Words spawn on `top` and are missed once they reach `ground`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub ground: f64,
}

impl Playfield {
    pub const TOP_MARGIN: f64 = 36.0;
    pub const GROUND_MARGIN: f64 = 48.0;

    pub fn new(width: f64, height: f64) -> Result<Self, EngineError> {
        let top = Self::TOP_MARGIN;
        let ground = height - Self::GROUND_MARGIN;
        if !(width > 0.0) || !(ground > top) {
            return Err(EngineError::InvalidPlayfield { width, height });
        }
        Ok(Self {
            width,
            height,
            top,
            ground,
        })
    }

    /// Vertical distance a word covers before it is missed.
    pub fn travel(&self) -> f64 {
        self.ground - self.top
    }

    /// Pixels per second for `level` on this playfield.
    pub fn fall_speed(&self, level: u8) -> f64 {
        self.travel() / fall_duration_secs(level)
    }

    /// Largest left edge that keeps a word of `text_width` inside the field.
    pub fn max_x(&self, text_width: f64) -> f64 {
        (self.width - text_width).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_endpoints() {
        assert!((fall_duration_secs(1) - SLOWEST_FALL_SECS).abs() < 1e-9);
        assert!((fall_duration_secs(10) - FASTEST_FALL_SECS).abs() < 1e-9);
        // out of range levels clamp
        assert_eq!(fall_duration_secs(0), fall_duration_secs(1));
        assert_eq!(fall_duration_secs(42), fall_duration_secs(10));
    }

    #[test]
    fn curve_is_monotonic_and_steepens() {
        let durations: Vec<f64> = (1..=10).map(fall_duration_secs).collect();
        for pair in durations.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        let first_step = durations[0] - durations[1];
        let last_step = durations[8] - durations[9];
        assert!(last_step > first_step);
    }

    #[test]
    fn playfield_speed_covers_travel_in_duration() {
        let pf = Playfield::new(800.0, 600.0).unwrap();
        let speed = pf.fall_speed(5);
        assert!((speed * fall_duration_secs(5) - pf.travel()).abs() < 1e-6);
    }

    #[test]
    fn playfield_rejects_degenerate_sizes() {
        assert!(Playfield::new(0.0, 600.0).is_err());
        assert!(Playfield::new(800.0, 50.0).is_err());
        assert!(Playfield::new(f64::NAN, 600.0).is_err());
    }

    #[test]
    fn max_x_never_negative() {
        let pf = Playfield::new(100.0, 600.0).unwrap();
        assert_eq!(pf.max_x(40.0), 60.0);
        assert_eq!(pf.max_x(400.0), 0.0);
    }
}
