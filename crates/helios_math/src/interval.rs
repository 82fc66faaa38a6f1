use glam::Vec3;

/// A closed range of `f32` values.
///
/// Used both for the accepted ray parameter range during intersection
/// and for clamping color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// The displayable range of a color channel.
    pub const COLOR: Interval = Interval { min: 0.0, max: 255.0 };

    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval of ray parameters beyond `epsilon` with no far limit.
    pub const fn forward(epsilon: f32) -> Self {
        Self::new(epsilon, f32::INFINITY)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Clamps every component of `v` into the interval.
    pub fn clamp_vec3(&self, v: Vec3) -> Vec3 {
        v.clamp(Vec3::splat(self.min), Vec3::splat(self.max))
    }

    /// Copy of this interval with the upper bound lowered to `max`.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(1.0, 4.0);

        assert!(interval.contains(1.0));
        assert!(interval.contains(4.0));
        assert!(!interval.contains(0.99));
        assert!(!interval.contains(4.01));
    }

    #[test]
    fn test_interval_surrounds_is_exclusive() {
        let interval = Interval::forward(1e-4);

        assert!(!interval.surrounds(1e-4));
        assert!(!interval.surrounds(0.0));
        assert!(interval.surrounds(1.0));
        assert!(interval.surrounds(1e30));
    }

    #[test]
    fn test_color_clamp() {
        assert_eq!(Interval::COLOR.clamp(-12.0), 0.0);
        assert_eq!(Interval::COLOR.clamp(128.5), 128.5);
        assert_eq!(Interval::COLOR.clamp(900.0), 255.0);
    }

    #[test]
    fn test_color_clamp_vec3() {
        let clamped = Interval::COLOR.clamp_vec3(Vec3::new(-5.0, 64.0, 300.0));
        assert_eq!(clamped, Vec3::new(0.0, 64.0, 255.0));
    }

    #[test]
    fn test_with_max() {
        let shortened = Interval::forward(0.5).with_max(10.0);
        assert_eq!(shortened, Interval::new(0.5, 10.0));
        assert!(!shortened.surrounds(10.0));
    }

    #[test]
    fn test_empty_and_universe() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(-1e20));
        assert!(Interval::UNIVERSE.contains(1e20));
    }
}
