//! Procedural target shapes
//!
//! Every generator is a pure function of its parameters and the random source
//! handed in by the caller. Production code passes `rand::rng()`, tests pass a
//! seeded `StdRng` so layouts are reproducible.

use crate::constants::*;
use crate::error::LayoutError;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Tunable geometry of the three target shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub y_min: f32,
    pub y_max: f32,
    /// Cone radius at `y_min`, shrinking linearly to zero at `y_max`
    pub cone_radius: f32,
    /// Ribbon radius margin over the cone (ε)
    pub ribbon_offset: f32,
    pub ribbon_revolutions: f32,
    pub dispersed_radius_min: f32,
    pub dispersed_radius_max: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            y_min: Y_MIN,
            y_max: Y_MAX,
            cone_radius: CONE_RADIUS,
            ribbon_offset: RIBBON_OFFSET,
            ribbon_revolutions: RIBBON_REVOLUTIONS,
            dispersed_radius_min: DISPERSED_RADIUS_MIN,
            dispersed_radius_max: DISPERSED_RADIUS_MAX,
        }
    }
}

impl LayoutParams {
    /// Reject bounds that would make the generators emit NaN/Inf or
    /// negative radii.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("cone_radius", self.cone_radius),
            ("ribbon_offset", self.ribbon_offset),
            ("ribbon_revolutions", self.ribbon_revolutions),
            ("dispersed_radius_min", self.dispersed_radius_min),
            ("dispersed_radius_max", self.dispersed_radius_max),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(LayoutError::NonFiniteParam { name });
            }
        }

        if self.y_max <= self.y_min {
            return Err(LayoutError::InvertedHeight {
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }

        for (name, value) in [
            ("cone_radius", self.cone_radius),
            ("ribbon_offset", self.ribbon_offset),
            ("dispersed_radius_min", self.dispersed_radius_min),
        ] {
            if value < 0.0 {
                return Err(LayoutError::NegativeRadius { name, value });
            }
        }

        if self.dispersed_radius_max < self.dispersed_radius_min {
            return Err(LayoutError::InvertedDispersedRadius {
                min: self.dispersed_radius_min,
                max: self.dispersed_radius_max,
            });
        }

        Ok(())
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Radius of the cone's horizontal cross-section at height `y`
    pub fn level_radius(&self, y: f32) -> f32 {
        let t = ((y - self.y_min) / self.height()).clamp(0.0, 1.0);
        (1.0 - t) * self.cone_radius
    }
}

/// Uniform sample in `[min, max)`; returns `min` for a degenerate range.
pub fn random_range_f32<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Random point inside the cone body.
///
/// Height is uniform, the radial distance uses `sqrt(u)` so points are
/// uniform by area within each level disk instead of clustering at the axis.
pub fn cone_position<R: Rng + ?Sized>(params: &LayoutParams, rng: &mut R) -> Vec3 {
    let y = random_range_f32(rng, params.y_min, params.y_max);
    let level_radius = params.level_radius(y);
    let angle = random_range_f32(rng, 0.0, TAU);
    let r = rng.random::<f32>().sqrt() * level_radius;

    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Point on the ribbon helix for `t ∈ [0, 1]`.
///
/// Height runs linearly from `y_min` to `y_max`, radius shrinks from
/// `cone_radius + ribbon_offset` to `ribbon_offset`.
pub fn helix_position(params: &LayoutParams, t: f32) -> Vec3 {
    let height = params.y_min + t * params.height();
    let radius = (1.0 - t) * params.cone_radius + params.ribbon_offset;
    let angle = t * TAU * params.ribbon_revolutions;

    Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
}

/// Random point in the dispersed shell.
///
/// Radius and both spherical angles are sampled uniformly, which is denser
/// towards the poles and the inner radius than a volume-uniform cloud.
pub fn dispersed_position<R: Rng + ?Sized>(params: &LayoutParams, rng: &mut R) -> Vec3 {
    let r = random_range_f32(
        rng,
        params.dispersed_radius_min,
        params.dispersed_radius_max,
    );
    let theta = random_range_f32(rng, 0.0, TAU);
    let phi = random_range_f32(rng, 0.0, PI);

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

pub fn is_finite_point(p: Vec3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    fn horizontal_radius(p: Vec3) -> f32 {
        (p.x * p.x + p.z * p.z).sqrt()
    }

    #[test]
    fn test_cone_points_inside_level_disk() {
        let params = LayoutParams::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5000 {
            let p = cone_position(&params, &mut rng);
            assert!(is_finite_point(p));
            assert!(p.y >= params.y_min && p.y <= params.y_max);
            assert!(horizontal_radius(p) <= params.level_radius(p.y) + EPS);
        }
    }

    #[test]
    fn test_cone_is_not_center_clustered() {
        // With sqrt sampling half of the points should lie beyond r/√2.
        let params = LayoutParams::default();
        let mut rng = StdRng::seed_from_u64(11);
        let samples = 20_000;

        let outer = (0..samples)
            .map(|_| cone_position(&params, &mut rng))
            .filter(|p| {
                let level = params.level_radius(p.y);
                level > 0.0 && horizontal_radius(*p) > level / 2f32.sqrt()
            })
            .count();

        let fraction = outer as f32 / samples as f32;
        assert!((fraction - 0.5).abs() < 0.03, "fraction = {fraction}");
    }

    #[test]
    fn test_helix_endpoints() {
        let params = LayoutParams::default();

        let bottom = helix_position(&params, 0.0);
        assert!((bottom.y - params.y_min).abs() < EPS);
        assert!(
            (horizontal_radius(bottom) - (params.cone_radius + params.ribbon_offset)).abs() < EPS
        );

        let top = helix_position(&params, 1.0);
        assert!((top.y - params.y_max).abs() < EPS);
        assert!((horizontal_radius(top) - params.ribbon_offset).abs() < EPS);
    }

    #[test]
    fn test_helix_radius_non_negative_and_finite() {
        let params = LayoutParams::default();
        for i in 0..=1000 {
            let t = i as f32 / 1000.0;
            let p = helix_position(&params, t);
            assert!(is_finite_point(p));
            assert!(horizontal_radius(p) >= 0.0);
            assert!(horizontal_radius(p) >= params.ribbon_offset - EPS);
        }
    }

    #[test]
    fn test_helix_completes_revolutions() {
        let params = LayoutParams::default();
        // One third of the way up the ribbon has made exactly one turn.
        let p = helix_position(&params, 1.0 / 3.0);
        assert!(p.z.abs() < 1e-3);
        assert!(p.x > 0.0);
    }

    #[test]
    fn test_dispersed_radius_in_shell() {
        let params = LayoutParams::default();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..5000 {
            let p = dispersed_position(&params, &mut rng);
            let r = p.length();
            assert!(is_finite_point(p));
            assert!(r >= params.dispersed_radius_min - EPS);
            assert!(r <= params.dispersed_radius_max + EPS);
        }
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let params = LayoutParams::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(cone_position(&params, &mut a), cone_position(&params, &mut b));
            assert_eq!(
                dispersed_position(&params, &mut a),
                dispersed_position(&params, &mut b)
            );
        }
    }

    #[test]
    fn test_random_range_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_range_f32(&mut rng, 0.06, 0.06), 0.06);
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        assert!(LayoutParams::default().validate().is_ok());

        let inverted = LayoutParams {
            y_min: 4.0,
            y_max: -4.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(LayoutError::InvertedHeight { .. })
        ));

        let nan = LayoutParams {
            cone_radius: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            nan.validate(),
            Err(LayoutError::NonFiniteParam {
                name: "cone_radius"
            })
        );

        let shell = LayoutParams {
            dispersed_radius_min: 30.0,
            ..Default::default()
        };
        assert!(matches!(
            shell.validate(),
            Err(LayoutError::InvertedDispersedRadius { .. })
        ));

        let negative = LayoutParams {
            ribbon_offset: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(LayoutError::NegativeRadius { .. })
        ));
    }
}
