//! Star ornament above the cone apex
//!
//! Bobs vertically, spins about Y, and shrinks to almost nothing while the
//! ensemble is dispersed.

use glam::{Mat4, Quat, Vec3};
use particle_layout::{InstanceTransform, Mode};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopperParams {
    /// Rest height of the star's centre
    pub height: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub spin_rate: f32,
    /// Scale-lerp rate per second
    pub scale_speed: f32,
    /// Scale while dispersed; never zero so the matrix stays invertible
    pub hidden_scale: f32,
}

impl Default for TopperParams {
    fn default() -> Self {
        Self {
            height: 4.3,
            bob_amplitude: 0.15,
            bob_frequency: 1.5,
            spin_rate: 0.5,
            scale_speed: 3.0,
            hidden_scale: 0.01,
        }
    }
}

pub struct StarTopper {
    params: TopperParams,
    scale: f32,
}

impl StarTopper {
    pub fn new(params: TopperParams) -> Self {
        Self { params, scale: 1.0 }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn update(&mut self, elapsed: f32, dt: f32, mode: Mode) -> InstanceTransform {
        let p = &self.params;
        let target = match mode {
            Mode::Assembled => 1.0,
            Mode::Dispersed => p.hidden_scale,
        };
        let factor = (p.scale_speed * dt).clamp(0.0, 1.0);
        self.scale += (target - self.scale) * factor;

        let y = p.height + (elapsed * p.bob_frequency).sin() * p.bob_amplitude;
        let rotation = Quat::from_rotation_y(elapsed * p.spin_rate);

        InstanceTransform::from_mat4(Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            rotation,
            Vec3::new(0.0, y, 0.0),
        ))
    }
}

impl Default for StarTopper {
    fn default() -> Self {
        Self::new(TopperParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bob_height() {
        let mut topper = StarTopper::default();
        let t = topper.update(0.0, 0.0, Mode::Assembled);
        assert!((t.translation().y - 4.3).abs() < 1e-6);

        let quarter = std::f32::consts::FRAC_PI_2 / 1.5;
        let t = topper.update(quarter, 0.0, Mode::Assembled);
        assert!((t.translation().y - 4.45).abs() < 1e-5);
    }

    #[test]
    fn test_shrinks_when_dispersed_and_recovers() {
        let mut topper = StarTopper::default();
        for _ in 0..600 {
            topper.update(0.0, 1.0 / 60.0, Mode::Dispersed);
        }
        assert!((topper.scale() - 0.01).abs() < 1e-3);

        for _ in 0..600 {
            topper.update(0.0, 1.0 / 60.0, Mode::Assembled);
        }
        assert!((topper.scale() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_large_dt_does_not_overshoot() {
        let mut topper = StarTopper::default();
        topper.update(0.0, 10.0, Mode::Dispersed);
        assert!((topper.scale() - 0.01).abs() < 1e-6);
    }
}
