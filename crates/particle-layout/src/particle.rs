//! Particle records and GPU instance layouts

use crate::group::RenderGroup;
use crate::palette::Color;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Target configuration the ensemble morphs toward
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Cone body wrapped by the ribbon
    #[default]
    Assembled = 0,
    /// Spherical cloud around the scene
    Dispersed = 1,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Assembled => Mode::Dispersed,
            Mode::Dispersed => Mode::Assembled,
        }
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Mode::Assembled),
            1 => Some(Mode::Dispersed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Assembled => "ASSEMBLED",
            Mode::Dispersed => "DISPERSED",
        }
    }
}

/// Immutable per-particle parameters, computed once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Dense index in `[0, N)`; identity is purely positional
    pub id: usize,
    pub group: RenderGroup,
    /// Slot inside the group's instance buffer
    pub local_index: usize,
    pub assembled: Vec3,
    pub dispersed: Vec3,
    /// Intrinsic rotation, radians per second per axis
    pub spin: Vec3,
    pub base_scale: f32,
    pub color: Color,
}

impl Particle {
    #[inline]
    pub fn target(&self, mode: Mode) -> Vec3 {
        match mode {
            Mode::Assembled => self.assembled,
            Mode::Dispersed => self.dispersed,
        }
    }
}

/// Per-instance model matrix, column major (matches WGSL `mat4x4<f32>`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub const IDENTITY: Self = Self {
        model: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_mat4(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// Per-instance linear RGBA colour, uploaded once
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct InstanceColor {
    pub rgba: [f32; 4],
}

impl From<Color> for InstanceColor {
    fn from(color: Color) -> Self {
        Self {
            rgba: color.to_linear_rgba(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::default(), Mode::Assembled);
        assert_eq!(Mode::Assembled.toggled(), Mode::Dispersed);
        assert_eq!(Mode::Assembled.toggled().toggled(), Mode::Assembled);
    }

    #[test]
    fn test_mode_from_u8() {
        assert_eq!(Mode::from_u8(Mode::Dispersed as u8), Some(Mode::Dispersed));
        assert_eq!(Mode::from_u8(7), None);
    }

    #[test]
    fn test_instance_layout_sizes() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 64);
        assert_eq!(std::mem::size_of::<InstanceColor>(), 16);
    }

    #[test]
    fn test_transform_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let t = InstanceTransform::from_mat4(m);
        assert_eq!(t.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.to_mat4(), m);
    }
}
