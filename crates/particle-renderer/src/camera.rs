//! Orbit camera around the scene origin

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::PI;

/// Camera uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
}

/// Camera orbiting a target at fixed distance.
///
/// The orientation is kept as yaw about world Y and a polar angle measured
/// from +Y, so the polar limits can be enforced directly.
pub struct Camera {
    pub distance: f32,
    pub yaw: f32,
    pub polar: f32,
    pub target: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            distance: 12.0,
            yaw: 0.0,
            polar: PI / 2.0,
            target: Vec3::ZERO,
            aspect: width as f32 / height.max(1) as f32,
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
            min_polar: PI / 3.0,
            max_polar: PI / 1.5,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.polar - PI / 2.0)
    }

    pub fn position(&self) -> Vec3 {
        let offset = self.rotation() * Vec3::new(0.0, 0.0, self.distance);
        self.target + offset
    }

    /// Orbit by a drag delta in radians
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw = (self.yaw - delta_x).rem_euclid(std::f32::consts::TAU);
        self.polar = (self.polar - delta_y).clamp(self.min_polar, self.max_polar);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(4.0, 60.0);
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn to_uniform(&self, time: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
            position: self.position().to_array(),
            time,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_looks_at_origin_from_front() {
        let camera = Camera::new(800, 600);
        let p = camera.position();
        assert!((p - Vec3::new(0.0, 0.0, 12.0)).length() < 1e-4);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut camera = Camera::new(800, 600);
        camera.rotate(0.0, 10.0);
        assert!((camera.polar - PI / 3.0).abs() < 1e-6);
        // Looking down from above the equator.
        assert!(camera.position().y > 0.0);

        camera.rotate(0.0, -10.0);
        assert!((camera.polar - PI / 1.5).abs() < 1e-6);
        assert!(camera.position().y < 0.0);
    }

    #[test]
    fn test_distance_preserved_by_orbit() {
        let mut camera = Camera::new(800, 600);
        camera.rotate(1.3, 0.2);
        assert!((camera.position().length() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_origin_projects_to_centre() {
        let camera = Camera::new(1024, 768);
        let clip = camera.build_view_projection_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
