//! Per-frame morph update
//!
//! Every frame each particle closes a fixed fraction of the remaining
//! distance to its current target, advances its own orientation, breathes,
//! and writes one composed transform into its group's buffer. Buffers are
//! preallocated; the loop itself never allocates.

use crate::buffers::{GroupBuffers, InstanceSink};
use crate::params::MorphParams;
use crate::registry::ParticleRegistry;
use crate::topper::StarTopper;
use glam::{EulerRot, Mat4, Quat, Vec3};
use particle_layout::{InstanceTransform, Mode, RenderGroup};
use std::f32::consts::TAU;

/// Inputs sampled by the shell once per display refresh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Seconds since the scene started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub dt: f32,
    pub mode: Mode,
    pub rotation_drive: f32,
}

/// Compose translation, XYZ Euler orientation and uniform scale
#[inline]
pub fn compose_transform(position: Vec3, orientation: Vec3, scale: f32) -> InstanceTransform {
    let rotation = Quat::from_euler(EulerRot::XYZ, orientation.x, orientation.y, orientation.z);
    InstanceTransform::from_mat4(Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        rotation,
        position,
    ))
}

pub struct MorphEngine {
    params: MorphParams,
    positions: Vec<Vec3>,
    orientations: Vec<Vec3>,
    buffers: GroupBuffers,
    topper: StarTopper,
    topper_transform: InstanceTransform,
    frames: u64,
}

impl MorphEngine {
    /// Start every particle on its assembled target with zero orientation.
    pub fn new(registry: &ParticleRegistry, params: MorphParams) -> Self {
        let positions = registry.particles().iter().map(|p| p.assembled).collect();
        let orientations = vec![Vec3::ZERO; registry.len()];

        Self {
            params,
            positions,
            orientations,
            buffers: GroupBuffers::new(registry.layout()),
            topper: StarTopper::default(),
            topper_transform: InstanceTransform::IDENTITY,
            frames: 0,
        }
    }

    pub fn params(&self) -> &MorphParams {
        &self.params
    }

    pub fn set_params(&mut self, params: MorphParams) {
        self.params = params;
    }

    /// Current position of every particle, in id order
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn buffers(&self) -> &GroupBuffers {
        &self.buffers
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one frame and commit every group buffer exactly once.
    pub fn tick(&mut self, registry: &ParticleRegistry, input: FrameInput) {
        // A stalled or rewound clock freezes motion rather than corrupting it.
        let dt = if input.dt.is_finite() { input.dt.max(0.0) } else { 0.0 };
        let factor = (self.params.lerp_speed(input.mode) * dt).clamp(0.0, 1.0);
        let phase = self.params.breathe_frequency * input.elapsed;
        let amplitude = self.params.breathe_amplitude;

        let particles = registry.particles();
        debug_assert_eq!(particles.len(), self.positions.len());

        for ((p, position), orientation) in particles
            .iter()
            .zip(self.positions.iter_mut())
            .zip(self.orientations.iter_mut())
        {
            *position = position.lerp(p.target(input.mode), factor);

            *orientation += p.spin * dt;
            *orientation = Vec3::new(
                orientation.x.rem_euclid(TAU),
                orientation.y.rem_euclid(TAU),
                orientation.z.rem_euclid(TAU),
            );

            // The particle id doubles as a phase offset so neighbours breathe
            // out of step without storing a phase.
            let breathe = (phase + p.id as f32).sin() * amplitude + 1.0;

            self.buffers.write(
                p.group,
                p.local_index,
                compose_transform(*position, *orientation, p.base_scale * breathe),
            );
        }

        let drive = if input.rotation_drive.is_finite() {
            input.rotation_drive
        } else {
            0.0
        };
        let spin = dt * self.params.group_spin(drive);
        let spin = if spin.is_finite() { spin } else { 0.0 };
        for group in RenderGroup::ALL {
            self.buffers.rotate(group, spin);
            self.buffers.commit(group);
        }

        self.topper_transform = self.topper.update(input.elapsed, dt, input.mode);
        self.frames += 1;

        log::trace!(
            "frame {}: mode={:?} factor={:.4} spin={:.4}",
            self.frames,
            input.mode,
            factor,
            spin
        );
    }

    /// Push committed groups and the topper to the sink.
    pub fn flush<S: InstanceSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let uploaded = self.buffers.flush(sink);
        sink.upload_topper(&self.topper_transform);
        uploaded
    }
}
