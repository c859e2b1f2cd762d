//! Fixed particle pool, built once at startup

use crate::error::ConfigError;
use crate::params::SceneConfig;
use glam::Vec3;
use particle_layout::{
    cone_position, dispersed_position, helix_position, is_finite_point, random_range_f32,
    GroupLayout, InstanceColor, LayoutError, Particle, RenderGroup, TargetKind,
};
use rand::Rng;

/// Owns the immutable parameters of every particle, in id order
pub struct ParticleRegistry {
    particles: Vec<Particle>,
    layout: GroupLayout,
}

impl ParticleRegistry {
    /// Sample targets, spin, scale and colour for every particle.
    ///
    /// Any non-finite target is rejected here so the render loop never sees it.
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let layout = config.validate()?;
        let ribbon_count = layout.len(RenderGroup::Ribbon);
        let mut particles = Vec::with_capacity(layout.total());

        for group in RenderGroup::ALL {
            let style = config.style(group);
            let range = layout.range(group);
            let start = range.start;

            for id in range {
                let local_index = id - start;

                let assembled = match group {
                    RenderGroup::Ribbon => {
                        helix_position(&config.layout, local_index as f32 / ribbon_count as f32)
                    }
                    _ => cone_position(&config.layout, rng),
                };
                let dispersed = dispersed_position(&config.layout, rng);

                if !is_finite_point(assembled) {
                    return Err(LayoutError::NonFinitePoint {
                        id,
                        target: TargetKind::Assembled,
                    }
                    .into());
                }
                if !is_finite_point(dispersed) {
                    return Err(LayoutError::NonFinitePoint {
                        id,
                        target: TargetKind::Dispersed,
                    }
                    .into());
                }

                let spin = Vec3::new(
                    random_range_f32(rng, 0.0, config.max_spin),
                    random_range_f32(rng, 0.0, config.max_spin),
                    random_range_f32(rng, 0.0, config.max_spin),
                );
                let base_scale = random_range_f32(rng, style.scale.0, style.scale.1);
                let color = style.palette.pick(rng);

                particles.push(Particle {
                    id,
                    group,
                    local_index,
                    assembled,
                    dispersed,
                    spin,
                    base_scale,
                    color,
                });
            }
        }

        log::info!("✓ Built particle registry: {} particles", particles.len());
        for group in RenderGroup::ALL {
            log::debug!("  {:<10} {:>5} instances", group.name(), layout.len(group));
        }

        Ok(Self { particles, layout })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles of one group, in local-index order
    pub fn group(&self, group: RenderGroup) -> &[Particle] {
        &self.particles[self.layout.range(group)]
    }

    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Linear instance colours of one group, for the one-time upload
    pub fn group_colors(&self, group: RenderGroup) -> Vec<InstanceColor> {
        self.group(group)
            .iter()
            .map(|p| InstanceColor::from(p.color))
            .collect()
    }
}
