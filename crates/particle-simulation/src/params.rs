//! Scene parameters for startup and runtime tuning

use crate::error::ConfigError;
use particle_layout::{
    GroupLayout, LayoutParams, Mode, Palette, RenderGroup, DECOR_CUBE_COUNT, DECOR_ICO_COUNT,
    DECOR_PALETTE, DECOR_SCALE, LEAF_PALETTE, LEAF_SCALE, MAX_PARTICLE_COUNT, MAX_SPIN,
    PARTICLE_COUNT, RIBBON_COUNT, RIBBON_PALETTE, RIBBON_SCALE,
};

/// Sizes of the particle pool and its named groups; leaves take the rest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupSizes {
    pub total: usize,
    pub ribbon: usize,
    pub decor_cube: usize,
    pub decor_ico: usize,
}

impl Default for GroupSizes {
    fn default() -> Self {
        Self {
            total: PARTICLE_COUNT,
            ribbon: RIBBON_COUNT,
            decor_cube: DECOR_CUBE_COUNT,
            decor_ico: DECOR_ICO_COUNT,
        }
    }
}

/// Scale range and palette of one render group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupStyle {
    /// `[min, max)`; `min == max` gives every instance the same scale
    pub scale: (f32, f32),
    pub palette: Palette,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphParams {
    /// Lerp rate (per second) while assembling
    pub assemble_speed: f32,
    /// Lerp rate (per second) while dispersing
    pub disperse_speed: f32,
    /// Angular frequency of the breathing scale
    pub breathe_frequency: f32,
    /// Relative amplitude of the breathing scale
    pub breathe_amplitude: f32,
    /// Auto-spin of every group about Y, radians per second
    pub base_spin: f32,
    /// Gain applied to the gesture rotation drive
    pub drive_gain: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            assemble_speed: 2.5,
            disperse_speed: 1.5,
            breathe_frequency: 2.0,
            breathe_amplitude: 0.1,
            base_spin: 0.1,
            drive_gain: 2.0,
        }
    }
}

impl MorphParams {
    pub fn lerp_speed(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Assembled => self.assemble_speed,
            Mode::Dispersed => self.disperse_speed,
        }
    }

    /// Group rotation rate about Y for the given gesture drive
    pub fn group_spin(&self, rotation_drive: f32) -> f32 {
        self.base_spin + rotation_drive * self.drive_gain
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("assemble_speed", self.assemble_speed),
            ("disperse_speed", self.disperse_speed),
            ("breathe_frequency", self.breathe_frequency),
            ("breathe_amplitude", self.breathe_amplitude),
            ("base_spin", self.base_spin),
            ("drive_gain", self.drive_gain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMorphParam { name, value });
            }
        }
        Ok(())
    }
}

/// Everything needed to build the particle registry and run the engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub layout: LayoutParams,
    pub groups: GroupSizes,
    /// Indexed by `RenderGroup::index()`
    pub styles: [GroupStyle; RenderGroup::COUNT],
    /// Upper bound of each intrinsic spin axis, radians per second
    pub max_spin: f32,
    pub morph: MorphParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            groups: GroupSizes::default(),
            styles: [
                GroupStyle {
                    scale: (RIBBON_SCALE, RIBBON_SCALE),
                    palette: RIBBON_PALETTE,
                },
                GroupStyle {
                    scale: DECOR_SCALE,
                    palette: DECOR_PALETTE,
                },
                GroupStyle {
                    scale: DECOR_SCALE,
                    palette: DECOR_PALETTE,
                },
                GroupStyle {
                    scale: LEAF_SCALE,
                    palette: LEAF_PALETTE,
                },
            ],
            max_spin: MAX_SPIN,
            morph: MorphParams::default(),
        }
    }
}

impl SceneConfig {
    /// Same scene with a different pool size; named groups shrink
    /// proportionally when they would no longer fit.
    pub fn with_particle_count(mut self, total: usize) -> Self {
        let named = self.groups.ribbon + self.groups.decor_cube + self.groups.decor_ico;
        if named > total && named > 0 {
            let scale = |n: usize| n * total / named;
            self.groups.ribbon = scale(self.groups.ribbon);
            self.groups.decor_cube = scale(self.groups.decor_cube);
            self.groups.decor_ico = scale(self.groups.decor_ico);
        }
        self.groups.total = total;
        self
    }

    pub fn style(&self, group: RenderGroup) -> &GroupStyle {
        &self.styles[group.index()]
    }

    /// Check every tunable and return the resulting group partition.
    pub fn validate(&self) -> Result<GroupLayout, ConfigError> {
        self.layout.validate()?;
        self.morph.validate()?;

        if self.groups.total == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.groups.total > MAX_PARTICLE_COUNT {
            return Err(ConfigError::TooManyParticles {
                total: self.groups.total,
                max: MAX_PARTICLE_COUNT,
            });
        }

        if !self.max_spin.is_finite() || self.max_spin < 0.0 {
            return Err(ConfigError::InvalidMorphParam {
                name: "max_spin",
                value: self.max_spin,
            });
        }

        for group in RenderGroup::ALL {
            let style = self.style(group);
            let (min, max) = style.scale;
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || max < min {
                return Err(ConfigError::InvalidScale { group, min, max });
            }
            if style.palette.colors.is_empty() {
                return Err(ConfigError::EmptyPalette { group });
            }
        }

        GroupLayout::new(
            self.groups.total,
            self.groups.ribbon,
            self.groups.decor_cube,
            self.groups.decor_ico,
        )
        .ok_or(ConfigError::GroupsExceedTotal {
            total: self.groups.total,
            ribbon: self.groups.ribbon,
            decor_cube: self.groups.decor_cube,
            decor_ico: self.groups.decor_ico,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_layout::LayoutError;

    #[test]
    fn test_default_config_is_valid() {
        let layout = SceneConfig::default().validate().unwrap();
        assert_eq!(layout.total(), 7500);
        assert_eq!(layout.len(RenderGroup::Leaf), 6300);
    }

    #[test]
    fn test_lerp_speed_is_asymmetric() {
        let morph = MorphParams::default();
        assert_eq!(morph.lerp_speed(Mode::Assembled), 2.5);
        assert_eq!(morph.lerp_speed(Mode::Dispersed), 1.5);
    }

    #[test]
    fn test_group_spin() {
        let morph = MorphParams::default();
        assert!((morph.group_spin(0.0) - 0.1).abs() < 1e-6);
        assert!((morph.group_spin(0.3) - 0.7).abs() < 1e-6);
        assert!((morph.group_spin(-0.3) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_groups_exceeding_total_rejected() {
        let mut config = SceneConfig::default();
        config.groups.total = 1000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GroupsExceedTotal { total: 1000, .. })
        ));
    }

    #[test]
    fn test_particle_count_is_capped() {
        let config = SceneConfig::default().with_particle_count(100_000_000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyParticles {
                total: 100_000_000,
                max: MAX_PARTICLE_COUNT,
            })
        );

        let at_cap = SceneConfig::default().with_particle_count(MAX_PARTICLE_COUNT);
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn test_with_particle_count_shrinks_groups() {
        let config = SceneConfig::default().with_particle_count(600);
        let layout = config.validate().unwrap();
        assert_eq!(layout.total(), 600);
        assert_eq!(layout.len(RenderGroup::Ribbon), 300);
        assert_eq!(layout.len(RenderGroup::DecorCube), 150);
        assert_eq!(layout.len(RenderGroup::DecorIco), 150);
        assert_eq!(layout.len(RenderGroup::Leaf), 0);

        let larger = SceneConfig::default().with_particle_count(10_000);
        assert_eq!(larger.groups.ribbon, RIBBON_COUNT);
        assert_eq!(larger.validate().unwrap().len(RenderGroup::Leaf), 8800);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SceneConfig::default();
        config.groups.total = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyPool));

        let mut config = SceneConfig::default();
        config.styles[RenderGroup::Leaf.index()].scale = (0.2, 0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScale {
                group: RenderGroup::Leaf,
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.morph.assemble_speed = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMorphParam {
                name: "assemble_speed",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.layout.y_max = f32::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Layout(LayoutError::NonFiniteParam { name: "y_max" }))
        );
    }
}
