//! Per-group instance output and the render sink it is flushed into
//!
//! The engine writes transforms by `(group, local index)` into buffers that
//! are allocated once. A group is committed at most once per frame, and only
//! committed groups are handed to the sink on `flush`.

use crate::registry::ParticleRegistry;
use particle_layout::{GroupLayout, InstanceColor, InstanceTransform, RenderGroup};

/// Consumer of instance data, typically the GPU renderer
pub trait InstanceSink {
    /// Called once per group at startup
    fn upload_colors(&mut self, group: RenderGroup, colors: &[InstanceColor]);

    /// Called at most once per group per frame
    fn upload_transforms(
        &mut self,
        group: RenderGroup,
        group_rotation_y: f32,
        transforms: &[InstanceTransform],
    );

    /// Single ornament above the cone apex
    fn upload_topper(&mut self, transform: &InstanceTransform);
}

struct GroupBuffer {
    transforms: Vec<InstanceTransform>,
    rotation_y: f32,
    dirty: bool,
    commits: u64,
}

pub struct GroupBuffers {
    groups: [GroupBuffer; RenderGroup::COUNT],
}

impl GroupBuffers {
    /// One buffer per group, sized exactly to the group's particle count
    pub fn new(layout: &GroupLayout) -> Self {
        Self {
            groups: RenderGroup::ALL.map(|group| GroupBuffer {
                transforms: vec![InstanceTransform::IDENTITY; layout.len(group)],
                rotation_y: 0.0,
                dirty: false,
                commits: 0,
            }),
        }
    }

    #[inline]
    pub fn write(&mut self, group: RenderGroup, local_index: usize, transform: InstanceTransform) {
        self.groups[group.index()].transforms[local_index] = transform;
    }

    /// Spin the whole group about the vertical axis
    pub fn rotate(&mut self, group: RenderGroup, delta: f32) {
        let buffer = &mut self.groups[group.index()];
        buffer.rotation_y = (buffer.rotation_y + delta).rem_euclid(std::f32::consts::TAU);
    }

    /// Mark the group's contents as ready for upload
    pub fn commit(&mut self, group: RenderGroup) {
        let buffer = &mut self.groups[group.index()];
        buffer.dirty = true;
        buffer.commits += 1;
    }

    /// Hand every committed group to the sink and clear its dirty flag.
    ///
    /// Returns the number of groups uploaded.
    pub fn flush<S: InstanceSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut uploaded = 0;
        for group in RenderGroup::ALL {
            let buffer = &mut self.groups[group.index()];
            if !buffer.dirty {
                continue;
            }
            sink.upload_transforms(group, buffer.rotation_y, &buffer.transforms);
            buffer.dirty = false;
            uploaded += 1;
        }
        uploaded
    }

    pub fn transforms(&self, group: RenderGroup) -> &[InstanceTransform] {
        &self.groups[group.index()].transforms
    }

    pub fn rotation(&self, group: RenderGroup) -> f32 {
        self.groups[group.index()].rotation_y
    }

    pub fn is_dirty(&self, group: RenderGroup) -> bool {
        self.groups[group.index()].dirty
    }

    /// Total commits since creation
    pub fn commit_count(&self, group: RenderGroup) -> u64 {
        self.groups[group.index()].commits
    }
}

/// Upload every group's colours once
pub fn upload_colors<S: InstanceSink + ?Sized>(registry: &ParticleRegistry, sink: &mut S) {
    for group in RenderGroup::ALL {
        sink.upload_colors(group, &registry.group_colors(group));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    /// Sink that records what it was given
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub colors: Vec<(RenderGroup, usize)>,
        pub transforms: Vec<(RenderGroup, f32, usize)>,
        pub toppers: Vec<InstanceTransform>,
    }

    impl InstanceSink for RecordingSink {
        fn upload_colors(&mut self, group: RenderGroup, colors: &[InstanceColor]) {
            self.colors.push((group, colors.len()));
        }

        fn upload_transforms(
            &mut self,
            group: RenderGroup,
            group_rotation_y: f32,
            transforms: &[InstanceTransform],
        ) {
            self.transforms
                .push((group, group_rotation_y, transforms.len()));
        }

        fn upload_topper(&mut self, transform: &InstanceTransform) {
            self.toppers.push(*transform);
        }
    }

    fn small_layout() -> GroupLayout {
        GroupLayout::new(20, 4, 3, 2).unwrap()
    }

    #[test]
    fn test_buffers_sized_per_group() {
        let buffers = GroupBuffers::new(&small_layout());
        assert_eq!(buffers.transforms(RenderGroup::Ribbon).len(), 4);
        assert_eq!(buffers.transforms(RenderGroup::DecorCube).len(), 3);
        assert_eq!(buffers.transforms(RenderGroup::DecorIco).len(), 2);
        assert_eq!(buffers.transforms(RenderGroup::Leaf).len(), 11);
    }

    #[test]
    fn test_flush_uploads_only_committed_groups() {
        let mut buffers = GroupBuffers::new(&small_layout());
        let mut sink = RecordingSink::default();

        assert_eq!(buffers.flush(&mut sink), 0);

        buffers.commit(RenderGroup::Leaf);
        assert!(buffers.is_dirty(RenderGroup::Leaf));
        assert_eq!(buffers.flush(&mut sink), 1);
        assert_eq!(sink.transforms, vec![(RenderGroup::Leaf, 0.0, 11)]);
        assert!(!buffers.is_dirty(RenderGroup::Leaf));

        // Nothing new committed, nothing uploaded.
        assert_eq!(buffers.flush(&mut sink), 0);
    }

    #[test]
    fn test_write_is_index_addressed() {
        let mut buffers = GroupBuffers::new(&small_layout());
        let t = InstanceTransform::from_mat4(Mat4::from_translation(Vec3::X));
        buffers.write(RenderGroup::DecorIco, 1, t);

        assert_eq!(buffers.transforms(RenderGroup::DecorIco)[1], t);
        assert_eq!(
            buffers.transforms(RenderGroup::DecorIco)[0],
            InstanceTransform::IDENTITY
        );
    }

    #[test]
    fn test_rotation_wraps() {
        let mut buffers = GroupBuffers::new(&small_layout());
        buffers.rotate(RenderGroup::Ribbon, 7.0);
        let r = buffers.rotation(RenderGroup::Ribbon);
        assert!((r - (7.0 - std::f32::consts::TAU)).abs() < 1e-5);

        buffers.rotate(RenderGroup::Ribbon, -1.0);
        assert!(buffers.rotation(RenderGroup::Ribbon) >= 0.0);
    }
}
