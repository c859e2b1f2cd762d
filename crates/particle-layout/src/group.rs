//! Render group routing
//!
//! The particle index space `[0, total)` is split into four contiguous
//! ranges, in this order: ribbon, cube ornaments, icosahedron ornaments,
//! leaves. Each range is drawn by its own instanced buffer, so a particle id
//! maps to `(group, local index)` with two subtractions at most.

use std::ops::Range;

/// Geometry class of a render group
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderGroup {
    Ribbon = 0,
    DecorCube = 1,
    DecorIco = 2,
    Leaf = 3,
}

impl RenderGroup {
    pub const ALL: [RenderGroup; 4] = [
        RenderGroup::Ribbon,
        RenderGroup::DecorCube,
        RenderGroup::DecorIco,
        RenderGroup::Leaf,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderGroup::Ribbon => "ribbon",
            RenderGroup::DecorCube => "decor-cube",
            RenderGroup::DecorIco => "decor-ico",
            RenderGroup::Leaf => "leaf",
        }
    }
}

/// Fixed boundaries of the four render groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayout {
    ribbon_end: usize,
    cube_end: usize,
    ico_end: usize,
    total: usize,
}

impl GroupLayout {
    /// Build from explicit sizes; the leaf group takes whatever is left.
    ///
    /// Returns `None` when the named groups do not fit into `total`.
    pub fn new(total: usize, ribbon: usize, decor_cube: usize, decor_ico: usize) -> Option<Self> {
        let ribbon_end = ribbon;
        let cube_end = ribbon_end.checked_add(decor_cube)?;
        let ico_end = cube_end.checked_add(decor_ico)?;
        if ico_end > total {
            return None;
        }

        Some(Self {
            ribbon_end,
            cube_end,
            ico_end,
            total,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Map a particle id to its group and index within that group.
    ///
    /// Boundaries are checked in ascending order; ids at or past `total`
    /// belong to no group.
    #[inline]
    pub fn group_of(&self, id: usize) -> Option<(RenderGroup, usize)> {
        if id < self.ribbon_end {
            Some((RenderGroup::Ribbon, id))
        } else if id < self.cube_end {
            Some((RenderGroup::DecorCube, id - self.ribbon_end))
        } else if id < self.ico_end {
            Some((RenderGroup::DecorIco, id - self.cube_end))
        } else if id < self.total {
            Some((RenderGroup::Leaf, id - self.ico_end))
        } else {
            None
        }
    }

    /// Global id range owned by `group`
    pub fn range(&self, group: RenderGroup) -> Range<usize> {
        match group {
            RenderGroup::Ribbon => 0..self.ribbon_end,
            RenderGroup::DecorCube => self.ribbon_end..self.cube_end,
            RenderGroup::DecorIco => self.cube_end..self.ico_end,
            RenderGroup::Leaf => self.ico_end..self.total,
        }
    }

    pub fn len(&self, group: RenderGroup) -> usize {
        self.range(group).len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
