//! Latest gesture reading, shared between the tracker thread and the render
//! loop without locks.
//!
//! Each field is an independent atomic. A reader may observe a mode from one
//! frame next to a drive from the next; both are sampled again every frame so
//! the mismatch never persists.

use crate::interpreter::GestureReading;
use glam::Vec2;
use particle_layout::Mode;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

fn decode_mode(raw: u8) -> Mode {
    Mode::from_u8(raw).unwrap_or_default()
}

/// Plain copy of [`GestureState`] at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSnapshot {
    pub hand_present: bool,
    pub mode: Mode,
    pub rotation_drive: f32,
    pub cursor: Option<Vec2>,
    pub frames: u64,
}

pub struct GestureState {
    hand_present: AtomicBool,
    mode: AtomicU8,
    /// `f32` bit pattern
    rotation_drive: AtomicU32,
    /// Packed `(x, y)` `f32` bit patterns, valid only while a hand is present
    cursor: AtomicU64,
    frames: AtomicU64,
}

impl GestureState {
    pub fn new(initial: Mode) -> Self {
        Self {
            hand_present: AtomicBool::new(false),
            mode: AtomicU8::new(initial as u8),
            rotation_drive: AtomicU32::new(0.0f32.to_bits()),
            cursor: AtomicU64::new(0),
            frames: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> Mode {
        decode_mode(self.mode.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Flip the mode from the UI. Returns the new mode.
    pub fn toggle_mode(&self) -> Mode {
        let previous = self
            .mode
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(decode_mode(raw).toggled() as u8)
            })
            .unwrap_or_else(|raw| raw);
        decode_mode(previous).toggled()
    }

    pub fn rotation_drive(&self) -> f32 {
        f32::from_bits(self.rotation_drive.load(Ordering::Acquire))
    }

    pub fn hand_present(&self) -> bool {
        self.hand_present.load(Ordering::Acquire)
    }

    pub fn cursor(&self) -> Option<Vec2> {
        if !self.hand_present() {
            return None;
        }
        let bits = self.cursor.load(Ordering::Acquire);
        Some(Vec2::new(
            f32::from_bits((bits >> 32) as u32),
            f32::from_bits(bits as u32),
        ))
    }

    /// Frames published since creation
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Store one interpreted frame. The mode is only written when a hand was
    /// seen, so a lost hand leaves the last decision in place.
    pub fn publish(&self, reading: &GestureReading) {
        if reading.hand_present {
            self.set_mode(reading.mode);
        }
        if let Some(cursor) = reading.cursor {
            let bits = ((cursor.x.to_bits() as u64) << 32) | cursor.y.to_bits() as u64;
            self.cursor.store(bits, Ordering::Release);
        }
        self.rotation_drive
            .store(reading.rotation_drive.to_bits(), Ordering::Release);
        self.hand_present
            .store(reading.hand_present, Ordering::Release);
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Forget the hand without touching the mode
    pub fn clear_hand(&self) {
        self.rotation_drive
            .store(0.0f32.to_bits(), Ordering::Release);
        self.hand_present.store(false, Ordering::Release);
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            hand_present: self.hand_present(),
            mode: self.mode(),
            rotation_drive: self.rotation_drive(),
            cursor: self.cursor(),
            frames: self.frames(),
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new(Mode::Assembled)
    }
}
