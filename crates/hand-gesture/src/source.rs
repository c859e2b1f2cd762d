//! Landmark sources
//!
//! A source is polled from the tracker thread. It either hands over a raw
//! frame, reports that nothing arrived within its poll interval, or reports
//! that the stream has ended for good.

use crate::error::DetectorError;
use crate::landmarks::{Landmark, RawFrame, HAND_LANDMARK_COUNT};
use glam::Vec2;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub enum SourcePoll {
    Frame(RawFrame),
    /// Nothing new within the poll interval
    Idle,
    /// The stream is finished; polling again is pointless
    Closed,
}

pub trait LandmarkSource {
    /// Block for at most one poll interval.
    fn poll(&mut self) -> Result<SourcePoll, DetectorError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn poll(&mut self) -> Result<SourcePoll, DetectorError> {
        (**self).poll()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JSON lines
// ────────────────────────────────────────────────────────────────────────────

/// Reads one JSON object per line from an external detector process.
///
/// ```text
/// {"timestamp_ms": 1520.0, "landmarks": [{"x": 0.41, "y": 0.63, "z": -0.02}, ...]}
/// {"timestamp_ms": 1553.3, "landmarks": null}
/// ```
///
/// Lines are read on a dedicated thread. A reader blocked on stdin cannot be
/// interrupted, so that thread is detached. Once the source is dropped the
/// thread exits and drops its reader as soon as the next line or end of
/// input arrives.
pub struct JsonLinesSource {
    rx: Receiver<Result<RawFrame, DetectorError>>,
    poll_interval: Duration,
}

impl JsonLinesSource {
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_lines(reader, tx));
        Self { rx, poll_interval }
    }

    pub fn stdin(poll_interval: Duration) -> Self {
        Self::spawn(std::io::BufReader::new(std::io::stdin()), poll_interval)
    }
}

fn read_lines<R: BufRead>(reader: R, tx: Sender<Result<RawFrame, DetectorError>>) {
    for line in reader.lines() {
        let item = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => serde_json::from_str::<RawFrame>(&line).map_err(DetectorError::from),
            Err(e) => {
                let _ = tx.send(Err(e.into()));
                return;
            }
        };
        if tx.send(item).is_err() {
            return;
        }
    }
    log::debug!("landmark stream reached end of input");
}

impl LandmarkSource for JsonLinesSource {
    fn poll(&mut self) -> Result<SourcePoll, DetectorError> {
        match self.rx.recv_timeout(self.poll_interval) {
            Ok(item) => item.map(SourcePoll::Frame),
            Err(RecvTimeoutError::Timeout) => Ok(SourcePoll::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(SourcePoll::Closed),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated hand
// ────────────────────────────────────────────────────────────────────────────

/// Input from the window that steers the simulated hand
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position in normalized, mirrored screen space
    Cursor { x: f32, y: f32 },
    Pinch(bool),
    HandVisible(bool),
}

/// Thumb tip offset from the index tip while the hand is open
const OPEN_THUMB_OFFSET: Vec2 = Vec2::new(0.18, 0.18);
/// ... and while pinched
const PINCHED_THUMB_OFFSET: Vec2 = Vec2::new(0.02, 0.02);
const WRIST_OFFSET: Vec2 = Vec2::new(0.0, 0.3);

/// Default frame interval, roughly a webcam's 30 Hz
pub const SIM_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Landmark source that synthesizes a hand from pointer input, so the
/// gesture path can be exercised without a camera.
pub struct SimulatedHand {
    rx: Receiver<SimInput>,
    interval: Duration,
    started: Instant,
    last_emit: Instant,
    cursor: Vec2,
    pinched: bool,
    visible: bool,
}

impl SimulatedHand {
    /// Returns the input sender for the window and the source for the tracker.
    ///
    /// The hand starts hidden so manual mode toggles hold until it is shown.
    pub fn channel(interval: Duration) -> (Sender<SimInput>, Self) {
        let (tx, rx) = mpsc::channel();
        let now = Instant::now();
        let source = Self {
            rx,
            interval,
            started: now,
            last_emit: now,
            cursor: Vec2::splat(0.5),
            pinched: false,
            visible: false,
        };
        (tx, source)
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Cursor { x, y } if x.is_finite() && y.is_finite() => {
                self.cursor = Vec2::new(x, y).clamp(Vec2::ZERO, Vec2::ONE);
            }
            SimInput::Cursor { .. } => {}
            SimInput::Pinch(pinched) => self.pinched = pinched,
            SimInput::HandVisible(visible) => self.visible = visible,
        }
    }

    fn frame(&self) -> RawFrame {
        let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        if !self.visible {
            return RawFrame::no_hand(timestamp_ms);
        }
        RawFrame::hand(timestamp_ms, synthesize_hand(self.cursor, self.pinched))
    }
}

/// 21 landmarks whose index tip lands under `cursor` once mirrored.
///
/// Each finger is four joints spaced evenly from the wrist to its tip.
pub fn synthesize_hand(cursor: Vec2, pinched: bool) -> Vec<Landmark> {
    let index = Vec2::new(1.0 - cursor.x, cursor.y);
    let wrist = index + WRIST_OFFSET;
    let thumb_offset = if pinched {
        PINCHED_THUMB_OFFSET
    } else {
        OPEN_THUMB_OFFSET
    };

    let tips = [
        index + thumb_offset,
        index,
        index + Vec2::new(-0.05, 0.02),
        index + Vec2::new(-0.10, 0.04),
        index + Vec2::new(-0.15, 0.07),
    ];

    let mut points = Vec::with_capacity(HAND_LANDMARK_COUNT);
    points.push(Landmark::new(wrist.x, wrist.y, 0.0));
    for tip in tips {
        for joint in 1..=4 {
            let p = wrist.lerp(tip, joint as f32 / 4.0);
            points.push(Landmark::new(p.x, p.y, 0.0));
        }
    }
    points
}

impl LandmarkSource for SimulatedHand {
    fn poll(&mut self) -> Result<SourcePoll, DetectorError> {
        let deadline = self.last_emit + self.interval;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(input) => self.apply(input),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(SourcePoll::Closed),
            }
        }

        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(SourcePoll::Closed),
            }
        }

        self.last_emit = Instant::now();
        Ok(SourcePoll::Frame(self.frame()))
    }
}
