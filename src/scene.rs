//! Simulation side of the app: particle pool, morph engine and gesture input

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hand_gesture::{
    GestureInterpreter, GestureParams, GestureSnapshot, GestureState, GestureTracker,
    JsonLinesSource, SimInput, SimulatedHand, SIM_FRAME_INTERVAL,
};
use particle_layout::{GroupLayout, Mode, PARTICLE_COUNT};
use particle_simulation::{
    upload_colors, FrameInput, InstanceSink, MorphEngine, ParticleRegistry, SceneConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Poll interval for the stdin landmark stream
const STDIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Longest frame step fed to the engine
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LandmarkInput {
    /// Synthesize a hand from the mouse cursor
    Sim,
    /// Read JSON-lines frames from stdin
    Stdin,
    /// No gesture tracking; mode changes only via click / Space
    None,
}

impl LandmarkInput {
    pub fn label(self) -> &'static str {
        match self {
            LandmarkInput::Sim => "simulated",
            LandmarkInput::Stdin => "stdin",
            LandmarkInput::None => "off",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "morph-tree")]
#[command(about = "Gesture-driven particle tree", long_about = None)]
#[command(version)]
pub struct Args {
    /// Total particle count
    #[arg(long, default_value_t = PARTICLE_COUNT)]
    pub particles: usize,

    /// Seed for the procedural layout (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where hand landmarks come from
    #[arg(long, value_enum, default_value_t = LandmarkInput::Sim)]
    pub landmarks: LandmarkInput,

    /// Thumb-index distance below which the tree assembles
    #[arg(long, default_value_t = 0.18)]
    pub pinch_threshold: f32,

    /// Rotation drive per unit of wrist offset
    #[arg(long, default_value_t = 1.5)]
    pub sensitivity: f32,

    /// Pinch distance that releases an assembled tree (enables hysteresis)
    #[arg(long)]
    pub hysteresis: Option<f32>,
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig::default().with_particle_count(self.particles)
    }

    pub fn gesture_params(&self) -> GestureParams {
        GestureParams {
            pinch_threshold: self.pinch_threshold,
            sensitivity: self.sensitivity,
            release_threshold: self.hysteresis,
        }
    }
}

pub struct Scene {
    registry: ParticleRegistry,
    engine: MorphEngine,
    gesture: Arc<GestureState>,
    tracker: Option<GestureTracker>,
    sim_input: Option<Sender<SimInput>>,
    source: LandmarkInput,
    started: Instant,
    last_tick: Instant,
    hand_visible: bool,
}

impl Scene {
    pub fn new(args: &Args) -> Result<Self> {
        let config = args.scene_config();
        let seed = args.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let registry =
            ParticleRegistry::build(&config, &mut rng).context("Invalid scene configuration")?;
        log::info!("✓ Layout seed: {seed}");

        let engine = MorphEngine::new(&registry, config.morph);
        let gesture = Arc::new(GestureState::new(Mode::Assembled));
        let interpreter = GestureInterpreter::new(args.gesture_params())
            .context("Invalid gesture parameters")?;

        let (tracker, sim_input) = match args.landmarks {
            LandmarkInput::Sim => {
                let (tx, source) = SimulatedHand::channel(SIM_FRAME_INTERVAL);
                let tracker =
                    GestureTracker::spawn(move || Ok(source), interpreter, Arc::clone(&gesture))
                        .context("Failed to start gesture tracker")?;
                log::info!("Simulated hand hidden; press H to show it");
                (Some(tracker), Some(tx))
            }
            LandmarkInput::Stdin => {
                let tracker = GestureTracker::spawn(
                    || Ok(JsonLinesSource::stdin(STDIN_POLL_INTERVAL)),
                    interpreter,
                    Arc::clone(&gesture),
                )
                .context("Failed to start gesture tracker")?;
                (Some(tracker), None)
            }
            LandmarkInput::None => (None, None),
        };
        log::info!("✓ Landmark input: {}", args.landmarks.label());

        let now = Instant::now();
        Ok(Self {
            registry,
            engine,
            gesture,
            tracker,
            sim_input,
            source: args.landmarks,
            started: now,
            last_tick: now,
            hand_visible: false,
        })
    }

    pub fn particle_count(&self) -> usize {
        self.registry.len()
    }

    pub fn layout(&self) -> &GroupLayout {
        self.registry.layout()
    }

    pub fn source(&self) -> LandmarkInput {
        self.source
    }

    pub fn gesture(&self) -> GestureSnapshot {
        self.gesture.snapshot()
    }

    pub fn toggle_mode(&self) {
        let mode = self.gesture.toggle_mode();
        log::info!("Mode toggled: {}", mode.label());
    }

    /// Push per-instance colours once the renderer exists
    pub fn upload_colors<S: InstanceSink + ?Sized>(&self, sink: &mut S) {
        upload_colors(&self.registry, sink);
    }

    /// Advance the engine by the wall-clock time since the last call.
    pub fn advance(&mut self) -> FrameInput {
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_DT);
        self.last_tick = now;

        let input = FrameInput {
            elapsed: now.duration_since(self.started).as_secs_f32(),
            dt,
            mode: self.gesture.mode(),
            rotation_drive: self.gesture.rotation_drive(),
        };
        self.engine.tick(&self.registry, input);
        input
    }

    pub fn flush<S: InstanceSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        self.engine.flush(sink)
    }

    // Simulated-hand controls. Without a simulated source these are no-ops.

    pub fn sim_cursor(&self, x: f32, y: f32) {
        self.send_sim(SimInput::Cursor { x, y });
    }

    pub fn sim_pinch(&self, pinched: bool) {
        self.send_sim(SimInput::Pinch(pinched));
    }

    pub fn sim_toggle_hand(&mut self) {
        if self.sim_input.is_none() {
            return;
        }
        self.hand_visible = !self.hand_visible;
        log::info!(
            "Simulated hand {}",
            if self.hand_visible { "shown" } else { "hidden" }
        );
        self.send_sim(SimInput::HandVisible(self.hand_visible));
    }

    fn send_sim(&self, input: SimInput) {
        if let Some(tx) = &self.sim_input {
            if tx.send(input).is_err() {
                log::debug!("Simulated hand is no longer listening");
            }
        }
    }

    /// Stop gesture tracking and release its source
    pub fn shutdown(&mut self) {
        self.sim_input = None;
        if let Some(mut tracker) = self.tracker.take() {
            tracker.stop();
            log::info!("✓ Gesture tracking stopped");
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["morph-tree"]).unwrap();
        assert_eq!(args.particles, 7500);
        assert_eq!(args.landmarks, LandmarkInput::Sim);
        assert_eq!(args.gesture_params(), GestureParams::default());
    }

    #[test]
    fn test_args_override_params() {
        let args = Args::try_parse_from([
            "morph-tree",
            "--particles",
            "2000",
            "--landmarks",
            "none",
            "--pinch-threshold",
            "0.1",
            "--hysteresis",
            "0.2",
            "--seed",
            "7",
        ])
        .unwrap();

        assert_eq!(args.scene_config().groups.total, 2000);
        assert_eq!(args.gesture_params().pinch_threshold, 0.1);
        assert_eq!(args.gesture_params().release_threshold, Some(0.2));
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn test_scene_without_tracking_toggles_and_advances() {
        let args =
            Args::try_parse_from(["morph-tree", "--particles", "800", "--landmarks", "none", "--seed", "1"])
                .unwrap();
        let mut scene = Scene::new(&args).unwrap();
        assert_eq!(scene.particle_count(), 800);
        assert_eq!(scene.gesture().mode, Mode::Assembled);

        scene.toggle_mode();
        let input = scene.advance();
        assert_eq!(input.mode, Mode::Dispersed);
        assert_eq!(input.rotation_drive, 0.0);
        assert!(input.dt >= 0.0 && input.dt <= MAX_FRAME_DT);

        // No simulated source: these must be harmless.
        scene.sim_cursor(0.2, 0.2);
        scene.sim_toggle_hand();
    }

    #[test]
    fn test_zero_particles_is_rejected() {
        let args = Args::try_parse_from(["morph-tree", "--particles", "0", "--landmarks", "none"])
            .unwrap();
        assert!(Scene::new(&args).is_err());

        let args = Args::try_parse_from([
            "morph-tree",
            "--particles",
            "100000000",
            "--landmarks",
            "none",
        ])
        .unwrap();
        assert!(Scene::new(&args).is_err());
    }

    #[test]
    fn test_non_finite_gesture_params_are_rejected() {
        for flag in [
            ["--sensitivity", "NaN"],
            ["--pinch-threshold", "NaN"],
            ["--hysteresis", "inf"],
        ] {
            let args = Args::try_parse_from(
                ["morph-tree", "--particles", "800", "--landmarks", "none"]
                    .into_iter()
                    .chain(flag),
            )
            .unwrap();
            assert!(Scene::new(&args).is_err(), "{flag:?}");
        }
    }

    #[test]
    fn test_toggle_survives_default_simulated_hand() {
        let args = Args::try_parse_from(["morph-tree", "--particles", "800", "--seed", "3"])
            .unwrap();
        assert_eq!(args.landmarks, LandmarkInput::Sim);
        let mut scene = Scene::new(&args).unwrap();

        std::thread::sleep(SIM_FRAME_INTERVAL * 4);
        assert_eq!(scene.gesture().mode, Mode::Assembled);
        assert!(!scene.gesture().hand_present);

        scene.toggle_mode();
        std::thread::sleep(SIM_FRAME_INTERVAL * 4);
        assert_eq!(scene.gesture().mode, Mode::Dispersed);

        // Showing the open simulated hand hands control back to gestures.
        scene.toggle_mode();
        scene.sim_toggle_hand();
        let deadline = Instant::now() + Duration::from_secs(2);
        while !scene.gesture().hand_present && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(scene.gesture().hand_present);
        assert_eq!(scene.gesture().mode, Mode::Dispersed);
    }
}
