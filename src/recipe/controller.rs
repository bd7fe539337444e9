use glam::Vec2;
use tracing::{debug, info, warn};

use crate::scene::camera::Camera;
use crate::scene::graph::{NodeId, SceneGraph};
use crate::scene::material::MaterialStore;

use super::animation::{AnimationPlayer, PlaybackMode};
use super::camera_finder::{self, InteractionSource};
use super::highlight::HighlightSet;
use super::hit_test::{self, HitTestConfig};
use super::mesh_index::MeshIndex;
use super::sequencer::{Sequencer, TapOutcome, Transition};
use super::steps::{StepList, frames_to_seconds};

pub const DEFAULT_CLIP_NAME: &str = "Layer0";
pub const DEFAULT_CAMERA_NODE_NAME: &str = "Camera Object";
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// The controller's configuration surface. Fixed for the session.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Name of the animation clip whose sub-ranges the steps play.
    pub clip_name: String,
    /// Frame rate used to convert step frames to seconds.
    pub frame_rate: f32,
    /// Explicitly assigned camera node, first in the resolver chain.
    pub camera: Option<NodeId>,
    /// Node name probed when no camera is assigned.
    pub camera_node_name: String,
    pub hit_test: HitTestConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            clip_name: DEFAULT_CLIP_NAME.to_string(),
            frame_rate: DEFAULT_FRAME_RATE,
            camera: None,
            camera_node_name: DEFAULT_CAMERA_NODE_NAME.to_string(),
            hit_test: HitTestConfig::default(),
        }
    }
}

/// Fatal configuration problems. The controller refuses to start; nothing is
/// half-initialized.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("animation clip '{0}' not found")]
    ClipNotFound(String),
    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(f32),
}

/// Tap-to-advance interaction controller.
///
/// Owns the scene collaborators and drives the mesh index, hit tester,
/// sequencer and highlight set from two entry points: `handle_tap` for tap
/// events and `update` once per host frame.
pub struct TapToAdvance {
    graph: SceneGraph,
    materials: MaterialStore,
    player: Box<dyn AnimationPlayer>,
    interaction: Option<Box<dyn InteractionSource>>,
    config: ControllerConfig,
    index: MeshIndex,
    sequencer: Sequencer,
    highlights: HighlightSet,
    cached_camera: Option<NodeId>,
}

impl TapToAdvance {
    pub fn new(
        graph: SceneGraph,
        materials: MaterialStore,
        mut player: Box<dyn AnimationPlayer>,
        interaction: Option<Box<dyn InteractionSource>>,
        steps: StepList,
        config: ControllerConfig,
    ) -> Result<Self, ControllerError> {
        if !(config.frame_rate > 0.0) {
            return Err(ControllerError::InvalidFrameRate(config.frame_rate));
        }

        // Prime the whole clip before any step narrows it down.
        match player.clip_mut(&config.clip_name) {
            Some(clip) => {
                clip.begin = 0.0;
                clip.end = frames_to_seconds(steps.last_frame(), config.frame_rate);
                clip.playback_mode = PlaybackMode::Once;
            }
            None => return Err(ControllerError::ClipNotFound(config.clip_name)),
        }

        let index = MeshIndex::build(&graph, graph.root(), &steps.all_mesh_names());
        info!("Indexed {} mesh name(s)", index.len());
        for (mesh_name, nodes) in index.iter() {
            debug!("  mesh '{}': {} node(s)", mesh_name, nodes.len());
        }

        let cached_camera = match camera_finder::resolve_camera(
            &graph,
            config.camera,
            interaction.as_deref(),
            &config.camera_node_name,
        ) {
            Some((id, source)) => {
                info!(?source, "Camera resolved for tap detection");
                Some(id)
            }
            None => {
                warn!("No camera found in scene, taps will not resolve");
                None
            }
        };

        let mut controller = Self {
            graph,
            materials,
            player,
            interaction,
            sequencer: Sequencer::new(steps, config.frame_rate),
            config,
            index,
            highlights: HighlightSet::default(),
            cached_camera,
        };

        controller.refresh_highlights();
        if let Some(step) = controller.sequencer.current_step() {
            info!("Waiting for step {}: {}", step.index, step.description);
        }

        Ok(controller)
    }

    /// Feed one tap at normalized screen coordinates through hit testing and
    /// the sequencer. Rejections leave all state untouched.
    pub fn handle_tap(&mut self, tap: Vec2) -> TapOutcome {
        if self.sequencer.is_playing() {
            info!("Animation is already playing, ignoring tap");
            return TapOutcome::AlreadyPlaying;
        }
        if self.sequencer.is_completed() {
            info!("All steps completed, ignoring tap");
            return TapOutcome::AllStepsCompleted;
        }

        let tapped = self.detect_tapped_mesh(tap);
        if let Some(mesh) = &tapped {
            debug!("Tapped mesh: {mesh}");
        }

        let outcome = self
            .sequencer
            .handle_tap(tapped.as_deref(), self.player.as_mut(), &self.config.clip_name);

        match &outcome {
            TapOutcome::Advanced { step } => {
                // The tapped mesh stops glowing right away; the rest of the
                // set follows when playback ends.
                if let Some(mesh) = &tapped {
                    self.highlights
                        .remove_mesh(mesh, &self.index, &mut self.materials);
                }
                info!(step, "Step triggered");
            }
            TapOutcome::NoMeshDetected => {
                info!("No target mesh detected at tap location");
            }
            TapOutcome::WrongMesh { tapped, expected } => {
                info!(
                    "Wrong mesh '{}', expected one of: {}",
                    tapped,
                    expected.join(", ")
                );
            }
            TapOutcome::AlreadyPlaying | TapOutcome::AllStepsCompleted => {}
        }

        outcome
    }

    /// Advance the playback and glow clocks by one host frame.
    pub fn update(&mut self, delta_time: f32) {
        if let Some(transition) = self.sequencer.update(delta_time) {
            match transition {
                Transition::ReadyForStep(cursor) => {
                    self.refresh_highlights();
                    if let Some(step) = self.sequencer.steps().get(cursor) {
                        info!(
                            "Ready for step {}: {} (tap {})",
                            step.index,
                            step.description,
                            step.mesh_names.join(" or ")
                        );
                    }
                }
                Transition::Finished => {
                    self.highlights.clear(&mut self.materials);
                    info!("All steps completed, animation finished");
                }
            }
        }

        self.highlights
            .update(delta_time, self.sequencer.is_playing(), &mut self.materials);
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn materials(&self) -> &MaterialStore {
        &self.materials
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn mesh_index(&self) -> &MeshIndex {
        &self.index
    }

    fn detect_tapped_mesh(&mut self, tap: Vec2) -> Option<String> {
        let camera_node = self.camera_node()?;
        let camera = self.graph.node(camera_node).and_then(Camera::from_node)?;

        hit_test::resolve_tapped_mesh(&self.graph, &self.index, &camera, tap, &self.config.hit_test)
            .map(str::to_owned)
    }

    /// The cached camera, re-resolved lazily when the cached node is gone or
    /// no longer carries a camera.
    fn camera_node(&mut self) -> Option<NodeId> {
        if let Some(id) = self.cached_camera {
            if self.graph.node(id).is_some_and(|node| node.is_camera()) {
                return Some(id);
            }
        }

        self.cached_camera = camera_finder::resolve_camera(
            &self.graph,
            self.config.camera,
            self.interaction.as_deref(),
            &self.config.camera_node_name,
        )
        .map(|(id, _)| id);

        if self.cached_camera.is_none() {
            warn!("No camera found for tap detection");
        }
        self.cached_camera
    }

    /// Rebuild the highlight set for the step the cursor points at. While
    /// playing or after completion the set stays empty.
    fn refresh_highlights(&mut self) {
        if self.sequencer.is_playing() || self.sequencer.is_completed() {
            self.highlights.clear(&mut self.materials);
            return;
        }
        if let Some(step) = self.sequencer.current_step() {
            self.highlights
                .highlight_step(step, &self.graph, &self.index, &mut self.materials);
        }
    }
}
