use tracing::{info, warn};

use super::animation::{AnimationPlayer, PlaybackMode};
use super::steps::{Step, StepList};

/// Where the sequencer is in its lifecycle. The variants make impossible
/// combinations, like playback with no active step, unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Waiting for a correct tap on the current step's meshes.
    WaitingForTap,
    /// The current step's animation window is running.
    Playing { elapsed: f32, duration: f32 },
    /// Every step has finished.
    Completed,
}

/// Result of feeding one tap into the sequencer.
#[derive(Clone, Debug, PartialEq)]
pub enum TapOutcome {
    /// The tap matched; holds the 1-based number of the triggered step.
    Advanced { step: usize },
    AlreadyPlaying,
    AllStepsCompleted,
    NoMeshDetected,
    WrongMesh {
        tapped: String,
        expected: Vec<String>,
    },
}

/// What an update tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Playback finished; now waiting on the step at this cursor.
    ReadyForStep(usize),
    /// The final step's animation finished.
    Finished,
}

/// Strictly sequential state machine over the fixed step list.
pub struct Sequencer {
    steps: StepList,
    frame_rate: f32,
    /// Index of the step currently awaited; equals `steps.len()` once every
    /// step has been triggered.
    cursor: usize,
    phase: Phase,
}

impl Sequencer {
    pub fn new(steps: StepList, frame_rate: f32) -> Self {
        Self {
            steps,
            frame_rate,
            cursor: 0,
            phase: Phase::WaitingForTap,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// The step the cursor points at, `None` once the sequence has been
    /// fully triggered.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    /// Feed a resolved tap into the state machine. Only a tap on one of the
    /// current step's meshes advances; everything else leaves the state
    /// untouched.
    pub fn handle_tap(
        &mut self,
        mesh: Option<&str>,
        player: &mut dyn AnimationPlayer,
        clip_name: &str,
    ) -> TapOutcome {
        match self.phase {
            Phase::Playing { .. } => return TapOutcome::AlreadyPlaying,
            Phase::Completed => return TapOutcome::AllStepsCompleted,
            Phase::WaitingForTap => {}
        }

        let Some(mesh) = mesh else {
            return TapOutcome::NoMeshDetected;
        };

        let Some(step) = self.steps.get(self.cursor) else {
            return TapOutcome::AllStepsCompleted;
        };

        if !step.requires(mesh) {
            return TapOutcome::WrongMesh {
                tapped: mesh.to_string(),
                expected: step.mesh_names.clone(),
            };
        }

        let triggered = step.index;
        let (begin, end) = step.window_seconds(self.frame_rate);
        info!(
            "Playing step {}: {} (frames {}-{}, {:.2}s-{:.2}s)",
            step.index, step.description, step.start_frame, step.end_frame, begin, end
        );

        self.cursor += 1;
        self.play_window(begin, end, player, clip_name);

        TapOutcome::Advanced { step: triggered }
    }

    fn play_window(
        &mut self,
        begin: f32,
        end: f32,
        player: &mut dyn AnimationPlayer,
        clip_name: &str,
    ) {
        if let Some(clip) = player.clip_mut(clip_name) {
            clip.begin = begin;
            clip.end = end;
            clip.playback_mode = PlaybackMode::Once;
        }
        if !player.play_clip(clip_name) {
            warn!("Clip '{clip_name}' went missing at playback time");
        }

        self.phase = Phase::Playing {
            elapsed: 0.0,
            duration: end - begin,
        };
    }

    /// Poll playback completion. Only does work while playing, mirroring a
    /// per-frame tick that is disabled in every other phase. Completion lands
    /// on the first tick at or after the nominal duration.
    pub fn update(&mut self, delta_time: f32) -> Option<Transition> {
        let Phase::Playing { elapsed, duration } = self.phase else {
            return None;
        };

        let elapsed = elapsed + delta_time;
        if elapsed < duration {
            self.phase = Phase::Playing { elapsed, duration };
            return None;
        }

        if self.cursor >= self.steps.len() {
            self.phase = Phase::Completed;
            Some(Transition::Finished)
        } else {
            self.phase = Phase::WaitingForTap;
            Some(Transition::ReadyForStep(self.cursor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::animation::{Clip, ClipPlayer};
    use crate::recipe::steps::StepList;

    fn player() -> ClipPlayer {
        let mut player = ClipPlayer::new();
        player.insert("Layer0", Clip::new(12.0));
        player
    }

    fn sequencer() -> Sequencer {
        Sequencer::new(StepList::iced_coffee(), 30.0)
    }

    #[test]
    fn correct_tap_advances_and_plays_the_frame_window() {
        let mut sequencer = sequencer();
        let mut player = player();

        let outcome = sequencer.handle_tap(Some("Nescafe_BTM"), &mut player, "Layer0");
        assert_eq!(outcome, TapOutcome::Advanced { step: 1 });
        assert_eq!(sequencer.cursor(), 1);
        assert_eq!(
            sequencer.phase(),
            Phase::Playing {
                elapsed: 0.0,
                duration: 2.0
            }
        );

        // Frames 0-60 at 30 fps bound playback to [0.0, 2.0] seconds.
        let played = player.last_played().unwrap();
        assert_eq!((played.begin, played.end), (0.0, 2.0));
        assert_eq!(played.name, "Layer0");
    }

    #[test]
    fn wrong_mesh_is_rejected_without_state_change() {
        let mut sequencer = sequencer();
        let mut player = player();

        let outcome = sequencer.handle_tap(Some("pot"), &mut player, "Layer0");
        assert!(matches!(outcome, TapOutcome::WrongMesh { ref tapped, .. } if tapped == "pot"));
        assert_eq!(sequencer.cursor(), 0);
        assert_eq!(sequencer.phase(), Phase::WaitingForTap);
        assert_eq!(player.last_played(), None);
    }

    #[test]
    fn unresolved_tap_is_rejected() {
        let mut sequencer = sequencer();
        let mut player = player();
        assert_eq!(
            sequencer.handle_tap(None, &mut player, "Layer0"),
            TapOutcome::NoMeshDetected
        );
        assert_eq!(sequencer.cursor(), 0);
    }

    #[test]
    fn taps_during_playback_are_ignored() {
        let mut sequencer = sequencer();
        let mut player = player();
        sequencer.handle_tap(Some("Nescafe_TOP__Copy_"), &mut player, "Layer0");

        assert_eq!(
            sequencer.handle_tap(Some("pot"), &mut player, "Layer0"),
            TapOutcome::AlreadyPlaying
        );
        assert_eq!(sequencer.cursor(), 1);
    }

    #[test]
    fn completion_lands_on_the_first_tick_past_the_duration() {
        let mut sequencer = sequencer();
        let mut player = player();
        sequencer.handle_tap(Some("Nescafe_BTM"), &mut player, "Layer0");

        assert_eq!(sequencer.update(1.9), None);
        assert!(sequencer.is_playing());
        assert_eq!(sequencer.update(0.1), Some(Transition::ReadyForStep(1)));
        assert_eq!(sequencer.phase(), Phase::WaitingForTap);
    }

    #[test]
    fn last_step_completes_the_sequence() {
        let mut sequencer = sequencer();
        let mut player = player();

        let order = [
            "Nescafe_BTM",
            "tablespoon",
            "jug",
            "mixing_bowl",
            "scoop",
            "mug",
        ];
        for (i, mesh) in order.iter().enumerate() {
            let outcome = sequencer.handle_tap(Some(mesh), &mut player, "Layer0");
            assert_eq!(outcome, TapOutcome::Advanced { step: i + 1 });
            let transition = sequencer.update(1000.0);
            if i + 1 < order.len() {
                assert_eq!(transition, Some(Transition::ReadyForStep(i + 1)));
            } else {
                assert_eq!(transition, Some(Transition::Finished));
            }
        }

        assert!(sequencer.is_completed());
        assert_eq!(sequencer.cursor(), 6);

        // Post-terminal taps and ticks are inert.
        assert_eq!(
            sequencer.handle_tap(Some("mug"), &mut player, "Layer0"),
            TapOutcome::AllStepsCompleted
        );
        assert_eq!(sequencer.update(1.0), None);
        assert!(sequencer.is_completed());
    }
}
