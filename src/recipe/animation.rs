use ahash::AHashMap;

/// What a clip does when its range ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    #[default]
    Once,
    Loop,
}

/// A named animation clip with a playable sub-range in seconds.
#[derive(Clone, Debug)]
pub struct Clip {
    pub begin: f32,
    pub end: f32,
    pub playback_mode: PlaybackMode,
}

impl Clip {
    pub fn new(duration: f32) -> Self {
        Self {
            begin: 0.0,
            end: duration,
            playback_mode: PlaybackMode::Once,
        }
    }
}

/// Animation playback collaborator. The engine only adjusts clip ranges and
/// starts playback; sampling and blending live with the host renderer.
pub trait AnimationPlayer {
    fn clip(&self, name: &str) -> Option<&Clip>;

    fn clip_mut(&mut self, name: &str) -> Option<&mut Clip>;

    /// Start playback of the clip's currently configured range. Returns false
    /// when the clip does not exist.
    fn play_clip(&mut self, name: &str) -> bool;
}

/// The clip name and range that a [`ClipPlayer`] last started.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedClip {
    pub name: String,
    pub begin: f32,
    pub end: f32,
}

/// In-memory clip store, enough to drive the engine and observe what plays.
#[derive(Default)]
pub struct ClipPlayer {
    clips: AHashMap<String, Clip>,
    last_played: Option<PlayedClip>,
}

impl ClipPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, clip: Clip) {
        self.clips.insert(name.into(), clip);
    }

    pub fn last_played(&self) -> Option<&PlayedClip> {
        self.last_played.as_ref()
    }
}

impl AnimationPlayer for ClipPlayer {
    fn clip(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    fn clip_mut(&mut self, name: &str) -> Option<&mut Clip> {
        self.clips.get_mut(name)
    }

    fn play_clip(&mut self, name: &str) -> bool {
        match self.clips.get(name) {
            Some(clip) => {
                self.last_played = Some(PlayedClip {
                    name: name.to_string(),
                    begin: clip.begin,
                    end: clip.end,
                });
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_records_the_configured_range() {
        let mut player = ClipPlayer::new();
        player.insert("Layer0", Clip::new(12.0));

        let clip = player.clip_mut("Layer0").unwrap();
        clip.begin = 2.0;
        clip.end = 4.5;

        assert!(player.play_clip("Layer0"));
        assert_eq!(
            player.last_played(),
            Some(&PlayedClip {
                name: "Layer0".to_string(),
                begin: 2.0,
                end: 4.5,
            })
        );
    }

    #[test]
    fn missing_clip_does_not_play() {
        let mut player = ClipPlayer::new();
        assert!(!player.play_clip("Layer0"));
        assert_eq!(player.last_played(), None);
    }
}
