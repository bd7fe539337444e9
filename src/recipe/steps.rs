use ahash::AHashSet;

/// One unit of the recipe: the meshes the user must tap, and the animation
/// frame range that plays when they do.
#[derive(Clone, Debug)]
pub struct Step {
    /// 1-based step number.
    pub index: usize,
    /// Tapping any one of these advances the step.
    pub mesh_names: Vec<String>,
    pub start_frame: u32,
    pub end_frame: u32,
    pub description: String,
}

impl Step {
    pub fn requires(&self, mesh_name: &str) -> bool {
        self.mesh_names.iter().any(|name| name == mesh_name)
    }

    /// The step's animation window in seconds at the given frame rate.
    pub fn window_seconds(&self, frame_rate: f32) -> (f32, f32) {
        (
            frames_to_seconds(self.start_frame, frame_rate),
            frames_to_seconds(self.end_frame, frame_rate),
        )
    }
}

#[inline]
pub fn frames_to_seconds(frames: u32, frame_rate: f32) -> f32 {
    frames as f32 / frame_rate
}

#[derive(Debug, thiserror::Error)]
pub enum StepListError {
    #[error("step list is empty")]
    Empty,
    #[error("step {index}: start frame {start} is not before end frame {end}")]
    InvalidRange { index: usize, start: u32, end: u32 },
}

/// The ordered, immutable list of steps for a session.
#[derive(Clone, Debug)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    pub fn new(steps: Vec<Step>) -> Result<Self, StepListError> {
        if steps.is_empty() {
            return Err(StepListError::Empty);
        }
        for step in &steps {
            if step.start_frame >= step.end_frame {
                return Err(StepListError::InvalidRange {
                    index: step.index,
                    start: step.start_frame,
                    end: step.end_frame,
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn get(&self, cursor: usize) -> Option<&Step> {
        self.steps.get(cursor)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// The highest frame any step reaches, used to prime the full clip range.
    pub fn last_frame(&self) -> u32 {
        self.steps.iter().map(|step| step.end_frame).max().unwrap_or(0)
    }

    /// Every mesh name referenced by any step.
    pub fn all_mesh_names(&self) -> AHashSet<String> {
        self.steps
            .iter()
            .flat_map(|step| step.mesh_names.iter().cloned())
            .collect()
    }

    /// The six-step iced coffee recipe the lens ships with.
    pub fn iced_coffee() -> Self {
        fn step(index: usize, mesh_names: &[&str], frames: (u32, u32), description: &str) -> Step {
            Step {
                index,
                mesh_names: mesh_names.iter().map(|name| name.to_string()).collect(),
                start_frame: frames.0,
                end_frame: frames.1,
                description: description.to_string(),
            }
        }

        Self {
            steps: vec![
                step(1, &["Nescafe_TOP__Copy_", "Nescafe_BTM"], (0, 60), "Add coffee sachet"),
                step(2, &["pot", "tablespoon"], (60, 140), "Add spoon of hot water"),
                step(3, &["jug"], (140, 200), "Add milk"),
                step(4, &["mixing_bowl"], (200, 240), "Pour coffee mix into mug"),
                step(5, &["scoop", "ice_bowl"], (240, 300), "Add ice"),
                step(6, &["mug"], (300, 360), "Ready to sip"),
            ],
        }
    }
}
