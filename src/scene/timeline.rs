use crate::geometry::{Color, Size, Vec2};
use crate::mobject::ObjectId;
use serde::{Deserialize, Serialize};

/// Drawn state of one leaf object at an instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub center: Vec2,
    pub extent: Size,
    pub color: Color,
    pub opacity: f64,
}

impl ObjectState {
    pub fn lerp(&self, other: &ObjectState, t: f64) -> ObjectState {
        ObjectState {
            center: self.center.lerp(other.center, t),
            extent: Size::new(
                self.extent.width + (other.extent.width - self.extent.width) * t,
                self.extent.height + (other.extent.height - self.extent.height) * t,
            ),
            color: self.color.lerp(other.color, t),
            opacity: self.opacity + (other.opacity - self.opacity) * t,
        }
    }

    pub fn faded(mut self) -> ObjectState {
        self.opacity = 0.0;
        self
    }

    pub fn shifted(mut self, delta: Vec2) -> ObjectState {
        self.center = self.center + delta;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub object: ObjectId,
    pub from: ObjectState,
    pub to: ObjectState,
}

/// One primitive animation placed on the scene clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub animation: String,
    pub start: f64,
    pub end: f64,
    pub targets: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<Keyframe>,
    /// Leaves that become visible when the track starts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enter: Vec<ObjectId>,
    /// Leaves that leave the screen when the track completes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<(Vec2, Vec2)>,
    /// Part or glyph pairs kept across a matching transform
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<(usize, usize)>,
    /// `(leaf, look)`: the leaf is drawn as `look` from the halfway point on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub morph: Vec<(ObjectId, ObjectId)>,
}

impl Track {
    pub fn new(animation: &str, targets: Vec<ObjectId>) -> Self {
        Self {
            animation: animation.to_string(),
            start: 0.0,
            end: 0.0,
            targets,
            keyframes: Vec::new(),
            enter: Vec::new(),
            exit: Vec::new(),
            camera: None,
            matched: Vec::new(),
            morph: Vec::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Linear progress in `0..=1` at scene time `t`
    pub fn progress(&self, t: f64) -> f64 {
        if self.duration() <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        ((t - self.start) / self.duration()).clamp(0.0, 1.0)
    }

    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    Play { tracks: Vec<Track> },
    Wait,
    Add { added: Vec<(ObjectId, ObjectState)> },
    SetCamera { center: Vec2 },
}

/// One entry of the timeline; starts when the previous step ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub start: f64,
    pub duration: f64,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn tracks(&self) -> &[Track] {
        match &self.kind {
            StepKind::Play { tracks } => tracks,
            _ => &[],
        }
    }
}

/// Ordered, strictly sequential list of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene time at which the next step will start
    pub fn cursor(&self) -> f64 {
        self.steps.last().map(Step::end).unwrap_or(0.0)
    }

    /// Append a play step. Track times are relative to the step start.
    pub fn push_play(&mut self, mut tracks: Vec<Track>) -> &Step {
        let start = self.cursor();
        let duration = tracks.iter().map(|t| t.end).fold(0.0, f64::max);
        for track in &mut tracks {
            track.start += start;
            track.end += start;
        }
        self.push(start, duration, StepKind::Play { tracks })
    }

    pub fn push_wait(&mut self, duration: f64) -> &Step {
        let start = self.cursor();
        self.push(start, duration.max(0.0), StepKind::Wait)
    }

    pub fn push_add(&mut self, added: Vec<(ObjectId, ObjectState)>) -> &Step {
        let start = self.cursor();
        self.push(start, 0.0, StepKind::Add { added })
    }

    pub fn push_set_camera(&mut self, center: Vec2) -> &Step {
        let start = self.cursor();
        self.push(start, 0.0, StepKind::SetCamera { center })
    }

    fn push(&mut self, start: f64, duration: f64, kind: StepKind) -> &Step {
        let index = self.steps.len();
        self.steps.push(Step {
            index,
            start,
            duration,
            kind,
        });
        &self.steps[index]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn total_duration(&self) -> f64 {
        self.cursor()
    }

    pub fn play_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|s| matches!(s.kind, StepKind::Play { .. }))
    }

    /// Step running at scene time `t`
    pub fn step_at(&self, t: f64) -> Option<&Step> {
        self.steps
            .iter()
            .filter(|s| s.duration > 0.0)
            .find(|s| t >= s.start && t < s.end())
    }

    /// Frame count at `fps`
    pub fn total_frames(&self, fps: u32) -> u32 {
        (self.total_duration() * fps as f64).ceil() as u32
    }

    /// Convert frame number to time in seconds
    pub fn frame_to_time(frame: u32, fps: u32) -> f64 {
        frame as f64 / fps as f64
    }
}
