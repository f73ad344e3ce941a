//! Animation descriptors. They are plain values: building one has no effect
//! until it is handed to [`SceneContext::play`](crate::scene::SceneContext::play).

use crate::geometry::{Color, Vec2, ORIGIN};
use crate::layout::Arrangement;
use crate::mobject::ObjectId;
use serde::{Deserialize, Serialize};

/// Run time of a primitive animation when none is given
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// Length of `wait()` when none is given
pub const DEFAULT_WAIT: f64 = 1.0;

/// Property change applied by an `animate` builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ObjectOp {
    Shift { delta: Vec2 },
    MoveTo { point: Vec2 },
    SetY { y: f64 },
    Arrange { arrangement: Arrangement },
    ScaleToFitWidth { width: f64 },
    ScaleToFitHeight { height: f64 },
    NextTo { anchor: ObjectId, direction: Vec2, buff: f64 },
    Surround { target: ObjectId, buff: f64 },
    SetColor { color: Color },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationKind {
    FadeIn { target: ObjectId, shift: Vec2 },
    FadeOut { targets: Vec<ObjectId>, shift: Vec2 },
    Write { target: ObjectId },
    Create { target: ObjectId },
    /// `source` takes on the look of `target` and stays on screen
    Transform { source: ObjectId, target: ObjectId },
    /// `source` is replaced by `target`, parts paired by identical tex
    TransformMatchingTex { source: ObjectId, target: ObjectId },
    /// `source` is replaced by `target`, glyphs paired by identical shape
    TransformMatchingShapes { source: ObjectId, target: ObjectId },
    Animate { target: ObjectId, ops: Vec<ObjectOp> },
    CameraShift { delta: Vec2 },
    Group(AnimationGroup),
}

/// One timed transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub run_time: f64,
}

/// Sub-animations whose starts are staggered by `lag_ratio`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationGroup {
    pub animations: Vec<Animation>,
    pub lag_ratio: f64,
    /// Rescales the whole group to this length when set
    pub run_time: Option<f64>,
}

impl Animation {
    fn of(kind: AnimationKind) -> Self {
        Self {
            kind,
            run_time: DEFAULT_RUN_TIME,
        }
    }

    pub fn fade_in(target: ObjectId) -> Self {
        Self::of(AnimationKind::FadeIn {
            target,
            shift: ORIGIN,
        })
    }

    pub fn fade_in_shift(target: ObjectId, shift: Vec2) -> Self {
        Self::of(AnimationKind::FadeIn { target, shift })
    }

    pub fn fade_out(targets: &[ObjectId]) -> Self {
        Self::of(AnimationKind::FadeOut {
            targets: targets.to_vec(),
            shift: ORIGIN,
        })
    }

    pub fn fade_out_shift(targets: &[ObjectId], shift: Vec2) -> Self {
        Self::of(AnimationKind::FadeOut {
            targets: targets.to_vec(),
            shift,
        })
    }

    pub fn write(target: ObjectId) -> Self {
        Self::of(AnimationKind::Write { target })
    }

    pub fn create(target: ObjectId) -> Self {
        Self::of(AnimationKind::Create { target })
    }

    pub fn transform(source: ObjectId, target: ObjectId) -> Self {
        Self::of(AnimationKind::Transform { source, target })
    }

    pub fn transform_matching_tex(source: ObjectId, target: ObjectId) -> Self {
        Self::of(AnimationKind::TransformMatchingTex { source, target })
    }

    pub fn transform_matching_shapes(source: ObjectId, target: ObjectId) -> Self {
        Self::of(AnimationKind::TransformMatchingShapes { source, target })
    }

    /// Start an `animate` chain on `target`
    pub fn animate(target: ObjectId) -> AnimateBuilder {
        AnimateBuilder {
            target,
            ops: Vec::new(),
        }
    }

    pub fn camera_shift(delta: Vec2) -> Self {
        Self::of(AnimationKind::CameraShift { delta })
    }

    /// Staggered group; its length is derived from the members
    pub fn group(animations: Vec<Animation>, lag_ratio: f64) -> Self {
        let group = AnimationGroup {
            animations,
            lag_ratio,
            run_time: None,
        };
        let run_time = group.natural_length();
        Self {
            kind: AnimationKind::Group(group),
            run_time,
        }
    }

    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = run_time;
        if let AnimationKind::Group(group) = &mut self.kind {
            group.run_time = Some(run_time);
        }
        self
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            AnimationKind::FadeIn { .. } => "FadeIn",
            AnimationKind::FadeOut { .. } => "FadeOut",
            AnimationKind::Write { .. } => "Write",
            AnimationKind::Create { .. } => "Create",
            AnimationKind::Transform { .. } => "Transform",
            AnimationKind::TransformMatchingTex { .. } => "TransformMatchingTex",
            AnimationKind::TransformMatchingShapes { .. } => "TransformMatchingShapes",
            AnimationKind::Animate { .. } => "Animate",
            AnimationKind::CameraShift { .. } => "CameraShift",
            AnimationKind::Group(_) => "AnimationGroup",
        }
    }
}

impl AnimationGroup {
    /// Unscaled `(start, end)` of each member.
    ///
    /// `start_i = start_{i-1} + lag_ratio * run_time_{i-1}`
    pub fn raw_offsets(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::with_capacity(self.animations.len());
        let mut start = 0.0;
        for anim in &self.animations {
            out.push((start, start + anim.run_time));
            start += self.lag_ratio * anim.run_time;
        }
        out
    }

    pub fn natural_length(&self) -> f64 {
        self.raw_offsets()
            .iter()
            .map(|(_, end)| *end)
            .fold(0.0, f64::max)
    }

    /// `(start, end)` of each member, rescaled to `run_time` when one is set
    pub fn offsets(&self) -> Vec<(f64, f64)> {
        let raw = self.raw_offsets();
        let natural = self.natural_length();
        match self.run_time {
            Some(target) if natural > 0.0 => {
                let k = target / natural;
                raw.into_iter().map(|(s, e)| (s * k, e * k)).collect()
            }
            _ => raw,
        }
    }
}

/// Collects property changes for one `animate` transition
#[derive(Debug, Clone)]
pub struct AnimateBuilder {
    target: ObjectId,
    ops: Vec<ObjectOp>,
}

impl AnimateBuilder {
    pub fn shift(mut self, delta: Vec2) -> Self {
        self.ops.push(ObjectOp::Shift { delta });
        self
    }

    pub fn move_to(mut self, point: Vec2) -> Self {
        self.ops.push(ObjectOp::MoveTo { point });
        self
    }

    pub fn set_y(mut self, y: f64) -> Self {
        self.ops.push(ObjectOp::SetY { y });
        self
    }

    pub fn arrange(mut self, arrangement: Arrangement) -> Self {
        self.ops.push(ObjectOp::Arrange { arrangement });
        self
    }

    pub fn scale_to_fit_width(mut self, width: f64) -> Self {
        self.ops.push(ObjectOp::ScaleToFitWidth { width });
        self
    }

    pub fn scale_to_fit_height(mut self, height: f64) -> Self {
        self.ops.push(ObjectOp::ScaleToFitHeight { height });
        self
    }

    pub fn next_to(mut self, anchor: ObjectId, direction: Vec2) -> Self {
        self.ops.push(ObjectOp::NextTo {
            anchor,
            direction,
            buff: crate::geometry::DEFAULT_BUFF,
        });
        self
    }

    pub fn surround(mut self, target: ObjectId) -> Self {
        self.ops.push(ObjectOp::Surround {
            target,
            buff: crate::geometry::SMALL_BUFF,
        });
        self
    }

    pub fn set_color(mut self, color: Color) -> Self {
        self.ops.push(ObjectOp::SetColor { color });
        self
    }

    pub fn build(self) -> Animation {
        Animation::of(AnimationKind::Animate {
            target: self.target,
            ops: self.ops,
        })
    }
}

impl From<AnimateBuilder> for Animation {
    fn from(builder: AnimateBuilder) -> Self {
        builder.build()
    }
}
