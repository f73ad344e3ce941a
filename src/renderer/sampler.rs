//! Evaluates a scene record at an instant: which leaves are on screen, how
//! they look, and where the camera is.

use crate::geometry::{Vec2, ORIGIN};
use crate::mobject::ObjectId;
use crate::scene::{ObjectState, SceneRecord, StepKind};
use std::collections::{BTreeMap, BTreeSet};

/// Ease-in-out rate used for every transition
pub fn smooth(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub time: f64,
    pub camera: Vec2,
    /// Visible leaves in draw order
    pub objects: Vec<(ObjectId, ObjectState)>,
    /// Leaves drawn with another object's content at this instant
    pub looks: BTreeMap<ObjectId, ObjectId>,
}

impl FrameSnapshot {
    /// Object whose content `id` is drawn with in this frame
    pub fn look(&self, id: ObjectId) -> ObjectId {
        self.looks.get(&id).copied().unwrap_or(id)
    }
}

/// Replay every step that has started by `t`
pub fn sample(record: &SceneRecord, t: f64) -> FrameSnapshot {
    let mut states: BTreeMap<ObjectId, ObjectState> = BTreeMap::new();
    let mut visible: BTreeSet<ObjectId> = BTreeSet::new();
    let mut looks: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
    let mut camera = ORIGIN;

    for step in record.timeline.steps() {
        if step.start > t {
            break;
        }
        match &step.kind {
            StepKind::Add { added } => {
                for (id, state) in added {
                    states.insert(*id, *state);
                    visible.insert(*id);
                }
            }
            StepKind::SetCamera { center } => camera = *center,
            StepKind::Wait => {}
            StepKind::Play { tracks } => {
                for track in tracks.iter().filter(|tr| tr.start <= t) {
                    let p = track.progress(t);
                    let eased = smooth(p);
                    visible.extend(track.enter.iter().copied());
                    for kf in &track.keyframes {
                        states.insert(kf.object, kf.from.lerp(&kf.to, eased));
                    }
                    if let Some((from, to)) = track.camera {
                        camera = from.lerp(to, eased);
                    }
                    if p >= 0.5 {
                        for &(leaf, look) in &track.morph {
                            if leaf == look {
                                looks.remove(&leaf);
                            } else {
                                looks.insert(leaf, look);
                            }
                        }
                    }
                    if p >= 1.0 {
                        for id in &track.exit {
                            visible.remove(id);
                        }
                    }
                }
            }
        }
    }

    let objects = visible
        .into_iter()
        .filter_map(|id| states.get(&id).map(|s| (id, *s)))
        .collect();
    FrameSnapshot {
        time: t,
        camera,
        objects,
        looks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::assets::AssetLoader;
    use crate::geometry::{DOWN, RIGHT};
    use crate::scene::SceneContext;
    use std::path::Path;

    fn record<F: FnOnce(&mut SceneContext<'_>)>(f: F) -> SceneRecord {
        let mut loader = AssetLoader::new(Path::new("."));
        let mut ctx = SceneContext::new(&mut loader, 0);
        f(&mut ctx);
        ctx.finish("sample")
    }

    #[test]
    fn test_smooth_endpoints() {
        assert_eq!(smooth(0.0), 0.0);
        assert_eq!(smooth(0.5), 0.5);
        assert_eq!(smooth(1.0), 1.0);
        assert_eq!(smooth(2.0), 1.0);
    }

    #[test]
    fn test_fade_in_then_out() {
        let rec = record(|ctx| {
            let r = ctx.rectangle(1.0, 1.0);
            ctx.play(vec![Animation::fade_in(r)]).unwrap();
            ctx.play(vec![Animation::fade_out(&[r])]).unwrap();
        });

        let start = sample(&rec, 0.0);
        assert_eq!(start.objects.len(), 1);
        assert_eq!(start.objects[0].1.opacity, 0.0);

        let mid = sample(&rec, 0.5);
        assert!((mid.objects[0].1.opacity - 0.5).abs() < 1e-9);

        let shown = sample(&rec, 1.0);
        assert_eq!(shown.objects[0].1.opacity, 1.0);

        assert!(sample(&rec, 2.0).objects.is_empty());
    }

    #[test]
    fn test_staggered_member_waits_for_its_start() {
        let rec = record(|ctx| {
            let a = ctx.rectangle(1.0, 1.0);
            let b = ctx.rectangle(1.0, 1.0);
            ctx.play(vec![Animation::group(
                vec![Animation::fade_in(a), Animation::fade_in(b)],
                1.0,
            )])
            .unwrap();
        });
        assert_eq!(sample(&rec, 0.5).objects.len(), 1);
        assert_eq!(sample(&rec, 1.5).objects.len(), 2);
    }

    #[test]
    fn test_transform_switches_look_halfway() {
        let mut source = ObjectId(0);
        let mut target = ObjectId(0);
        let rec = record(|ctx| {
            source = ctx.tex(&["question"], 48.0);
            target = ctx.tex(&["another question"], 48.0);
            ctx.play(vec![Animation::write(source)]).unwrap();
            ctx.play(vec![Animation::transform(source, target)]).unwrap();
        });

        let writing = sample(&rec, 0.5);
        assert_eq!(writing.look(source), source);
        let early = sample(&rec, 1.25);
        assert_eq!(early.look(source), source);
        let late = sample(&rec, 1.75);
        assert_eq!(late.look(source), target);
        assert_eq!(late.objects.len(), 1);
    }

    #[test]
    fn test_camera_interpolates() {
        let rec = record(|ctx| {
            let r = ctx.rectangle(1.0, 1.0);
            ctx.add(r).unwrap();
            ctx.play(vec![Animation::camera_shift(DOWN * 2.0)]).unwrap();
            ctx.play(vec![Animation::animate(r).shift(RIGHT).build()])
                .unwrap();
        });
        assert_eq!(sample(&rec, 0.5).camera, DOWN);
        let end = sample(&rec, 2.0);
        assert_eq!(end.camera, DOWN * 2.0);
        assert_eq!(end.objects[0].1.center, RIGHT);
    }
}
