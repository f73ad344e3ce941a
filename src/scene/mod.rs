//! Scene construction: the explicit context a scene builds into, and the
//! record it produces.

pub mod registry;
pub mod timeline;

pub use registry::SceneRegistry;
pub use timeline::{Keyframe, ObjectState, Step, StepKind, Timeline, Track};

use crate::animation::{Animation, AnimationKind, ObjectOp, DEFAULT_WAIT};
use crate::assets::{Asset, AssetLoader};
use crate::error::{SceneError, SceneResult};
use crate::geometry::{BoundingBox, Color, Size, Vec2, DOWN, FRAME_HEIGHT, ORIGIN, SMALL_BUFF};
use crate::layout::{self, Arrangement, GridConfig};
use crate::mobject::{ImageSource, ObjectArena, ObjectId, Shape, VisualKind};
use crate::tex::{self, TexContent};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Pixel height an image is shown at natural scale relative to the frame
const IMAGE_RESOLUTION: f64 = 1080.0;

/// Height of an SVG at natural scale
const SVG_HEIGHT: f64 = 2.0;

const BRACE_THICKNESS: f64 = 0.3;

/// A named, independently renderable timeline
pub trait Scene {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Populate the context. Called once per invocation.
    fn construct(&self, ctx: &mut SceneContext<'_>) -> anyhow::Result<()>;
}

/// Everything a scene mutates while it is being built.
pub struct SceneContext<'a> {
    arena: ObjectArena,
    timeline: Timeline,
    visible: BTreeSet<ObjectId>,
    camera: Vec2,
    loader: &'a mut AssetLoader,
    rng: Pcg64,
}

impl<'a> SceneContext<'a> {
    pub fn new(loader: &'a mut AssetLoader, seed: u64) -> Self {
        Self {
            arena: ObjectArena::new(),
            timeline: Timeline::new(),
            visible: BTreeSet::new(),
            camera: ORIGIN,
            loader,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn arena(&self) -> &ObjectArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ObjectArena {
        &mut self.arena
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.arena
            .leaves(id)
            .map(|leaves| !leaves.is_empty() && leaves.iter().all(|l| self.visible.contains(l)))
            .unwrap_or(false)
    }

    // ---- object construction ----

    pub fn tex<S: AsRef<str>>(&mut self, sources: &[S], font_size: f64) -> ObjectId {
        self.insert_tex(TexContent::new(sources, font_size), false)
    }

    /// Tex set in a named environment such as `flushleft`
    pub fn tex_in<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        environment: &str,
        font_size: f64,
    ) -> ObjectId {
        self.insert_tex(
            TexContent::new(sources, font_size).with_environment(environment),
            false,
        )
    }

    pub fn math_tex<S: AsRef<str>>(&mut self, sources: &[S], font_size: f64) -> ObjectId {
        self.insert_tex(TexContent::new(sources, font_size), true)
    }

    fn insert_tex(&mut self, content: TexContent, math: bool) -> ObjectId {
        let size = content.natural_size();
        let kind = if math {
            VisualKind::MathTex(content)
        } else {
            VisualKind::Text(content)
        };
        self.arena.insert(kind, size)
    }

    pub fn set_color_by_tex(&mut self, id: ObjectId, needle: &str, color: Color) -> SceneResult<()> {
        if let Some(tex) = self.arena.get_mut(id)?.tex_mut() {
            tex.set_color_by_tex(needle, color);
        }
        Ok(())
    }

    /// Color one Tex part; the rest of the expression keeps its colors
    pub fn set_part_color(&mut self, id: ObjectId, part: usize, color: Color) -> SceneResult<()> {
        if let Some(tex) = self.arena.get_mut(id)?.tex_mut() {
            tex.set_part_color(part, color);
        }
        Ok(())
    }

    pub fn set_color(&mut self, id: ObjectId, color: Color) -> SceneResult<()> {
        self.arena.set_color(id, color)
    }

    /// Raster image loaded through the asset loader
    pub fn image(&mut self, path: impl AsRef<Path>) -> SceneResult<ObjectId> {
        let img = self.loader.load_image(path.as_ref())?;
        let source = ImageSource {
            path: img.path.clone(),
            pixel_width: img.width,
            pixel_height: img.height,
        };
        Ok(self.insert_image(source))
    }

    fn insert_image(&mut self, source: ImageSource) -> ObjectId {
        let height = source.pixel_height as f64 / IMAGE_RESOLUTION * FRAME_HEIGHT;
        let width = if source.pixel_height == 0 {
            0.0
        } else {
            height * source.pixel_width as f64 / source.pixel_height as f64
        };
        self.arena
            .insert(VisualKind::Image(source), Size::new(width, height))
    }

    pub fn svg(&mut self, path: impl AsRef<Path>) -> SceneResult<ObjectId> {
        let svg = self.loader.load_svg(path.as_ref())?;
        let aspect = if svg.height > 0.0 {
            svg.width / svg.height
        } else {
            1.0
        };
        let source = ImageSource {
            path: svg.path.clone(),
            pixel_width: svg.width.round() as u32,
            pixel_height: svg.height.round() as u32,
        };
        Ok(self.arena.insert(
            VisualKind::Svg(source),
            Size::new(SVG_HEIGHT * aspect, SVG_HEIGHT),
        ))
    }

    /// Load every asset in `dir`, labelled by file name
    pub fn scan_assets(&mut self, dir: impl AsRef<Path>) -> SceneResult<BTreeMap<String, ObjectId>> {
        let assets = self.loader.scan(dir.as_ref())?;
        let mut out = BTreeMap::new();
        for (label, asset) in assets {
            let id = match asset {
                Asset::Image(img) => self.insert_image(ImageSource {
                    path: img.path,
                    pixel_width: img.width,
                    pixel_height: img.height,
                }),
                Asset::Svg(svg) => self.svg(&svg.path)?,
            };
            out.insert(label, id);
        }
        Ok(out)
    }

    pub fn group(&mut self, members: &[ObjectId]) -> SceneResult<ObjectId> {
        for id in members {
            self.arena.get(*id)?;
        }
        Ok(self
            .arena
            .insert(VisualKind::Group { members: members.to_vec() }, Size::default()))
    }

    pub fn rectangle(&mut self, width: f64, height: f64) -> ObjectId {
        self.arena
            .insert(VisualKind::Shape(Shape::Rectangle), Size::new(width, height))
    }

    pub fn surrounding_rectangle(&mut self, target: ObjectId, color: Color) -> SceneResult<ObjectId> {
        let bb = self.arena.bounds(target)?.padded(SMALL_BUFF);
        let id = self.arena.insert(
            VisualKind::Shape(Shape::SurroundingRectangle { buff: SMALL_BUFF }),
            bb.size(),
        );
        self.arena.move_to(id, bb.center())?;
        self.arena.set_color(id, color)?;
        Ok(id)
    }

    /// Brace under (or beside) a box
    pub fn brace_for_box(&mut self, bb: &BoundingBox, direction: Vec2) -> SceneResult<ObjectId> {
        let size = if direction.x == 0.0 {
            Size::new(bb.width(), BRACE_THICKNESS)
        } else {
            Size::new(BRACE_THICKNESS, bb.height())
        };
        let id = self
            .arena
            .insert(VisualKind::Shape(Shape::Brace { direction }), size);
        self.arena.next_to_box(id, bb, direction, SMALL_BUFF * 2.0)?;
        Ok(id)
    }

    pub fn brace(&mut self, target: ObjectId) -> SceneResult<ObjectId> {
        let bb = self.arena.bounds(target)?;
        self.brace_for_box(&bb, DOWN)
    }

    /// Brace under one part of a Tex expression
    pub fn brace_for_part(&mut self, id: ObjectId, part: usize) -> SceneResult<ObjectId> {
        let bb = self.part_bounds(id, part)?;
        self.brace_for_box(&bb, DOWN)
    }

    /// Bounding box of a single Tex part
    pub fn part_bounds(&self, id: ObjectId, part: usize) -> SceneResult<BoundingBox> {
        let bb = self.arena.bounds(id)?;
        let object = self.arena.appearance(id)?;
        let spans = object.tex().map(TexContent::part_spans).unwrap_or_default();
        let Some((offset, width)) = spans.get(part).copied() else {
            return Ok(bb);
        };
        let min_x = bb.min.x + offset * bb.width();
        Ok(BoundingBox {
            min: Vec2::new(min_x, bb.min.y),
            max: Vec2::new(min_x + width * bb.width(), bb.max.y),
        })
    }

    /// Table of Tex cells with an optional header row
    pub fn table<S: AsRef<str>>(
        &mut self,
        rows: &[Vec<S>],
        col_labels: Vec<ObjectId>,
        font_size: f64,
        grid: GridConfig,
    ) -> SceneResult<ObjectId> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(col_labels.len());
        let mut cells = col_labels;
        for row in rows {
            for value in row {
                cells.push(self.tex_in(&[value.as_ref()], "flushleft", font_size));
            }
        }
        let total_rows = cells.len().div_ceil(cols.max(1));
        let config = GridConfig {
            rows: Some(total_rows),
            cols: Some(cols),
            ..grid
        };
        layout::arrange(&mut self.arena, &cells, &Arrangement::grid(config))?;
        Ok(self.arena.insert(
            VisualKind::Table {
                rows: total_rows,
                cols,
                cells,
            },
            Size::default(),
        ))
    }

    // ---- immediate placement ----

    pub fn arrange(&mut self, id: ObjectId, arrangement: &Arrangement) -> SceneResult<()> {
        let members = self.arena.get(id)?.children().to_vec();
        layout::arrange(&mut self.arena, &members, arrangement)
    }

    pub fn shift(&mut self, id: ObjectId, delta: Vec2) -> SceneResult<()> {
        self.arena.shift(id, delta)
    }

    pub fn next_to(&mut self, id: ObjectId, anchor: ObjectId, direction: Vec2) -> SceneResult<()> {
        self.arena
            .next_to(id, anchor, direction, crate::geometry::DEFAULT_BUFF)
    }

    pub fn scale_to_fit_width(&mut self, id: ObjectId, width: f64) -> SceneResult<()> {
        self.arena.scale_to_fit_width(id, width)
    }

    pub fn scale_to_fit_height(&mut self, id: ObjectId, height: f64) -> SceneResult<()> {
        self.arena.scale_to_fit_height(id, height)
    }

    /// Pick one of `choices` with the scene's seeded generator
    pub fn choose<'c, T>(&mut self, choices: &'c [T]) -> Option<&'c T> {
        choices.choose(&mut self.rng)
    }

    // ---- timeline ----

    /// Show `id` immediately
    pub fn add(&mut self, id: ObjectId) -> SceneResult<()> {
        let leaves = self.arena.leaves(id)?;
        let mut added = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            added.push((leaf, self.state_of(leaf)?));
            self.visible.insert(leaf);
        }
        self.timeline.push_add(added);
        Ok(())
    }

    pub fn set_camera_y(&mut self, y: f64) {
        self.camera = Vec2::new(self.camera.x, y);
        self.timeline.push_set_camera(self.camera);
    }

    pub fn wait(&mut self) {
        self.wait_for(DEFAULT_WAIT);
    }

    pub fn wait_for(&mut self, duration: f64) {
        self.timeline.push_wait(duration);
    }

    /// Play animations together as one step
    pub fn play(&mut self, animations: Vec<Animation>) -> SceneResult<()> {
        let mut tracks = Vec::new();
        for anim in &animations {
            self.realize(anim, 0.0, anim.run_time, &mut tracks)?;
        }
        let step = self.timeline.push_play(tracks);
        tracing::debug!(
            step = step.index,
            start = step.start,
            duration = step.duration,
            tracks = step.tracks().len(),
            "scheduled play step"
        );
        Ok(())
    }

    fn state_of(&self, leaf: ObjectId) -> SceneResult<ObjectState> {
        let p = self.arena.get(leaf)?.placement;
        let size = self.arena.appearance(leaf)?.natural_size;
        Ok(ObjectState {
            center: p.center,
            extent: Size::new(size.width * p.scale, size.height * p.scale),
            color: p.color,
            opacity: p.opacity,
        })
    }

    fn states(&self, leaves: &[ObjectId]) -> SceneResult<Vec<ObjectState>> {
        leaves.iter().map(|l| self.state_of(*l)).collect()
    }

    fn realize(
        &mut self,
        anim: &Animation,
        start: f64,
        end: f64,
        out: &mut Vec<Track>,
    ) -> SceneResult<()> {
        let mut track = match &anim.kind {
            AnimationKind::Group(group) => {
                let natural = group.natural_length();
                let k = if natural > 0.0 { (end - start) / natural } else { 0.0 };
                for (sub, (s, e)) in group.animations.iter().zip(group.raw_offsets()) {
                    self.realize(sub, start + s * k, start + e * k, out)?;
                }
                return Ok(());
            }
            AnimationKind::FadeIn { target, shift } => {
                let leaves = self.arena.leaves(*target)?;
                let mut track = Track::new(anim.name(), vec![*target]);
                for &leaf in &leaves {
                    let to = self.state_of(leaf)?;
                    let from = to.faded().shifted(-*shift);
                    track.keyframes.push(Keyframe { object: leaf, from, to });
                }
                self.enter(&mut track, leaves);
                track
            }
            AnimationKind::Write { target } | AnimationKind::Create { target } => {
                let leaves = self.arena.leaves(*target)?;
                let mut track = Track::new(anim.name(), vec![*target]);
                for &leaf in &leaves {
                    let to = self.state_of(leaf)?;
                    track.keyframes.push(Keyframe {
                        object: leaf,
                        from: to.faded(),
                        to,
                    });
                }
                self.enter(&mut track, leaves);
                track
            }
            AnimationKind::FadeOut { targets, shift } => {
                let mut track = Track::new(anim.name(), targets.clone());
                for target in targets {
                    let leaves = self.arena.leaves(*target)?;
                    for &leaf in &leaves {
                        let from = self.state_of(leaf)?;
                        track.keyframes.push(Keyframe {
                            object: leaf,
                            from,
                            to: from.faded().shifted(*shift),
                        });
                    }
                    self.exit(&mut track, leaves);
                }
                track
            }
            AnimationKind::Transform { source, target } => {
                self.realize_transform(anim.name(), *source, *target)?
            }
            AnimationKind::TransformMatchingTex { source, target }
            | AnimationKind::TransformMatchingShapes { source, target } => {
                self.realize_matching(anim, *source, *target)?
            }
            AnimationKind::Animate { target, ops } => {
                let leaves = self.arena.leaves(*target)?;
                let before = self.states(&leaves)?;
                for op in ops {
                    self.apply_op(*target, op)?;
                }
                let after = self.states(&leaves)?;
                let mut track = Track::new(anim.name(), vec![*target]);
                track.keyframes = leaves
                    .iter()
                    .zip(before.into_iter().zip(after))
                    .map(|(&object, (from, to))| Keyframe { object, from, to })
                    .collect();
                track
            }
            AnimationKind::CameraShift { delta } => {
                let from = self.camera;
                self.camera = from + *delta;
                let mut track = Track::new(anim.name(), Vec::new());
                track.camera = Some((from, self.camera));
                track
            }
        };
        track.start = start;
        track.end = end;
        out.push(track);
        Ok(())
    }

    fn enter(&mut self, track: &mut Track, leaves: Vec<ObjectId>) {
        for leaf in &leaves {
            self.visible.insert(*leaf);
        }
        track.enter.extend(leaves);
    }

    fn exit(&mut self, track: &mut Track, leaves: Vec<ObjectId>) {
        for leaf in &leaves {
            self.visible.remove(leaf);
        }
        track.exit.extend(leaves);
    }

    fn realize_transform(
        &mut self,
        name: &str,
        source: ObjectId,
        target: ObjectId,
    ) -> SceneResult<Track> {
        let src = self.arena.leaves(source)?;
        let dst = self.arena.leaves(target)?;
        let mut track = Track::new(name, vec![source, target]);
        if dst.is_empty() {
            return Ok(track);
        }
        for (i, &leaf) in src.iter().enumerate() {
            let twin = dst[i.min(dst.len() - 1)];
            let from = self.state_of(leaf)?;
            let to = self.state_of(twin)?;
            track.keyframes.push(Keyframe { object: leaf, from, to });

            let placement = self.arena.get(twin)?.placement;
            self.arena.get_mut(leaf)?.placement = placement;
            let look = self.arena.look(twin);
            self.arena.set_look(leaf, look)?;
            track.morph.push((leaf, look));
        }
        let newly_visible: Vec<ObjectId> = src
            .into_iter()
            .filter(|l| !self.visible.contains(l))
            .collect();
        self.enter(&mut track, newly_visible);
        Ok(track)
    }

    fn realize_matching(
        &mut self,
        anim: &Animation,
        source: ObjectId,
        target: ObjectId,
    ) -> SceneResult<Track> {
        let src = self.arena.leaves(source)?;
        let dst = self.arena.leaves(target)?;
        let mut track = Track::new(anim.name(), vec![source, target]);

        if let (Some(a), Some(b)) = (
            self.arena.appearance(source)?.tex().cloned(),
            self.arena.appearance(target)?.tex().cloned(),
        ) {
            track.matched = match anim.kind {
                AnimationKind::TransformMatchingTex { .. } => tex::match_parts_by_tex(&a, &b),
                _ => tex::match_glyphs(&a, &b),
            };
        }

        let dst_anchor = match dst.first() {
            Some(first) => Some(self.state_of(*first)?),
            None => None,
        };
        for &leaf in &src {
            let from = self.state_of(leaf)?;
            let mut to = from.faded();
            if let Some(anchor) = dst_anchor {
                to.center = anchor.center;
                to.extent = anchor.extent;
            }
            track.keyframes.push(Keyframe { object: leaf, from, to });
        }
        let src_anchor = match src.first() {
            Some(first) => Some(self.state_of(*first)?),
            None => None,
        };
        for &leaf in &dst {
            let to = self.state_of(leaf)?;
            let mut from = to.faded();
            if let Some(anchor) = src_anchor {
                from.center = anchor.center;
                from.extent = anchor.extent;
            }
            track.keyframes.push(Keyframe { object: leaf, from, to });
        }
        self.exit(&mut track, src);
        self.enter(&mut track, dst);
        Ok(track)
    }

    fn apply_op(&mut self, target: ObjectId, op: &ObjectOp) -> SceneResult<()> {
        match op {
            ObjectOp::Shift { delta } => self.arena.shift(target, *delta),
            ObjectOp::MoveTo { point } => self.arena.move_to(target, *point),
            ObjectOp::SetY { y } => self.arena.set_y(target, *y),
            ObjectOp::Arrange { arrangement } => self.arrange(target, arrangement),
            ObjectOp::ScaleToFitWidth { width } => self.arena.scale_to_fit_width(target, *width),
            ObjectOp::ScaleToFitHeight { height } => {
                self.arena.scale_to_fit_height(target, *height)
            }
            ObjectOp::NextTo {
                anchor,
                direction,
                buff,
            } => self.arena.next_to(target, *anchor, *direction, *buff),
            ObjectOp::Surround { target: around, buff } => {
                let bb = self.arena.bounds(*around)?.padded(*buff);
                let object = self.arena.get_mut(target)?;
                object.natural_size = bb.size();
                object.placement.scale = 1.0;
                object.placement.center = bb.center();
                self.arena.clear_look(target);
                Ok(())
            }
            ObjectOp::SetColor { color } => self.arena.set_color(target, *color),
        }
    }

    /// Close the scene and hand back its record
    pub fn finish(self, name: &str) -> SceneRecord {
        SceneRecord {
            name: name.to_string(),
            duration: self.timeline.total_duration(),
            timeline: self.timeline,
            objects: self.arena,
            visible: self.visible.into_iter().collect(),
            camera: self.camera,
        }
    }
}

/// Result of invoking one scene: its schedule and final state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub name: String,
    pub duration: f64,
    pub timeline: Timeline,
    pub objects: ObjectArena,
    /// Leaves on screen when the last step completes
    pub visible: Vec<ObjectId>,
    pub camera: Vec2,
}

impl SceneRecord {
    /// SHA-256 over the serialized record
    pub fn fingerprint(&self) -> SceneResult<String> {
        let bytes = serde_json::to_vec(self).map_err(SceneError::from)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// All tracks in scene order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.timeline.steps().iter().flat_map(|s| s.tracks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{RIGHT, UP};
    use std::path::Path;

    fn with_ctx<F: FnOnce(&mut SceneContext<'_>)>(f: F) -> SceneRecord {
        let mut loader = AssetLoader::new(Path::new("."));
        let mut ctx = SceneContext::new(&mut loader, 7);
        f(&mut ctx);
        ctx.finish("test")
    }

    #[test]
    fn test_ungrouped_plays_do_not_overlap() {
        let record = with_ctx(|ctx| {
            let ids: Vec<_> = (0..4).map(|i| ctx.tex(&[format!("item {i}")], 48.0)).collect();
            for id in ids {
                ctx.play(vec![Animation::fade_in(id)]).unwrap();
            }
        });
        let plays: Vec<_> = record.timeline.play_steps().collect();
        assert_eq!(plays.len(), 4);
        for pair in plays.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
        assert_eq!(record.duration, 4.0);
        assert_eq!(record.visible.len(), 4);
    }

    #[test]
    fn test_group_in_play_staggers_tracks() {
        let record = with_ctx(|ctx| {
            let a = ctx.rectangle(1.0, 1.0);
            let b = ctx.rectangle(1.0, 1.0);
            ctx.play(vec![Animation::group(
                vec![Animation::fade_in(a), Animation::fade_in(b)],
                0.5,
            )])
            .unwrap();
        });
        let tracks: Vec<_> = record.tracks().collect();
        assert_eq!(tracks.len(), 2);
        assert_eq!((tracks[0].start, tracks[0].end), (0.0, 1.0));
        assert_eq!((tracks[1].start, tracks[1].end), (0.5, 1.5));
    }

    #[test]
    fn test_fade_out_hides_leaves() {
        let record = with_ctx(|ctx| {
            let a = ctx.rectangle(1.0, 1.0);
            let b = ctx.rectangle(1.0, 1.0);
            let g = ctx.group(&[a, b]).unwrap();
            ctx.play(vec![Animation::fade_in(g)]).unwrap();
            assert!(ctx.is_visible(g));
            ctx.play(vec![Animation::fade_out_shift(&[g], UP)]).unwrap();
            assert!(!ctx.is_visible(a));
        });
        assert!(record.visible.is_empty());
        let last = record.tracks().last().unwrap();
        assert_eq!(last.keyframes[0].to.opacity, 0.0);
        assert_eq!(last.keyframes[0].to.center, UP);
    }

    #[test]
    fn test_animate_records_before_and_after() {
        let record = with_ctx(|ctx| {
            let a = ctx.rectangle(1.0, 1.0);
            ctx.add(a).unwrap();
            ctx.play(vec![Animation::animate(a).shift(RIGHT * 2.0).build()])
                .unwrap();
        });
        let track = record.tracks().next().unwrap();
        assert_eq!(track.keyframes[0].from.center, ORIGIN);
        assert_eq!(track.keyframes[0].to.center, RIGHT * 2.0);
    }

    #[test]
    fn test_transform_keeps_source_on_screen() {
        let record = with_ctx(|ctx| {
            let q = ctx.tex(&["question"], 48.0);
            let alt = ctx.tex(&["a much longer question"], 48.0);
            ctx.play(vec![Animation::write(q)]).unwrap();
            ctx.play(vec![Animation::transform(q, alt)]).unwrap();
            assert!(ctx.is_visible(q));
            assert!(!ctx.is_visible(alt));
            let shown = ctx.arena().appearance(q).unwrap();
            assert_eq!(shown.tex().unwrap().source(), "a much longer question");
            let own = ctx.arena().get(q).unwrap();
            assert_eq!(own.tex().unwrap().source(), "question");
        });
        assert_eq!(record.visible.len(), 1);

        // the earlier Write still refers to the original text
        let write = record.tracks().next().unwrap();
        let written = record.objects.get(write.targets[0]).unwrap();
        assert_eq!(written.tex().unwrap().source(), "question");

        let morph = &record.tracks().last().unwrap().morph;
        assert_eq!(morph.len(), 1);
        assert_eq!(morph[0].0, write.targets[0]);
    }

    #[test]
    fn test_part_color_leaves_object_color() {
        with_ctx(|ctx| {
            let quote = ctx.tex(&["first", "second"], 48.0);
            ctx.set_part_color(quote, 0, crate::geometry::YELLOW).unwrap();
            let object = ctx.arena().get(quote).unwrap();
            assert_eq!(object.placement.color, crate::geometry::WHITE);
            let tex = object.tex().unwrap();
            assert_eq!(tex.parts[0].color, crate::geometry::YELLOW);
            assert_eq!(tex.parts[1].color, crate::geometry::WHITE);
        });
    }

    #[test]
    fn test_matching_tex_swaps_objects() {
        let record = with_ctx(|ctx| {
            let a = ctx.math_tex(&["f({{3}}) = {{x^2}}"], 120.0);
            let b = ctx.math_tex(&["{{f(3)}} = {{3}}^2"], 120.0);
            ctx.add(a).unwrap();
            ctx.play(vec![Animation::transform_matching_tex(a, b)]).unwrap();
            assert!(ctx.is_visible(b) && !ctx.is_visible(a));
        });
        let track = record.tracks().next().unwrap();
        assert_eq!(track.matched, vec![(1, 2)]);
    }

    #[test]
    fn test_camera_shift() {
        let record = with_ctx(|ctx| {
            ctx.set_camera_y(25.0);
            ctx.play(vec![Animation::camera_shift(DOWN * 40.5).with_run_time(10.0)])
                .unwrap();
        });
        assert_eq!(record.camera, Vec2::new(0.0, -15.5));
        assert_eq!(record.duration, 10.0);
    }

    #[test]
    fn test_surround_moves_rectangle() {
        with_ctx(|ctx| {
            let a = ctx.rectangle(1.0, 1.0);
            let b = ctx.rectangle(2.0, 2.0);
            ctx.shift(b, RIGHT * 5.0).unwrap();
            let rect = ctx.surrounding_rectangle(a, crate::geometry::WHITE).unwrap();
            ctx.play(vec![Animation::animate(rect).surround(b).build()])
                .unwrap();
            let bb = ctx.arena().bounds(rect).unwrap();
            assert!((bb.center().x - 5.0).abs() < 1e-9);
            assert!((bb.width() - 2.2).abs() < 1e-9);
        });
    }

    #[test]
    fn test_part_bounds_split_expression() {
        with_ctx(|ctx| {
            let m = ctx.math_tex(&["f(", "x", ")", " = ", "x^2"], 120.0);
            let whole = ctx.arena().bounds(m).unwrap();
            let first = ctx.part_bounds(m, 0).unwrap();
            let last = ctx.part_bounds(m, 4).unwrap();
            assert!((first.min.x - whole.min.x).abs() < 1e-9);
            assert!((last.max.x - whole.max.x).abs() < 1e-9);
            let brace = ctx.brace_for_part(m, 1).unwrap();
            assert!(ctx.arena().bounds(brace).unwrap().max.y < whole.min.y);
        });
    }
}
