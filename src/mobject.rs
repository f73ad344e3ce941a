//! Visual objects: the closed set of renderable kinds and the per-scene arena
//! that owns them.

use crate::error::{SceneError, SceneResult};
use crate::geometry::{BoundingBox, Color, Size, Vec2, ORIGIN, WHITE};
use crate::tex::TexContent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Handle to an object inside a [`ObjectArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

/// Geometric primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rectangle,
    SurroundingRectangle { buff: f64 },
    Brace { direction: Vec2 },
}

/// Image or vector file backing an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// The closed set of things a scene can show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualKind {
    Text(TexContent),
    MathTex(TexContent),
    Image(ImageSource),
    Svg(ImageSource),
    Shape(Shape),
    Table {
        rows: usize,
        cols: usize,
        cells: Vec<ObjectId>,
    },
    Group { members: Vec<ObjectId> },
}

/// Where and how an object is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub center: Vec2,
    pub scale: f64,
    pub color: Color,
    pub opacity: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            center: ORIGIN,
            scale: 1.0,
            color: WHITE,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualObject {
    pub kind: VisualKind,
    /// Size at scale 1; unused for containers
    pub natural_size: Size,
    pub placement: Placement,
}

impl VisualObject {
    pub fn is_container(&self) -> bool {
        matches!(self.kind, VisualKind::Group { .. } | VisualKind::Table { .. })
    }

    pub fn children(&self) -> &[ObjectId] {
        match &self.kind {
            VisualKind::Group { members } => members,
            VisualKind::Table { cells, .. } => cells,
            _ => &[],
        }
    }

    pub fn tex(&self) -> Option<&TexContent> {
        match &self.kind {
            VisualKind::Text(t) | VisualKind::MathTex(t) => Some(t),
            _ => None,
        }
    }

    pub fn tex_mut(&mut self) -> Option<&mut TexContent> {
        match &mut self.kind {
            VisualKind::Text(t) | VisualKind::MathTex(t) => Some(t),
            _ => None,
        }
    }
}

/// Owns every object of one scene; ids are indices and never reused.
///
/// Objects are never rewritten by a transform. A transformed leaf keeps its
/// own kind and is redirected to the object whose content it now shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectArena {
    objects: Vec<VisualObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    looks: BTreeMap<ObjectId, ObjectId>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: VisualKind, natural_size: Size) -> ObjectId {
        let id = ObjectId(self.objects.len());
        let color = match &kind {
            VisualKind::Text(t) | VisualKind::MathTex(t) => {
                t.parts.first().map(|p| p.color).unwrap_or(WHITE)
            }
            _ => WHITE,
        };
        self.objects.push(VisualObject {
            kind,
            natural_size,
            placement: Placement {
                color,
                ..Placement::default()
            },
        });
        id
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> SceneResult<&VisualObject> {
        self.objects.get(id.0).ok_or(SceneError::UnknownObject(id.0))
    }

    pub fn get_mut(&mut self, id: ObjectId) -> SceneResult<&mut VisualObject> {
        self.objects
            .get_mut(id.0)
            .ok_or(SceneError::UnknownObject(id.0))
    }

    /// Object whose content `id` currently shows
    pub fn look(&self, id: ObjectId) -> ObjectId {
        self.looks.get(&id).copied().unwrap_or(id)
    }

    /// Content and natural size `id` is drawn with right now
    pub fn appearance(&self, id: ObjectId) -> SceneResult<&VisualObject> {
        self.get(self.look(id))
    }

    /// Make `id` show the content of `look` from now on
    pub fn set_look(&mut self, id: ObjectId, look: ObjectId) -> SceneResult<()> {
        self.get(id)?;
        let look = self.look(look);
        self.get(look)?;
        if look == id {
            self.looks.remove(&id);
        } else {
            self.looks.insert(id, look);
        }
        Ok(())
    }

    pub fn clear_look(&mut self, id: ObjectId) {
        self.looks.remove(&id);
    }

    /// Leaf objects under `id` in draw order (the object itself if it is a leaf)
    pub fn leaves(&self, id: ObjectId) -> SceneResult<Vec<ObjectId>> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out)?;
        Ok(out)
    }

    fn collect_leaves(&self, id: ObjectId, out: &mut Vec<ObjectId>) -> SceneResult<()> {
        let object = self.get(id)?;
        if object.is_container() {
            for child in object.children() {
                self.collect_leaves(*child, out)?;
            }
        } else {
            out.push(id);
        }
        Ok(())
    }

    /// Bounding box; containers are always derived from their current members.
    pub fn bounds(&self, id: ObjectId) -> SceneResult<BoundingBox> {
        let object = self.get(id)?;
        if object.is_container() {
            let mut acc: Option<BoundingBox> = None;
            for child in object.children() {
                let bb = self.bounds(*child)?;
                acc = Some(match acc {
                    Some(a) => a.union(&bb),
                    None => bb,
                });
            }
            Ok(acc.unwrap_or_else(|| BoundingBox::from_center(object.placement.center, Size::default())))
        } else {
            let p = &object.placement;
            let size = self.appearance(id)?.natural_size;
            Ok(BoundingBox::from_center(
                p.center,
                Size::new(size.width * p.scale, size.height * p.scale),
            ))
        }
    }

    pub fn center(&self, id: ObjectId) -> SceneResult<Vec2> {
        Ok(self.bounds(id)?.center())
    }

    pub fn shift(&mut self, id: ObjectId, delta: Vec2) -> SceneResult<()> {
        for leaf in self.leaves(id)? {
            let p = &mut self.get_mut(leaf)?.placement;
            p.center = p.center + delta;
        }
        Ok(())
    }

    pub fn move_to(&mut self, id: ObjectId, target: Vec2) -> SceneResult<()> {
        let delta = target - self.center(id)?;
        self.shift(id, delta)
    }

    pub fn set_y(&mut self, id: ObjectId, y: f64) -> SceneResult<()> {
        let c = self.center(id)?;
        self.move_to(id, Vec2::new(c.x, y))
    }

    /// Scale about the object's own center
    pub fn scale(&mut self, id: ObjectId, factor: f64) -> SceneResult<()> {
        let about = self.center(id)?;
        for leaf in self.leaves(id)? {
            let p = &mut self.get_mut(leaf)?.placement;
            p.center = about + (p.center - about) * factor;
            p.scale *= factor;
        }
        Ok(())
    }

    pub fn scale_to_fit_width(&mut self, id: ObjectId, width: f64) -> SceneResult<()> {
        let current = self.bounds(id)?.width();
        if current > 0.0 {
            self.scale(id, width / current)?;
        }
        Ok(())
    }

    pub fn scale_to_fit_height(&mut self, id: ObjectId, height: f64) -> SceneResult<()> {
        let current = self.bounds(id)?.height();
        if current > 0.0 {
            self.scale(id, height / current)?;
        }
        Ok(())
    }

    /// Place `id` beside `anchor` in `direction`, `buff` apart, aligned on centers
    pub fn next_to(
        &mut self,
        id: ObjectId,
        anchor: ObjectId,
        direction: Vec2,
        buff: f64,
    ) -> SceneResult<()> {
        let anchor_bb = self.bounds(anchor)?;
        self.next_to_box(id, &anchor_bb, direction, buff)
    }

    pub fn next_to_box(
        &mut self,
        id: ObjectId,
        anchor_bb: &BoundingBox,
        direction: Vec2,
        buff: f64,
    ) -> SceneResult<()> {
        let bb = self.bounds(id)?;
        let target_point = anchor_bb.critical_point(direction) + direction * buff;
        let own_point = bb.critical_point(-direction);
        let mut delta = target_point - own_point;
        // keep alignment on the axis perpendicular to the direction
        if direction.x == 0.0 {
            delta.x = anchor_bb.center().x - bb.center().x;
        }
        if direction.y == 0.0 {
            delta.y = anchor_bb.center().y - bb.center().y;
        }
        self.shift(id, delta)
    }

    pub fn set_color(&mut self, id: ObjectId, color: Color) -> SceneResult<()> {
        for leaf in self.leaves(id)? {
            let object = self.get_mut(leaf)?;
            object.placement.color = color;
            if let Some(tex) = object.tex_mut() {
                tex.set_color(color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DOWN, RIGHT};

    fn square(arena: &mut ObjectArena, side: f64) -> ObjectId {
        arena.insert(VisualKind::Shape(Shape::Rectangle), Size::new(side, side))
    }

    #[test]
    fn test_group_bounds_follow_members() {
        let mut arena = ObjectArena::new();
        let a = square(&mut arena, 2.0);
        let b = square(&mut arena, 2.0);
        let group = arena.insert(VisualKind::Group { members: vec![a, b] }, Size::default());

        assert_eq!(arena.bounds(group).unwrap().width(), 2.0);
        arena.shift(b, RIGHT * 4.0).unwrap();
        assert_eq!(arena.bounds(group).unwrap().width(), 6.0);
    }

    #[test]
    fn test_scale_about_center() {
        let mut arena = ObjectArena::new();
        let a = square(&mut arena, 1.0);
        let b = square(&mut arena, 1.0);
        arena.shift(b, RIGHT * 2.0).unwrap();
        let group = arena.insert(VisualKind::Group { members: vec![a, b] }, Size::default());

        arena.scale_to_fit_width(group, 6.0).unwrap();
        let bb = arena.bounds(group).unwrap();
        assert!((bb.width() - 6.0).abs() < 1e-9);
        assert!((bb.center().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_next_to_below() {
        let mut arena = ObjectArena::new();
        let anchor = square(&mut arena, 2.0);
        let label = square(&mut arena, 1.0);
        arena.next_to(label, anchor, DOWN, 0.25).unwrap();

        let bb = arena.bounds(label).unwrap();
        assert!((bb.max.y - (-1.25)).abs() < 1e-9);
        assert!((bb.center().x).abs() < 1e-9);
    }

    #[test]
    fn test_look_redirects_size_without_rewriting() {
        let mut arena = ObjectArena::new();
        let small = square(&mut arena, 1.0);
        let big = square(&mut arena, 3.0);
        arena.set_look(small, big).unwrap();

        assert_eq!(arena.look(small), big);
        assert_eq!(arena.bounds(small).unwrap().width(), 3.0);
        assert_eq!(arena.get(small).unwrap().natural_size, Size::new(1.0, 1.0));

        arena.set_look(small, small).unwrap();
        assert_eq!(arena.look(small), small);
    }

    #[test]
    fn test_record_arena_serializes_groups() {
        let mut arena = ObjectArena::new();
        let a = square(&mut arena, 1.0);
        let b = square(&mut arena, 1.0);
        arena.insert(VisualKind::Group { members: vec![a, b] }, Size::default());
        arena.set_look(a, b).unwrap();

        let json = serde_json::to_string(&arena).unwrap();
        let back: ObjectArena = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(ObjectId(2)).unwrap().children(), &[a, b]);
        assert_eq!(back.look(a), b);
    }

    #[test]
    fn test_unknown_object() {
        let arena = ObjectArena::new();
        assert!(matches!(
            arena.get(ObjectId(3)),
            Err(SceneError::UnknownObject(3))
        ));
    }
}
