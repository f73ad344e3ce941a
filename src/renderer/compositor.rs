use crate::geometry::{Vec2, FRAME_HEIGHT, GREY};
use crate::mobject::{ObjectArena, Shape, VisualKind};
use crate::renderer::sampler::FrameSnapshot;
use crate::renderer::FrameBuffer;
use crate::scene::ObjectState;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const OUTLINE_PX: i64 = 2;

/// Draws flat placeholders for each visible leaf
pub struct Compositor;

/// Pixel rectangle `(x, y, width, height)`, y pointing down
type PixelRect = (i64, i64, i64, i64);

impl Compositor {
    pub fn draw(buffer: &mut FrameBuffer, objects: &ObjectArena, snapshot: &FrameSnapshot) {
        buffer.clear(BACKGROUND);
        for (id, state) in &snapshot.objects {
            let Ok(object) = objects.get(snapshot.look(*id)) else {
                continue;
            };
            let rect = Self::to_pixels(buffer, snapshot.camera, state);
            let color = state.color.to_rgba8(state.opacity);
            match &object.kind {
                VisualKind::Image(_) | VisualKind::Svg(_) => {
                    Self::fill_rect(buffer, rect, GREY.to_rgba8(state.opacity));
                    Self::outline_rect(buffer, rect, color);
                }
                VisualKind::Text(tex) | VisualKind::MathTex(tex) => {
                    // parts colored apart from the object keep their own color
                    let lines: Vec<(String, [u8; 4])> = tex
                        .colored_lines()
                        .into_iter()
                        .map(|(line, part_color)| {
                            let c = if part_color == object.placement.color {
                                color
                            } else {
                                part_color.to_rgba8(state.opacity)
                            };
                            (line, c)
                        })
                        .collect();
                    Self::draw_text_placeholder(buffer, rect, &lines);
                }
                VisualKind::Shape(Shape::Brace { .. }) => Self::fill_rect(buffer, rect, color),
                VisualKind::Shape(_) => Self::outline_rect(buffer, rect, color),
                VisualKind::Table { .. } | VisualKind::Group { .. } => {}
            }
        }
    }

    /// Map a scene-space box to pixels relative to the camera
    pub fn to_pixels(buffer: &FrameBuffer, camera: Vec2, state: &ObjectState) -> PixelRect {
        let (w, h) = buffer.dimensions();
        let scale = h as f64 / FRAME_HEIGHT;
        let left = state.center.x - state.extent.width / 2.0 - camera.x;
        let top = state.center.y + state.extent.height / 2.0 - camera.y;
        let px = (left * scale + w as f64 / 2.0).round() as i64;
        let py = (h as f64 / 2.0 - top * scale).round() as i64;
        let pw = (state.extent.width * scale).round().max(1.0) as i64;
        let ph = (state.extent.height * scale).round().max(1.0) as i64;
        (px, py, pw, ph)
    }

    pub fn fill_rect(buffer: &mut FrameBuffer, rect: PixelRect, color: [u8; 4]) {
        let (x, y, width, height) = rect;
        let (buf_w, buf_h) = buffer.dimensions();
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(buf_w as i64);
        let y1 = (y + height).min(buf_h as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                buffer.blend_pixel(px, py, color);
            }
        }
    }

    pub fn outline_rect(buffer: &mut FrameBuffer, rect: PixelRect, color: [u8; 4]) {
        let (x, y, width, height) = rect;
        let t = OUTLINE_PX.min(width).min(height);
        Self::fill_rect(buffer, (x, y, width, t), color);
        Self::fill_rect(buffer, (x, y + height - t, width, t), color);
        Self::fill_rect(buffer, (x, y + t, t, height - 2 * t), color);
        Self::fill_rect(buffer, (x + width - t, y + t, t, height - 2 * t), color);
    }

    /// One bar per line of text, length proportional to the line
    pub fn draw_text_placeholder(
        buffer: &mut FrameBuffer,
        rect: PixelRect,
        lines: &[(String, [u8; 4])],
    ) {
        let (x, y, width, height) = rect;
        if lines.is_empty() {
            return;
        }
        let longest = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(1).max(1);
        let line_h = height / lines.len() as i64;
        let bar_h = (line_h * 6 / 10).max(1);
        for (i, (line, color)) in lines.iter().enumerate() {
            let bar_w = width * line.chars().count() as i64 / longest as i64;
            let top = y + i as i64 * line_h + (line_h - bar_h) / 2;
            Self::fill_rect(buffer, (x, top, bar_w, bar_h), *color);
        }
    }
}
