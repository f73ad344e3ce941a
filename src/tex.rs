//! Tex content handling: splitting into addressable parts, measuring and
//! matching parts between two expressions.

use crate::geometry::{Color, Size, WHITE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Default font size, matching a 48pt body text
pub const DEFAULT_FONT_SIZE: f64 = 48.0;

/// One independently colorable piece of a Tex expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexPart {
    pub tex: String,
    pub color: Color,
}

/// Typeset content of a `Text` or `MathTex` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexContent {
    pub parts: Vec<TexPart>,
    pub font_size: f64,
    #[serde(default)]
    pub environment: Option<String>,
}

fn double_brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("static regex"))
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\(?:begin|end)\{[^}]*\}|\\[a-zA-Z]+|[{}$]").expect("static regex"))
}

/// Split a string on `{{ ... }}` markers; text between markers becomes its own part.
pub fn split_double_braces(source: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in double_brace_re().captures_iter(source) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(source[last..whole.start()].to_string());
        }
        parts.push(inner.as_str().to_string());
        last = whole.end();
    }
    if last < source.len() {
        parts.push(source[last..].to_string());
    }
    parts.retain(|p| !p.trim().is_empty());
    parts
}

impl TexContent {
    /// Build from one or more source strings, each further split on `{{ }}`.
    pub fn new<S: AsRef<str>>(sources: &[S], font_size: f64) -> Self {
        let parts = sources
            .iter()
            .flat_map(|s| split_double_braces(s.as_ref()))
            .map(|tex| TexPart { tex, color: WHITE })
            .collect();
        Self {
            parts,
            font_size,
            environment: None,
        }
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = Some(environment.to_string());
        self
    }

    /// Color every part whose tex contains `needle`
    pub fn set_color_by_tex(&mut self, needle: &str, color: Color) {
        for part in self.parts.iter_mut().filter(|p| p.tex.contains(needle)) {
            part.color = color;
        }
    }

    pub fn set_part_color(&mut self, index: usize, color: Color) {
        if let Some(part) = self.parts.get_mut(index) {
            part.color = color;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        for part in &mut self.parts {
            part.color = color;
        }
    }

    /// Full source, parts concatenated
    pub fn source(&self) -> String {
        self.parts.iter().map(|p| p.tex.as_str()).collect()
    }

    /// Lines of visible text; `\\` breaks lines
    pub fn visible_lines(&self) -> Vec<String> {
        self.source()
            .split(r"\\")
            .map(visible_text)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Visible lines, each with the color of the part its text starts in
    pub fn colored_lines(&self) -> Vec<(String, Color)> {
        let mut lines: Vec<(String, Option<Color>)> = vec![(String::new(), None)];
        for part in &self.parts {
            for (i, segment) in part.tex.split(r"\\").enumerate() {
                if i > 0 {
                    lines.push((String::new(), None));
                }
                if let Some((text, color)) = lines.last_mut() {
                    if color.is_none() && !visible_text(segment).is_empty() {
                        *color = Some(part.color);
                    }
                    text.push_str(segment);
                }
            }
        }
        lines
            .into_iter()
            .filter_map(|(text, color)| {
                let visible = visible_text(&text);
                (!visible.is_empty()).then(|| (visible, color.unwrap_or(WHITE)))
            })
            .collect()
    }

    /// Approximate typeset size at scale 1
    pub fn natural_size(&self) -> Size {
        let lines = self.visible_lines();
        let line_height = self.line_height();
        let longest = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        Size::new(
            longest as f64 * line_height * 0.5,
            lines.len().max(1) as f64 * line_height,
        )
    }

    fn line_height(&self) -> f64 {
        0.6 * self.font_size / DEFAULT_FONT_SIZE
    }

    /// Horizontal `(offset, width)` fraction of each part along the expression
    pub fn part_spans(&self) -> Vec<(f64, f64)> {
        let weights: Vec<f64> = self
            .parts
            .iter()
            .map(|p| visible_text(&p.tex).chars().count().max(1) as f64)
            .collect();
        let total: f64 = weights.iter().sum();
        let mut offset = 0.0;
        weights
            .into_iter()
            .map(|w| {
                let span = (offset / total, w / total);
                offset += w;
                span
            })
            .collect()
    }
}

/// Strip Tex commands and grouping characters, collapse whitespace
pub fn visible_text(tex: &str) -> String {
    let stripped = command_re().replace_all(tex, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pair up parts of `from` and `to` that carry identical tex.
///
/// Each target part is matched at most once, in order of appearance.
pub fn match_parts_by_tex(from: &TexContent, to: &TexContent) -> Vec<(usize, usize)> {
    let mut used = vec![false; to.parts.len()];
    let mut pairs = Vec::new();
    for (i, part) in from.parts.iter().enumerate() {
        let key = part.tex.trim();
        if let Some(j) = (0..to.parts.len()).find(|&j| !used[j] && to.parts[j].tex.trim() == key) {
            used[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}

/// Pair up individual glyphs of `from` and `to` that are the same character.
///
/// Returns `(from_glyph, to_glyph)` indices into the whitespace-free visible text.
pub fn match_glyphs(from: &TexContent, to: &TexContent) -> Vec<(usize, usize)> {
    let glyphs = |c: &TexContent| -> Vec<char> {
        visible_text(&c.source())
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect()
    };
    let a = glyphs(from);
    let b = glyphs(to);
    let mut used = vec![false; b.len()];
    let mut pairs = Vec::new();
    for (i, ch) in a.iter().enumerate() {
        if let Some(j) = (0..b.len()).find(|&j| !used[j] && b[j] == *ch) {
            used[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}
