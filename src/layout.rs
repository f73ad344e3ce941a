use crate::error::{SceneError, SceneResult};
use crate::geometry::{BoundingBox, Size, Vec2, DEFAULT_BUFF, ORIGIN};
use crate::mobject::{ObjectArena, ObjectId};
use serde::{Deserialize, Serialize};

/// How the members of a group are laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Arrangement {
    /// Members one after another in `direction`, then centered at the origin
    Linear { direction: Vec2, buff: f64 },
    /// Row-major grid that keeps the group's current center
    Grid(GridConfig),
}

impl Arrangement {
    pub fn linear(direction: Vec2) -> Self {
        Arrangement::Linear {
            direction,
            buff: DEFAULT_BUFF,
        }
    }

    pub fn grid(config: GridConfig) -> Self {
        Arrangement::Grid(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    #[serde(default)]
    pub col_widths: Option<Vec<f64>>,
    #[serde(default)]
    pub row_heights: Option<Vec<f64>>,
    /// Alignment of each member inside its cell; `ORIGIN` centers
    pub cell_alignment: Vec2,
    pub buff: Vec2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            col_widths: None,
            row_heights: None,
            cell_alignment: ORIGIN,
            buff: Vec2::new(DEFAULT_BUFF, DEFAULT_BUFF),
        }
    }
}

impl GridConfig {
    pub fn rows(rows: usize) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    pub fn cols(cols: usize) -> Self {
        Self {
            cols: Some(cols),
            ..Self::default()
        }
    }

    pub fn with_col_widths(mut self, widths: Vec<f64>) -> Self {
        self.col_widths = Some(widths);
        self
    }

    pub fn with_cell_alignment(mut self, alignment: Vec2) -> Self {
        self.cell_alignment = alignment;
        self
    }

    /// Resolve `(rows, cols)` for `count` members
    pub fn dimensions(&self, count: usize) -> SceneResult<(usize, usize)> {
        let div_ceil = |a: usize, b: usize| a.div_ceil(b);
        let (rows, cols) = match (self.rows, self.cols) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(SceneError::layout("grid needs at least one row and column"))
            }
            (Some(r), Some(c)) => (r, c),
            (Some(r), None) => (r, div_ceil(count, r).max(1)),
            (None, Some(c)) => (div_ceil(count, c).max(1), c),
            (None, None) => {
                let c = (count as f64).sqrt().ceil().max(1.0) as usize;
                (div_ceil(count, c).max(1), c)
            }
        };
        if rows * cols < count {
            return Err(SceneError::layout(format!(
                "{} cells ({}x{}) cannot hold {} members",
                rows * cols,
                rows,
                cols,
                count
            )));
        }
        if let Some(widths) = &self.col_widths {
            if widths.len() != cols {
                return Err(SceneError::layout(format!(
                    "col_widths has {} entries, grid has {} columns",
                    widths.len(),
                    cols
                )));
            }
        }
        if let Some(heights) = &self.row_heights {
            if heights.len() != rows {
                return Err(SceneError::layout(format!(
                    "row_heights has {} entries, grid has {} rows",
                    heights.len(),
                    rows
                )));
            }
        }
        Ok((rows, cols))
    }
}

/// Apply `arrangement` to `members`
pub fn arrange(
    arena: &mut ObjectArena,
    members: &[ObjectId],
    arrangement: &Arrangement,
) -> SceneResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    match arrangement {
        Arrangement::Linear { direction, buff } => arrange_linear(arena, members, *direction, *buff),
        Arrangement::Grid(config) => arrange_grid(arena, members, config),
    }
}

fn members_bounds(arena: &ObjectArena, members: &[ObjectId]) -> SceneResult<BoundingBox> {
    let mut acc = arena.bounds(members[0])?;
    for id in &members[1..] {
        acc = acc.union(&arena.bounds(*id)?);
    }
    Ok(acc)
}

fn arrange_linear(
    arena: &mut ObjectArena,
    members: &[ObjectId],
    direction: Vec2,
    buff: f64,
) -> SceneResult<()> {
    for pair in members.windows(2) {
        arena.next_to(pair[1], pair[0], direction, buff)?;
    }
    let delta = ORIGIN - members_bounds(arena, members)?.center();
    for id in members {
        arena.shift(*id, delta)?;
    }
    Ok(())
}

fn arrange_grid(
    arena: &mut ObjectArena,
    members: &[ObjectId],
    config: &GridConfig,
) -> SceneResult<()> {
    let (rows, cols) = config.dimensions(members.len())?;
    let start_center = members_bounds(arena, members)?.center();

    let sizes: Vec<Size> = members
        .iter()
        .map(|id| arena.bounds(*id).map(|bb| bb.size()))
        .collect::<SceneResult<_>>()?;
    let cell = |r: usize, c: usize| sizes.get(r * cols + c);

    let col_widths: Vec<f64> = match &config.col_widths {
        Some(w) => w.clone(),
        None => (0..cols)
            .map(|c| {
                (0..rows)
                    .filter_map(|r| cell(r, c))
                    .map(|s| s.width)
                    .fold(0.0, f64::max)
            })
            .collect(),
    };
    let row_heights: Vec<f64> = match &config.row_heights {
        Some(h) => h.clone(),
        None => (0..rows)
            .map(|r| {
                (0..cols)
                    .filter_map(|c| cell(r, c))
                    .map(|s| s.height)
                    .fold(0.0, f64::max)
            })
            .collect(),
    };

    let mut x_offsets = Vec::with_capacity(cols);
    let mut x = 0.0;
    for w in &col_widths {
        x_offsets.push(x + w / 2.0);
        x += w + config.buff.x;
    }
    let mut y_offsets = Vec::with_capacity(rows);
    let mut y = 0.0;
    for h in &row_heights {
        y_offsets.push(y - h / 2.0);
        y -= h + config.buff.y;
    }

    for (index, id) in members.iter().enumerate() {
        let (r, c) = (index / cols, index % cols);
        let size = sizes[index];
        let align = config.cell_alignment;
        let target = Vec2::new(
            x_offsets[c] + align.x * (col_widths[c] - size.width) / 2.0,
            y_offsets[r] + align.y * (row_heights[r] - size.height) / 2.0,
        );
        arena.move_to(*id, target)?;
    }

    let delta = start_center - members_bounds(arena, members)?.center();
    for id in members {
        arena.shift(*id, delta)?;
    }
    Ok(())
}
