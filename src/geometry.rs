use rand::Rng;

/// Size of the play area in game units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the target, in game units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive ranges a target's top-left corner may be placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementBounds {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl PlacementBounds {
    pub fn contains(&self, p: Position) -> bool {
        (self.x_min..=self.x_max).contains(&p.x) && (self.y_min..=self.y_max).contains(&p.y)
    }
}

/// Target size and the margins kept clear around the play area.
///
/// `top_inset` leaves room for the score header and `bottom_inset` for the
/// footer; `padding` applies on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub target_size: u32,
    pub padding: u32,
    pub top_inset: u32,
    pub bottom_inset: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            target_size: 120,
            padding: 20,
            top_inset: 100,
            bottom_inset: 180,
        }
    }
}

impl Geometry {
    fn raw_bounds(&self, viewport: Viewport) -> (u32, i64, u32, i64) {
        let size = self.target_size as i64;
        let pad = self.padding as i64;

        let x_min = self.padding;
        let x_max = viewport.width as i64 - size - pad;

        let y_min = self.padding.saturating_add(self.top_inset);
        let y_max = viewport.height as i64 - size - pad - self.bottom_inset as i64;

        (x_min, x_max, y_min, y_max)
    }

    /// Whether the viewport is large enough for an unclamped placement range
    pub fn fits(&self, viewport: Viewport) -> bool {
        let (x_min, x_max, y_min, y_max) = self.raw_bounds(viewport);
        x_max >= x_min as i64 && y_max >= y_min as i64
    }

    /// Placement ranges for `viewport`. An axis too small for the target
    /// collapses onto its lower bound.
    pub fn bounds(&self, viewport: Viewport) -> PlacementBounds {
        let (x_min, x_max, y_min, y_max) = self.raw_bounds(viewport);
        PlacementBounds {
            x_min,
            x_max: clamp_upper(x_min, x_max),
            y_min,
            y_max: clamp_upper(y_min, y_max),
        }
    }

    /// Uniformly sample a target position inside `bounds(viewport)`
    pub fn random_position<R: Rng>(&self, viewport: Viewport, rng: &mut R) -> Position {
        let b = self.bounds(viewport);
        Position {
            x: rng.gen_range(b.x_min..=b.x_max),
            y: rng.gen_range(b.y_min..=b.y_max),
        }
    }

    /// Does `point` land on a target placed at `target`?
    pub fn hits(&self, target: Position, point: Position) -> bool {
        let size = self.target_size;
        point.x >= target.x
            && point.x < target.x.saturating_add(size)
            && point.y >= target.y
            && point.y < target.y.saturating_add(size)
    }
}

/// How many game units one terminal cell spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub width: u32,
    pub height: u32,
}

/// A block of terminal cells, `cols x rows` starting at (`col`, `row`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub col: u32,
    pub row: u32,
    pub cols: u32,
    pub rows: u32,
}

impl CellSpan {
    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.col
            && col < self.col.saturating_add(self.cols)
            && row >= self.row
            && row < self.row.saturating_add(self.rows)
    }
}

impl CellScale {
    pub fn viewport(&self, cols: u16, rows: u16) -> Viewport {
        Viewport {
            width: (cols as u32).saturating_mul(self.width),
            height: (rows as u32).saturating_mul(self.height),
        }
    }

    /// Centre of a cell, in game units
    pub fn point_at(&self, col: u16, row: u16) -> Position {
        Position {
            x: (col as u32)
                .saturating_mul(self.width)
                .saturating_add(self.width / 2),
            y: (row as u32)
                .saturating_mul(self.height)
                .saturating_add(self.height / 2),
        }
    }

    /// Every cell that overlaps a square of `size` units at `position`
    pub fn span(&self, position: Position, size: u32) -> CellSpan {
        let col = position.x / self.width;
        let row = position.y / self.height;
        let end_col = div_ceil(position.x.saturating_add(size), self.width);
        let end_row = div_ceil(position.y.saturating_add(size), self.height);
        CellSpan {
            col,
            row,
            cols: end_col.saturating_sub(col).max(1),
            rows: end_row.saturating_sub(row).max(1),
        }
    }
}

fn div_ceil(value: u32, by: u32) -> u32 {
    value / by + u32::from(value % by != 0)
}

fn clamp_upper(min: u32, max: i64) -> u32 {
    if max < min as i64 {
        min
    } else {
        u32::try_from(max).unwrap_or(u32::MAX)
    }
}
