//! Level geometry: a `width × length` grid of [`Square`]s.
//!
//! Placement helpers (`place_wall`, `place_*_room`) paint whole shapes from a
//! [`Texture`]. They validate every target cell first, so a shape that leaves
//! the grid changes nothing.

use tracing::debug;

use super::grid::{Grid, GridError, GridSlot, Lifecycle};
use super::pixel::Pixel;
use super::texture::Texture;
use crate::engine::{HeightSource, SOLID_HEIGHT, UNITS_PER_SQUARE};

/// One map cell.
///
/// `height` is in squares: positive rises from the floor, negative hangs
/// from the ceiling, zero is open floor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Square {
    pub height: i32,
    /// Optional textured vertical slice, top row first.
    pub column: Option<Vec<Pixel>>,
}

impl Square {
    pub fn solid(height: i32) -> Self {
        Self {
            height,
            column: None,
        }
    }

    /// Square painted from column `c` of `tex`.
    pub fn painted(tex: &Texture, c: usize) -> Self {
        if tex.is_empty() {
            return Self::default();
        }
        Self {
            height: tex.height().min(i32::MAX as usize) as i32,
            column: Some(tex.column(c)),
        }
    }

    /// Colour sample at vertical fraction `v` (0 = bottom, 1 = top).
    pub fn texel(&self, v: f32) -> Option<Pixel> {
        let col = self.column.as_deref()?;
        if col.is_empty() {
            return None;
        }
        let n = col.len();
        let from_top = ((1.0 - v.clamp(0.0, 1.0)) * n as f32) as usize;
        Some(col[from_top.min(n - 1)])
    }
}

/// The level grid plus its lifecycle guard.
#[derive(Debug)]
pub struct Map {
    slot: GridSlot<Square>,
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    pub const fn new() -> Self {
        Self {
            slot: GridSlot::new("map"),
        }
    }

    /*──────────────────────── lifecycle ─────────────────────────────*/

    pub fn create(&mut self, width: usize, length: usize) -> Result<Lifecycle, GridError> {
        self.slot.create(width, length)
    }

    pub fn request_recreate(&mut self) -> Result<Lifecycle, GridError> {
        self.slot.request_recreate()
    }

    pub fn teardown(&mut self) -> Lifecycle {
        self.slot.teardown()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    pub fn width(&self) -> Result<usize, GridError> {
        Ok(self.slot.grid()?.width())
    }

    pub fn length(&self) -> Result<usize, GridError> {
        Ok(self.slot.grid()?.height())
    }

    pub fn grid(&self) -> Result<&Grid<Square>, GridError> {
        self.slot.grid()
    }

    /*──────────────────────── cell access ───────────────────────────*/

    pub fn square(&self, x: i64, y: i64) -> Result<&Square, GridError> {
        self.slot.grid()?.get(x, y)
    }

    pub fn set_square(&mut self, x: i64, y: i64, square: Square) -> Result<(), GridError> {
        self.slot.grid_mut()?.set(x, y, square)
    }

    /// Height in squares, or `None` outside the grid (or before `create`).
    pub fn height(&self, x: i64, y: i64) -> Option<i32> {
        let grid = self.slot.grid().ok()?;
        grid.get(x, y).ok().map(|sq| sq.height)
    }

    /*──────────────────────── placement ─────────────────────────────*/

    /// Paint the line `(x, y) → (x + dx, y + dy)`, both ends inclusive.
    ///
    /// Cell `k` along the line takes texture column `k`. Returns the number
    /// of painted cells.
    pub fn place_wall(
        &mut self,
        x: i64,
        y: i64,
        dx: i64,
        dy: i64,
        texture: &Texture,
    ) -> Result<usize, GridError> {
        let (x1, y1) = self.check_span(x, y, dx, dy)?;
        let cells = line_cells(x, y, x1, y1)
            .into_iter()
            .enumerate()
            .map(|(k, (cx, cy))| (cx, cy, k));
        let n = self.paint(cells, texture)?;
        debug!(x, y, dx, dy, texture = texture.name(), cells = n, "placed wall");
        Ok(n)
    }

    /// Paint the filled axis-aligned rectangle with corners `(x, y)` and
    /// `(x + dx, y + dy)`. Cells take texture column `cx`.
    pub fn place_rectangular_room(
        &mut self,
        x: i64,
        y: i64,
        dx: i64,
        dy: i64,
        texture: &Texture,
    ) -> Result<usize, GridError> {
        let (x1, y1) = self.check_span(x, y, dx, dy)?;
        let (x0, x1) = (x.min(x1), x.max(x1));
        let (y0, y1) = (y.min(y1), y.max(y1));
        let cells = (y0..=y1).flat_map(|cy| (x0..=x1).map(move |cx| (cx, cy, cx as usize)));
        let n = self.paint(cells, texture)?;
        debug!(x, y, dx, dy, texture = texture.name(), cells = n, "placed rectangular room");
        Ok(n)
    }

    /// Paint every cell whose centre offset from `(x, y)` satisfies
    /// `dx² + dy² ≤ r²`.
    pub fn place_circular_room(
        &mut self,
        x: i64,
        y: i64,
        r: u32,
        texture: &Texture,
    ) -> Result<usize, GridError> {
        let r = r as i64;
        // the four extreme cells lie on the circle, so the rest fit too
        self.check_span(x, y, r, 0)?;
        self.check_span(x, y, 0, r)?;
        self.check_span(x, y, -r, 0)?;
        self.check_span(x, y, 0, -r)?;

        let r2 = (r as i128).pow(2);
        let cells = (y - r..=y + r).flat_map(move |cy| {
            (x - r..=x + r)
                .filter(move |&cx| ((cx - x) as i128).pow(2) + ((cy - y) as i128).pow(2) <= r2)
                .map(move |cx| (cx, cy, cx as usize))
        });
        let n = self.paint(cells, texture)?;
        debug!(x, y, r, texture = texture.name(), cells = n, "placed circular room");
        Ok(n)
    }

    /// Check that both `(x, y)` and `(x + dx, y + dy)` are inside the grid and
    /// return the far end. Every shape spanned by the two stays inside too.
    fn check_span(&self, x: i64, y: i64, dx: i64, dy: i64) -> Result<(i64, i64), GridError> {
        let grid = self.slot.grid()?;
        grid.index(x, y)?;
        let (Some(x1), Some(y1)) = (x.checked_add(dx), y.checked_add(dy)) else {
            return Err(GridError::OutOfBounds {
                x: x.saturating_add(dx),
                y: y.saturating_add(dy),
                width: grid.width(),
                height: grid.height(),
            });
        };
        grid.index(x1, y1)?;
        Ok((x1, y1))
    }

    /// Validate all `(x, y, column)` targets, then paint them.
    fn paint<I>(&mut self, cells: I, texture: &Texture) -> Result<usize, GridError>
    where
        I: IntoIterator<Item = (i64, i64, usize)>,
    {
        let grid = self.slot.grid_mut()?;
        let targets = cells
            .into_iter()
            .map(|(cx, cy, col)| grid.index(cx, cy).map(|i| (i, col)))
            .collect::<Result<Vec<_>, _>>()?;

        let dst = grid.cells_mut();
        for &(i, col) in &targets {
            dst[i] = Square::painted(texture, col);
        }
        Ok(targets.len())
    }
}

/// Library-unit height source for the ray caster. Anything outside the grid
/// reads as [`SOLID_HEIGHT`].
impl HeightSource for Map {
    fn height_at(&self, x: i32, y: i32) -> i32 {
        match self.height(x as i64, y as i64) {
            Some(h) => (h as i64 * UNITS_PER_SQUARE as i64)
                .clamp(-(SOLID_HEIGHT as i64 - 1), SOLID_HEIGHT as i64 - 1)
                as i32,
            None => SOLID_HEIGHT,
        }
    }
}

/// Integer Bresenham line, both endpoints included.
fn line_cells(mut x0: i64, mut y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut out = Vec::with_capacity(dx.max(-dy) as usize + 1);

    loop {
        out.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    out
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::pixel::Rgb;

    fn map(w: usize, l: usize) -> Map {
        let mut m = Map::new();
        m.create(w, l).unwrap();
        m
    }

    fn brick() -> Texture {
        Texture::solid("BRICK", 1, 2, Pixel::new(Rgb::new(180, 40, 30), '#')).unwrap()
    }

    #[test]
    fn get_before_create_is_an_error() {
        let m = Map::new();
        assert_eq!(m.square(0, 0).unwrap_err(), GridError::NotInitialized("map"));
        let mut m = Map::new();
        assert!(m.set_square(0, 0, Square::solid(1)).is_err());
    }

    #[test]
    fn set_get_round_trip_keeps_column() {
        let mut m = map(4, 4);
        let sq = Square {
            height: 2,
            column: Some(vec![Pixel::BLANK; 2]),
        };
        m.set_square(0, 0, sq.clone()).unwrap();
        assert_eq!(m.square(0, 0).unwrap(), &sq);
    }

    #[test]
    fn negative_coordinates_rejected() {
        let mut m = map(4, 4);
        assert_eq!(
            m.set_square(-1, 2, Square::solid(1)).unwrap_err(),
            GridError::NegativeCoordinate { x: -1, y: 2 }
        );
    }

    #[test]
    fn out_of_bounds_heights_are_solid() {
        let m = map(3, 2);
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (100, 100), (i32::MIN, 5)] {
            assert_eq!(m.height_at(x, y), SOLID_HEIGHT, "({x}, {y})");
        }
        assert_eq!(m.height_at(0, 0), 0);
        assert_eq!(Map::new().height_at(0, 0), SOLID_HEIGHT);
    }

    #[test]
    fn height_source_scales_to_library_units() {
        let mut m = map(2, 2);
        m.set_square(1, 1, Square::solid(-2)).unwrap();
        assert_eq!(m.height_at(1, 1), -2 * UNITS_PER_SQUARE);
    }

    #[test]
    fn diagonal_wall_paints_only_the_diagonal() {
        let mut m = map(4, 4);
        let tex = brick();
        assert_eq!(m.place_wall(0, 0, 1, 1, &tex), Ok(2));

        assert_eq!(m.square(0, 0).unwrap(), &Square::painted(&tex, 0));
        assert_eq!(m.square(1, 1).unwrap(), &Square::painted(&tex, 1));
        assert_eq!(m.square(1, 0).unwrap(), &Square::default());
        assert_eq!(m.square(0, 1).unwrap(), &Square::default());
        assert_eq!(m.square(2, 2).unwrap(), &Square::default());
    }

    #[test]
    fn wall_with_negative_delta_runs_backwards() {
        let mut m = map(5, 1);
        assert_eq!(m.place_wall(4, 0, -3, 0, &brick()), Ok(4));
        assert_eq!(m.height(0, 0), Some(0));
        assert!((1..=4).all(|x| m.height(x, 0) == Some(2)));
    }

    #[test]
    fn wall_leaving_grid_changes_nothing() {
        let mut m = map(3, 3);
        let err = m.place_wall(0, 0, 5, 0, &brick()).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { x: 5, .. }));
        assert!(m.grid().unwrap().cells().iter().all(|s| s.height == 0));
    }

    #[test]
    fn huge_extents_are_out_of_bounds() {
        let mut m = map(4, 4);
        let tex = brick();
        let cases = [
            m.place_wall(1, 0, i64::MAX, 0, &tex),
            m.place_wall(0, 1, 0, i64::MAX, &tex),
            m.place_wall(3, 3, i64::MAX - 10, 0, &tex),
            m.place_rectangular_room(1, 1, i64::MAX, i64::MAX, &tex),
            m.place_circular_room(1, 1, u32::MAX, &tex),
        ];
        for res in cases {
            assert!(matches!(res, Err(GridError::OutOfBounds { .. })), "{res:?}");
        }
        assert!(matches!(
            m.place_rectangular_room(1, 1, i64::MIN, 0, &tex),
            Err(GridError::NegativeCoordinate { .. })
        ));
        assert!(m.grid().unwrap().cells().iter().all(|s| s.height == 0));
    }

    #[test]
    fn rectangular_room_is_filled_span() {
        let mut m = map(6, 6);
        assert_eq!(m.place_rectangular_room(4, 3, -2, 1, &brick()), Ok(6));
        for y in 0..6 {
            for x in 0..6 {
                let inside = (2..=4).contains(&x) && (3..=4).contains(&y);
                assert_eq!(m.height(x, y) == Some(2), inside, "({x}, {y})");
            }
        }
    }

    #[test]
    fn circular_room_boundary_inclusive() {
        let mut m = map(7, 7);
        // r = 2: 13 cells (centre, 4 at distance 1, 4 diagonals, 4 at distance 2)
        assert_eq!(m.place_circular_room(3, 3, 2, &brick()), Ok(13));
        assert_eq!(m.height(5, 3), Some(2));
        assert_eq!(m.height(3, 1), Some(2));
        assert_eq!(m.height(5, 5), Some(0));
    }

    #[test]
    fn empty_texture_carves_floor() {
        let mut m = map(3, 3);
        m.place_rectangular_room(0, 0, 2, 2, &brick()).unwrap();
        m.place_wall(1, 0, 0, 2, &Texture::empty()).unwrap();
        assert_eq!(m.square(1, 1).unwrap(), &Square::default());
        assert_eq!(m.height(0, 1), Some(2));
    }

    #[test]
    fn texel_samples_top_down() {
        let top = Pixel::new(Rgb::WHITE, 't');
        let bottom = Pixel::new(Rgb::BLACK, 'b');
        let sq = Square {
            height: 2,
            column: Some(vec![top, bottom]),
        };
        assert_eq!(sq.texel(0.9), Some(top));
        assert_eq!(sq.texel(0.1), Some(bottom));
        assert_eq!(sq.texel(1.0), Some(top));
        assert_eq!(Square::solid(1).texel(0.5), None);
    }
}
