use tracing::debug;

use super::grid::GridError;
use super::map::Map;
use super::texture::TextureBank;

/// Demo layout, 20 × 15. `#` is a brick wall, `.` is open floor.
pub const DEMO_LAYOUT: [&str; 15] = [
    "............#....#..",
    "............#....#..",
    "............#...##..",
    "#......#....#.......",
    ".........#..###..#..",
    ".................#..",
    "###....#.........#..",
    ".......#.......#....",
    ".......#.......#####",
    ".....#####..........",
    ".....#...#.........#",
    ".....#...#....###..#",
    ".....#........#.....",
    ".....#...###..#.....",
    ".....#...#....#.....",
];

pub const DEMO_WIDTH: usize = 20;
pub const DEMO_LENGTH: usize = 15;

/// Paint `layout` into `map` with its top-left corner at `(0, 0)`.
///
/// `#` cells take `BRICK` from `bank`; every other character is left alone.
pub fn paint_layout(map: &mut Map, layout: &[&str], bank: &TextureBank) -> Result<usize, GridError> {
    let brick = bank.get_or_fallback("BRICK");
    let mut painted = 0;
    for (y, row) in layout.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                painted += map.place_wall(x as i64, y as i64, 0, 0, brick)?;
            }
        }
    }
    Ok(painted)
}

/// Fill an initialized map with the demo level: a stone border around the
/// whole map, then [`DEMO_LAYOUT`] on top.
pub fn demo_level(map: &mut Map, bank: &TextureBank) -> Result<(), GridError> {
    let w = map.width()? as i64;
    let l = map.length()? as i64;
    let stone = bank.get_or_fallback("STONE");

    map.place_wall(0, 0, w - 1, 0, stone)?;
    map.place_wall(0, l - 1, w - 1, 0, stone)?;
    map.place_wall(0, 0, 0, l - 1, stone)?;
    map.place_wall(w - 1, 0, 0, l - 1, stone)?;

    let painted = paint_layout(map, &DEMO_LAYOUT, bank)?;
    debug!(width = w, length = l, painted, "demo level ready");
    Ok(())
}
