use glam::IVec2;

use yawolf_rs::{
    RenderConfig, RenderError, RenderSession,
    engine::{HeightSource, SOLID_HEIGHT, UNITS_PER_SQUARE},
    world::{Lifecycle, Pixel, Square, builtin, demo_level},
};

fn configured(config: &RenderConfig) -> RenderSession {
    let mut s = RenderSession::new();
    s.configure(config).unwrap();
    s
}

#[test]
fn open_field_render_writes_every_cell() {
    let config = RenderConfig {
        camera_pos_x: 0.0,
        camera_pos_y: 0.0,
        camera_view_distance: 40,
        map_width: 100,
        map_height: 100,
        frame_width: 100,
        frame_height: 100,
        ..RenderConfig::default()
    };
    let mut s = configured(&config);
    s.render(100, 100).unwrap();

    let frame = s.frame().unwrap();
    let cells = frame.grid().unwrap().cells();
    assert_eq!(cells.len(), 100 * 100);
    assert!(cells.iter().all(|&px| px != Pixel::BLANK));

    let text = frame.to_text().unwrap();
    assert_eq!(text.len(), 101 * 100);
    assert_eq!(text.lines().count(), 100);
}

#[test]
fn demo_level_shows_wall_floor_and_ceiling() {
    let mut s = configured(&RenderConfig::default());
    demo_level(s.map_mut().unwrap(), builtin()).unwrap();
    s.render_frame().unwrap();

    let text = s.frame().unwrap().to_text().unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 40);
    assert!(rows.iter().all(|r| r.chars().count() == 80));

    // brick at (12, 1), ten and a half squares straight ahead
    assert_eq!(rows[20].chars().nth(40), Some('+'));
    assert_eq!(rows[0].chars().nth(40), Some(':'));
    assert_eq!(rows[39].chars().nth(40), Some('.'));
}

#[test]
fn wall_placed_through_session_is_rendered() {
    let config = RenderConfig {
        map_width: 8,
        map_height: 8,
        camera_pos_x: 1.5,
        camera_pos_y: 4.5,
        ..RenderConfig::default()
    };
    let mut s = configured(&config);
    let brick = builtin().get_or_fallback("BRICK");
    let map = s.map_mut().unwrap();
    assert_eq!(map.place_wall(2, 0, 0, 7, brick).unwrap(), 8);
    assert_eq!(map.height_at(2, 4), UNITS_PER_SQUARE);
    assert_eq!(map.height_at(-1, 4), SOLID_HEIGHT);

    s.render_frame().unwrap();
    // half a square away: nearest shade, face 0 → densest glyph
    let text = s.frame().unwrap().to_text().unwrap();
    let middle = text.lines().nth(20).unwrap();
    assert!(middle.chars().all(|c| c == '@'), "{middle}");
}

#[test]
fn diagonal_wall_marks_only_its_cells() {
    let mut s = configured(&RenderConfig::default());
    let brick = builtin().get_or_fallback("BRICK");
    let map = s.map_mut().unwrap();
    map.place_wall(0, 0, 1, 1, brick).unwrap();

    let map = s.map().unwrap();
    assert!(map.height(0, 0).unwrap() > 0);
    assert!(map.height(1, 1).unwrap() > 0);
    assert_eq!(map.height(1, 0), Some(0));
    assert_eq!(map.height(0, 1), Some(0));
}

#[test]
fn reconfigure_gives_fresh_grids() {
    let mut s = configured(&RenderConfig::default());
    s.map_mut()
        .unwrap()
        .set_square(3, 3, Square::solid(1))
        .unwrap();
    s.render_frame().unwrap();

    let smaller = RenderConfig {
        map_width: 6,
        map_height: 6,
        frame_width: 20,
        frame_height: 10,
        ..RenderConfig::default()
    };
    s.configure(&smaller).unwrap();

    let map = s.map().unwrap();
    assert_eq!(map.lifecycle(), Lifecycle::Initialized);
    assert_eq!(map.generation(), 2);
    assert_eq!(map.height(3, 3), Some(0));
    assert_eq!(s.frame().unwrap().size().unwrap(), glam::UVec2::new(20, 10));

    assert!(matches!(s.render(80, 40), Err(RenderError::FrameSize { .. })));
    s.render(20, 10).unwrap();
}

#[test]
fn camera_turn_round_trip_is_exact() {
    let mut s = configured(&RenderConfig::default());
    let start = *s.camera().unwrap();
    for a in [1, 7, 256, 1000, -333] {
        s.turn(a).unwrap();
        s.turn(-a).unwrap();
        assert_eq!(*s.camera().unwrap(), start);
    }
    s.walk(UNITS_PER_SQUARE).unwrap();
    assert_eq!(
        s.camera().unwrap().pos(),
        start.pos() + IVec2::new(UNITS_PER_SQUARE, 0)
    );
}

#[test]
fn failed_reconfigure_leaves_nothing_to_render() {
    let mut s = configured(&RenderConfig::default());
    demo_level(s.map_mut().unwrap(), builtin()).unwrap();
    s.render_frame().unwrap();

    let too_big = RenderConfig {
        map_width: usize::MAX,
        ..RenderConfig::default()
    };
    assert!(s.configure(&too_big).is_err());
    assert!(!s.is_configured());
    assert!(matches!(s.render_frame(), Err(RenderError::NotConfigured)));
    assert!(matches!(s.present(&mut Vec::new()), Err(RenderError::NotConfigured)));

    s.configure(&RenderConfig::default()).unwrap();
    assert_eq!(s.map().unwrap().height(12, 1), Some(0));
    s.render_frame().unwrap();
}
