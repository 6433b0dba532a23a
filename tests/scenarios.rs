use pyramids::config::ViewerConfig;
use pyramids::frame::{handle_key, Animation, FrameState, Tick, MIN_TESSELLATION};
use pyramids::geometry::{Fractal, Style, CELL_TRIANGLES, PYRAMID_TRIANGLES};
use pyramids::render::{Renderer, View};
use pyramids::scene::{build_frame, Lattice};
use pyramids::vec3::Point3;

#[test]
fn reference_frame_matches_closed_form() {
    let config = ViewerConfig::default();
    let fractal = Fractal::new(config.fractal.threshold, config.fractal.style);

    // 11x11 lattice: 60 odd-sum pairs, 4 of them in the central 3x3, two layers.
    let placements = (60 - 4) * 2;
    let per_placement = CELL_TRIANGLES * 5 * 5 * 5;

    assert_eq!(placements * per_placement, build_frame(&config.lattice, &fractal).len());
}

#[test]
fn frames_are_rebuilt_identically() {
    let lattice = Lattice {
        extent: 3,
        ..Lattice::default()
    };
    let fractal = Fractal::default();

    let first = build_frame(&lattice, &fractal);
    let second = build_frame(&lattice, &fractal);
    assert_eq!(first, second);
}

#[test]
fn every_terminal_pair_mirrors_through_the_horizontal_plane() {
    let fractal = Fractal::default();
    let triangles = fractal.generate(Point3::new(8.0, 8.0, -24.0), 4.0);

    for pair in triangles.chunks(CELL_TRIANGLES) {
        let (up, down) = pair.split_at(PYRAMID_TRIANGLES);
        // The apex is the only vertex shared by all four lateral faces; it
        // sits last on upright faces and in the middle on inverted ones.
        let up_apex = up[0].vertices[2];
        let down_apex = down[0].vertices[1];

        assert_eq!(Point3::new(up_apex.x, -up_apex.y, up_apex.z), down_apex);
    }
}

#[test]
fn pyramids_use_configured_style() {
    let config = ViewerConfig::from_json(r#"{ "fractal": { "style": { "base": [0, 0, 0] } } }"#).unwrap();
    let fractal = Fractal::new(config.fractal.threshold, config.fractal.style);
    let triangles = fractal.generate(Point3::default(), 1.0);

    assert_eq!(Style::default().sides[0], triangles[0].color);
    assert_eq!(config.fractal.style.base, triangles[5].color);
}

#[test]
fn keyboard_keeps_counters_in_range() {
    let mut state = FrameState::default();

    for _ in 0..50 {
        handle_key(&mut state, b'-');
    }
    assert_eq!(MIN_TESSELLATION, state.slices);
    assert_eq!(MIN_TESSELLATION, state.stacks);

    for _ in 0..10_000 {
        handle_key(&mut state, b'+');
    }
    assert_eq!(MIN_TESSELLATION + 10_000, state.slices);
}

#[test]
fn tick_angle_scenarios() {
    let animation = Animation::default();

    assert_eq!(0.0, Tick::at(0.0, &animation).angle);
    assert!((Tick::at(1.0, &animation).angle - 20.0).abs() < 1e-9);
}

#[test]
fn default_scene_renders_something() {
    let config = ViewerConfig::default();
    let fractal = Fractal::new(config.fractal.threshold, config.fractal.style);
    let tick = Tick::at(0.0, &config.animation);
    let view = View::new(&config, &tick, 4.0 / 3.0);

    let mut renderer = Renderer::new(64, 48);
    let drawn = renderer.render(&build_frame(&config.lattice, &fractal), &view);

    assert!(drawn > 0);
    assert!(renderer.pixels().iter().any(|&c| c > 0));
}
