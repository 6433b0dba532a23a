//! Per-frame animation values and keyboard handling.

use tracing::info;

pub const KEY_ESCAPE: u8 = 27;

/// Lowest value either tessellation counter can be decremented to.
pub const MIN_TESSELLATION: u32 = 4;

const INITIAL_TESSELLATION: u32 = 16;

/// User-adjustable tessellation counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameState {
    pub slices: u32,
    pub stacks: u32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            slices: INITIAL_TESSELLATION,
            stacks: INITIAL_TESSELLATION,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Continue,
    Quit,
}

/// Applies one key press given as its ASCII code.
pub fn handle_key(state: &mut FrameState, key: u8) -> Command {
    if key == KEY_ESCAPE || key == b'q' {
        return Command::Quit;
    }

    if step(state, key) {
        info!(slices = state.slices, stacks = state.stacks, "tessellation changed");
    }
    Command::Continue
}

/// Moves both counters for `+` and `-`. Returns whether anything changed.
fn step(state: &mut FrameState, key: u8) -> bool {
    let before = *state;
    match key {
        b'+' => {
            state.slices = state.slices.saturating_add(1);
            state.stacks = state.stacks.saturating_add(1);
        }
        b'-' if state.slices > MIN_TESSELLATION && state.stacks > MIN_TESSELLATION => {
            state.slices -= 1;
            state.stacks -= 1;
        }
        _ => {}
    }

    *state != before
}

/// Time-dependent animation parameters.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Animation {
    /// Rotation speed in hundredths of a degree per second.
    pub rotation_rate: f64,
    /// Lowest fog density; the oscillation peaks at three times this.
    pub fog_density: f64,
    /// Angular frequency of the fog oscillation, radians per second.
    pub fog_frequency: f64,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            rotation_rate: 2000.0,
            fog_density: 0.02,
            fog_frequency: 10.0,
        }
    }
}

/// Values derived from the elapsed time for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tick {
    /// Rotation about the vertical axis in degrees, within `[0, 360)`.
    pub angle: f64,
    pub fog_density: f64,
}

impl Tick {
    /// `elapsed` is in seconds since start.
    pub fn at(elapsed: f64, animation: &Animation) -> Self {
        let angle = (elapsed * animation.rotation_rate / 100.0).rem_euclid(360.0);
        let base = animation.fog_density;
        let fog_density = base + ((animation.fog_frequency * elapsed).sin() + 1.0) * base;

        Self { angle, fog_density }
    }
}

#[test]
fn escape_and_q_quit() {
    let mut state = FrameState::default();

    assert_eq!(Command::Quit, handle_key(&mut state, KEY_ESCAPE));
    assert_eq!(Command::Quit, handle_key(&mut state, b'q'));
    assert_eq!(Command::Continue, handle_key(&mut state, b'Q'));
    assert_eq!(Command::Continue, handle_key(&mut state, b'x'));
    assert_eq!(FrameState::default(), state);
}

#[test]
fn plus_and_minus_step_both_counters() {
    let mut state = FrameState::default();

    handle_key(&mut state, b'+');
    assert_eq!(FrameState { slices: 17, stacks: 17 }, state);

    handle_key(&mut state, b'-');
    handle_key(&mut state, b'-');
    assert_eq!(FrameState { slices: 15, stacks: 15 }, state);
}

#[test]
fn minus_stops_at_floor() {
    let mut state = FrameState::default();

    for _ in 0..100 {
        assert_eq!(Command::Continue, handle_key(&mut state, b'-'));
    }

    assert_eq!(FrameState { slices: MIN_TESSELLATION, stacks: MIN_TESSELLATION }, state);
}

#[test]
fn minus_needs_both_above_floor() {
    let mut state = FrameState { slices: 10, stacks: MIN_TESSELLATION };
    handle_key(&mut state, b'-');

    assert_eq!(FrameState { slices: 10, stacks: MIN_TESSELLATION }, state);
}

#[test]
fn refused_steps_report_no_change() {
    let mut floor = FrameState { slices: MIN_TESSELLATION, stacks: MIN_TESSELLATION };
    assert!(!step(&mut floor, b'-'));

    let mut top = FrameState { slices: u32::MAX, stacks: u32::MAX };
    assert!(!step(&mut top, b'+'));

    let mut state = FrameState::default();
    assert!(!step(&mut state, b'x'));
    assert!(step(&mut state, b'-'));
    assert!(step(&mut state, b'+'));
    assert_eq!(FrameState::default(), state);
}

#[test]
fn plus_has_no_upper_bound() {
    let mut state = FrameState::default();

    for _ in 0..10_000 {
        handle_key(&mut state, b'+');
    }

    assert_eq!(FrameState { slices: 10_016, stacks: 10_016 }, state);
}

#[test]
fn rotation_is_twenty_degrees_per_second() {
    let animation = Animation::default();

    assert_eq!(0.0, Tick::at(0.0, &animation).angle);
    assert!((Tick::at(1.0, &animation).angle - 20.0).abs() < 1e-9);
    assert!((Tick::at(18.5, &animation).angle - 10.0).abs() < 1e-9);
}

#[test]
fn fog_oscillates_between_one_and_three_times_base() {
    let animation = Animation::default();
    let base = animation.fog_density;

    assert!((Tick::at(0.0, &animation).fog_density - 2.0 * base).abs() < 1e-12);

    for step in 0..1000 {
        let density = Tick::at(step as f64 * 0.013, &animation).fog_density;
        assert!(density >= base - 1e-12 && density <= 3.0 * base + 1e-12, "{}", density);
    }
}
