use bevy::prelude::*;

use super::{Edge, GamepadState, InputFrame, InputSource, KeyboardState, deadzone, sample_input};
use crate::common::test_utils::run_system_once;
use crate::plugins::core::SimStep;

#[test]
fn keyboard_maps_to_unit_axes() {
    let mut src = InputSource {
        keyboard: KeyboardState {
            forward: true,
            right: true,
            lift_up: true,
            yaw_left: true,
            boost: true,
            ..default()
        },
        ..default()
    };
    let s = src.snapshot(1);
    assert_eq!(s.move_x, 1.0);
    assert_eq!(s.move_z, -1.0);
    assert_eq!(s.lift, 1.0);
    assert_eq!(s.yaw, 1.0);
    assert!(s.boost);
}

#[test]
fn opposing_keys_cancel() {
    let mut src = InputSource {
        keyboard: KeyboardState { left: true, right: true, ..default() },
        ..default()
    };
    assert_eq!(src.snapshot(1).move_x, 0.0);
}

#[test]
fn active_gamepad_wins_outright() {
    let mut src = InputSource {
        keyboard: KeyboardState { forward: true, boost: true, ..default() },
        gamepad: Some(GamepadState { move_x: 0.5, ..default() }),
        ..default()
    };
    let s = src.snapshot(1);
    assert_eq!(s.move_x, 0.5);
    // Keyboard is ignored entirely, no blending.
    assert_eq!(s.move_z, 0.0);
    assert!(!s.boost);
}

#[test]
fn resting_gamepad_falls_back_to_keyboard() {
    let mut src = InputSource {
        keyboard: KeyboardState { lift_down: true, ..default() },
        gamepad: Some(GamepadState { boost: true, ..default() }),
        ..default()
    };
    let s = src.snapshot(1);
    assert_eq!(s.lift, -1.0);
    assert!(!s.boost);
}

#[test]
fn edges_last_exactly_one_step() {
    let mut src = InputSource::default();
    src.press(Edge::Fire);
    src.press(Edge::Start);

    let first = src.snapshot(1);
    assert!(first.fire_pressed);
    assert!(first.start_pressed);
    assert!(!first.reload_pressed);

    let next = src.snapshot(2);
    assert!(!next.fire_pressed);
    assert!(!next.start_pressed);
}

#[test]
fn orbit_motion_sums_between_steps_then_drains() {
    let mut src = InputSource::default();
    src.add_orbit(Vec2::new(0.1, -0.2), 0.0);
    src.add_orbit(Vec2::new(0.3, 0.0), 2.0);

    let s = src.snapshot(1);
    assert!((s.orbit - Vec2::new(0.4, -0.2)).length() < 1e-6);
    assert_eq!(s.zoom, 2.0);

    let next = src.snapshot(2);
    assert_eq!(next.orbit, Vec2::ZERO);
    assert_eq!(next.zoom, 0.0);
}

#[test]
fn repeated_reads_in_one_step_are_identical() {
    let mut src = InputSource::default();
    src.press(Edge::ToggleCockpit);

    let a = src.snapshot(7);
    // A press landing mid-step waits for the next step.
    src.press(Edge::Reload);
    let b = src.snapshot(7);
    assert_eq!(a, b);
    assert!(b.toggle_cockpit_pressed);
    assert!(!b.reload_pressed);

    assert!(src.snapshot(8).reload_pressed);
}

#[test]
fn deadzone_threshold() {
    assert_eq!(deadzone(0.119), 0.0);
    assert_eq!(deadzone(-0.05), 0.0);
    assert_eq!(deadzone(0.12), 0.12);
    assert_eq!(deadzone(-0.9), -0.9);
}

#[test]
fn sample_input_publishes_frame() {
    let mut world = World::new();
    world.insert_resource(SimStep(3));
    world.insert_resource(InputFrame::default());
    let mut src = InputSource::default();
    src.press(Edge::ToggleAssist);
    world.insert_resource(src);

    run_system_once(&mut world, sample_input);

    assert!(world.resource::<InputFrame>().0.toggle_assist_pressed);
}
