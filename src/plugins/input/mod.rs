//! Input plugin: one normalized snapshot per simulation step.
//!
//! Raw devices are read in `Update` (variable rate) into [`InputSource`]. Edge-triggered
//! actions are latched there so a press between two fixed steps is never lost. The fixed step
//! then calls [`InputSource::snapshot`] exactly once and publishes the result as
//! [`InputFrame`]; every later system in the step reads that value.
//!
//! Free-look orbit deltas (mouse drag, scroll, right stick) accumulate the same way and are
//! drained by the snapshot.
//!
//! ```text
//! Update:       capture_input  -> InputSource { keyboard, gamepad, latched edges, orbit }
//! FixedUpdate:  sample_input   -> InputFrame(InputSnapshot)   (edges consumed here)
//! ```

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use crate::common::sets::SimSet;
use crate::plugins::core::SimStep;

/// Analog values below this are treated as zero.
pub const STICK_DEADZONE: f32 = 0.12;
/// Gamepad wins the step when its summed axis magnitude exceeds this.
const GAMEPAD_EPSILON: f32 = 0.001;
/// Orbit radians per pixel of mouse drag.
const ORBIT_MOUSE_RATE: f32 = 0.005;
/// Orbit radians per second at full right-stick deflection.
const ORBIT_PAD_RATE: f32 = 2.0;
/// Pixel-unit scroll is converted to lines at this ratio.
const SCROLL_PIXELS_PER_LINE: f32 = 100.0;

/// Immutable per-step input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_x: f32,
    /// Forward is negative, matching the `-Z` forward axis.
    pub move_z: f32,
    pub lift: f32,
    /// Positive turns left (counter-clockwise seen from above).
    pub yaw: f32,
    pub boost: bool,
    /// Free-look orbit since the last step, radians: `x` about world up, `y` toward the pole.
    pub orbit: Vec2,
    /// Free-look zoom since the last step; positive pulls in.
    pub zoom: f32,
    pub fire_pressed: bool,
    pub toggle_cockpit_pressed: bool,
    pub reload_pressed: bool,
    pub toggle_free_look_pressed: bool,
    pub toggle_assist_pressed: bool,
    pub start_pressed: bool,
}

/// Held digital keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub back: bool,
    pub lift_up: bool,
    pub lift_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub boost: bool,
}

impl KeyboardState {
    #[inline]
    fn axis(neg: bool, pos: bool) -> f32 {
        f32::from(u8::from(pos)) - f32::from(u8::from(neg))
    }
}

/// Analog pad state, already deadzone-filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    pub move_x: f32,
    pub move_z: f32,
    pub lift: f32,
    pub yaw: f32,
    pub boost: bool,
}

impl GamepadState {
    #[inline]
    fn magnitude(&self) -> f32 {
        self.move_x.abs() + self.move_z.abs() + self.lift.abs() + self.yaw.abs()
    }
}

#[inline]
pub fn deadzone(v: f32) -> f32 {
    if v.abs() < STICK_DEADZONE { 0.0 } else { v }
}

/// One-shot actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Fire,
    ToggleCockpit,
    Reload,
    ToggleFreeLook,
    ToggleAssist,
    Start,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Latches {
    fire: bool,
    cockpit: bool,
    reload: bool,
    free_look: bool,
    assist: bool,
    start: bool,
}

impl Latches {
    fn set(&mut self, edge: Edge) {
        match edge {
            Edge::Fire => self.fire = true,
            Edge::ToggleCockpit => self.cockpit = true,
            Edge::Reload => self.reload = true,
            Edge::ToggleFreeLook => self.free_look = true,
            Edge::ToggleAssist => self.assist = true,
            Edge::Start => self.start = true,
        }
    }
}

/// Merged keyboard + gamepad source with latched edges.
#[derive(Resource, Debug, Default)]
pub struct InputSource {
    pub keyboard: KeyboardState,
    /// `None` when no pad is connected.
    pub gamepad: Option<GamepadState>,
    latched: Latches,
    orbit: Vec2,
    zoom: f32,
    cached: Option<(u64, InputSnapshot)>,
}

impl InputSource {
    /// Latch an edge until the next step's snapshot consumes it.
    pub fn press(&mut self, edge: Edge) {
        self.latched.set(edge);
    }

    /// Accumulate free-look motion until the next snapshot drains it.
    pub fn add_orbit(&mut self, look: Vec2, zoom: f32) {
        self.orbit += look;
        self.zoom += zoom;
    }

    /// Snapshot for `step`. Repeated calls with the same step return the same value and do not
    /// consume further edges.
    pub fn snapshot(&mut self, step: u64) -> InputSnapshot {
        if let Some((cached_step, snap)) = self.cached
            && cached_step == step
        {
            return snap;
        }

        let k = &self.keyboard;
        let pad = self.gamepad.filter(|g| g.magnitude() > GAMEPAD_EPSILON);

        let (move_x, move_z, lift, yaw, boost) = match pad {
            Some(g) => (g.move_x, g.move_z, g.lift, g.yaw, g.boost),
            None => (
                KeyboardState::axis(k.left, k.right),
                KeyboardState::axis(k.forward, k.back),
                KeyboardState::axis(k.lift_down, k.lift_up),
                KeyboardState::axis(k.yaw_right, k.yaw_left),
                k.boost,
            ),
        };

        let edges = std::mem::take(&mut self.latched);
        let orbit = std::mem::take(&mut self.orbit);
        let zoom = std::mem::take(&mut self.zoom);
        let snap = InputSnapshot {
            move_x: move_x.clamp(-1.0, 1.0),
            move_z: move_z.clamp(-1.0, 1.0),
            lift: lift.clamp(-1.0, 1.0),
            yaw: yaw.clamp(-1.0, 1.0),
            boost,
            orbit,
            zoom,
            fire_pressed: edges.fire,
            toggle_cockpit_pressed: edges.cockpit,
            reload_pressed: edges.reload,
            toggle_free_look_pressed: edges.free_look,
            toggle_assist_pressed: edges.assist,
            start_pressed: edges.start,
        };
        self.cached = Some((step, snap));
        snap
    }
}

/// The snapshot for the current step.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputFrame(pub InputSnapshot);

pub fn plugin(app: &mut App) {
    app.init_resource::<InputSource>()
        .init_resource::<InputFrame>()
        .add_systems(Update, capture_input)
        .add_systems(
            FixedUpdate,
            sample_input
                .in_set(SimSet::Input)
                .after(crate::plugins::core::advance_step),
        );
}

const KEY_EDGES: [(KeyCode, Edge); 6] = [
    (KeyCode::Space, Edge::Fire),
    (KeyCode::KeyX, Edge::ToggleCockpit),
    (KeyCode::KeyT, Edge::Reload),
    (KeyCode::KeyC, Edge::ToggleFreeLook),
    (KeyCode::KeyV, Edge::ToggleAssist),
    (KeyCode::Enter, Edge::Start),
];

const PAD_EDGES: [(GamepadButton, Edge); 3] = [
    (GamepadButton::RightTrigger, Edge::Fire),
    (GamepadButton::West, Edge::Reload),
    (GamepadButton::Start, Edge::Start),
];

/// Read raw devices. All are optional so headless apps run without input plugins.
#[allow(clippy::too_many_arguments)]
fn capture_input(
    time: Res<Time>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    motion: Option<Res<AccumulatedMouseMotion>>,
    scroll: Option<Res<AccumulatedMouseScroll>>,
    pads: Query<&Gamepad>,
    mut source: ResMut<InputSource>,
) {
    // Drag to orbit, like a typical orbit control: left button held.
    if let Some(buttons) = buttons
        && let Some(motion) = motion
        && buttons.pressed(MouseButton::Left)
    {
        source.add_orbit(motion.delta * ORBIT_MOUSE_RATE, 0.0);
    }
    if let Some(scroll) = scroll {
        let lines = match scroll.unit {
            MouseScrollUnit::Line => scroll.delta.y,
            MouseScrollUnit::Pixel => scroll.delta.y / SCROLL_PIXELS_PER_LINE,
        };
        if lines != 0.0 {
            source.add_orbit(Vec2::ZERO, lines);
        }
    }

    if let Some(keys) = keys {
        let held = |a: KeyCode, b: KeyCode| keys.pressed(a) || keys.pressed(b);
        source.keyboard = KeyboardState {
            left: held(KeyCode::ArrowLeft, KeyCode::KeyA),
            right: held(KeyCode::ArrowRight, KeyCode::KeyD),
            forward: held(KeyCode::ArrowUp, KeyCode::KeyW),
            back: held(KeyCode::ArrowDown, KeyCode::KeyS),
            lift_up: keys.pressed(KeyCode::KeyR),
            lift_down: keys.pressed(KeyCode::KeyF),
            yaw_left: keys.pressed(KeyCode::KeyQ),
            yaw_right: keys.pressed(KeyCode::KeyE),
            boost: held(KeyCode::ShiftLeft, KeyCode::ShiftRight),
        };
        for (key, edge) in KEY_EDGES {
            if keys.just_pressed(key) {
                source.press(edge);
            }
        }
    }

    // First connected pad only.
    let Some(pad) = pads.iter().next() else {
        source.gamepad = None;
        return;
    };

    let left = pad.left_stick();
    let rt = pad.get(GamepadButton::RightTrigger2).unwrap_or(0.0);
    let lt = pad.get(GamepadButton::LeftTrigger2).unwrap_or(0.0);
    source.gamepad = Some(GamepadState {
        move_x: deadzone(left.x),
        // Stick up is +y, forward is -z.
        move_z: deadzone(-left.y),
        lift: deadzone((rt - lt).clamp(-1.0, 1.0)),
        yaw: deadzone(-pad.right_stick().x),
        boost: pad.pressed(GamepadButton::South) || pad.pressed(GamepadButton::LeftThumb),
    });
    let right = pad.right_stick();
    let look = Vec2::new(deadzone(right.x), deadzone(-right.y));
    if look != Vec2::ZERO {
        source.add_orbit(look * ORBIT_PAD_RATE * time.delta_secs(), 0.0);
    }
    for (button, edge) in PAD_EDGES {
        if pad.just_pressed(button) {
            source.press(edge);
        }
    }
}

fn sample_input(step: Res<SimStep>, mut source: ResMut<InputSource>, mut frame: ResMut<InputFrame>) {
    frame.0 = source.snapshot(step.0);
}

#[cfg(test)]
mod tests;
