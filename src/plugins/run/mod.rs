//! Run plugin: hit points, objectives, level progression and the terminal states.
//!
//! ```text
//!   Intro ──start──▶ Playing ──objective met──▶ LevelCleared ──deadline──▶ Playing (level + 1)
//!                       │                                         └──────▶ Won (final level)
//!                       └──hp == 0──▶ Lost
//!   Lost / Won ──start──▶ Playing (level 1, new run id)
//! ```
//!
//! [`RunState`] is plain data with methods; systems only feed it the step clock and input.
//! Every mutation that can change phase returns the [`RunTransition`] it caused so the caller
//! can publish it.

use bevy::prelude::*;

use crate::common::levels::{MAX_LEVEL, level_spec};
use crate::common::sets::SimSet;
use crate::common::state::GameMode;
use crate::common::tunables::{RunTunables, Tunables};
use crate::plugins::input::InputFrame;
use crate::plugins::player::PilotView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    #[default]
    Intro,
    Playing,
    LevelCleared,
    Won,
    Lost,
}

impl RunPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTransition {
    Started { run_id: u32 },
    LevelCleared { level: u8 },
    Advanced { level: u8, run_id: u32 },
    Won,
    Lost,
}

#[derive(Resource, Debug, Clone)]
pub struct RunState {
    mode: GameMode,
    rules: RunTunables,
    phase: RunPhase,
    run_id: u32,
    level: u8,
    hit_points: u8,
    /// Coins collected this run.
    score: u32,
    /// Enemies destroyed this run.
    kills: u32,
    /// Mode objective counted since entering the current level.
    objective: u32,
    ammo: u32,
    /// Pending level-clear deadline. `Some` is the "timer in flight" flag.
    clear_deadline: Option<f32>,
    hit_flash_until: Option<f32>,
    hit_marker_until: Option<f32>,
}

impl RunState {
    pub fn new(mode: GameMode, rules: RunTunables) -> Self {
        Self {
            mode,
            phase: RunPhase::Intro,
            run_id: 0,
            level: 1,
            hit_points: rules.max_hits,
            score: 0,
            kills: 0,
            objective: 0,
            ammo: rules.starting_ammo,
            clear_deadline: None,
            hit_flash_until: None,
            hit_marker_until: None,
            rules,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }
    pub fn phase(&self) -> RunPhase {
        self.phase
    }
    pub fn run_id(&self) -> u32 {
        self.run_id
    }
    pub fn level(&self) -> u8 {
        self.level
    }
    pub fn hit_points(&self) -> u8 {
        self.hit_points
    }
    pub fn max_hits(&self) -> u8 {
        self.rules.max_hits
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn kills(&self) -> u32 {
        self.kills
    }
    pub fn objective(&self) -> u32 {
        self.objective
    }
    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn objective_required(&self) -> u32 {
        let spec = level_spec(self.level);
        match self.mode {
            GameMode::Beginner => spec.coins_required,
            GameMode::Shooter => spec.kills_required,
        }
    }

    /// Flight input and weapons are live.
    #[inline]
    pub fn controls_enabled(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    /// The drone is pinned to spawn.
    #[inline]
    pub fn frozen(&self) -> bool {
        matches!(self.phase, RunPhase::LevelCleared | RunPhase::Won)
    }

    #[inline]
    pub fn level_clear_pending(&self) -> bool {
        self.clear_deadline.is_some()
    }

    pub fn hit_flash_active(&self, now: f32) -> bool {
        self.hit_flash_until.is_some_and(|t| now < t)
    }

    pub fn hit_marker_active(&self, now: f32) -> bool {
        self.hit_marker_until.is_some_and(|t| now < t)
    }

    /// Start from `Intro` or restart from a terminal state. Ignored mid-run.
    pub fn start_or_restart(&mut self) -> Option<RunTransition> {
        if self.phase != RunPhase::Intro && !self.phase.is_terminal() {
            return None;
        }
        // A stale deadline must never fire into the new run.
        self.clear_deadline = None;
        self.hit_flash_until = None;
        self.hit_marker_until = None;

        self.run_id = self.run_id.wrapping_add(1);
        self.level = 1;
        self.hit_points = self.rules.max_hits;
        self.score = 0;
        self.kills = 0;
        self.objective = 0;
        self.ammo = self.rules.starting_ammo;
        self.phase = RunPhase::Playing;
        Some(RunTransition::Started { run_id: self.run_id })
    }

    /// The single damage entry point. No-op unless `Playing`.
    pub fn apply_damage(&mut self, now: f32) -> Option<RunTransition> {
        if self.phase != RunPhase::Playing {
            return None;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        self.hit_flash_until = Some(now + self.rules.hit_flash);
        if self.hit_points == 0 {
            self.phase = RunPhase::Lost;
            return Some(RunTransition::Lost);
        }
        None
    }

    pub fn record_coin(&mut self, now: f32) -> Option<RunTransition> {
        if self.phase != RunPhase::Playing {
            return None;
        }
        self.score += 1;
        if self.mode == GameMode::Beginner {
            self.objective += 1;
        }
        self.check_objective(now)
    }

    pub fn record_kill(&mut self, now: f32) -> Option<RunTransition> {
        if self.phase != RunPhase::Playing {
            return None;
        }
        self.kills += 1;
        if self.mode == GameMode::Shooter {
            self.objective += 1;
        }
        self.check_objective(now)
    }

    /// Enemy took a bullet; drives the hit-marker overlay.
    pub fn mark_enemy_hit(&mut self, now: f32) {
        self.hit_marker_until = Some(now + self.rules.hit_marker);
    }

    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.rules.ammo_cap);
    }

    /// Spend one round. `false` (and no change) when empty.
    pub fn try_consume_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    fn check_objective(&mut self, now: f32) -> Option<RunTransition> {
        if self.objective < self.objective_required() {
            return None;
        }
        if self.level_clear_pending() {
            debug!("level-clear timer already armed; ignoring re-arm");
            return None;
        }
        self.clear_deadline = Some(now + self.rules.level_clear_delay);
        self.phase = RunPhase::LevelCleared;
        Some(RunTransition::LevelCleared { level: self.level })
    }

    /// Check pending deadlines against the step clock.
    pub fn tick(&mut self, now: f32) -> Option<RunTransition> {
        if self.hit_flash_until.is_some_and(|t| now >= t) {
            self.hit_flash_until = None;
        }
        if self.hit_marker_until.is_some_and(|t| now >= t) {
            self.hit_marker_until = None;
        }

        let deadline = self.clear_deadline?;
        if now < deadline {
            return None;
        }
        self.clear_deadline = None;

        if self.level >= MAX_LEVEL {
            self.phase = RunPhase::Won;
            return Some(RunTransition::Won);
        }

        self.level += 1;
        self.hit_points = self.rules.max_hits;
        self.objective = 0;
        self.ammo = self.ammo.max(self.rules.ammo_floor_on_advance);
        self.run_id = self.run_id.wrapping_add(1);
        self.phase = RunPhase::Playing;
        Some(RunTransition::Advanced { level: self.level, run_id: self.run_id })
    }
}

pub fn plugin(app: &mut App) {
    let mode = app.world().get_resource::<GameMode>().copied().unwrap_or_default();
    let rules = app.world().resource::<Tunables>().run.clone();

    app.insert_resource(RunState::new(mode, rules))
        .add_message::<RunTransition>()
        .add_systems(
            FixedUpdate,
            (handle_start, tick_run).chain().in_set(SimSet::Run),
        )
        .add_systems(FixedUpdate, log_transitions.after(SimSet::Combat));
}

fn handle_start(
    frame: Res<InputFrame>,
    mut run: ResMut<RunState>,
    mut view: ResMut<PilotView>,
    mut transitions: MessageWriter<RunTransition>,
) {
    if !frame.0.start_pressed {
        return;
    }
    let Some(t) = run.start_or_restart() else {
        return;
    };
    view.reset_camera();
    transitions.write(t);
}

fn tick_run(time: Res<Time>, mut run: ResMut<RunState>, mut transitions: MessageWriter<RunTransition>) {
    if let Some(t) = run.tick(time.elapsed_secs()) {
        transitions.write(t);
    }
}

fn log_transitions(mut transitions: MessageReader<RunTransition>, run: Res<RunState>) {
    for t in transitions.read() {
        match *t {
            RunTransition::Started { run_id } => {
                info!(run_id, mode = ?run.mode(), "run started");
            }
            RunTransition::LevelCleared { level } => {
                info!(level, objective = run.objective(), "level cleared");
            }
            RunTransition::Advanced { level, run_id } => {
                info!(level, run_id, ammo = run.ammo(), "advanced to next level");
            }
            RunTransition::Won => info!(kills = run.kills(), score = run.score(), "run won"),
            RunTransition::Lost => info!(level = run.level(), "run lost"),
        }
    }
}
