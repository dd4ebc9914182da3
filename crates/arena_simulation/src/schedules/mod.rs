//! Порядок fixed tick и tick-based cadence
//!
//! **FixedUpdate (60 Hz)**, sets по порядку:
//!   ├─ MatchFlow  - match clock + round state machine
//!   ├─ TargetScan - tick % 30 == 0 → TargetScan schedule (2 Hz), потом tick += 1
//!   ├─ Enemies    - волны + погоня/атака
//!   └─ Combat     - урон от атак, маркер Dead
//!
//! Tick counter вместо `timer += delta`: modulo не дрейфует и не зависит от FPS.

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

pub mod timer_systems;

pub use timer_systems::{advance_tick_counter, run_target_scan_timer};

/// Частота FixedUpdate
pub const SIMULATION_HZ: f64 = 60.0;

/// Период переоценки целей врагов (секунды)
pub const TARGET_SCAN_PERIOD_SECS: f64 = 0.5;

pub const TARGET_SCAN_INTERVAL_TICKS: u64 = (SIMULATION_HZ * TARGET_SCAN_PERIOD_SECS) as u64;

/// Глобальный tick counter (wraparound safe)
#[derive(Resource, Debug, Default)]
pub struct FixedTickCounter {
    pub tick: u64,
}

/// Custom schedule: TargetScan (2 Hz = 60/30)
///
/// Target acquisition врагов. Не блокирует round state machine,
/// запускается из FixedUpdate через `run_target_scan_timer`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetScan;

/// Порядок систем внутри одного fixed tick
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    MatchFlow,
    TargetScan,
    Enemies,
    Combat,
}

pub struct SchedulesPlugin;

impl Plugin for SchedulesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FixedTickCounter>()
            .init_schedule(TargetScan)
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::MatchFlow,
                    SimulationSet::TargetScan,
                    SimulationSet::Enemies,
                    SimulationSet::Combat,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (run_target_scan_timer, advance_tick_counter)
                    .chain()
                    .in_set(SimulationSet::TargetScan),
            );
    }
}
