//! Enemy AI module
//!
//! Враги арены гоняются за ближайшим живым танком и бьют его в ближнем бою.
//! - Target acquisition: собственный cadence (`TargetScan`, раз в 0.5s)
//! - Pursuit/attack: каждый fixed tick, после round state machine
//!
//! Враги только читают позиции/alive танков и шлют `EnemyAttack` -
//! урон применяет combat слой.

use bevy::prelude::*;

pub mod components;
pub mod spawn;
pub mod systems;

// Re-export основных типов
pub use components::{ChaseMode, ChaseTarget, Enemy, EnemyChase};
pub use spawn::{spawn_enemy_wave, spawn_initial_enemies, EnemyWaves};
pub use systems::{decide_chase, select_nearest_target, ChaseAction};

use crate::schedules::{SimulationSet, TargetScan};

/// AI Plugin
///
/// Порядок выполнения (FixedUpdate, `SimulationSet::Enemies`):
/// 1. spawn_enemy_waves - волны (если включены в ArenaLayout)
/// 2. enemy_chase_step - движение/атака по текущей цели
///
/// `acquire_enemy_targets` живёт в `TargetScan` и запускается раньше,
/// в `SimulationSet::TargetScan`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyWaves>();

        app.add_systems(TargetScan, systems::acquire_enemy_targets);

        app.add_systems(
            FixedUpdate,
            (
                spawn::spawn_enemy_waves.run_if(resource_exists::<crate::config::ArenaLayout>),
                systems::enemy_chase_step,
            )
                .chain()
                .in_set(SimulationSet::Enemies),
        );
    }
}
