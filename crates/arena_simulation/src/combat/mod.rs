//! Combat module: урон от врагов и смерть танков
//!
//! ECS ответственность:
//! - Health танков, применение `EnemyAttack` → `DamageDealt` / `EntityDied`
//! - Маркер `Dead` для упавших танков (хост прячет/взрывает визуал)
//!
//! Reset раунда (full health, снятие `Dead`) делает match_flow.

use bevy::prelude::*;

pub mod damage;


// Re-export основных типов
pub use damage::{is_agent_alive, strike, DamageDealt, Dead, EnemyAttack, EntityDied};

use crate::schedules::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate, `SimulationSet::Combat`):
/// 1. apply_enemy_attacks - EnemyAttack → Health → DamageDealt / EntityDied
/// 2. mark_fallen_tanks - Health == 0 → Dead
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyAttack>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (damage::apply_enemy_attacks, damage::mark_fallen_tanks)
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
