//! Enemy chase components: Enemy, EnemyChase, ChaseTarget, ChaseMode.

use bevy::prelude::*;

use crate::components::{MatchEntity, PrefabPath};
use crate::config::EnemyChaseConfig;

/// Враг арены (не combatant - в реестр матча не попадает)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(EnemyChase, ChaseTarget, ChaseMode, PrefabPath, MatchEntity)]
pub struct Enemy;

/// Погоня + атака ближнего боя
///
/// `last_attack_time` - время (Time<Fixed>::elapsed) последней атаки,
/// None = ещё не атаковал (первая атака доступна сразу).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyChase {
    pub move_speed: f32,
    pub chase_range: f32,
    pub attack_range: f32,
    pub attack_damage: u32,
    pub attack_cooldown: f32,
    pub last_attack_time: Option<f32>,
}

impl Default for EnemyChase {
    fn default() -> Self {
        Self::from(EnemyChaseConfig::default())
    }
}

impl From<EnemyChaseConfig> for EnemyChase {
    fn from(config: EnemyChaseConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            chase_range: config.chase_range,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            attack_cooldown: config.attack_cooldown,
            last_attack_time: None,
        }
    }
}

impl EnemyChase {
    pub fn can_attack(&self, now: f32) -> bool {
        match self.last_attack_time {
            None => true,
            Some(last) => now >= last + self.attack_cooldown,
        }
    }

    pub fn register_attack(&mut self, now: f32) {
        self.last_attack_time = Some(now);
    }
}

/// Текущая цель врага (weak reference)
///
/// Entity может умереть или исчезнуть между тиками - перед использованием
/// цель всегда проверяется заново.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ChaseTarget {
    pub target: Option<Entity>,
}

/// Что враг делал на последнем тике (хост читает для анимаций)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum ChaseMode {
    /// Нет цели
    #[default]
    Idle,
    Pursuing,
    Attacking,
}
