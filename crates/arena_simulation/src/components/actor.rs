//! Компоненты агентов арены: Tank, TankControl, Health

use bevy::prelude::*;

use crate::components::{MatchEntity, PrefabPath};

/// Танк игрока (combatant)
///
/// Номер игрока 1-based, совпадает с id в `CombatantRegistry`.
/// Автоматически добавляет Health, TankControl, PrefabPath, MatchEntity через Required Components.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Health, TankControl, PrefabPath, MatchEntity)]
pub struct Tank {
    pub player_number: u32,
}

/// Разрешён ли input для танка (читает input слой хоста)
///
/// Выставляется только round state machine: выключен в Starting/Ending, включён в Playing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct TankControl {
    pub enabled: bool,
}

/// Здоровье агента (Health capability)
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Полное восстановление (reset танка в начале раунда)
    pub fn restore(&mut self) {
        self.current = self.max;
    }
}
