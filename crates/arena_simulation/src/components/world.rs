//! World компоненты: PrefabPath, MatchEntity

use bevy::prelude::*;

/// Prefab path для визуального представления (читает хост)
///
/// Позволяет разные визуалы для танков и разных типов врагов.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PrefabPath {
    pub path: String,
}

impl Default for PrefabPath {
    fn default() -> Self {
        Self {
            path: "res://tanks/tank.tscn".to_string(),
        }
    }
}

impl PrefabPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Маркер: entity принадлежит текущему матчу
///
/// Full restart деспавнит всё с этим маркером и заново наполняет арену.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MatchEntity;
