//! Agent factory - spawn танков и врагов
//!
//! `AgentFactory` - seam к хосту: симуляция просит "prefab kind + поза",
//! хост (через `PrefabPath`) создаёт визуал. Реализация для `Commands`
//! собирает ECS bundle, для тестов можно подставить свою.

use bevy::prelude::*;

use crate::ai::{ChaseTarget, Enemy, EnemyChase};
use crate::components::{PrefabPath, Tank};
use crate::config::EnemyPrefab;

/// Что спавнить
#[derive(Debug, Clone, PartialEq)]
pub enum PrefabKind {
    Tank { player_number: u32, prefab: String },
    Enemy(EnemyPrefab),
}

pub trait AgentFactory {
    fn spawn_agent(&mut self, kind: &PrefabKind, pose: Transform) -> Entity;
}

impl AgentFactory for Commands<'_, '_> {
    fn spawn_agent(&mut self, kind: &PrefabKind, pose: Transform) -> Entity {
        match kind {
            PrefabKind::Tank {
                player_number,
                prefab,
            } => self
                .spawn((
                    pose,
                    Tank {
                        player_number: *player_number,
                    },
                    PrefabPath::new(prefab.clone()),
                ))
                .id(),
            PrefabKind::Enemy(prefab) => self
                .spawn((
                    pose,
                    Enemy,
                    EnemyChase::from(prefab.chase),
                    ChaseTarget::default(),
                    PrefabPath::new(prefab.path.clone()),
                ))
                .id(),
        }
    }
}
