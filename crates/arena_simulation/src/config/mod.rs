//! Конфигурация матча и арены (data-driven, RON)
//!
//! - `MatchConfig` - правила матча (immutable после старта)
//! - `ArenaLayout` - spawn точки, prefabs, enemy tuning
//! - `ArenaConfig` - оба вместе, грузится из `config/arena.ron`

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MatchSetupError;

/// Правила матча
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Сколько поражений выбивает игрока из матча
    pub max_losses_to_end: u32,
    /// Пауза перед раундом (секунды)
    pub start_delay: f32,
    /// Пауза после раунда (секунды)
    pub end_delay: f32,
    /// Общий лимит времени матча (секунды)
    pub max_game_time: f32,
    /// Лимит раундов
    pub max_rounds: u32,
    /// Задержка авто-рестарта после timeout (секунды)
    pub restart_delay: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_losses_to_end: 5,
            start_delay: 3.0,
            end_delay: 3.0,
            max_game_time: 240.0,
            max_rounds: 5,
            restart_delay: 4.0,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchSetupError> {
        if self.max_losses_to_end == 0 {
            return Err(MatchSetupError::InvalidConfig(
                "max_losses_to_end must be at least 1".into(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(MatchSetupError::InvalidConfig("max_rounds must be at least 1".into()));
        }

        let delays = [
            ("start_delay", self.start_delay),
            ("end_delay", self.end_delay),
            ("max_game_time", self.max_game_time),
            ("restart_delay", self.restart_delay),
        ];
        for (name, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchSetupError::InvalidConfig(format!(
                    "{} must be a non-negative number of seconds (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Поза спавна: позиция + поворот вокруг Y (градусы)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnPose {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl SpawnPose {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            yaw_degrees: 0.0,
        }
    }

    pub fn with_yaw(mut self, yaw_degrees: f32) -> Self {
        self.yaw_degrees = yaw_degrees;
        self
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_rotation_y(self.yaw_degrees.to_radians()))
    }
}

/// Параметры погони/атаки врага
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyChaseConfig {
    /// Скорость движения (м/с)
    pub move_speed: f32,
    /// Радиус, в котором враг выбирает цель (м)
    pub chase_range: f32,
    /// Дистанция атаки (м)
    pub attack_range: f32,
    pub attack_damage: u32,
    /// Секунды между атаками
    pub attack_cooldown: f32,
}

impl Default for EnemyChaseConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            chase_range: 20.0,
            attack_range: 2.0,
            attack_damage: 10,
            attack_cooldown: 1.5,
        }
    }
}

/// Enemy prefab: визуал (для хоста) + tuning погони
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyPrefab {
    pub path: String,
    #[serde(default)]
    pub chase: EnemyChaseConfig,
}

/// Раскладка арены
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// По одной точке на игрока, порядок = номер игрока (1..=N)
    pub tank_spawns: Vec<SpawnPose>,
    pub tank_prefab: String,
    pub enemy_spawns: Vec<SpawnPose>,
    pub enemy_prefabs: Vec<EnemyPrefab>,
    /// Сколько врагов спавнится при старте (не больше чем enemy_spawns)
    pub initial_enemies: usize,
    /// Периодические волны врагов (None = выключено)
    pub enemy_wave_interval: Option<f32>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            tank_spawns: vec![
                SpawnPose::new(-12.0, 0.0, 0.0).with_yaw(90.0),
                SpawnPose::new(12.0, 0.0, 0.0).with_yaw(-90.0),
            ],
            tank_prefab: "res://tanks/tank.tscn".to_string(),
            enemy_spawns: vec![SpawnPose::new(0.0, 0.0, 15.0), SpawnPose::new(0.0, 0.0, -15.0)],
            enemy_prefabs: vec![EnemyPrefab {
                path: "res://enemies/crawler.tscn".to_string(),
                chase: EnemyChaseConfig::default(),
            }],
            initial_enemies: 2,
            enemy_wave_interval: None,
        }
    }
}

impl ArenaLayout {
    /// Проверка обязательных данных для старта матча
    pub fn validate(&self) -> Result<(), MatchSetupError> {
        if self.tank_spawns.is_empty() {
            return Err(MatchSetupError::ConfigurationMissing("tank spawn points"));
        }
        let wants_enemies = self.initial_enemies > 0 || self.enemy_wave_interval.is_some();
        if wants_enemies && !self.enemy_spawns.is_empty() && self.enemy_prefabs.is_empty() {
            return Err(MatchSetupError::ConfigurationMissing("enemy prefabs"));
        }
        if let Some(interval) = self.enemy_wave_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(MatchSetupError::InvalidConfig(format!(
                    "enemy_wave_interval must be positive (got {})",
                    interval
                )));
            }
        }
        Ok(())
    }

    pub fn tank_spawn_transforms(&self) -> Vec<Transform> {
        self.tank_spawns.iter().map(SpawnPose::to_transform).collect()
    }
}

/// Полный конфиг арены (один RON файл)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub match_rules: MatchConfig,
    pub layout: ArenaLayout,
}

impl ArenaConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, MatchSetupError> {
        let config: ArenaConfig = ron::from_str(source)?;
        config.match_rules.validate()?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MatchSetupError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.max_losses_to_end, 5);
        assert_eq!(config.start_delay, 3.0);
        assert_eq!(config.end_delay, 3.0);
        assert_eq!(config.max_game_time, 240.0);
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.restart_delay, 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_match_config_rejects_zero_limits() {
        let config = MatchConfig {
            max_losses_to_end: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MatchSetupError::InvalidConfig(_))));

        let config = MatchConfig {
            end_delay: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_without_tank_spawns_is_missing_configuration() {
        let layout = ArenaLayout {
            tank_spawns: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(MatchSetupError::ConfigurationMissing("tank spawn points"))
        ));
    }

    #[test]
    fn test_enemy_chase_defaults() {
        let chase = EnemyChaseConfig::default();
        assert_eq!(chase.move_speed, 4.0);
        assert_eq!(chase.chase_range, 20.0);
        assert_eq!(chase.attack_range, 2.0);
        assert_eq!(chase.attack_damage, 10);
        assert_eq!(chase.attack_cooldown, 1.5);
    }

    #[test]
    fn test_arena_config_from_ron() {
        let source = r#"(
            match_rules: (
                max_losses_to_end: 2,
                max_rounds: 3,
            ),
            layout: (
                tank_spawns: [
                    (position: (-5.0, 0.0, 0.0), yaw_degrees: 90.0),
                    (position: (5.0, 0.0, 0.0)),
                ],
                enemy_spawns: [],
                initial_enemies: 0,
            ),
        )"#;

        let config = ArenaConfig::from_ron_str(source).unwrap();
        assert_eq!(config.match_rules.max_losses_to_end, 2);
        assert_eq!(config.match_rules.max_rounds, 3);
        // Не указанные поля - defaults
        assert_eq!(config.match_rules.start_delay, 3.0);
        assert_eq!(config.layout.tank_spawns.len(), 2);
        assert_eq!(config.layout.tank_spawns[0].yaw_degrees, 90.0);
        assert_eq!(config.layout.tank_spawns[1].yaw_degrees, 0.0);
    }

    #[test]
    fn test_arena_config_rejects_broken_ron() {
        let result = ArenaConfig::from_ron_str("(match_rules: (max_rounds: \"five\"))");
        assert!(matches!(result, Err(MatchSetupError::ConfigParse(_))));
    }

    #[test]
    fn test_spawn_pose_to_transform() {
        let transform = SpawnPose::new(1.0, 2.0, 3.0).with_yaw(90.0).to_transform();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        let forward = transform.rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}
