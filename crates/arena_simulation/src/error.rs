//! Ошибки симуляции
//!
//! - `MatchSetupError` - фатальны для инициализации (лог + ранний выход, без паники)
//! - `AgentError` - per-tick ошибки отдельной entity, поглощаются локально

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchSetupError {
    /// Обязательная ссылка/массив отсутствует или пуст
    #[error("configuration missing: {0}")]
    ConfigurationMissing(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read arena config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse arena config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    /// Instance исчез или не был создан
    #[error("agent handle {0:?} is not alive in the world")]
    InvalidHandle(Entity),

    /// У target нет ожидаемого capability (например Health)
    #[error("entity {entity:?} has no {capability} capability")]
    NoCapability {
        entity: Entity,
        capability: &'static str,
    },
}
