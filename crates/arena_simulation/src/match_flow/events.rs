//! Match events - ECS → хост (HUD, камера, сцена)

use bevy::prelude::*;

use super::registry::RoundOutcome;

/// Почему матч закончился
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEndReason {
    /// Игрок `loser` достиг лимита поражений; `winner` - первый соперник
    Eliminated { loser: u32, winner: Option<u32> },
    /// Сыграно `max_rounds` раундов
    RoundLimit { winner: Option<u32>, draw: bool },
    /// Кончилось время матча
    TimedOut,
}

/// Lifecycle события матча (с готовым текстом для HUD)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MatchEvent {
    RoundStarted {
        round: u32,
        message: String,
    },
    RoundEnded {
        round: u32,
        outcome: RoundOutcome,
        message: String,
    },
    MatchEnded {
        reason: MatchEndReason,
        message: String,
    },
}

/// Запросы к camera rig хоста
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CameraRequest {
    /// Кого держать в кадре
    SetTargets(Vec<Entity>),
    /// Мгновенно выставить позицию/размер по стартовым позициям
    FrameStartPositions,
}

/// Full restart матча (UI кнопка хоста или таймер после timeout)
///
/// Обрабатывается в `Update`, поэтому работает и при замороженном времени.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartMatch;
