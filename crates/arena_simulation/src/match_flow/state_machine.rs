//! Round state machine: Starting → Playing → Ending → (Starting | GameOver)
//!
//! Чистая логика без ECS: `advance(dt, alive)` вызывается один раз за fixed tick
//! и возвращает список директив, которые ECS слой применяет к миру
//! (reset танков, control, HUD, камера, заморозка времени, restart).
//!
//! Ожидания ("подождать N секунд", "ждать пока не останется один танк") хранятся
//! как явное resumable состояние (`Suspension`) и проверяются на каждом тике.
//! Фаза не начинается, пока ожидание предыдущей не завершилось полностью.

use bevy::prelude::*;

use super::clock::MatchClock;
use super::events::{MatchEndReason, MatchEvent};
use super::messages;
use super::registry::{one_tank_left, CombatantRegistry, LossTally, RoundOutcome};
use crate::config::MatchConfig;
use crate::error::MatchSetupError;

/// Допуск на накопленную ошибку f32 при вычитании fixed delta
/// (3s при 60Hz = ровно 180 тиков, а не 181)
const DELAY_TOLERANCE: f32 = 1e-4;

/// Фаза матча (единственный источник правды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum MatchPhase {
    #[default]
    Starting,
    Playing,
    Ending,
    GameOver,
}

/// Чего ждёт текущая фаза
#[derive(Debug, Clone, Copy, PartialEq)]
enum Suspension {
    /// Вход в фазу ещё не выполнен
    Enter,
    Delay { remaining: f32 },
    UntilOneTankLeft,
    /// GameOver: ждём только restart
    Halted,
}

/// Директива для ECS слоя
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDirective {
    /// Все танки → spawn поза, полное здоровье
    ResetCombatants,
    SetControl(bool),
    FrameStartPositions,
    /// Пустая строка = очистить сообщение
    ShowMessage(String),
    ShowTimer(String),
    ShowEndPanel,
    Announce(MatchEvent),
    /// Time scale → 0
    FreezeSimulation,
    RestartMatch,
}

#[derive(Resource, Debug, Clone)]
pub struct RoundStateMachine {
    config: MatchConfig,
    registry: CombatantRegistry,
    clock: MatchClock,
    phase: MatchPhase,
    round_number: u32,
    suspension: Suspension,
    round_winner: Option<u32>,
    /// Матч решён (может ещё идти end delay перед GameOver)
    concluded: Option<MatchEndReason>,
    restart_countdown: Option<f32>,
}

impl RoundStateMachine {
    pub fn new(config: MatchConfig, spawn_poses: Vec<Transform>) -> Result<Self, MatchSetupError> {
        config.validate()?;
        if spawn_poses.is_empty() {
            return Err(MatchSetupError::ConfigurationMissing("tank spawn points"));
        }

        let registry = CombatantRegistry::from_spawn_poses(spawn_poses);
        let clock = MatchClock::new(config.max_game_time);

        Ok(Self {
            config,
            registry,
            clock,
            phase: MatchPhase::Starting,
            round_number: 0,
            suspension: Suspension::Enter,
            round_winner: None,
            concluded: None,
            restart_countdown: None,
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn registry(&self) -> &CombatantRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Победитель последнего завершённого раунда (None = никто не выжил)
    pub fn round_winner(&self) -> Option<u32> {
        self.round_winner
    }

    pub fn end_reason(&self) -> Option<MatchEndReason> {
        self.concluded
    }

    /// Матч идёт: часы тикают, враги могут приходить волнами
    pub fn is_match_active(&self) -> bool {
        self.phase != MatchPhase::GameOver && self.concluded.is_none()
    }

    pub fn is_restart_pending(&self) -> bool {
        self.restart_countdown.is_some()
    }

    /// Привязка instance танка к слоту после spawn через factory
    pub fn assign_instance(&mut self, index: usize, instance: Entity) {
        self.registry.assign_instance(index, instance);
    }

    /// Full restart: всё состояние как при первом запуске.
    ///
    /// Отменяет незавершённые ожидания и запланированный restart.
    pub fn restart(&mut self) {
        self.registry.reset_for_new_match();
        self.clock = MatchClock::new(self.config.max_game_time);
        self.phase = MatchPhase::Starting;
        self.round_number = 0;
        self.suspension = Suspension::Enter;
        self.round_winner = None;
        self.concluded = None;
        self.restart_countdown = None;
    }

    /// Один тик: часы → фазы. `alive[i]` - жив ли танк слота `i`.
    pub fn advance(&mut self, dt: f32, alive: &[bool]) -> Vec<MatchDirective> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut out = Vec::new();

        if self.is_match_active() {
            let expired = self.clock.tick(dt);
            out.push(MatchDirective::ShowTimer(self.clock.format()));

            if expired {
                self.time_out(&mut out);
                return out;
            }
        }

        if self.phase == MatchPhase::GameOver {
            self.tick_restart_countdown(dt, &mut out);
            return out;
        }

        self.run_phases(dt, alive, &mut out);
        out
    }

    fn run_phases(&mut self, dt: f32, alive: &[bool], out: &mut Vec<MatchDirective>) {
        // Время тика тратится только на ожидание, начатое на прошлых тиках
        if let Suspension::Delay { remaining } = &mut self.suspension {
            *remaining -= dt;
        }

        // После ResetCombatants snapshot этого тика устарел: все снова живы
        let mut after_reset: Option<Vec<bool>> = None;

        loop {
            let alive = after_reset.as_deref().unwrap_or(alive);
            match self.suspension {
                Suspension::Enter => {
                    self.enter_phase(alive, out);
                    if self.phase == MatchPhase::Starting {
                        after_reset = Some(vec![true; self.registry.len()]);
                    }
                }
                Suspension::Delay { remaining } => {
                    if remaining > DELAY_TOLERANCE {
                        break;
                    }
                    self.finish_delay(out);
                }
                Suspension::UntilOneTankLeft => {
                    if !one_tank_left(alive) {
                        break;
                    }
                    self.transition(MatchPhase::Ending);
                }
                Suspension::Halted => break,
            }
        }
    }

    fn transition(&mut self, phase: MatchPhase) {
        crate::log(&format!("Match: {:?} → {:?} (round {})", self.phase, phase, self.round_number));
        self.phase = phase;
        self.suspension = Suspension::Enter;
    }

    fn enter_phase(&mut self, alive: &[bool], out: &mut Vec<MatchDirective>) {
        match self.phase {
            MatchPhase::Starting => {
                out.push(MatchDirective::ResetCombatants);
                self.set_control(false, out);
                out.push(MatchDirective::FrameStartPositions);

                self.round_number += 1;
                let message = messages::round_start(self.round_number);
                crate::log_info(&format!("Match: round {} starting", self.round_number));

                out.push(MatchDirective::ShowMessage(message.clone()));
                out.push(MatchDirective::Announce(MatchEvent::RoundStarted {
                    round: self.round_number,
                    message,
                }));
                self.suspension = Suspension::Delay {
                    remaining: self.config.start_delay,
                };
            }
            MatchPhase::Playing => {
                self.set_control(true, out);
                out.push(MatchDirective::ShowMessage(String::new()));
                self.suspension = Suspension::UntilOneTankLeft;
            }
            MatchPhase::Ending => self.enter_ending(alive, out),
            MatchPhase::GameOver => {
                self.suspension = Suspension::Halted;
            }
        }
    }

    fn enter_ending(&mut self, alive: &[bool], out: &mut Vec<MatchDirective>) {
        self.set_control(false, out);

        let winner_index = self.registry.round_winner(alive);
        self.round_winner = winner_index.and_then(|index| self.registry.get(index)).map(|c| c.id);
        let outcome = match self.round_winner {
            Some(id) => RoundOutcome::SoleSurvivor(id),
            None => RoundOutcome::NoSurvivor,
        };

        let max_losses = self.config.max_losses_to_end;
        match self.registry.record_round_losses(winner_index, max_losses) {
            LossTally::LimitReached { loser } => {
                let rival = self.registry.first_rival(loser);
                let message = messages::player_eliminated(
                    &self.registry,
                    loser,
                    rival,
                    max_losses,
                    self.clock.remaining(),
                );
                let reason = MatchEndReason::Eliminated {
                    loser: self.combatant_id(loser).unwrap_or_default(),
                    winner: rival.and_then(|index| self.combatant_id(index)),
                };
                crate::log_info(&format!("Match: decided in round {} ({:?})", self.round_number, reason));

                // Матч решён сразу: часы стоят, но end delay ещё отыгрывается
                self.concluded = Some(reason);
                out.push(MatchDirective::ShowMessage(message.clone()));
                out.push(MatchDirective::ShowEndPanel);
                out.push(MatchDirective::Announce(MatchEvent::RoundEnded {
                    round: self.round_number,
                    outcome,
                    message: message.clone(),
                }));
                out.push(MatchDirective::Announce(MatchEvent::MatchEnded { reason, message }));
            }
            LossTally::Recorded => {
                let message = messages::round_summary(&self.registry);
                crate::log_info(&format!("Match: round {} ended ({:?})", self.round_number, outcome));

                out.push(MatchDirective::ShowMessage(message.clone()));
                out.push(MatchDirective::Announce(MatchEvent::RoundEnded {
                    round: self.round_number,
                    outcome,
                    message,
                }));
            }
        }

        self.suspension = Suspension::Delay {
            remaining: self.config.end_delay,
        };
    }

    fn finish_delay(&mut self, out: &mut Vec<MatchDirective>) {
        match self.phase {
            MatchPhase::Starting => self.transition(MatchPhase::Playing),
            MatchPhase::Ending if self.concluded.is_some() => {
                out.push(MatchDirective::FreezeSimulation);
                self.transition(MatchPhase::GameOver);
            }
            MatchPhase::Ending if self.round_number >= self.config.max_rounds => {
                self.finish_by_round_limit(out);
            }
            MatchPhase::Ending => self.transition(MatchPhase::Starting),
            MatchPhase::Playing | MatchPhase::GameOver => {
                self.suspension = Suspension::Halted;
            }
        }
    }

    fn finish_by_round_limit(&mut self, out: &mut Vec<MatchDirective>) {
        let standings = self.registry.standings();
        let message = messages::final_results(
            &self.registry,
            self.config.max_losses_to_end,
            self.clock.remaining(),
        );
        // При ничьей winner_index остаётся от первого минимума - отдаём как есть вместе с флагом
        let reason = MatchEndReason::RoundLimit {
            winner: standings.winner_index.and_then(|index| self.combatant_id(index)),
            draw: standings.ambiguous,
        };
        crate::log_info(&format!("Match: round limit reached ({:?})", reason));

        self.concluded = Some(reason);
        out.push(MatchDirective::ShowMessage(message.clone()));
        out.push(MatchDirective::ShowEndPanel);
        out.push(MatchDirective::Announce(MatchEvent::MatchEnded { reason, message }));
        out.push(MatchDirective::FreezeSimulation);
        self.transition(MatchPhase::GameOver);
    }

    fn time_out(&mut self, out: &mut Vec<MatchDirective>) {
        let message = messages::timed_out(&self.registry, self.config.max_losses_to_end);
        crate::log_info(&format!(
            "Match: time is up in round {}, restart in {}s",
            self.round_number, self.config.restart_delay
        ));

        self.concluded = Some(MatchEndReason::TimedOut);
        out.push(MatchDirective::ShowMessage(message.clone()));
        out.push(MatchDirective::ShowEndPanel);
        out.push(MatchDirective::Announce(MatchEvent::MatchEnded {
            reason: MatchEndReason::TimedOut,
            message,
        }));

        self.transition(MatchPhase::GameOver);
        self.suspension = Suspension::Halted;
        self.restart_countdown = Some(self.config.restart_delay);
    }

    fn tick_restart_countdown(&mut self, dt: f32, out: &mut Vec<MatchDirective>) {
        let Some(remaining) = self.restart_countdown.as_mut() else {
            return;
        };

        *remaining -= dt;
        if *remaining <= DELAY_TOLERANCE {
            self.restart_countdown = None;
            out.push(MatchDirective::RestartMatch);
        }
    }

    fn set_control(&mut self, enabled: bool, out: &mut Vec<MatchDirective>) {
        self.registry.set_control(enabled);
        out.push(MatchDirective::SetControl(enabled));
    }

    fn combatant_id(&self, index: usize) -> Option<u32> {
        self.registry.get(index).map(|c| c.id)
    }

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut CombatantRegistry {
        &mut self.registry
    }
}
