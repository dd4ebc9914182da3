//! ECS слой match flow
//!
//! - `setup_match` (Startup): RoundStateMachine + spawn танков/врагов через factory
//! - `advance_match` (FixedUpdate): alive snapshot → `advance` → применение директив
//! - `restart_match` (Update): full restart, работает и при замороженном времени

use bevy::prelude::*;
use rand::Rng;

use super::events::{CameraRequest, MatchEvent, RestartMatch};
use super::state_machine::{MatchDirective, RoundStateMachine};
use crate::ai::{spawn_initial_enemies, EnemyWaves};
use crate::combat::{is_agent_alive, Dead};
use crate::components::{Health, MatchEntity, Tank, TankControl};
use crate::config::{ArenaLayout, MatchConfig};
use crate::error::{AgentError, MatchSetupError};
use crate::factory::{AgentFactory, PrefabKind};
use crate::DeterministicRng;

/// Display sink: что хост показывает игроку
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchHud {
    /// Центральное сообщение (пустое = скрыто)
    pub message: String,
    /// Оставшееся время "mm:ss"
    pub timer_text: String,
    pub end_panel_visible: bool,
}

type TankQuery<'w, 's> =
    Query<'w, 's, (&'static mut Transform, &'static mut Health, &'static mut TankControl, Has<Dead>), With<Tank>>;

pub fn build_round_machine(
    config: &MatchConfig,
    layout: &ArenaLayout,
) -> Result<RoundStateMachine, MatchSetupError> {
    layout.validate()?;
    RoundStateMachine::new(config.clone(), layout.tank_spawn_transforms())
}

/// Спавнит танк на каждый слот реестра (+ стартовых врагов)
///
/// Возвращает instances танков в порядке игроков.
pub fn populate_arena(
    factory: &mut impl AgentFactory,
    machine: &mut RoundStateMachine,
    layout: &ArenaLayout,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let slots: Vec<(usize, u32, Transform)> = machine
        .registry()
        .iter()
        .enumerate()
        .map(|(index, combatant)| (index, combatant.id, combatant.spawn_pose))
        .collect();

    let tanks: Vec<Entity> = slots
        .into_iter()
        .map(|(index, player_number, pose)| {
            let kind = PrefabKind::Tank {
                player_number,
                prefab: layout.tank_prefab.clone(),
            };
            let instance = factory.spawn_agent(&kind, pose);
            machine.assign_instance(index, instance);
            instance
        })
        .collect();

    let enemies = spawn_initial_enemies(factory, layout, rng);
    crate::log_info(&format!(
        "Arena populated: {} tanks, {} enemies",
        tanks.len(),
        enemies.len()
    ));

    tanks
}

/// System: создание матча (Startup)
///
/// Ошибка конфигурации → лог + выход без RoundStateMachine (match flow инертен).
pub fn setup_match(
    mut commands: Commands,
    config: Option<Res<MatchConfig>>,
    layout: Option<Res<ArenaLayout>>,
    mut rng: ResMut<DeterministicRng>,
    mut hud: ResMut<MatchHud>,
    mut camera: EventWriter<CameraRequest>,
) {
    let result = match (config.as_deref(), layout.as_deref()) {
        (Some(config), Some(layout)) => build_round_machine(config, layout),
        (None, _) => Err(MatchSetupError::ConfigurationMissing("MatchConfig resource")),
        (_, None) => Err(MatchSetupError::ConfigurationMissing("ArenaLayout resource")),
    };

    let mut machine = match result {
        Ok(machine) => machine,
        Err(err) => {
            crate::log_error(&format!("Match setup failed: {}", err));
            return;
        }
    };

    // layout точно есть, иначе build_round_machine вернул бы ошибку
    let Some(layout) = layout else {
        return;
    };

    let tanks = populate_arena(&mut commands, &mut machine, &layout, &mut rng.rng);
    camera.write(CameraRequest::SetTargets(tanks));
    *hud = MatchHud::default();

    crate::log_info(&format!(
        "Match ready: {} players, {} losses to lose, {} rounds, {}s",
        machine.registry().len(),
        machine.config().max_losses_to_end,
        machine.config().max_rounds,
        machine.config().max_game_time
    ));
    commands.insert_resource(machine);
}

/// Alive snapshot в порядке слотов (нет instance / исчез → мёртв)
pub fn alive_snapshot(machine: &RoundStateMachine, tanks: &TankQuery) -> Vec<bool> {
    machine
        .registry()
        .iter()
        .map(|combatant| {
            combatant
                .instance
                .and_then(|entity| tanks.get(entity).ok())
                .is_some_and(|(_, health, _, dead)| is_agent_alive(Some(health), dead))
        })
        .collect()
}

/// Танк → spawn поза, полное здоровье, снять Dead
pub fn reset_tank(
    commands: &mut Commands,
    tanks: &mut TankQuery,
    instance: Entity,
    spawn_pose: Transform,
) -> Result<(), AgentError> {
    let (mut transform, mut health, _, dead) = tanks
        .get_mut(instance)
        .map_err(|_| AgentError::InvalidHandle(instance))?;

    *transform = spawn_pose;
    health.restore();
    if dead {
        commands.entity(instance).remove::<Dead>();
    }
    Ok(())
}

/// System: один тик round state machine
pub fn advance_match(
    mut commands: Commands,
    mut machine: ResMut<RoundStateMachine>,
    mut hud: ResMut<MatchHud>,
    mut tanks: TankQuery,
    mut match_events: EventWriter<MatchEvent>,
    mut camera: EventWriter<CameraRequest>,
    mut restarts: EventWriter<RestartMatch>,
    mut virtual_time: ResMut<Time<Virtual>>,
    time: Res<Time<Fixed>>,
) {
    let alive = alive_snapshot(&machine, &tanks);
    let directives = machine.advance(time.delta_secs(), &alive);

    for directive in directives {
        match directive {
            MatchDirective::ResetCombatants => {
                for combatant in machine.registry().iter() {
                    let Some(instance) = combatant.instance else {
                        continue;
                    };
                    if let Err(err) = reset_tank(&mut commands, &mut tanks, instance, combatant.spawn_pose) {
                        crate::log_warning(&format!("Reset of player {} skipped: {}", combatant.id, err));
                    }
                }
            }
            MatchDirective::SetControl(enabled) => {
                for instance in machine.registry().instances() {
                    if let Ok((_, _, mut control, _)) = tanks.get_mut(instance) {
                        control.enabled = enabled;
                    }
                }
            }
            MatchDirective::FrameStartPositions => {
                camera.write(CameraRequest::FrameStartPositions);
            }
            MatchDirective::ShowMessage(message) => hud.message = message,
            MatchDirective::ShowTimer(text) => hud.timer_text = text,
            MatchDirective::ShowEndPanel => hud.end_panel_visible = true,
            MatchDirective::Announce(event) => {
                match_events.write(event);
            }
            MatchDirective::FreezeSimulation => {
                crate::log_info("Match: simulation frozen");
                virtual_time.pause();
            }
            MatchDirective::RestartMatch => {
                restarts.write(RestartMatch);
            }
        }
    }
}

/// System: full restart (UI кнопка хоста или таймер после timeout)
///
/// Несколько запросов в одном кадре = один restart.
pub fn restart_match(
    mut commands: Commands,
    mut requests: EventReader<RestartMatch>,
    machine: Option<ResMut<RoundStateMachine>>,
    layout: Option<Res<ArenaLayout>>,
    match_entities: Query<Entity, With<MatchEntity>>,
    mut rng: ResMut<DeterministicRng>,
    mut hud: ResMut<MatchHud>,
    mut waves: ResMut<EnemyWaves>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut camera: EventWriter<CameraRequest>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let (Some(mut machine), Some(layout)) = (machine, layout) else {
        crate::log_warning("Restart requested but match was never set up");
        return;
    };

    crate::log_info("Match: full restart");

    for entity in match_entities.iter() {
        commands.entity(entity).despawn();
    }

    machine.restart();
    let tanks = populate_arena(&mut commands, &mut machine, &layout, &mut rng.rng);
    camera.write(CameraRequest::SetTargets(tanks));

    *hud = MatchHud::default();
    *waves = EnemyWaves::default();
    virtual_time.unpause();
    virtual_time.set_relative_speed(1.0);
}
