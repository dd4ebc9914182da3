//! Tank Arena Simulation Core
//!
//! ECS-симуляция матча на Bevy 0.16: раунды танков, таймер матча,
//! враги-преследователи. Хост (движок) рисует, читает input и камеру;
//! симуляция владеет правилами матча.
//!
//! Порядок fixed tick: match clock + round state machine → target scan →
//! враги → урон (см. `schedules`).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod factory;
pub mod logger;
pub mod match_flow;
pub mod schedules;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, ChaseMode, ChaseTarget, Enemy, EnemyChase};
pub use combat::{CombatPlugin, DamageDealt, Dead, EnemyAttack, EntityDied};
pub use components::*;
pub use config::{ArenaConfig, ArenaLayout, EnemyChaseConfig, EnemyPrefab, MatchConfig, SpawnPose};
pub use error::{AgentError, MatchSetupError};
pub use factory::{AgentFactory, PrefabKind};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use match_flow::{
    CameraRequest, MatchEndReason, MatchEvent, MatchHud, MatchPhase, MatchPlugin, RestartMatch,
    RoundStateMachine,
};
pub use schedules::{SchedulesPlugin, SimulationSet, SIMULATION_HZ};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Конфиг арены становится ресурсами `MatchConfig` + `ArenaLayout`.
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: ArenaConfig,
}

impl SimulationPlugin {
    pub fn new(config: ArenaConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        init_logger();

        // Seed мог задать create_headless_app
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .insert_resource(self.config.match_rules.clone())
            .insert_resource(self.config.layout.clone())
            // Подсистемы
            .add_plugins((SchedulesPlugin, MatchPlugin, AIPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную ровно на один fixed timestep за `app.update()`
/// (первый update - нулевой delta), поэтому прогон детерминирован.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(SIMULATION_HZ);
    let step = fixed.timestep();

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(fixed)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
