//! Match flow: раунды, поражения, таймер матча, restart
//!
//! - `RoundStateMachine` - чистая логика (Starting → Playing → Ending → GameOver),
//!   единственный владелец реестра игроков и часов матча
//! - `systems` - ECS слой: alive snapshot, применение директив, HUD, камера
//!
//! Хост читает `MatchHud`, `MatchEvent`, `CameraRequest`; шлёт `RestartMatch`.

use bevy::prelude::*;

pub mod clock;
pub mod events;
pub mod messages;
pub mod registry;
pub mod state_machine;
pub mod systems;


// Re-export основных типов
pub use clock::{format_time, MatchClock};
pub use events::{CameraRequest, MatchEndReason, MatchEvent, RestartMatch};
pub use registry::{Combatant, CombatantRegistry, RoundOutcome, Standings};
pub use state_machine::{MatchDirective, MatchPhase, RoundStateMachine};
pub use systems::{populate_arena, MatchHud};

use crate::schedules::SimulationSet;

/// Match Plugin
///
/// - Startup: setup_match
/// - FixedUpdate (`SimulationSet::MatchFlow`): advance_match - часы + фазы
/// - Update: restart_match (FixedUpdate стоит, пока время заморожено)
pub struct MatchPlugin;

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MatchEvent>()
            .add_event::<CameraRequest>()
            .add_event::<RestartMatch>()
            .init_resource::<MatchHud>();

        app.add_systems(Startup, systems::setup_match)
            .add_systems(
                FixedUpdate,
                systems::advance_match
                    .run_if(resource_exists::<RoundStateMachine>)
                    .in_set(SimulationSet::MatchFlow),
            )
            .add_systems(Update, systems::restart_match);
    }
}
