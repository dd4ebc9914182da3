//! ECS Components для entity арены
//!
//! Организация по доменам:
//! - actor: танки игроков и здоровье (Tank, TankControl, Health)
//! - world: визуал и принадлежность матчу (PrefabPath, MatchEntity)
//!
//! Компоненты врагов живут в `crate::ai`, маркер `Dead` - в `crate::combat`.

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
