//! Timer systems для tick-based schedules

use bevy::prelude::{ResMut, World};

use super::{FixedTickCounter, TargetScan, TARGET_SCAN_INTERVAL_TICKS};

/// System: tick += 1 (после всех проверок cadence в этом тике)
pub fn advance_tick_counter(mut counter: ResMut<FixedTickCounter>) {
    counter.tick = counter.tick.wrapping_add(1);
}

/// Нужен ли TargetScan на этом тике (первый тик - сразу)
pub fn is_target_scan_tick(tick: u64) -> bool {
    tick % TARGET_SCAN_INTERVAL_TICKS == 0
}

/// System: TargetScan каждые 30 ticks (0.5s @ 60 Hz)
///
/// Exclusive system (требует &mut World для run_schedule).
pub fn run_target_scan_timer(world: &mut World) {
    let tick = world.resource::<FixedTickCounter>().tick;

    if is_target_scan_tick(tick) {
        if let Err(err) = world.try_run_schedule(TargetScan) {
            crate::log_error(&format!("TargetScan: {}", err));
        }
    }
}
