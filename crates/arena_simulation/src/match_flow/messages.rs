//! Тексты для HUD (round start, round summary, итоги матча)

use super::clock::format_time;
use super::registry::CombatantRegistry;

pub const TIMEOUT_PREFIX: &str = "TIME UP\n";

pub fn round_start(round_number: u32) -> String {
    format!("ROUND {}", round_number)
}

pub fn round_summary(registry: &CombatantRegistry) -> String {
    let mut msg = String::from("ROUND OVER\n");
    push_loss_table(&mut msg, registry);
    msg
}

/// Игрок достиг лимита поражений; `rival` - первый соперник по порядку
pub fn player_eliminated(
    registry: &CombatantRegistry,
    loser: usize,
    rival: Option<usize>,
    max_losses: u32,
    remaining_time: f32,
) -> String {
    let loser_id = registry.get(loser).map(|c| c.id).unwrap_or_default();
    let mut msg = format!("PLAYER {} LOST\n", loser_id);

    if let Some(rival) = rival.and_then(|index| registry.get(index)) {
        msg += &format!("WINNER: PLAYER {}\n", rival.id);
        msg += &format!("SCORE: {}\n", max_losses.saturating_sub(rival.losses));
        msg += &format!("TIME: {}", format_time(remaining_time));
    }

    msg
}

/// Итоги по лимиту раундов: меньше всего поражений - победитель, равный минимум - ничья
pub fn final_results(registry: &CombatantRegistry, max_losses: u32, remaining_time: f32) -> String {
    let standings = registry.standings();
    let mut msg = String::from("GAME COMPLETE\n");

    if standings.ambiguous {
        msg += "DRAW BETWEEN PLAYERS\n";
    } else if let Some(winner) = standings.winner_index.and_then(|index| registry.get(index)) {
        msg += &format!("WINNER: PLAYER {}\n", winner.id);
        msg += &format!("SCORE: {}\n", max_losses.saturating_sub(winner.losses));
    }

    msg += &format!("TIME: {}\n\n", format_time(remaining_time));
    msg += "--- RESULTS ---\n";
    push_loss_table(&mut msg, registry);
    msg
}

pub fn timed_out(registry: &CombatantRegistry, max_losses: u32) -> String {
    format!("{}{}", TIMEOUT_PREFIX, final_results(registry, max_losses, 0.0))
}

fn push_loss_table(msg: &mut String, registry: &CombatantRegistry) {
    for combatant in registry.iter() {
        msg.push_str(&format!("Player {}: {} losses\n", combatant.id, combatant.losses));
    }
}
