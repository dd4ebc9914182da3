//! Combatant registry - per-player состояние матча
//!
//! Registry мутирует только round state machine. Alive-состояние в registry
//! не хранится: его каждый тик передаёт ECS слой (snapshot `&[bool]` в порядке слотов).

use bevy::prelude::{Entity, Transform};

/// Игрок матча
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    /// Номер игрока (1-based)
    pub id: u32,
    pub spawn_pose: Transform,
    /// Текущий instance танка (weak: проверяется перед каждым использованием)
    pub instance: Option<Entity>,
    /// Растёт монотонно, сбрасывается только full restart'ом
    pub losses: u32,
    pub control_enabled: bool,
}

/// Итог раунда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    SoleSurvivor(u32),
    NoSurvivor,
}

/// Итог подсчёта поражений для финальных результатов
///
/// `winner_index` - первый найденный минимум. `ambiguous` выставляется, если позже
/// встретился игрок с тем же минимумом; `winner_index` при этом НЕ сбрасывается.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standings {
    pub winner_index: Option<usize>,
    pub least_losses: u32,
    pub ambiguous: bool,
}

/// Результат начисления поражений в конце раунда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossTally {
    /// Все поражения начислены, никто не выбыл
    Recorded,
    /// Игрок по индексу `loser` достиг лимита; начисление остановлено на нём
    LimitReached { loser: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatantRegistry {
    combatants: Vec<Combatant>,
}

impl CombatantRegistry {
    /// Регистрирует игроков по spawn позам, номера 1..=N
    pub fn from_spawn_poses(poses: impl IntoIterator<Item = Transform>) -> Self {
        let combatants = poses
            .into_iter()
            .enumerate()
            .map(|(index, spawn_pose)| Combatant {
                id: index as u32 + 1,
                spawn_pose,
                instance: None,
                losses: 0,
                control_enabled: false,
            })
            .collect();

        Self { combatants }
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.combatants.get(index)
    }

    /// Привязывает instance танка к слоту (после spawn через factory)
    pub fn assign_instance(&mut self, index: usize, instance: Entity) {
        if let Some(combatant) = self.combatants.get_mut(index) {
            combatant.instance = Some(instance);
        }
    }

    pub fn instances(&self) -> impl Iterator<Item = Entity> + '_ {
        self.combatants.iter().filter_map(|c| c.instance)
    }

    pub fn set_control(&mut self, enabled: bool) {
        for combatant in &mut self.combatants {
            combatant.control_enabled = enabled;
        }
    }

    /// Full restart: поражения в 0, instances забываются (арена наполняется заново)
    pub fn reset_for_new_match(&mut self) {
        for combatant in &mut self.combatants {
            combatant.losses = 0;
            combatant.instance = None;
            combatant.control_enabled = false;
        }
    }

    /// Индекс победителя раунда: первый живой игрок по порядку
    pub fn round_winner(&self, alive: &[bool]) -> Option<usize> {
        (0..self.combatants.len()).find(|&index| is_alive(alive, index))
    }

    /// Начисляет +1 поражение всем, кроме победителя раунда (включая уже выбывших).
    ///
    /// Останавливается на первом игроке, достигшем `max_losses`.
    pub fn record_round_losses(&mut self, winner: Option<usize>, max_losses: u32) -> LossTally {
        for (index, combatant) in self.combatants.iter_mut().enumerate() {
            if Some(index) == winner {
                continue;
            }

            combatant.losses += 1;
            if combatant.losses >= max_losses {
                return LossTally::LimitReached { loser: index };
            }
        }
        LossTally::Recorded
    }

    /// Первый соперник выбывшего игрока (по порядку регистрации)
    pub fn first_rival(&self, loser: usize) -> Option<usize> {
        (0..self.combatants.len()).find(|&index| index != loser)
    }

    /// Минимум поражений: строгое `<` при скане слева направо, равенство → ambiguous
    pub fn standings(&self) -> Standings {
        let mut least_losses = u32::MAX;
        let mut winner_index = None;
        let mut ambiguous = false;

        for (index, combatant) in self.combatants.iter().enumerate() {
            if combatant.losses < least_losses {
                least_losses = combatant.losses;
                winner_index = Some(index);
                ambiguous = false;
            } else if combatant.losses == least_losses {
                ambiguous = true;
            }
        }

        Standings {
            winner_index,
            least_losses,
            ambiguous,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_losses(&mut self, losses: &[u32]) {
        for (combatant, &value) in self.combatants.iter_mut().zip(losses) {
            combatant.losses = value;
        }
    }
}

/// OneTankLeft: живых ≤ 1
pub fn one_tank_left(alive: &[bool]) -> bool {
    alive.iter().filter(|&&a| a).count() <= 1
}

fn is_alive(alive: &[bool], index: usize) -> bool {
    alive.get(index).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(count: usize) -> CombatantRegistry {
        CombatantRegistry::from_spawn_poses((0..count).map(|i| Transform::from_xyz(i as f32, 0.0, 0.0)))
    }

    #[test]
    fn test_ids_are_one_based() {
        let registry = registry(3);
        let ids: Vec<u32> = registry.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(registry.iter().all(|c| c.losses == 0 && c.instance.is_none()));
    }

    #[test]
    fn test_one_tank_left() {
        assert!(one_tank_left(&[]));
        assert!(one_tank_left(&[false, false]));
        assert!(one_tank_left(&[true, false, false]));
        assert!(!one_tank_left(&[true, true]));
        assert!(!one_tank_left(&[true, false, true]));
    }

    #[test]
    fn test_round_winner_is_first_alive() {
        let registry = registry(3);
        assert_eq!(registry.round_winner(&[false, true, true]), Some(1));
        assert_eq!(registry.round_winner(&[false, false, false]), None);
        // Короткий snapshot: недостающие слоты считаются мёртвыми
        assert_eq!(registry.round_winner(&[false]), None);
    }

    #[test]
    fn test_standings_equal_minimum_is_ambiguous() {
        let mut registry = registry(3);
        registry.set_losses(&[2, 1, 1]);

        let standings = registry.standings();
        assert_eq!(standings.winner_index, Some(1));
        assert_eq!(standings.least_losses, 1);
        assert!(standings.ambiguous);
    }

    #[test]
    fn test_standings_later_smaller_overrides() {
        let mut registry = registry(3);
        registry.set_losses(&[2, 1, 0]);

        let standings = registry.standings();
        assert_eq!(standings.winner_index, Some(2));
        assert!(!standings.ambiguous);

        // Равенство, а потом меньше - draw флаг снимается
        registry.set_losses(&[1, 1, 0]);
        let standings = registry.standings();
        assert_eq!(standings.winner_index, Some(2));
        assert!(!standings.ambiguous);
    }

    #[test]
    fn test_losses_skip_only_round_winner() {
        let mut registry = registry(3);
        let tally = registry.record_round_losses(Some(1), 5);
        assert_eq!(tally, LossTally::Recorded);

        let losses: Vec<u32> = registry.iter().map(|c| c.losses).collect();
        assert_eq!(losses, vec![1, 0, 1]);
    }

    #[test]
    fn test_no_survivor_charges_everyone() {
        let mut registry = registry(2);
        registry.record_round_losses(None, 5);
        assert!(registry.iter().all(|c| c.losses == 1));
    }

    #[test]
    fn test_loss_limit_stops_tally_at_first_loser() {
        let mut registry = registry(3);
        registry.set_losses(&[0, 1, 1]);

        let tally = registry.record_round_losses(Some(0), 2);
        assert_eq!(tally, LossTally::LimitReached { loser: 1 });

        // Игрок 3 не получил поражение - начисление прервано
        let losses: Vec<u32> = registry.iter().map(|c| c.losses).collect();
        assert_eq!(losses, vec![0, 2, 1]);
        assert_eq!(registry.first_rival(1), Some(0));
        assert_eq!(registry.first_rival(0), Some(1));
    }

    #[test]
    fn test_reset_for_new_match() {
        let mut registry = registry(2);
        registry.assign_instance(0, Entity::PLACEHOLDER);
        registry.set_losses(&[3, 4]);
        registry.set_control(true);

        registry.reset_for_new_match();
        assert!(registry.iter().all(|c| c.losses == 0 && c.instance.is_none() && !c.control_enabled));
    }
}
