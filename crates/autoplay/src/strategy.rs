use crate::AutoAction;
use tenzies_core::{Die, DIE_FACES};

/// Most common face; ties go to the higher face. `None` for an empty set.
pub fn majority_face(dice: &[Die]) -> Option<u8> {
    if dice.is_empty() {
        return None;
    }
    let mut counts = [0usize; DIE_FACES as usize + 1];
    for die in dice {
        counts[die.value as usize] += 1;
    }
    (1..=DIE_FACES).max_by_key(|face| counts[*face as usize])
}

/// Holds every die showing `target`, releases the rest, then rolls.
pub fn plan_turn(dice: &[Die]) -> Vec<AutoAction> {
    let Some(target) = majority_face(dice) else {
        return Vec::new();
    };
    let mut actions: Vec<AutoAction> = dice
        .iter()
        .enumerate()
        .filter(|(_, die)| die.held != (die.value == target))
        .map(|(index, _)| AutoAction::Hold { index })
        .collect();
    let all_on_target = dice.iter().all(|die| die.value == target);
    if !all_on_target {
        actions.push(AutoAction::Roll);
    }
    actions
}
