use serde::{Deserialize, Serialize};
use std::fmt;

pub const DICE_COUNT: usize = 10;
pub const DIE_FACES: u8 = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DieId(pub u32);

impl fmt::Display for DieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Die {
    pub id: DieId,
    pub value: u8,
    pub held: bool,
}

impl Die {
    pub fn new(id: DieId, value: u8) -> Self {
        Self {
            id,
            value,
            held: false,
        }
    }

    pub fn toggle_hold(&mut self) {
        self.held = !self.held;
    }
}

/// True when there is at least one die, every die is held, and all faces match.
pub fn derive_won(dice: &[Die]) -> bool {
    let Some(first) = dice.first() else {
        return false;
    };
    dice.iter()
        .all(|die| die.held && die.value == first.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(values: &[u8], held: bool) -> Vec<Die> {
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| Die {
                id: DieId(idx as u32),
                value: *value,
                held,
            })
            .collect()
    }

    #[test]
    fn empty_set_is_never_won() {
        assert!(!derive_won(&[]));
    }

    #[test]
    fn all_held_and_equal_is_won() {
        assert!(derive_won(&dice(&[4; DICE_COUNT], true)));
    }

    #[test]
    fn equal_but_not_held_is_not_won() {
        assert!(!derive_won(&dice(&[4; DICE_COUNT], false)));
        let mut mixed = dice(&[4; DICE_COUNT], true);
        mixed[9].held = false;
        assert!(!derive_won(&mixed));
    }

    #[test]
    fn held_but_unequal_is_not_won() {
        let mut values = [2; DICE_COUNT];
        values[3] = 5;
        assert!(!derive_won(&dice(&values, true)));
    }

    #[test]
    fn toggle_hold_flips_back() {
        let mut die = Die::new(DieId(1), 3);
        die.toggle_hold();
        assert!(die.held);
        die.toggle_hold();
        assert!(!die.held);
        assert_eq!(die.id.to_string(), "d1");
    }
}
