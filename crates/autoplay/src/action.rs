use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AutoAction {
    Hold { index: usize },
    Roll,
}

impl AutoAction {
    pub fn short_label(&self) -> String {
        match self {
            Self::Hold { index } => format!("hold {index}"),
            Self::Roll => "roll".to_string(),
        }
    }
}
