use evalkit_core::Label;
use serde::{Deserialize, Serialize};

/// How per-class scores are combined into one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    /// Only report the score of `pos_label`; requires at most two classes
    Binary { pos_label: Label },
    /// Count true positives, false positives and false negatives over all classes
    Micro,
    /// Unweighted mean of the per-class scores
    Macro,
    /// Mean of the per-class scores weighted by their support
    Weighted,
}

impl Default for Average {
    fn default() -> Self {
        Average::Binary {
            pos_label: Label::Integer(1),
        }
    }
}
