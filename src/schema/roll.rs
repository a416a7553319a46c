use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed dice expression: `count` dice of `sides` faces plus a flat
/// `modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceFormula {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl fmt::Display for DiceFormula {
    /// Canonical form: `{count}d{sides}`, followed by `+K`/`-K` only when
    /// the modifier is non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

/// The outcome of evaluating a formula once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Canonical rendering of the formula that was rolled.
    #[serde(rename = "formula")]
    pub canonical_formula: String,
    /// Individual die faces in the order drawn.
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i64,
}

impl fmt::Display for RollResult {
    /// `2d6: [3, 4] = 7`, with the signed modifier shown only when it is
    /// non-zero: `1d20+3: [12] +3 = 15`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.canonical_formula)?;
        for (i, face) in self.rolls.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", face)?;
        }
        write!(f, "]")?;
        if self.modifier != 0 {
            write!(f, " {:+}", self.modifier)?;
        }
        write!(f, " = {}", self.total)
    }
}
