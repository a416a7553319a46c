/// Dice expression engine — parsing and rolling `NdM+K` formulas.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use thiserror::Error;

use crate::schema::roll::{DiceFormula, RollResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The formula does not match the `NdM(+/-K)` grammar.
    #[error("cannot parse '{formula}': {reason} (expected NdM(+/-K), e.g. 1d20+3 or 2d6-1)")]
    Parse { formula: String, reason: String },
    /// The formula parsed but its numbers are out of range.
    #[error("{0}")]
    Range(String),
}

impl DiceError {
    fn parse(formula: &str, reason: impl Into<String>) -> Self {
        DiceError::Parse {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Most dice a single formula may roll.
pub const MAX_DICE: u32 = 1000;

impl DiceFormula {
    /// Parse a dice formula.
    ///
    /// Syntax, whitespace tolerated between every token:
    /// - optional count (defaults to 1)
    /// - `d` or `D`
    /// - side count
    /// - optional `+K` / `-K` modifier
    ///
    /// The whole input must match. A count outside `1..=MAX_DICE` or fewer
    /// than 2 sides is reported as [`DiceError::Range`], distinct from
    /// grammar errors.
    pub fn parse(input: &str) -> Result<DiceFormula, DiceError> {
        let mut scanner = Scanner::new(input);

        scanner.skip_whitespace();
        let count = scanner.number(input, "dice count")?;

        scanner.skip_whitespace();
        if !scanner.eat(|c| c == 'd' || c == 'D') {
            return Err(DiceError::parse(input, "missing die marker 'd'"));
        }

        scanner.skip_whitespace();
        let sides = scanner
            .number(input, "side count")?
            .ok_or_else(|| DiceError::parse(input, "missing side count"))?;

        scanner.skip_whitespace();
        let mut modifier: i64 = 0;
        if let Some(sign) = scanner.next_if(|c| c == '+' || c == '-') {
            scanner.skip_whitespace();
            let magnitude = scanner
                .number(input, "modifier")?
                .ok_or_else(|| DiceError::parse(input, "missing modifier after sign"))?;
            modifier = if sign == '-' {
                -i64::from(magnitude)
            } else {
                i64::from(magnitude)
            };
            scanner.skip_whitespace();
        }

        if let Some(c) = scanner.peek() {
            return Err(DiceError::parse(
                input,
                format!("unexpected character '{}'", c),
            ));
        }

        let modifier = i32::try_from(modifier)
            .map_err(|_| DiceError::parse(input, "modifier is too large"))?;
        let formula = DiceFormula {
            count: count.unwrap_or(1),
            sides,
            modifier,
        };
        formula.check_ranges()?;
        Ok(formula)
    }

    /// Reject counts outside `1..=MAX_DICE` and dice with fewer than 2 sides.
    pub fn check_ranges(&self) -> Result<(), DiceError> {
        if self.count < 1 {
            return Err(DiceError::Range(format!(
                "dice count must be >= 1, got {}",
                self.count
            )));
        }
        if self.count > MAX_DICE {
            return Err(DiceError::Range(format!(
                "dice count must be <= {}, got {}",
                MAX_DICE, self.count
            )));
        }
        if self.sides < 2 {
            return Err(DiceError::Range(format!(
                "sides must be >= 2, got {}",
                self.sides
            )));
        }
        Ok(())
    }
}

impl FromStr for DiceFormula {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceFormula::parse(s)
    }
}

/// Character cursor over a formula.
struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        self.chars.next_if(|c| pred(*c))
    }

    fn eat(&mut self, pred: impl Fn(char) -> bool) -> bool {
        self.next_if(pred).is_some()
    }

    fn skip_whitespace(&mut self) {
        while self.eat(char::is_whitespace) {}
    }

    /// Read a run of ASCII digits. `Ok(None)` when no digit is present.
    fn number(&mut self, input: &str, what: &str) -> Result<Option<u32>, DiceError> {
        let mut digits = String::new();
        while let Some(d) = self.next_if(|c| c.is_ascii_digit()) {
            digits.push(d);
        }
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| DiceError::parse(input, format!("{} is too large", what)))
    }
}

/// A source of individual die faces.
pub trait DieSource {
    /// Roll one die, returning a value in `[1, sides]`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Uniform dice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DieSource for RngDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of faces, cycling when exhausted.
///
/// Values are clamped into `[1, sides]` so results stay well-formed.
/// Used for tests and replays.
#[derive(Debug, Clone)]
pub struct SequenceDice {
    values: Vec<u32>,
    index: usize,
}

impl SequenceDice {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DieSource for SequenceDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.values.is_empty() {
            return 1;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value.clamp(1, sides.max(1))
    }
}

/// Rolls formulas against an owned [`DieSource`].
#[derive(Debug, Clone)]
pub struct DiceRoller<S = RngDice<StdRng>> {
    source: S,
}

impl DiceRoller<RngDice<StdRng>> {
    /// Roller seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_source(RngDice::new(StdRng::from_entropy()))
    }

    /// Reproducible roller: the same seed yields the same rolls.
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(RngDice::new(StdRng::seed_from_u64(seed)))
    }
}

impl Default for DiceRoller<RngDice<StdRng>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DieSource> DiceRoller<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Parse and roll a formula.
    pub fn roll(&mut self, formula: &str) -> Result<RollResult, DiceError> {
        let formula = DiceFormula::parse(formula)?;
        self.roll_formula(&formula)
    }

    /// Roll an already parsed formula. Hand-built formulas are range
    /// checked the same way parsed ones are.
    pub fn roll_formula(&mut self, formula: &DiceFormula) -> Result<RollResult, DiceError> {
        formula.check_ranges()?;
        let rolls: Vec<u32> = (0..formula.count)
            .map(|_| self.source.roll_die(formula.sides))
            .collect();
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(formula.modifier);

        Ok(RollResult {
            canonical_formula: formula.to_string(),
            rolls,
            modifier: formula.modifier,
            total,
        })
    }
}

/// Roll a formula with the thread-local process generator.
pub fn roll(formula: &str) -> Result<RollResult, DiceError> {
    let rng: ThreadRng = rand::thread_rng();
    DiceRoller::with_source(RngDice::new(rng)).roll(formula)
}
