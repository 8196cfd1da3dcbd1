use std::fmt::Display;

use itertools::Itertools;
use rand::Rng;

use super::RoundOutcome;

pub const DEFAULT_DIGITS: u32 = 2;
pub const MAX_DIGITS: u32 = 4;

/// The numbers the player has to reproduce, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    values: Vec<u32>,
}

impl Sequence {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values }
    }

    /// Draws `len` values uniformly from `[0, 10^digits)`.
    pub fn generate<R: Rng>(rng: &mut R, len: usize, digits: u32) -> Self {
        let upper = Self::upper_bound(digits);
        let values = (0..len).map(|_| rng.random_range(0..upper)).collect();
        Self { values }
    }

    pub fn upper_bound(digits: u32) -> u32 {
        10u32.pow(digits.clamp(1, MAX_DIGITS))
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compares typed answers position by position, stopping at the first
    /// entry that is not a number or does not match.
    pub fn check<S: AsRef<str>>(&self, answers: &[S]) -> RoundOutcome {
        if answers.len() != self.values.len() {
            return RoundOutcome::Incorrect;
        }
        let all_match = self
            .values
            .iter()
            .zip(answers)
            .all(|(expected, answer)| {
                let answer: &str = answer.as_ref();
                match answer.trim().parse::<i64>() {
                    Ok(entered) => entered == i64::from(*expected),
                    Err(_) => false,
                }
            });
        if all_match {
            RoundOutcome::Correct
        } else {
            RoundOutcome::Incorrect
        }
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.values.iter().join(" "))
    }
}
