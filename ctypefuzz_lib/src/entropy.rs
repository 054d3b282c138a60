//! Sources of the random draws the generator makes.

use std::{collections::VecDeque, fmt::Display, str::FromStr};

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait Entropy {
    /// Returns `true` with probability `p`, which has to be in `[0, 1]`.
    fn chance(&mut self, p: f64) -> bool;

    /// Returns a uniformly drawn integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32;
}

impl<E: Entropy + ?Sized> Entropy for &mut E {
    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }

    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        (**self).range(lo, hi)
    }
}

/// Pseudo random draws from a seeded [`StdRng`].
///
/// The seed is kept around so a run can be reproduced with [`RngEntropy::seeded`]. The exact
/// sequence for a seed is only stable for a given version of `rand`.
#[derive(Debug, Clone)]
pub struct RngEntropy {
    rng: StdRng,
    seed: u64,
}

impl RngEntropy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Picks a fresh seed from the thread local rng, which is seeded by the OS.
    pub fn from_os() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Entropy for RngEntropy {
    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Bool(bool),
    Int(u32),
}

impl Display for Draw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Draw::Bool(b) => write!(f, "{b}"),
            Draw::Int(i) => write!(f, "{i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDrawErr(String);

impl Display for ParseDrawErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` is not a draw, expected `true`, `false` or an unsigned integer.",
            self.0
        )
    }
}

impl std::error::Error for ParseDrawErr {}

impl FromStr for Draw {
    type Err = ParseDrawErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Draw::Bool(true)),
            "false" => Ok(Draw::Bool(false)),
            _ => s
                .parse()
                .map(Draw::Int)
                .map_err(|_| ParseDrawErr(s.to_owned())),
        }
    }
}

/// Replays a fixed sequence of draws, so a test can force the exact shape of a generated type.
///
/// Panics when the script runs out, when the next draw has the wrong kind or when an integer draw
/// falls outside the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntropy {
    draws: VecDeque<Draw>,
    taken: usize,
}

impl ScriptedEntropy {
    pub fn new(draws: impl IntoIterator<Item = Draw>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            taken: 0,
        }
    }

    /// Parses a whitespace separated script such as `true 2 false`.
    pub fn parse(script: &str) -> Result<Self, ParseDrawErr> {
        let draws = script
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Draw>, _>>()?;
        Ok(Self::new(draws))
    }

    pub fn is_exhausted(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }

    fn next(&mut self, wanted: &str) -> Draw {
        let Some(draw) = self.draws.pop_front() else {
            panic!(
                "scripted entropy ran out after {} draws, wanted {wanted}",
                self.taken
            );
        };
        self.taken += 1;
        draw
    }
}

impl Entropy for ScriptedEntropy {
    fn chance(&mut self, p: f64) -> bool {
        match self.next("a bool") {
            Draw::Bool(b) => b,
            other => panic!(
                "draw {} is `{other}`, wanted a bool (p = {p})",
                self.taken - 1
            ),
        }
    }

    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        match self.next("an int") {
            Draw::Int(i) if (lo..=hi).contains(&i) => i,
            other => panic!(
                "draw {} is `{other}`, wanted an int in {lo}..={hi}",
                self.taken - 1
            ),
        }
    }
}
