//! Eight-entrant single-elimination bracket.
//!
//! A [`Bracket`] is an immutable value: [`Bracket::decide`] returns the next
//! state and leaves the receiver untouched. Callers replace the state they
//! hold with the returned one.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::candidate::Candidate;
use crate::error::BracketError;
use crate::selection::BRACKET_SIZE;
use crate::shuffle::shuffle_with;

/// Pairings per round: quarterfinal, semifinal, final.
pub const ROUND_PAIRS: [usize; 3] = [4, 2, 1];

/// Matches played from seeding to champion.
pub const TOTAL_MATCHES: usize = 7;

const FINAL_ROUND: usize = ROUND_PAIRS.len() - 1;

pub type Pairing = (Candidate, Candidate);

/// Round names as shown to players.
#[must_use]
pub fn round_label(round: usize) -> &'static str {
    match round {
        0 => "8강",
        1 => "4강",
        _ => "결승",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BracketStatus {
    InProgress { round: usize, match_index: usize },
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed_matches: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bracket {
    rounds: Vec<Vec<Pairing>>,
    current_round: usize,
    current_match: usize,
    winners: Vec<Vec<Candidate>>,
    champion: Option<Candidate>,
}

impl Bracket {
    /// Shuffle the eight selected candidates and seed round 0.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::WrongSeedCount`] unless exactly eight
    /// candidates are given, or [`BracketError::DuplicateSeed`] if an id
    /// repeats.
    pub fn new(selected: &[Candidate]) -> Result<Self, BracketError> {
        Self::new_with_rng(selected, &mut rand::rng())
    }

    /// [`Bracket::new`] with a caller-supplied RNG for the seeding shuffle.
    ///
    /// # Errors
    ///
    /// Same as [`Bracket::new`].
    pub fn new_with_rng<R: Rng + ?Sized>(
        selected: &[Candidate],
        rng: &mut R,
    ) -> Result<Self, BracketError> {
        Self::from_seeds(shuffle_with(selected, rng))
    }

    /// Build round 0 from seeds already in bracket order: seed 0 meets seed 1,
    /// seed 2 meets seed 3, and so on.
    ///
    /// # Errors
    ///
    /// Same as [`Bracket::new`].
    pub fn from_seeds(seeds: Vec<Candidate>) -> Result<Self, BracketError> {
        if seeds.len() != BRACKET_SIZE {
            return Err(BracketError::WrongSeedCount {
                expected: BRACKET_SIZE,
                actual: seeds.len(),
            });
        }
        let mut seen = HashSet::new();
        for seed in &seeds {
            if !seen.insert(seed.id.as_str()) {
                return Err(BracketError::DuplicateSeed(seed.id.clone()));
            }
        }

        Ok(Self {
            rounds: vec![pair_up(seeds)],
            current_round: 0,
            current_match: 0,
            winners: vec![Vec::new()],
            champion: None,
        })
    }

    /// Record `winner` for the current pairing and return the next state.
    ///
    /// Finishing a round pairs its winners in decision order to form the next
    /// round. Finishing the final crowns the champion.
    ///
    /// # Errors
    ///
    /// - [`BracketError::AlreadyComplete`] once a champion exists.
    /// - [`BracketError::NotInCurrentPairing`] if `winner` is neither side of
    ///   the current pairing.
    /// - [`BracketError::InconsistentState`] if the round bookkeeping no
    ///   longer lines up with the pairings.
    pub fn decide(&self, winner: &Candidate) -> Result<Self, BracketError> {
        let Some((left, right)) = self.current_pairing() else {
            return Err(BracketError::AlreadyComplete);
        };
        let winner = if winner.id == left.id {
            left.clone()
        } else if winner.id == right.id {
            right.clone()
        } else {
            return Err(BracketError::NotInCurrentPairing {
                winner_id: winner.id.clone(),
            });
        };

        let mut next = self.clone();
        let round = next.current_round;
        let (Some(&pairs), Some(decided)) = (ROUND_PAIRS.get(round), next.winners.get_mut(round))
        else {
            return Err(BracketError::InconsistentState { round });
        };
        decided.push(winner);

        if next.current_match + 1 < pairs {
            next.current_match += 1;
        } else if round == FINAL_ROUND {
            next.champion = decided.first().cloned();
            tracing::debug!(
                champion = next.champion.as_ref().map(|c| c.id.as_str()),
                "bracket complete"
            );
        } else {
            let advancing = decided.clone();
            next.rounds.push(pair_up(advancing));
            next.current_round += 1;
            next.current_match = 0;
            next.winners.push(Vec::new());
        }

        Ok(next)
    }

    /// The two candidates awaiting a decision, or `None` once complete.
    #[must_use]
    pub fn current_pairing(&self) -> Option<&Pairing> {
        if self.champion.is_some() {
            return None;
        }
        self.rounds
            .get(self.current_round)
            .and_then(|round| round.get(self.current_match))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }

    #[must_use]
    pub fn champion(&self) -> Option<&Candidate> {
        self.champion.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> BracketStatus {
        if self.is_complete() {
            BracketStatus::Complete
        } else {
            BracketStatus::InProgress {
                round: self.current_round,
                match_index: self.current_match,
            }
        }
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            completed_matches: self.winners.iter().map(Vec::len).sum(),
            total_matches: TOTAL_MATCHES,
        }
    }

    #[must_use]
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    #[must_use]
    pub fn current_match(&self) -> usize {
        self.current_match
    }

    /// Pairings of every round computed so far.
    #[must_use]
    pub fn rounds(&self) -> &[Vec<Pairing>] {
        &self.rounds
    }

    /// Winners of each round so far, in decision order.
    #[must_use]
    pub fn winners(&self) -> &[Vec<Candidate>] {
        &self.winners
    }
}

fn pair_up(entrants: Vec<Candidate>) -> Vec<Pairing> {
    let mut pairs = Vec::with_capacity(entrants.len() / 2);
    let mut iter = entrants.into_iter();
    while let (Some(a), Some(b)) = (iter.next(), iter.next()) {
        pairs.push((a, b));
    }
    pairs
}

#[cfg(test)]
#[path = "bracket_test.rs"]
mod tests;
