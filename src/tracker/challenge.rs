use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::store::state::ProjectState;

/// A named daily goal the user can pick instead of typing a number.
pub struct ChallengePreset {
    pub name: &'static str,
    pub goal: u64,
}

pub const PRESETS: &[ChallengePreset] = &[
    ChallengePreset {
        name: "Warm-up",
        goal: 500,
    },
    ChallengePreset {
        name: "Morning pages",
        goal: 750,
    },
    ChallengePreset {
        name: "Daily habit",
        goal: 1000,
    },
    ChallengePreset {
        name: "NaNoWriMo",
        goal: 1667,
    },
    ChallengePreset {
        name: "Thesis sprint",
        goal: 3000,
    },
];

/// Selection entry that prompts for a number instead of using a preset.
pub const CUSTOM_CHOICE: &str = "Custom goal…";

pub fn parse_positive_count(input: &str) -> Result<u64> {
    let input = input.trim();
    let Ok(count) = input.parse::<u64>() else {
        bail!("Expected a positive whole number, got \"{input}\"");
    };
    if count == 0 {
        bail!("Expected a positive whole number, got 0");
    }
    Ok(count)
}

pub fn set_challenge(state: &mut ProjectState, name: &str, goal: u64) {
    state.goal = goal;
    state.challenge_name = name.into();
}

/// The single mutator behind every increase of the daily count, ledger
/// commits and bonuses alike, so a goal crossing is never missed. Returns
/// true exactly when this call moved the count from below the goal to at or
/// above it.
pub fn apply_daily_increment(state: &mut ProjectState, amount: u64) -> bool {
    let before = state.daily_count;
    state.daily_count += amount;
    state.goal > 0 && before < state.goal && state.daily_count >= state.goal
}

/// Subtracts a user-supplied correction, clamped at zero. Decreases can't
/// complete a challenge, so this bypasses the crossing check.
pub fn apply_correction(state: &mut ProjectState, amount: u64) {
    state.daily_count = state.daily_count.saturating_sub(amount);
}

pub fn reset_today(state: &mut ProjectState) {
    state.daily_count = 0;
}

pub fn reset_all(state: &mut ProjectState, today: NaiveDate) {
    *state = ProjectState::fresh(today);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    RevisionTime,
    Citation,
}

impl Bonus {
    pub fn amount(self) -> u64 {
        match self {
            Bonus::RevisionTime => 1000,
            Bonus::Citation => 50,
        }
    }

    /// Bonuses only make sense against substantial goals; below this the
    /// command is rejected.
    pub fn min_goal(self) -> u64 {
        match self {
            Bonus::RevisionTime => 3000,
            Bonus::Citation => 2000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bonus::RevisionTime => "revision time",
            Bonus::Citation => "citation",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BonusOutcome {
    Granted { goal_reached: bool },
    GoalTooLow { required: u64 },
}

pub fn grant_bonus(state: &mut ProjectState, bonus: Bonus) -> BonusOutcome {
    if state.goal < bonus.min_goal() {
        return BonusOutcome::GoalTooLow {
            required: bonus.min_goal(),
        };
    }
    BonusOutcome::Granted {
        goal_reached: apply_daily_increment(state, bonus.amount()),
    }
}
