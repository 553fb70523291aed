//! Formula selection via UCB1 over `{default, deep}`, with a
//! hard guarantee that `deep` runs at least once every 7 cycles outside of
//! warm-up/cool-down.
//!
//! Grounded on `coordination::perf_control::PerfBudget`'s plain-struct,
//! pure-function style: no trait object, just arithmetic over recorded arm
//! statistics.

use serde::{Deserialize, Serialize};

const DEEP_CYCLE_GUARANTEE: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Default,
    Deep,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ArmStats {
    pulls: u32,
    total_reward: f64,
}

impl ArmStats {
    fn mean(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_reward / self.pulls as f64
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormulaBandit {
    default_arm: ArmStats,
    deep_arm: ArmStats,
    cycles_since_deep: u32,
}

impl FormulaBandit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reward(&mut self, formula: Formula, reward: f64) {
        match formula {
            Formula::Default => {
                self.default_arm.pulls += 1;
                self.default_arm.total_reward += reward;
                self.cycles_since_deep += 1;
            }
            Formula::Deep => {
                self.deep_arm.pulls += 1;
                self.deep_arm.total_reward += reward;
                self.cycles_since_deep = 0;
            }
        }
    }

    /// Select the next formula. `warm_up_or_cool_down` suppresses the
    /// every-7-cycles deep guarantee (those windows already have their own
    /// cadence).
    pub fn select(&self, cycle: u32, warm_up_or_cool_down: bool) -> Formula {
        if !warm_up_or_cool_down && self.cycles_since_deep >= DEEP_CYCLE_GUARANTEE {
            return Formula::Deep;
        }

        let total_pulls = self.default_arm.pulls + self.deep_arm.pulls;
        if self.default_arm.pulls == 0 {
            return Formula::Default;
        }
        if self.deep_arm.pulls == 0 {
            return Formula::Deep;
        }

        let t = (total_pulls.max(1)) as f64;
        let ucb = |arm: &ArmStats| arm.mean() + (2.0 * t.ln() / arm.pulls as f64).sqrt();

        let _ = cycle;
        if ucb(&self.default_arm) >= ucb(&self.deep_arm) {
            Formula::Default
        } else {
            Formula::Deep
        }
    }
}
