//! Determinism testing utilities.
//!
//! Battles have no randomness, so the same units and the same skill choices
//! must always end in the same state. The helpers here replay a turn script
//! several times (sequentially or on scoped threads) and compare
//! [`BattleField::state_hash`] values.

use std::thread;

use duel_core::battlefield::BattleField;

/// Skill pair for one turn: `(player_skill, enemy_skill)`.
pub type TurnScript = Vec<(String, String)>;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns in the script.
    pub turns: usize,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, turns: usize) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_deterministic,
            hashes,
            turns,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic battle).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Play `script` on `field` until it runs out or a turn is rejected.
///
/// Returns the number of turns that were processed successfully.
pub fn run_script(field: &mut BattleField, script: &[(String, String)]) -> usize {
    let mut played = 0;
    for (player_skill, enemy_skill) in script {
        match field.process_turn(player_skill, enemy_skill) {
            Ok(_) => played += 1,
            Err(err) => {
                tracing::debug!(%err, turn = field.turn(), "Script stopped");
                break;
            }
        }
    }
    played
}

/// Run a script against fresh battlefields `runs` times and compare hashes.
pub fn verify_determinism<F>(runs: usize, setup: F, script: &[(String, String)]) -> DeterminismResult
where
    F: Fn() -> BattleField,
{
    let hashes = (0..runs)
        .map(|_| {
            let mut field = setup();
            run_script(&mut field, script);
            field.state_hash()
        })
        .collect();

    DeterminismResult::from_hashes(hashes, script.len())
}

/// Like [`verify_determinism`], with each run on its own scoped thread.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_battles<F>(
    setup: F,
    num_battles: usize,
    script: &[(String, String)],
) -> DeterminismResult
where
    F: Fn() -> BattleField + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_battles)
            .map(|_| {
                s.spawn(|| {
                    let mut field = setup();
                    run_script(&mut field, script);
                    field.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult::from_hashes(hashes, script.len())
}

/// Proptest strategies for battle inputs.
pub mod strategies {
    use duel_core::catalog::{BASIC_ATTACK, MAGIC_ATTACK};
    use duel_core::roster::TOTAL_HP_MP;
    use duel_core::status::StatInput;
    use proptest::prelude::*;

    /// Generate a valid stat maximum (1-1000).
    pub fn arb_valid_stat() -> impl Strategy<Value = u32> {
        1u32..1000u32
    }

    /// Generate damage or heal amounts, including overshooting ones.
    pub fn arb_amount() -> impl Strategy<Value = u32> {
        0u32..2000u32
    }

    /// Generate any raw stat input, valid or not.
    pub fn arb_stat_input() -> impl Strategy<Value = StatInput> {
        prop_oneof![
            any::<i64>().prop_map(StatInput::Integer),
            any::<f64>().prop_map(StatInput::Float),
            "[a-z]{0,8}".prop_map(StatInput::Text),
            any::<bool>().prop_map(StatInput::Flag),
        ]
    }

    /// Generate player `(hp, mp)` pairs that satisfy the default budget.
    pub fn arb_player_stats() -> impl Strategy<Value = (u32, u32)> {
        let total = u32::try_from(TOTAL_HP_MP).unwrap_or(200);
        (1..total).prop_map(move |hp| (hp, total - hp))
    }

    /// Generate a skill the default player knows.
    pub fn arb_player_skill() -> impl Strategy<Value = String> {
        prop_oneof![Just(BASIC_ATTACK.to_string()), Just(MAGIC_ATTACK.to_string())]
    }

    /// Generate a turn script where the monster always uses its basic attack.
    pub fn arb_turn_script(max_len: usize) -> impl Strategy<Value = Vec<(String, String)>> {
        proptest::collection::vec(
            arb_player_skill().prop_map(|skill| (skill, BASIC_ATTACK.to_string())),
            0..max_len,
        )
    }
}
