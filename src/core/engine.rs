use crate::core::export::export_pairs;
use crate::core::filters::apply_gender_filter;
use crate::core::person::{partition_people, Person, RolePartition};
use crate::models::{Gender, GenderPref, Pairing, ScoreMatrix};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by one matching run
///
/// None of these are recoverable inside the engine; the caller decides
/// whether to retry with corrected input.
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("gender {kind} sequence has {len} entries, expected {expected}")]
    AttributeLengthMismatch {
        kind: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("population size {n} is odd; an exact proposer/receiver split is impossible")]
    OddPopulation { n: usize },
    #[error("proposer {proposer} has no compatible receiver left to propose to")]
    NoCompatibleCandidate { proposer: usize },
    #[error(
        "proposal budget of {budget} exceeded after {proposals} proposals; \
         receiver assignments: {ledger:?}"
    )]
    NonTerminatingGuard {
        proposals: usize,
        budget: usize,
        ledger: Vec<Option<usize>>,
    },
}

/// How participants are split into proposers and receivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSplit {
    /// Proposers 0..N/2, receivers N/2..N. The reproducible default.
    ByIndex,
    /// Shuffled split, reproducible from the seed.
    Seeded(u64),
}

/// Engine options for one run
#[derive(Debug, Clone, Copy)]
pub struct MatcherOptions {
    pub role_split: RoleSplit,
    /// Safety bound on total proposals, as a multiple of N^2
    pub proposal_budget_factor: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            role_split: RoleSplit::ByIndex,
            proposal_budget_factor: 1,
        }
    }
}

/// Result of a completed matching run
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One pairing per receiver, ascending receiver index
    pub pairs: Vec<Pairing>,
    /// Total proposals made before the loop reached its fixed point
    pub proposals: usize,
}

/// Receiver assignments for one run, engine-owned
///
/// Every receiver slot exists from construction; a slot moves from
/// unassigned to assigned exactly once and is afterwards only replaced,
/// never cleared.
#[derive(Debug)]
pub struct ProposalLedger {
    assignment: Vec<Option<usize>>,
}

impl ProposalLedger {
    fn new(receiver_count: usize) -> Self {
        Self {
            assignment: vec![None; receiver_count],
        }
    }

    /// Proposer slot currently held by the receiver at `slot`, if any
    pub fn held_by(&self, slot: usize) -> Option<usize> {
        self.assignment.get(slot).copied().flatten()
    }

    fn assign(&mut self, receiver_slot: usize, proposer_slot: usize) {
        self.assignment[receiver_slot] = Some(proposer_slot);
    }

    pub fn receiver_count(&self) -> usize {
        self.assignment.len()
    }

    /// Assignments translated to participant indices, for diagnostics
    fn snapshot(&self, partition: &RolePartition) -> Vec<Option<usize>> {
        self.assignment
            .iter()
            .map(|held| held.map(|p| partition.proposers[p]))
            .collect()
    }
}

/// Deferred-acceptance stable matching engine
///
/// Runs Gale-Shapley over gender-filtered private score views: each free
/// proposer works down a ranked list of positively scored receivers; a
/// receiver holds its best offer so far and replaces it only for a strictly
/// better proposer by its own raw-matrix score. Single-threaded, no I/O;
/// each run owns its ledger and Person records, so independent runs may
/// share the matrix read-only.
#[derive(Debug, Clone, Default)]
pub struct StableMatcher {
    options: MatcherOptions,
}

impl StableMatcher {
    pub fn new(options: MatcherOptions) -> Self {
        Self { options }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Same engine with a seeded shuffled role split
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            options: MatcherOptions {
                role_split: RoleSplit::Seeded(seed),
                ..self.options
            },
        }
    }

    /// Run one matching over the full population
    ///
    /// Input shape is validated before partitioning; the loop then runs to
    /// its fixed point or fails. The output contains exactly one pairing
    /// per receiver, ordered by ascending receiver index.
    pub fn run(
        &self,
        matrix: &ScoreMatrix,
        identities: &[Gender],
        preferences: &[GenderPref],
    ) -> Result<MatchOutcome, MatchingError> {
        let n = matrix.len();
        if identities.len() != n {
            return Err(MatchingError::AttributeLengthMismatch {
                kind: "identity",
                len: identities.len(),
                expected: n,
            });
        }
        if preferences.len() != n {
            return Err(MatchingError::AttributeLengthMismatch {
                kind: "preference",
                len: preferences.len(),
                expected: n,
            });
        }
        if n % 2 != 0 {
            return Err(MatchingError::OddPopulation { n });
        }

        let partition = match self.options.role_split {
            RoleSplit::ByIndex => RolePartition::by_index(n),
            RoleSplit::Seeded(seed) => RolePartition::seeded(n, seed),
        };

        let (mut proposers, mut receivers) =
            partition_people(matrix, identities, preferences, &partition);
        apply_gender_filter(&mut proposers, &mut receivers);

        let rankings: Vec<Vec<usize>> = proposers
            .iter()
            .map(|p| ranked_receivers(p, &partition.receivers))
            .collect();

        let mut ledger = ProposalLedger::new(receivers.len());
        let mut cursors = vec![0usize; proposers.len()];
        let mut free: VecDeque<usize> = (0..proposers.len()).collect();
        let budget = self.options.proposal_budget_factor.max(1) * n * n;
        let mut proposals = 0usize;

        while let Some(p_slot) = free.pop_front() {
            loop {
                let Some(&r_slot) = rankings[p_slot].get(cursors[p_slot]) else {
                    return Err(MatchingError::NoCompatibleCandidate {
                        proposer: partition.proposers[p_slot],
                    });
                };
                cursors[p_slot] += 1;
                proposals += 1;
                if proposals > budget {
                    return Err(MatchingError::NonTerminatingGuard {
                        proposals,
                        budget,
                        ledger: ledger.snapshot(&partition),
                    });
                }

                match ledger.held_by(r_slot) {
                    None => {
                        ledger.assign(r_slot, p_slot);
                        break;
                    }
                    Some(held) => {
                        // The receiver compares candidates by its own raw
                        // score of each proposer, not the filtered view.
                        let receiver = partition.receivers[r_slot];
                        let offered = matrix.score(receiver, partition.proposers[p_slot]);
                        let current = matrix.score(receiver, partition.proposers[held]);

                        if offered > current {
                            ledger.assign(r_slot, p_slot);
                            free.push_back(held);
                            break;
                        }
                        // Rejected; continue down the ranking.
                    }
                }
            }
        }

        let pairs = export_pairs(&ledger, &partition);

        Ok(MatchOutcome { pairs, proposals })
    }
}

/// Receiver slots ranked by this proposer's filtered score, descending,
/// ties broken by lowest receiver index; zero-scored receivers are excluded
fn ranked_receivers(proposer: &Person, receiver_indices: &[usize]) -> Vec<usize> {
    let mut slots: Vec<usize> = (0..receiver_indices.len())
        .filter(|&slot| proposer.score_of(slot) > 0.0)
        .collect();

    slots.sort_by(|&a, &b| {
        proposer
            .score_of(b)
            .partial_cmp(&proposer.score_of(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| receiver_indices[a].cmp(&receiver_indices[b]))
    });

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_bisexual(n: usize) -> (Vec<Gender>, Vec<GenderPref>) {
        (
            (0..n)
                .map(|i| if i % 2 == 0 { Gender::Male } else { Gender::Female })
                .collect(),
            vec![GenderPref::Bisexual; n],
        )
    }

    fn reference_matrix() -> ScoreMatrix {
        // Proposers 0 and 1, receivers 2 and 3.
        ScoreMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.9, 0.2],
            vec![0.1, 0.0, 0.8, 0.5],
            vec![0.9, 0.1, 0.0, 0.1],
            vec![0.3, 0.7, 0.1, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_four_person_scenario() {
        let (identities, preferences) = all_bisexual(4);
        let outcome = StableMatcher::with_defaults()
            .run(&reference_matrix(), &identities, &preferences)
            .unwrap();

        assert_eq!(
            outcome.pairs,
            vec![
                Pairing { proposer: 0, receiver: 2 },
                Pairing { proposer: 1, receiver: 3 },
            ]
        );
        // 0->2 accepted, 1->2 rejected, 1->3 accepted.
        assert_eq!(outcome.proposals, 3);
    }

    #[test]
    fn test_displacement_frees_held_proposer() {
        // Receiver 2 prefers proposer 1; proposer 0 gets displaced and
        // falls back to receiver 3.
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.9, 0.2],
            vec![0.1, 0.0, 0.8, 0.5],
            vec![0.1, 0.9, 0.0, 0.1],
            vec![0.3, 0.7, 0.1, 0.0],
        ])
        .unwrap();
        let (identities, preferences) = all_bisexual(4);

        let outcome = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap();

        assert_eq!(
            outcome.pairs,
            vec![
                Pairing { proposer: 1, receiver: 2 },
                Pairing { proposer: 0, receiver: 3 },
            ]
        );
    }

    #[test]
    fn test_equal_scores_break_to_lowest_receiver_index() {
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.5, 0.5],
            vec![0.0, 0.0, 0.5, 0.5],
            vec![0.4, 0.6, 0.0, 0.0],
            vec![0.6, 0.4, 0.0, 0.0],
        ])
        .unwrap();
        let (identities, preferences) = all_bisexual(4);

        let outcome = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap();

        // Both proposers try receiver 2 first; receiver 2 keeps the better
        // proposer 1 by its own raw scores.
        assert_eq!(
            outcome.pairs,
            vec![
                Pairing { proposer: 1, receiver: 2 },
                Pairing { proposer: 0, receiver: 3 },
            ]
        );
    }

    #[test]
    fn test_tie_at_receiver_keeps_incumbent() {
        // Receiver 2 scores both proposers equally; replacement requires a
        // strictly better offer, so the first proposer keeps the slot.
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.9, 0.2],
            vec![0.0, 0.0, 0.9, 0.2],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
        ])
        .unwrap();
        let (identities, preferences) = all_bisexual(4);

        let outcome = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap();

        assert_eq!(
            outcome.pairs,
            vec![
                Pairing { proposer: 0, receiver: 2 },
                Pairing { proposer: 1, receiver: 3 },
            ]
        );
    }

    #[test]
    fn test_odd_population_rejected() {
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.5],
            vec![0.5, 0.0, 0.5],
            vec![0.5, 0.5, 0.0],
        ])
        .unwrap();
        let (identities, preferences) = all_bisexual(3);

        let err = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap_err();
        assert!(matches!(err, MatchingError::OddPopulation { n: 3 }));
    }

    #[test]
    fn test_attribute_length_mismatch_rejected() {
        let (identities, preferences) = all_bisexual(4);

        let err = StableMatcher::with_defaults()
            .run(&reference_matrix(), &identities[..3], &preferences)
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::AttributeLengthMismatch {
                kind: "identity",
                len: 3,
                expected: 4,
            }
        ));

        let err = StableMatcher::with_defaults()
            .run(&reference_matrix(), &identities, &preferences[..2])
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::AttributeLengthMismatch {
                kind: "preference",
                ..
            }
        ));
    }

    #[test]
    fn test_all_zero_proposer_fails_explicitly() {
        // Proposer 1's row toward both receivers is zero; it must fail
        // rather than silently matching anywhere.
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.9, 0.2],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
        ])
        .unwrap();
        let (identities, preferences) = all_bisexual(4);

        let err = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::NoCompatibleCandidate { proposer: 1 }
        ));
    }

    #[test]
    fn test_fully_filtered_proposer_fails_explicitly() {
        // Proposer 0 is Male seeking Men; both receivers are Female seeking
        // Men, so the filter zeroes proposer 0 against everyone.
        let matrix = ScoreMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.9, 0.8],
            vec![0.0, 0.0, 0.7, 0.6],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
        ])
        .unwrap();
        let identities = vec![Gender::Male, Gender::Male, Gender::Female, Gender::Female];
        let preferences = vec![
            GenderPref::Men,
            GenderPref::Women,
            GenderPref::Men,
            GenderPref::Men,
        ];

        let err = StableMatcher::with_defaults()
            .run(&matrix, &identities, &preferences)
            .unwrap_err();
        assert!(matches!(
            err,
            MatchingError::NoCompatibleCandidate { proposer: 0 }
        ));
    }

    #[test]
    fn test_completeness_and_determinism() {
        let n = 20;
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0.0 } else { ((i * 31 + j * 17) % 97) as f64 / 97.0 + 0.01 })
                    .collect()
            })
            .collect();
        let matrix = ScoreMatrix::from_rows(rows).unwrap();
        let (identities, preferences) = all_bisexual(n);

        let matcher = StableMatcher::with_defaults();
        let first = matcher.run(&matrix, &identities, &preferences).unwrap();
        let second = matcher.run(&matrix, &identities, &preferences).unwrap();

        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.pairs.len(), n / 2);

        let mut proposers: Vec<usize> = first.pairs.iter().map(|m| m.proposer).collect();
        let mut receivers: Vec<usize> = first.pairs.iter().map(|m| m.receiver).collect();
        proposers.sort_unstable();
        receivers.sort_unstable();
        assert_eq!(proposers, (0..n / 2).collect::<Vec<_>>());
        assert_eq!(receivers, (n / 2..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_split_still_covers_everyone() {
        let n = 12;
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0.0 } else { ((i * 13 + j * 7) % 41) as f64 / 41.0 + 0.01 })
                    .collect()
            })
            .collect();
        let matrix = ScoreMatrix::from_rows(rows).unwrap();
        let (identities, preferences) = all_bisexual(n);

        let matcher = StableMatcher::with_defaults().with_seed(7);
        let first = matcher.run(&matrix, &identities, &preferences).unwrap();
        let second = matcher.run(&matrix, &identities, &preferences).unwrap();

        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.pairs.len(), n / 2);

        let mut all: Vec<usize> = first
            .pairs
            .iter()
            .flat_map(|m| [m.proposer, m.receiver])
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>());

        // Receivers come out ascending regardless of the shuffled split.
        for window in first.pairs.windows(2) {
            assert!(window[0].receiver < window[1].receiver);
        }
    }
}
