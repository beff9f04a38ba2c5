use crate::models::{Gender, GenderPref, ScoreMatrix};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One participant with a private, mutable view of scores toward the
/// opposite role
///
/// The score view is a fixed-size slice copied from the matrix at partition
/// time, indexed by counterpart slot (position within the opposite group).
/// It is mutated only by the gender filter and read-only during the engine's
/// run.
#[derive(Debug, Clone)]
pub struct Person {
    pub index: usize,
    pub gender: Gender,
    pub preference: GenderPref,
    scores: Vec<f64>,
}

impl Person {
    pub fn new(
        index: usize,
        gender: Gender,
        preference: GenderPref,
        matrix: &ScoreMatrix,
        counterparts: &[usize],
    ) -> Self {
        let scores = counterparts
            .iter()
            .map(|&other| matrix.score(index, other))
            .collect();

        Self {
            index,
            gender,
            preference,
            scores,
        }
    }

    /// This participant's private view of the counterpart at `slot`
    ///
    /// Out-of-range slots read as 0.0 (incompatible).
    #[inline]
    pub fn score_of(&self, slot: usize) -> f64 {
        self.scores.get(slot).copied().unwrap_or(0.0)
    }

    /// Number of counterparts in this participant's score view
    pub fn counterpart_count(&self) -> usize {
        self.scores.len()
    }

    /// Mark the counterpart at `slot` incompatible; zero is terminal
    pub fn zero(&mut self, slot: usize) {
        if let Some(score) = self.scores.get_mut(slot) {
            *score = 0.0;
        }
    }
}

/// Fixed proposer/receiver split for one matching run
#[derive(Debug, Clone)]
pub struct RolePartition {
    pub proposers: Vec<usize>,
    pub receivers: Vec<usize>,
}

impl RolePartition {
    /// Deterministic split by index: proposers 0..N/2, receivers N/2..N
    pub fn by_index(n: usize) -> Self {
        let half = n / 2;
        Self {
            proposers: (0..half).collect(),
            receivers: (half..n).collect(),
        }
    }

    /// Shuffled split, reproducible from the seed
    pub fn seeded(n: usize, seed: u64) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let receivers = order.split_off(n / 2);
        Self {
            proposers: order,
            receivers,
        }
    }
}

/// Build both groups' Person records with their private score slices
pub fn partition_people(
    matrix: &ScoreMatrix,
    identities: &[Gender],
    preferences: &[GenderPref],
    partition: &RolePartition,
) -> (Vec<Person>, Vec<Person>) {
    let proposers = partition
        .proposers
        .iter()
        .map(|&i| Person::new(i, identities[i], preferences[i], matrix, &partition.receivers))
        .collect();

    let receivers = partition
        .receivers
        .iter()
        .map(|&i| Person::new(i, identities[i], preferences[i], matrix, &partition.proposers))
        .collect();

    (proposers, receivers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix4() -> ScoreMatrix {
        ScoreMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.9, 0.2],
            vec![0.1, 0.0, 0.8, 0.5],
            vec![0.9, 0.1, 0.0, 0.1],
            vec![0.3, 0.7, 0.1, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_by_index_split() {
        let p = RolePartition::by_index(6);
        assert_eq!(p.proposers, vec![0, 1, 2]);
        assert_eq!(p.receivers, vec![3, 4, 5]);
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = RolePartition::seeded(10, 42);
        let b = RolePartition::seeded(10, 42);
        assert_eq!(a.proposers, b.proposers);
        assert_eq!(a.receivers, b.receivers);

        let mut all: Vec<usize> = a.proposers.iter().chain(&a.receivers).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_person_score_view() {
        let matrix = matrix4();
        let partition = RolePartition::by_index(4);
        let (proposers, receivers) =
            partition_people(&matrix, &identities(), &prefs(), &partition);

        // Proposer 0 sees receivers 2 and 3 at slots 0 and 1
        assert_eq!(proposers[0].score_of(0), 0.9);
        assert_eq!(proposers[0].score_of(1), 0.2);
        // Receiver 3 sees proposers 0 and 1
        assert_eq!(receivers[1].score_of(0), 0.3);
        assert_eq!(receivers[1].score_of(1), 0.7);
    }

    #[test]
    fn test_score_of_out_of_range_is_zero() {
        let matrix = matrix4();
        let partition = RolePartition::by_index(4);
        let (proposers, _) = partition_people(&matrix, &identities(), &prefs(), &partition);

        assert_eq!(proposers[0].score_of(99), 0.0);
    }

    #[test]
    fn test_zero_is_terminal() {
        let matrix = matrix4();
        let partition = RolePartition::by_index(4);
        let (mut proposers, _) = partition_people(&matrix, &identities(), &prefs(), &partition);

        proposers[0].zero(0);
        assert_eq!(proposers[0].score_of(0), 0.0);
        proposers[0].zero(0);
        assert_eq!(proposers[0].score_of(0), 0.0);
    }

    fn identities() -> Vec<Gender> {
        vec![Gender::Male, Gender::Female, Gender::Female, Gender::Male]
    }

    fn prefs() -> Vec<GenderPref> {
        vec![
            GenderPref::Bisexual,
            GenderPref::Bisexual,
            GenderPref::Bisexual,
            GenderPref::Bisexual,
        ]
    }
}
