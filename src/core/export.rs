use crate::core::engine::ProposalLedger;
use crate::core::person::RolePartition;
use crate::models::Pairing;

/// Flatten a terminal ledger into `(proposer, receiver)` pairs, ordered by
/// ascending receiver index
///
/// Pure and total: receiver slots still unassigned (never the case for a
/// ledger the engine finished with) are simply skipped.
pub fn export_pairs(ledger: &ProposalLedger, partition: &RolePartition) -> Vec<Pairing> {
    let mut pairs: Vec<Pairing> = (0..ledger.receiver_count())
        .filter_map(|r_slot| {
            ledger.held_by(r_slot).map(|p_slot| Pairing {
                proposer: partition.proposers[p_slot],
                receiver: partition.receivers[r_slot],
            })
        })
        .collect();

    pairs.sort_by_key(|pairing| pairing.receiver);
    pairs
}
