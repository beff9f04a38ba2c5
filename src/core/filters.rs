use crate::core::person::Person;
use crate::models::{Gender, GenderPref};

/// Zero out scores for gender-incompatible proposer/receiver pairs
///
/// The rule is applied per (proposer, receiver) pair, guarded by the
/// proposer's preference only: a Bisexual proposer preference skips both
/// clauses, while a receiver-side Bisexual preference does not shield the
/// partner's Male/Female checks. Non-binary identity has no direct clause
/// and is filtered only through the partner's checks. Both asymmetries are
/// intentional policy and must not be widened here.
///
/// Mutates both private score views in place. Zero is terminal, so
/// reapplying the filter is a no-op.
pub fn apply_gender_filter(proposers: &mut [Person], receivers: &mut [Person]) {
    for p_slot in 0..proposers.len() {
        let (p_gender, p_pref) = (proposers[p_slot].gender, proposers[p_slot].preference);
        if p_pref == GenderPref::Bisexual {
            continue;
        }

        for r_slot in 0..receivers.len() {
            let (r_gender, r_pref) = (receivers[r_slot].gender, receivers[r_slot].preference);

            let male_clash = (p_gender == Gender::Male && r_pref != GenderPref::Men)
                || (r_gender == Gender::Male && p_pref != GenderPref::Men);
            let female_clash = (p_gender == Gender::Female && r_pref != GenderPref::Women)
                || (r_gender == Gender::Female && p_pref != GenderPref::Women);

            if male_clash || female_clash {
                proposers[p_slot].zero(r_slot);
                receivers[r_slot].zero(p_slot);
            }
        }
    }
}
