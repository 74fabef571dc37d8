//! Chain scoring and outgoing attack.

use crate::config::AttackConfig;

/// Chain power by level; level 7 and beyond use the last entry.
pub const CHAIN_POWER: [u32; 8] = [0, 8, 16, 32, 64, 96, 128, 160];
pub const CELLS_PER_UNIT: u32 = 4;
pub const ATTACK_DIVISOR: u32 = 70;
pub const ALL_CLEAR_BONUS: u32 = 30;
pub const CHAIN_SCORE_UNIT: u32 = 100;

/// Points awarded when chain level `level` resolves.
pub fn chain_score(level: u32, config: &AttackConfig) -> u64 {
    u64::from(config.chain_score_unit) * u64::from(level)
}

/// Sum of `chain_score` over levels `1..=chain_count`.
pub fn total_chain_score(chain_count: u32, config: &AttackConfig) -> u64 {
    (1..=chain_count).map(|level| chain_score(level, config)).sum()
}

pub fn chain_bonus(chain_count: u32, config: &AttackConfig) -> u32 {
    table_lookup(&config.chain_power, chain_count)
}

/// Nuisance units produced by one full chain resolution, before netting.
pub fn outgoing_attack(
    chain_count: u32,
    total_erased: u32,
    all_clear: bool,
    config: &AttackConfig,
) -> u32 {
    let mut outgoing = 0;

    if chain_count > 0 {
        let base = total_erased / config.cells_per_unit.max(1);
        let bonus = chain_bonus(chain_count, config);
        outgoing = (base + bonus) / config.divisor.max(1);
    }

    if all_clear {
        outgoing += config.all_clear_bonus;
    }

    outgoing
}

fn table_lookup(table: &[u32], index: u32) -> u32 {
    if table.is_empty() {
        return 0;
    }

    let index = index as usize;
    if index < table.len() {
        table[index]
    } else {
        table[table.len() - 1]
    }
}
