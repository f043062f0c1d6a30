use anchor_lang::prelude::*;

/// One reconciliation round finished. The cross-chain distribution controller
/// picks these up and counts rounds.
#[event]
pub struct RewardsRoundCompletedEvent {
    pub staking_pool: Pubkey,
    pub distribution_controller: Pubkey,
    pub round: u64,
    pub indices: Vec<u32>,
    /// true when triggered through perform_upkeep, false for a whitelisted caller
    pub automated: bool,
}

#[event]
pub struct CallerWhitelistedEvent {
    pub rewards_initiator: Pubkey,
    pub caller: Pubkey,
    pub allowed: bool,
}

#[event]
pub struct DistributionControllerSetEvent {
    pub rewards_initiator: Pubkey,
    pub previous: Pubkey,
    pub distribution_controller: Pubkey,
}
