use anchor_lang::prelude::*;

#[event]
pub struct RewardTokenAddedEvent {
    pub controller: Pubkey,
    pub pool_id: u32,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
}

#[event]
pub struct RewardTokenRemovedEvent {
    pub controller: Pubkey,
    pub pool_id: u32,
    pub reward_mint: Pubkey,
    /// Residual vault balance sent to the owner
    pub swept: u64,
}

#[event]
pub struct StakedEvent {
    pub controller: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub staked_amount: u64,
    pub total_staked: u64,
}

#[event]
pub struct StakeWithdrawnEvent {
    pub controller: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub staked_amount: u64,
    pub total_staked: u64,
}

#[event]
pub struct RewardsDistributedEvent {
    pub controller: Pubkey,
    pub pool_id: u32,
    pub funder: Pubkey,
    pub amount: u64,
    pub reward_per_token: u128,
}

#[event]
pub struct RewardsWithdrawnEvent {
    pub controller: Pubkey,
    pub owner: Pubkey,
    pub pool_ids: Vec<u32>,
    pub amounts: Vec<u64>,
}
