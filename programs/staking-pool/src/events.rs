use anchor_lang::prelude::*;

#[event]
pub struct DepositEvent {
    pub staking_pool: Pubkey,
    pub account: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
    /// amount placed into each strategy, in list order
    pub allocations: Vec<u64>,
    /// amount left idle in the vault
    pub unallocated: u64,
    pub total_staked: u64,
    pub total_shares: u64,
}

#[event]
pub struct WithdrawEvent {
    pub staking_pool: Pubkey,
    pub account: Pubkey,
    pub receiver: Pubkey,
    pub amount: u64,
    pub shares_burned: u64,
    pub from_vault: u64,
    /// amount pulled from each strategy, in list order
    pub from_strategies: Vec<u64>,
    pub total_staked: u64,
    pub total_shares: u64,
}

#[event]
pub struct StrategyRewardsUpdatedEvent {
    pub staking_pool: Pubkey,
    pub indices: Vec<u32>,
    pub net_change: i64,
    /// fee shares minted per fee receiver, in fee-list order
    pub fee_shares: Vec<u64>,
    pub total_staked: u64,
    pub total_shares: u64,
    pub data: Vec<u8>,
}

#[event]
pub struct StrategyAddedEvent {
    pub staking_pool: Pubkey,
    pub strategy_state: Pubkey,
    pub strategy_program: Pubkey,
    pub index: u32,
}

#[event]
pub struct StrategyRemovedEvent {
    pub staking_pool: Pubkey,
    pub strategy_state: Pubkey,
    pub index: u32,
}

#[event]
pub struct FeesUpdatedEvent {
    pub staking_pool: Pubkey,
    pub receivers: Vec<Pubkey>,
    pub basis_points: Vec<u16>,
}

#[event]
pub struct RoleAssignedEvent {
    pub staking_pool: Pubkey,
    pub role: String,
    pub previous: Pubkey,
    pub holder: Pubkey,
}

#[event]
pub struct SharesTransferredEvent {
    pub staking_pool: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
    pub shares: u64,
}

#[event]
pub struct DonationEvent {
    pub staking_pool: Pubkey,
    pub donor: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
}

#[event]
pub struct WrapEvent {
    pub wrapped_token: Pubkey,
    pub account: Pubkey,
    pub underlying_amount: u64,
    pub wrapped_amount: u64,
}

#[event]
pub struct UnwrapEvent {
    pub wrapped_token: Pubkey,
    pub account: Pubkey,
    pub wrapped_amount: u64,
    pub underlying_amount: u64,
}
