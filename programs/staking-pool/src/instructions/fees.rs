use anchor_lang::prelude::*;

use crate::events::FeesUpdatedEvent;
use crate::instructions::admin::ConfigurePool;
use crate::state::StakingPool;

fn emit_fees(pool_key: Pubkey, pool: &StakingPool) {
    emit!(FeesUpdatedEvent {
        staking_pool: pool_key,
        receivers: pool.fees.iter().map(|fee| fee.receiver).collect(),
        basis_points: pool.fees.iter().map(|fee| fee.basis_points).collect(),
    });
    msg!("Total fee: {} bps across {} receivers", pool.total_fee_bps(), pool.fees.len());
}

/// Append a fee receiver. The receiver needs a ShareAccount before the next
/// reconciliation, see `open_share_account`.
pub fn handler_add_fee(ctx: Context<ConfigurePool>, receiver: Pubkey, basis_points: u16) -> Result<()> {
    ctx.accounts.require_owner()?;

    let pool_key = ctx.accounts.pool.key();
    ctx.accounts.pool.add_fee(receiver, basis_points)?;

    msg!("Fee added: {} bps to {}", basis_points, receiver);
    emit_fees(pool_key, &ctx.accounts.pool);
    Ok(())
}

/// Replace the fee at `index`; zero basis points removes it
pub fn handler_update_fee(
    ctx: Context<ConfigurePool>,
    index: u32,
    receiver: Pubkey,
    basis_points: u16,
) -> Result<()> {
    ctx.accounts.require_owner()?;

    let pool_key = ctx.accounts.pool.key();
    ctx.accounts.pool.update_fee(index, receiver, basis_points)?;

    msg!("Fee {} updated: {} bps to {}", index, basis_points, receiver);
    emit_fees(pool_key, &ctx.accounts.pool);
    Ok(())
}
