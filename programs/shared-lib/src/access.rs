use anchor_lang::prelude::*;

/// Roles a component can demand of the caller before it mutates state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Configures the component (strategies, fees, reward tokens, whitelists)
    Owner,
    /// The only key allowed to deposit into / withdraw from the staking pool
    PriorityPool,
    /// The only key allowed to reconcile strategy rewards
    RewardsInitiator,
}

/// Error returned when a role assignment is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The all-zero key can never sign, assigning it would lock the role forever
    ZeroHolder,
}

/// The access-control policy embedded in every component's state.
///
/// Every mutating handler asks `permits(role, signer)` first thing and fails
/// with its program's `Unauthorized` error when the answer is no. Roles that
/// were never assigned (still the default key) permit nobody.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct AccessPolicy {
    pub owner: Pubkey,
    pub priority_pool: Pubkey,
    pub rewards_initiator: Pubkey,
}

impl AccessPolicy {
    /// Policy with only the owner role assigned
    pub fn with_owner(owner: Pubkey) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn holder(&self, role: Role) -> Pubkey {
        match role {
            Role::Owner => self.owner,
            Role::PriorityPool => self.priority_pool,
            Role::RewardsInitiator => self.rewards_initiator,
        }
    }

    pub fn permits(&self, role: Role, caller: &Pubkey) -> bool {
        let holder = self.holder(role);
        holder != Pubkey::default() && holder == *caller
    }

    /// Hand a role to a new key, returning the previous holder.
    pub fn assign(&mut self, role: Role, holder: Pubkey) -> std::result::Result<Pubkey, AccessError> {
        if holder == Pubkey::default() {
            return Err(AccessError::ZeroHolder);
        }

        let slot = match role {
            Role::Owner => &mut self.owner,
            Role::PriorityPool => &mut self.priority_pool,
            Role::RewardsInitiator => &mut self.rewards_initiator,
        };

        Ok(std::mem::replace(slot, holder))
    }
}
