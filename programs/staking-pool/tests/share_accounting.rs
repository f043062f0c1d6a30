use anchor_lang::prelude::Pubkey;
use proptest::prelude::*;
use shared_lib::AccessPolicy;

use staking_pool::constants::STATE_VERSION;
use staking_pool::state::{
    allocate_deposit, plan_withdrawal, underlying_by_wrapped, wrapped_by_underlying, StakingPool,
    StrategyEntry,
};

fn empty_pool() -> StakingPool {
    StakingPool {
        version: STATE_VERSION,
        access: AccessPolicy::with_owner(Pubkey::new_unique()),
        token_mint: Pubkey::new_unique(),
        vault: Pubkey::new_unique(),
        wrapped_token: Pubkey::default(),
        total_staked: 0,
        total_shares: 0,
        fees: vec![],
        strategies: vec![],
        bump: 255,
        vault_bump: 255,
    }
}

#[derive(Clone, Debug)]
enum Op {
    Deposit { account: usize, amount: u64 },
    Withdraw { account: usize, percent: u64 },
    Transfer { from: usize, to: usize, percent: u64 },
}

fn empty_strategy() -> StrategyEntry {
    StrategyEntry {
        strategy_state: Pubkey::new_unique(),
        strategy_program: Pubkey::new_unique(),
        deposit_account: Pubkey::new_unique(),
        total_deposits: 0,
    }
}

const MAX_DEPOSITS: [u64; 3] = [5_000, 50_000, 1_000_000_000_000];
const MIN_DEPOSITS: [u64; 3] = [0, 1_000, 0];

/// Pool and strategy activity where strategies drift from their cache
#[derive(Clone, Debug)]
enum Flow {
    Deposit(u64),
    Withdraw { percent: u64 },
    Gain { strategy: usize, amount: u64 },
    Loss { strategy: usize, percent: u64 },
    ReconcileAll,
}

fn flow() -> impl Strategy<Value = Flow> {
    prop_oneof![
        (1u64..1_000_000).prop_map(Flow::Deposit),
        (1u64..=100).prop_map(|percent| Flow::Withdraw { percent }),
        (0usize..3, 1u64..100_000).prop_map(|(strategy, amount)| Flow::Gain { strategy, amount }),
        (0usize..3, 1u64..=100).prop_map(|(strategy, percent)| Flow::Loss { strategy, percent }),
        Just(Flow::ReconcileAll),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 1u64..1_000_000_000).prop_map(|(account, amount)| Op::Deposit { account, amount }),
        (0usize..4, 1u64..=100).prop_map(|(account, percent)| Op::Withdraw { account, percent }),
        (0usize..4, 0usize..4, 1u64..=100)
            .prop_map(|(from, to, percent)| Op::Transfer { from, to, percent }),
    ]
}

proptest! {
    /// Shares held across accounts always add up to total_shares, and the sum
    /// of balances never exceeds what the pool holds.
    #[test]
    fn shares_sum_to_total(ops in prop::collection::vec(op(), 1..60), donation in 0u64..1_000_000) {
        let mut pool = empty_pool();
        let mut shares = [0u64; 4];

        for (step, op) in ops.into_iter().enumerate() {
            // a donation midway moves the rate off 1:1
            if step == 5 && donation > 0 && pool.total_shares > 0 {
                pool.record_donation(donation).unwrap();
            }

            match op {
                Op::Deposit { account, amount } => {
                    if let Ok(minted) = pool.record_deposit(amount) {
                        shares[account] += minted;
                    }
                }
                Op::Withdraw { account, percent } => {
                    let balance = pool.balance_of(shares[account]).unwrap();
                    let amount = balance * percent / 100;
                    if amount > 0 {
                        let burned = pool.record_withdrawal(amount, shares[account]).unwrap();
                        prop_assert!(burned <= shares[account]);
                        shares[account] -= burned;
                    }
                }
                Op::Transfer { from, to, percent } => {
                    let balance = pool.balance_of(shares[from]).unwrap();
                    if let Ok(moved) = pool.shares_for_transfer(balance * percent / 100, shares[from]) {
                        shares[from] -= moved;
                        shares[to] += moved;
                    }
                }
            }

            prop_assert_eq!(shares.iter().sum::<u64>(), pool.total_shares);
            let balances: u64 = shares.iter().map(|s| pool.balance_of(*s).unwrap()).sum();
            prop_assert!(balances <= pool.total_staked);
        }
    }

    /// The vault's idle balance plus every strategy's cached total always
    /// equals total_staked, and once every strategy is reconciled the cache
    /// matches what the strategies actually hold.
    #[test]
    fn total_staked_tracks_vault_and_strategies(flows in prop::collection::vec(flow(), 1..80)) {
        let mut pool = empty_pool();
        for _ in 0..3 {
            pool.add_strategy(empty_strategy()).unwrap();
        }
        pool.add_fee(Pubkey::new_unique(), 1_000).unwrap();

        let mut holder = 0u64;
        let mut idle = 0u64;
        let mut reported = [0u64; 3];

        for flow in flows {
            match flow {
                Flow::Deposit(amount) => {
                    let mut next = pool.clone();
                    let Ok(minted) = next.record_deposit(amount) else { continue };
                    let room: Vec<u64> = (0..3)
                        .map(|i| MAX_DEPOSITS[i].saturating_sub(reported[i]))
                        .collect();
                    let (allocations, rest) = allocate_deposit(&room, amount);
                    for (i, allocation) in allocations.into_iter().enumerate() {
                        if allocation > 0 {
                            next.record_strategy_deposit(i as u32, allocation).unwrap();
                            reported[i] += allocation;
                        }
                    }
                    idle += rest;
                    holder += minted;
                    pool = next;
                }
                Flow::Withdraw { percent } => {
                    let amount = pool.balance_of(holder).unwrap() * percent / 100;
                    if amount == 0 {
                        continue;
                    }
                    let withdrawable: Vec<u64> = (0..3)
                        .map(|i| {
                            pool.strategy_withdrawable(i as u32, reported[i], MIN_DEPOSITS[i])
                                .unwrap()
                        })
                        .collect();
                    let Ok((from_vault, plan)) = plan_withdrawal(idle, &withdrawable, amount) else {
                        continue;
                    };

                    holder -= pool.record_withdrawal(amount, holder).unwrap();
                    idle -= from_vault;
                    for (i, take) in plan.into_iter().enumerate() {
                        if take > 0 {
                            pool.record_strategy_withdrawal(i as u32, take).unwrap();
                            reported[i] -= take;
                        }
                    }
                }
                Flow::Gain { strategy, amount } => reported[strategy] += amount,
                Flow::Loss { strategy, percent } => {
                    reported[strategy] -= reported[strategy] * percent / 100;
                }
                Flow::ReconcileAll => {
                    let reports: Vec<(u32, u64)> =
                        (0..3).map(|i| (i as u32, reported[i])).collect();
                    let mut next = pool.clone();
                    if next.reconcile(&reports).is_ok() {
                        pool = next;
                        prop_assert_eq!(pool.total_staked, idle + reported.iter().sum::<u64>());
                    }
                }
            }

            let cached: u64 = pool.strategies.iter().map(|s| s.total_deposits).sum();
            prop_assert_eq!(pool.total_staked, idle + cached);
            prop_assert!(pool.balance_of(holder).unwrap() <= pool.total_staked);
        }
    }

    /// More shares never means a smaller balance
    #[test]
    fn balance_monotonic_in_shares(
        staked in 1u64..1_000_000_000_000,
        total_shares in 1u64..1_000_000_000_000,
        a in 0u64..1_000_000_000_000,
        b in 0u64..1_000_000_000_000,
    ) {
        let mut pool = empty_pool();
        pool.total_staked = staked;
        pool.total_shares = total_shares;

        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(pool.balance_of(low).unwrap() <= pool.balance_of(high).unwrap());
    }

    /// A reward `gain` with a fee of `bps` leaves the receiver holding
    /// gain * bps / 10000 and the depositor the rest, within rounding.
    #[test]
    fn fee_receiver_gets_its_cut(
        staked in 1_000u64..1_000_000_000_000,
        gain_permille in 1u64..=1_000,
        bps in 1u16..=4_000,
    ) {
        let mut pool = empty_pool();
        pool.add_strategy(StrategyEntry {
            strategy_state: Pubkey::new_unique(),
            strategy_program: Pubkey::new_unique(),
            deposit_account: Pubkey::new_unique(),
            total_deposits: 0,
        }).unwrap();
        pool.add_fee(Pubkey::new_unique(), bps).unwrap();

        let depositor = pool.record_deposit(staked).unwrap();
        pool.record_strategy_deposit(0, staked).unwrap();

        let gain = staked / 1_000 * gain_permille;
        prop_assume!(gain > 0);
        let outcome = pool.reconcile(&[(0, staked + gain)]).unwrap();

        let fee = gain * bps as u64 / 10_000;
        prop_assert_eq!(outcome.fee_amounts[0], fee);

        let fee_balance = pool.balance_of(outcome.fee_shares[0]).unwrap();
        let depositor_balance = pool.balance_of(depositor).unwrap();

        prop_assert!(fee_balance <= fee);
        prop_assert!(fee - fee_balance <= 2, "fee {} vs balance {}", fee, fee_balance);
        prop_assert!(depositor_balance + 1 >= staked + gain - fee);
        prop_assert!(depositor_balance + fee_balance <= pool.total_staked);
    }

    /// Unwrapping what was just wrapped never returns more than went in, and
    /// loses at most one unit of the wrapper's exchange rate.
    #[test]
    fn unwrap_of_wrap_round_trip(
        supply in 1u64..1_000_000_000_000,
        rate_percent in 100u64..300,
        amount in 1u64..1_000_000_000,
    ) {
        let held = supply / 100 * rate_percent + 1;
        let wrapped = wrapped_by_underlying(amount, supply, held).unwrap();
        let back = underlying_by_wrapped(wrapped, supply + wrapped, held + amount).unwrap();

        prop_assert!(back <= amount);
        prop_assert!(amount - back <= held / supply + 1);
    }

    #[test]
    fn round_trip_is_exact_at_one_to_one(held in 1u64..1_000_000_000_000, amount in 1u64..1_000_000_000) {
        let wrapped = wrapped_by_underlying(amount, held, held).unwrap();
        prop_assert_eq!(wrapped, amount);
        prop_assert_eq!(underlying_by_wrapped(wrapped, held + wrapped, held + amount).unwrap(), amount);
    }
}
