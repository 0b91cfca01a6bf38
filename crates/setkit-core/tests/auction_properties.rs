//! Property-based tests for the auction engine.
//! Verifies price monotonicity, exact flows at minimum bid multiples,
//! additivity of bids and the lifecycle transition table.

use alloy_primitives::{Address, U256};
use proptest::prelude::*;
use setkit_core::auction::{combined_units, compute_flow, minimum_bid, price_at};
use setkit_core::*;

// ============================================================================
// Test Strategies
// ============================================================================

/// Natural units are powers of ten in practice
fn natural_units() -> impl Strategy<Value = U256> {
    (0u64..=18).prop_map(|exp| U256::from(10u64).pow(U256::from(exp)))
}

/// A basket over a subset of six component addresses
fn baskets() -> impl Strategy<Value = Basket> {
    (
        proptest::sample::subsequence((1u8..=6).collect::<Vec<_>>(), 1..=4),
        prop::collection::vec(1u64..1_000_000, 4),
        natural_units(),
    )
        .prop_map(|(components, units, natural_unit)| Basket {
            address: Address::repeat_byte(0xEE),
            units: units[..components.len()].iter().map(|u| U256::from(*u)).collect(),
            components: components.into_iter().map(Address::repeat_byte).collect(),
            natural_unit,
        })
}

/// Ascending curve parameters (time_to_pivot, start, pivot)
fn ascending_curve() -> impl Strategy<Value = (u64, u64, u64)> {
    (1u64..2_592_000, 0u64..1_000_000, 0u64..1_000_000)
        .prop_map(|(ttp, start, rise)| (ttp, start, start + rise))
}

#[derive(Debug, Clone)]
enum Step {
    Propose,
    Start,
    Bid(u64),
    Settle,
    Fail,
    Wait(u64),
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![
            Just(Step::Propose),
            Just(Step::Start),
            (1u64..4).prop_map(Step::Bid),
            Just(Step::Settle),
            Just(Step::Fail),
            (0u64..300_000).prop_map(Step::Wait),
        ],
        1..40,
    )
}

// ============================================================================
// Price Curve Properties
// ============================================================================

proptest! {
    /// Price never decreases on an ascending curve
    #[test]
    fn prop_price_monotonic(
        (ttp, start, pivot) in ascending_curve(),
        t1 in 0u64..5_000_000,
        dt in 0u64..5_000_000,
    ) {
        let d = U256::from(1_000u64);
        let p1 = price_at(t1, ttp, U256::from(start), U256::from(pivot), d).unwrap();
        let p2 = price_at(t1 + dt, ttp, U256::from(start), U256::from(pivot), d).unwrap();
        prop_assert!(p1.numerator <= p2.numerator);
        prop_assert_eq!(p1.denominator, p2.denominator);
    }

    /// Curve passes exactly through its start and pivot
    #[test]
    fn prop_price_endpoints((ttp, start, pivot) in ascending_curve()) {
        let d = U256::from(1_000u64);
        let at_start = price_at(0, ttp, U256::from(start), U256::from(pivot), d).unwrap();
        let at_pivot = price_at(ttp, ttp, U256::from(start), U256::from(pivot), d).unwrap();
        prop_assert_eq!(at_start.numerator, U256::from(start));
        prop_assert_eq!(at_pivot.numerator, U256::from(pivot));
    }
}

// ============================================================================
// Combined Array and Flow Properties
// ============================================================================

proptest! {
    /// Building the combined array is deterministic
    #[test]
    fn prop_combined_array_idempotent(current in baskets(), next in baskets()) {
        let a = combined_units::build(&current, &next).unwrap();
        let b = combined_units::build(&current, &next).unwrap();
        prop_assert_eq!(&a, &b);

        // Every component of either basket appears exactly once
        for component in current.components.iter().chain(&next.components) {
            prop_assert_eq!(a.components.iter().filter(|c| *c == component).count(), 1);
        }
    }

    /// At multiples of the minimum bid both flows divide exactly
    #[test]
    fn prop_flow_conservation(
        current in baskets(),
        next in baskets(),
        multiple in 1u64..1_000,
        price in 0u64..10_000,
    ) {
        let pd = U256::from(1_000u64);
        let pn = U256::from(price);
        let combined = combined_units::build(&current, &next).unwrap();
        let min_bid = minimum_bid(current.natural_unit, next.natural_unit, pd).unwrap();
        let quantity = min_bid * U256::from(multiple);

        let flow = compute_flow(&combined, quantity, pn, pd).unwrap();
        let n = combined.natural_unit;
        for i in 0..combined.len() {
            prop_assert_eq!(flow.outflow[i] * n, combined.current_units[i] * quantity);
            prop_assert_eq!(flow.inflow[i] * n * pd, combined.next_units[i] * quantity * pn);
        }
    }

    /// Draining in minimum bids moves the same tokens as one bid for the total
    #[test]
    fn prop_flow_additive(
        current in baskets(),
        next in baskets(),
        bids in 1u64..20,
        price in 0u64..10_000,
    ) {
        let pd = U256::from(1_000u64);
        let pn = U256::from(price);
        let combined = combined_units::build(&current, &next).unwrap();
        let min_bid = minimum_bid(current.natural_unit, next.natural_unit, pd).unwrap();

        let mut total = TokenFlow::zero(combined.len());
        for _ in 0..bids {
            let flow = compute_flow(&combined, min_bid, pn, pd).unwrap();
            total = total.checked_add(&flow).unwrap();
        }
        let single = compute_flow(&combined, min_bid * U256::from(bids), pn, pd).unwrap();
        prop_assert_eq!(total, single);
    }
}

// ============================================================================
// Lifecycle Properties
// ============================================================================

fn basket_of(address: u8, components: &[u8]) -> Basket {
    Basket::new(
        Address::repeat_byte(address),
        components.iter().map(|c| Address::repeat_byte(*c)).collect(),
        vec![U256::from(10u64); components.len()],
        U256::from(10u64),
    )
    .unwrap()
}

fn apply(cycle: &AuctionCycle, step: &Step, now: &mut u64) -> CoreResult<AuctionCycle> {
    let manager = Address::repeat_byte(0xB0);
    match step {
        Step::Propose => {
            let params = AuctionParameters::with_default_denominator(
                Address::repeat_byte(0x77),
                100_000,
                U256::from(500u64),
                U256::from(1_000u64),
            )?;
            cycle.propose(manager, basket_of(0xC1, &[2, 3]), params, *now)
        }
        Step::Start => cycle.start_rebalance(U256::from(50_000u64), *now),
        Step::Bid(sets) => {
            let bid = Bid {
                rebalancing_token: cycle.rebalancing_token,
                quantity: U256::from(sets * 10_000),
                allow_partial_fill: true,
            };
            cycle.place_bid(&bid, *now).map(|(next, _)| next)
        }
        Step::Settle => {
            let balances = vec![U256::from(1_000_000u64); 3];
            cycle
                .settle_rebalance(&balances, U256::from(1_000u64), *now)
                .map(|(next, _)| next)
        }
        Step::Fail => cycle.end_failed_auction(*now),
        Step::Wait(seconds) => {
            *now += seconds;
            Ok(cycle.clone())
        }
    }
}

proptest! {
    /// Every accepted operation follows the transition table
    #[test]
    fn prop_state_machine_transitions(steps in steps()) {
        let mut now = 1_000_000u64;
        let mut cycle = AuctionCycle::new(
            Address::repeat_byte(0xA0),
            Address::repeat_byte(0xB0),
            U256::from(10u64),
            U256::from(1u64),
            basket_of(0xC0, &[1, 2]),
            RebalanceSchedule {
                proposal_period: 86_400,
                rebalance_interval: 86_400,
                fail_grace_period: 86_400,
            },
            0,
        )
        .unwrap();

        for step in &steps {
            match apply(&cycle, step, &mut now) {
                Ok(next) => {
                    prop_assert!(
                        next.state == cycle.state || cycle.state.can_transition_to(next.state),
                        "illegal transition {} -> {} via {:?}", cycle.state, next.state, step
                    );
                    if next.state == cycle.state && !matches!(step, Step::Bid(_) | Step::Wait(_)) {
                        prop_assert!(false, "{:?} succeeded without changing state", step);
                    }
                    cycle = next;
                }
                Err(SetCoreError::InvalidAuctionState { actual, .. }) => {
                    prop_assert_eq!(actual, cycle.state.as_str());
                }
                Err(_) => {}
            }
        }
    }

    /// Only the listed transitions are legal
    #[test]
    fn prop_transition_table(from in 0u8..4, to in 0u8..4) {
        let states = [
            RebalanceState::Default,
            RebalanceState::Proposal,
            RebalanceState::Rebalance,
            RebalanceState::Drawdown,
        ];
        let (from, to) = (states[from as usize], states[to as usize]);
        let expected = matches!(
            (from, to),
            (RebalanceState::Default, RebalanceState::Proposal)
                | (RebalanceState::Proposal, RebalanceState::Rebalance)
                | (RebalanceState::Rebalance, RebalanceState::Default)
                | (RebalanceState::Rebalance, RebalanceState::Drawdown)
                | (RebalanceState::Drawdown, RebalanceState::Proposal)
        );
        prop_assert_eq!(from.can_transition_to(to), expected);
    }
}
