//! The fund's target token weights.

use std::collections::BTreeMap;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::Serialize;
use near_sdk::{require, AccountId, Balance};

use crate::errors::{
    ERR_ALLOCATION_DUPLICATE, ERR_ALLOCATION_LENGTH, ERR_ALLOCATION_SUM,
    ERR_ALLOCATION_ZERO_WEIGHT,
};

/// Weights are integer percentages and must cover the whole fund.
pub const TOTAL_WEIGHT: u32 = 100;

/// Maps each portfolio token to its percentage of the fund.
///
/// An ordered map keeps deposit splitting deterministic across calls.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde", transparent)]
pub struct AllocationTable {
    weights: BTreeMap<AccountId, u8>,
}

impl AllocationTable {
    /// Builds a table from parallel token and weight lists.
    ///
    /// Panics on a length mismatch, a duplicate token, a zero weight, or
    /// weights that do not sum to exactly [`TOTAL_WEIGHT`].
    pub fn new(token_list: Vec<AccountId>, token_alloc: Vec<u8>) -> Self {
        require!(token_list.len() == token_alloc.len(), ERR_ALLOCATION_LENGTH);
        let mut weights = BTreeMap::new();
        let mut total: u32 = 0;
        for (token_id, weight) in token_list.into_iter().zip(token_alloc) {
            require!(weight > 0, ERR_ALLOCATION_ZERO_WEIGHT);
            total += u32::from(weight);
            require!(
                weights.insert(token_id, weight).is_none(),
                ERR_ALLOCATION_DUPLICATE
            );
        }
        require!(total == TOTAL_WEIGHT, ERR_ALLOCATION_SUM);
        Self { weights }
    }

    /// Divides `amount` into per-token slices of `amount * weight / 100`.
    ///
    /// Integer division dust stays with the caller rather than being
    /// assigned to any token.
    pub fn split(&self, amount: Balance) -> Vec<(AccountId, Balance)> {
        self.weights
            .iter()
            .map(|(token_id, weight)| (token_id.clone(), amount * Balance::from(*weight) / 100))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(id: &str) -> AccountId {
        id.parse().unwrap()
    }

    #[test]
    fn builds_from_parallel_lists() {
        let table = AllocationTable::new(
            vec![token("wrap.testnet"), token("usdc.fakes.testnet")],
            vec![40, 60],
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    #[should_panic(expected = "Token list and allocation list differ in length")]
    fn rejects_uneven_lists() {
        AllocationTable::new(vec![token("wrap.testnet")], vec![40, 60]);
    }

    #[test]
    #[should_panic(expected = "Token allocation weights must sum to 100")]
    fn rejects_partial_cover() {
        AllocationTable::new(
            vec![token("wrap.testnet"), token("usdc.fakes.testnet")],
            vec![40, 50],
        );
    }

    #[test]
    #[should_panic(expected = "Token allocation weights must sum to 100")]
    fn rejects_empty_table() {
        AllocationTable::new(vec![], vec![]);
    }

    #[test]
    #[should_panic(expected = "Duplicate token in allocation")]
    fn rejects_duplicate_token() {
        AllocationTable::new(
            vec![token("wrap.testnet"), token("wrap.testnet")],
            vec![40, 60],
        );
    }

    #[test]
    #[should_panic(expected = "Token allocation weight must be non-zero")]
    fn rejects_zero_weight() {
        AllocationTable::new(
            vec![token("wrap.testnet"), token("usdc.fakes.testnet")],
            vec![0, 100],
        );
    }

    #[test]
    fn splits_proportionally() {
        let table = AllocationTable::new(
            vec![token("wrap.testnet"), token("usdc.fakes.testnet")],
            vec![40, 60],
        );
        let slices = table.split(1_000);
        // BTreeMap order: "usdc.fakes.testnet" sorts before "wrap.testnet".
        assert_eq!(
            slices,
            vec![
                (token("usdc.fakes.testnet"), 600),
                (token("wrap.testnet"), 400),
            ]
        );
    }

    #[test]
    fn split_keeps_dust_undeployed() {
        let table = AllocationTable::new(
            vec![token("wrap.testnet"), token("usdc.fakes.testnet")],
            vec![33, 67],
        );
        let slices = table.split(10);
        let deployed: Balance = slices.iter().map(|(_, amount)| amount).sum();
        assert_eq!(deployed, 9);
    }
}
