//! Buying into the fund through the ref-exchange AMM.
//!
//! `buy_token` splits the attached deposit per the allocation table into one
//! swap action per portfolio token and fires them at the exchange in a
//! single cross-contract call. The private callback either mints fund
//! shares to the buyer or refunds the whole deposit.

use near_contract_standards::fungible_token::events::FtMint;
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{
    env, ext_contract, log, near_bindgen, require, AccountId, Balance, Gas, Promise, PromiseError,
};

use crate::errors::{ERR_DEPOSIT_BELOW_MINIMUM, ERR_NO_POOL};
use crate::{Contract, ContractExt};

pub const GAS_FOR_SWAP: Gas = Gas(5_000_000_000_000);
// The callback may register the buyer and write two storage slots.
pub const GAS_FOR_ON_SWAP: Gas = Gas(10_000_000_000_000);

/// One leg of a ref-exchange `swap` call. Field names and types follow the
/// exchange's wire format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct SwapAction {
    pub pool_id: u64,
    pub token_in: AccountId,
    pub amount_in: U128,
    pub token_out: AccountId,
    pub min_amount_out: U128,
}

#[ext_contract(ext_exchange)]
trait Exchange {
    fn swap(&mut self, actions: Vec<SwapAction>) -> U128;
}

#[near_bindgen]
impl Contract {
    /// Invests the attached deposit into the fund.
    ///
    /// The deposit is swapped into the portfolio tokens through the
    /// exchange; once the swap resolves, fund shares are minted to the
    /// caller 1:1 with the deposited yoctoNEAR, or the deposit is refunded
    /// if the swap failed.
    #[payable]
    pub fn buy_token(&mut self) -> Promise {
        let deposit = env::attached_deposit();
        log!("Attached deposit is {}", deposit);
        require!(deposit >= self.min_investment, ERR_DEPOSIT_BELOW_MINIMUM);
        let buyer = env::predecessor_account_id();
        let actions = self.plan_swaps(deposit);

        ext_exchange::ext(self.exchange_id.clone())
            .with_attached_deposit(1)
            .with_static_gas(GAS_FOR_SWAP)
            .swap(actions)
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_ON_SWAP)
                    .on_swap(buyer, U128(deposit)),
            )
    }

    /// Resolves a purchase. Returns the number of shares minted.
    #[private]
    pub fn on_swap(
        &mut self,
        buyer: AccountId,
        deposit: U128,
        #[callback_result] swap_result: Result<U128, PromiseError>,
    ) -> U128 {
        match swap_result {
            Ok(_) => {
                if self.token.accounts.get(&buyer).is_none() {
                    self.token.internal_register_account(&buyer);
                }
                self.token.internal_deposit(&buyer, deposit.0);
                FtMint {
                    owner_id: &buyer,
                    amount: &deposit,
                    memo: Some("fund purchase"),
                }
                .emit();
                deposit
            }
            Err(_) => {
                log!("Swap failed, refunding {} to @{}", deposit.0, buyer);
                Promise::new(buyer).transfer(deposit.0);
                U128(0)
            }
        }
    }
}

impl Contract {
    /// Plans one swap leg per allocation entry for a deposit of `amount`.
    ///
    /// Panics if any portfolio token has no registered pool.
    pub(crate) fn plan_swaps(&self, amount: Balance) -> Vec<SwapAction> {
        let mut actions = Vec::with_capacity(self.allocation.len());
        for (token_out, amount_in) in self.allocation.split(amount) {
            let pool_id = self
                .pools
                .get(&token_out)
                .unwrap_or_else(|| env::panic_str(ERR_NO_POOL));
            actions.push(SwapAction {
                pool_id,
                token_in: self.input_token.clone(),
                amount_in: U128(amount_in),
                token_out,
                min_amount_out: U128(0),
            });
        }
        actions
    }
}
