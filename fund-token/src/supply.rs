//! Manager-gated mint and burn.
//!
//! Both operations track storage usage before and after the call: growth
//! must be covered by the attached deposit, and whatever is left of the
//! deposit is refunded to the caller.

use near_contract_standards::fungible_token::events::{FtBurn, FtMint};
use near_sdk::json_types::U128;
use near_sdk::{env, near_bindgen, require, AccountId, Balance, Promise, StorageUsage};

use crate::errors::{
    ERR_BALANCE_INSUFFICIENT, ERR_BALANCE_OVERFLOW, ERR_BURN_ALL, ERR_TOTAL_SUPPLY_OVERFLOW,
};
use crate::{Contract, ContractExt};

#[near_bindgen]
impl Contract {
    /// Mints `amount` to `receiver_id`, registering the account if needed.
    ///
    /// Only the token manager may call this. The attached deposit must
    /// cover any storage growth; the remainder is refunded.
    #[payable]
    pub fn ft_mint(&mut self, receiver_id: AccountId, amount: U128) {
        self.assert_manager();
        let initial_storage_usage = env::storage_usage();

        let balance = self.token.accounts.get(&receiver_id).unwrap_or(0);
        let new_balance = balance
            .checked_add(amount.0)
            .unwrap_or_else(|| env::panic_str(ERR_BALANCE_OVERFLOW));
        self.token.accounts.insert(&receiver_id, &new_balance);
        self.token.total_supply = self
            .token
            .total_supply
            .checked_add(amount.0)
            .unwrap_or_else(|| env::panic_str(ERR_TOTAL_SUPPLY_OVERFLOW));
        FtMint {
            owner_id: &receiver_id,
            amount: &amount,
            memo: None,
        }
        .emit();

        self.settle_storage_cost(initial_storage_usage);
    }

    /// Burns `amount` from `account_id`. The entire supply can never be
    /// burned away.
    #[payable]
    pub fn ft_burn(&mut self, account_id: AccountId, amount: U128) {
        self.assert_manager();
        require!(amount.0 < self.token.total_supply, ERR_BURN_ALL);
        let initial_storage_usage = env::storage_usage();

        let balance = self.token.accounts.get(&account_id).unwrap_or(0);
        let new_balance = balance
            .checked_sub(amount.0)
            .unwrap_or_else(|| env::panic_str(ERR_BALANCE_INSUFFICIENT));
        self.token.accounts.insert(&account_id, &new_balance);
        // The account balance is bounded by the total supply.
        self.token.total_supply -= amount.0;
        FtBurn {
            owner_id: &account_id,
            amount: &amount,
            memo: None,
        }
        .emit();

        self.settle_storage_cost(initial_storage_usage);
    }
}

impl Contract {
    /// Charges the attached deposit for storage grown since
    /// `initial_storage_usage` and refunds the rest to the predecessor.
    pub(crate) fn settle_storage_cost(&mut self, initial_storage_usage: StorageUsage) {
        let current_storage_usage = env::storage_usage();
        let required_cost = if current_storage_usage > initial_storage_usage {
            let storage_used = current_storage_usage - initial_storage_usage;
            env::storage_byte_cost() * Balance::from(storage_used)
        } else {
            0
        };
        let attached_deposit = env::attached_deposit();
        if required_cost > attached_deposit {
            env::panic_str(&format!(
                "Must attach {} yoctoNEAR to cover storage",
                required_cost
            ));
        }
        let refund = attached_deposit - required_cost;
        if refund > 1 {
            Promise::new(env::predecessor_account_id()).transfer(refund);
        }
    }
}
