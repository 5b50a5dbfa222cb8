//! Manager operations and view methods.

use near_sdk::json_types::U128;
use near_sdk::{log, near_bindgen, AccountId};

use crate::allocation::AllocationTable;
use crate::{Contract, ContractExt};

#[near_bindgen]
impl Contract {
    /// Replaces the token offered to the exchange on every swap leg.
    pub fn update_input_token(&mut self, input_token: AccountId) {
        self.assert_manager();
        self.input_token = input_token;
        log!("Input token updated to {}", self.input_token);
    }

    /// Replaces the fund's target allocation. The new table is validated
    /// the same way as at initialization.
    pub fn update_token_allocation(
        &mut self,
        token_list: Vec<AccountId>,
        token_alloc: Vec<u8>,
    ) {
        self.assert_manager();
        self.allocation = AllocationTable::new(token_list, token_alloc);
    }

    /// Registers (or re-points) the exchange pool used to buy `token_id`.
    pub fn register_pool(&mut self, token_id: AccountId, pool_id: u64) {
        self.assert_manager();
        self.pools.insert(&token_id, &pool_id);
        log!("Pool {} registered for {}", pool_id, token_id);
    }

    pub fn token_allocation(&self) -> AllocationTable {
        self.allocation.clone()
    }

    pub fn input_token(&self) -> AccountId {
        self.input_token.clone()
    }

    pub fn min_investment(&self) -> U128 {
        U128(self.min_investment)
    }

    pub fn pool_of(&self, token_id: AccountId) -> Option<u64> {
        self.pools.get(&token_id)
    }
}
