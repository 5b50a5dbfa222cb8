//! Index fund token for the NEAR testnet.
//!
//! The contract is a NEP-141 fungible token whose supply represents shares
//! in a basket of other tokens. Investors attach NEAR to [`Contract::buy_token`];
//! the deposit is split according to a percentage allocation table and
//! swapped through the ref-exchange AMM, and fund shares are minted to the
//! investor once the swap resolves.
//!
//! Notes:
//!   - JSON calls pass balances as base-10 strings via `U128`.
//!   - Mint and burn track storage usage before and after the call: growth
//!     must be covered by the attached deposit, and the unused remainder of
//!     the deposit is refunded, so attaching more than required is safe.
//!   - The deployed contract account should hold no access keys, otherwise
//!     the code could be swapped out from under holders.

use near_contract_standards::fungible_token::events::FtMint;
use near_contract_standards::fungible_token::metadata::{
    FungibleTokenMetadata, FungibleTokenMetadataProvider, FT_METADATA_SPEC,
};
use near_contract_standards::fungible_token::FungibleToken;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::{LazyOption, UnorderedMap};
use near_sdk::json_types::U128;
use near_sdk::{
    env, log, near_bindgen, require, AccountId, Balance, BorshStorageKey, PanicOnDefault,
    PromiseOrValue,
};

pub use crate::allocation::AllocationTable;

mod allocation;
mod errors;
mod exchange;
mod manage;
mod supply;

/// The ref-exchange instance `new_default_meta` wires up.
const DEFAULT_EXCHANGE_ID: &str = "ref-finance-101.testnet";

/// `(token, ref pool id)` pairs seeded by `new_default_meta`.
const DEFAULT_TESTNET_POOLS: [(&str, u64); 5] = [
    ("hapi.fakes.testnet", 114),
    ("wrap.testnet", 17),
    ("usdc.fakes.testnet", 374),
    ("usdt.fakes.testnet", 31),
    ("paras.fakes.testnet", 299),
];

const DATA_IMAGE_SVG_NEAR_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 288 288'%3E%3Cg id='l' data-name='l'%3E%3Cpath d='M187.58,79.81l-30.1,44.69a3.2,3.2,0,0,0,4.75,4.2L191.86,103a1.2,1.2,0,0,1,2,.91v80.46a1.2,1.2,0,0,1-2.12.77L102.18,77.93A15.35,15.35,0,0,0,90.47,72.5H87.34A15.34,15.34,0,0,0,72,87.84V201.16A15.34,15.34,0,0,0,87.34,216.5h0a15.35,15.35,0,0,0,13.08-7.31l30.1-44.69a3.2,3.2,0,0,0-4.75-4.2L96.14,186a1.2,1.2,0,0,1-2-.91V104.61a1.2,1.2,0,0,1,2.12-.77l89.55,107.23a15.35,15.35,0,0,0,11.71,5.43h3.13A15.34,15.34,0,0,0,216,201.16V87.84A15.34,15.34,0,0,0,200.66,72.5h0A15.35,15.35,0,0,0,187.58,79.81Z'/%3E%3C/g%3E%3C/svg%3E";

#[derive(BorshSerialize, BorshStorageKey)]
enum StorageKey {
    FungibleToken,
    Metadata,
    Pools,
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    token: FungibleToken,
    metadata: LazyOption<FungibleTokenMetadata>,
    /// Target percentage per portfolio token.
    allocation: AllocationTable,
    /// Ref-exchange pool id per portfolio token.
    pools: UnorderedMap<AccountId, u64>,
    /// Token offered to the exchange on every swap leg.
    input_token: AccountId,
    /// Smallest deposit `buy_token` accepts, in yoctoNEAR.
    min_investment: Balance,
    /// Account of the ref-exchange instance swaps are routed to.
    exchange_id: AccountId,
    /// Account allowed to mint, burn, and reconfigure the fund.
    manager_id: AccountId,
}

#[near_bindgen]
impl Contract {
    /// Initializes the fund with default metadata, the default testnet
    /// exchange, and its known pool ids (for example purposes only).
    #[init]
    #[allow(clippy::too_many_arguments)]
    pub fn new_default_meta(
        owner_id: AccountId,
        total_supply: U128,
        token_list: Vec<AccountId>,
        token_alloc: Vec<u8>,
        input_token: AccountId,
        min_investment: U128,
        manager_id: AccountId,
    ) -> Self {
        let mut this = Self::new(
            owner_id,
            total_supply,
            FungibleTokenMetadata {
                spec: FT_METADATA_SPEC.to_string(),
                name: "NEAR Index Fund Token".to_string(),
                symbol: "NIFT".to_string(),
                icon: Some(DATA_IMAGE_SVG_NEAR_ICON.to_string()),
                reference: None,
                reference_hash: None,
                decimals: 24,
            },
            token_list,
            token_alloc,
            input_token,
            min_investment,
            DEFAULT_EXCHANGE_ID.parse().unwrap(),
            manager_id,
        );
        for (token_id, pool_id) in DEFAULT_TESTNET_POOLS {
            this.pools.insert(&token_id.parse().unwrap(), &pool_id);
        }
        this
    }

    /// Initializes the fund with the given total supply owned by `owner_id`
    /// and the given fungible token metadata.
    #[init]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: AccountId,
        total_supply: U128,
        metadata: FungibleTokenMetadata,
        token_list: Vec<AccountId>,
        token_alloc: Vec<u8>,
        input_token: AccountId,
        min_investment: U128,
        exchange_id: AccountId,
        manager_id: AccountId,
    ) -> Self {
        require!(!env::state_exists(), crate::errors::ERR_ALREADY_INITIALIZED);
        metadata.assert_valid();
        let mut this = Self {
            token: FungibleToken::new(StorageKey::FungibleToken),
            metadata: LazyOption::new(StorageKey::Metadata, Some(&metadata)),
            allocation: AllocationTable::new(token_list, token_alloc),
            pools: UnorderedMap::new(StorageKey::Pools),
            input_token,
            min_investment: min_investment.0,
            exchange_id,
            manager_id,
        };
        this.token.internal_register_account(&owner_id);
        this.token.internal_deposit(&owner_id, total_supply.into());
        FtMint {
            owner_id: &owner_id,
            amount: &total_supply,
            memo: Some("initial supply"),
        }
        .emit();
        this
    }

    pub(crate) fn assert_manager(&self) {
        require!(
            env::predecessor_account_id() == self.manager_id,
            crate::errors::ERR_NOT_MANAGER
        );
    }

    fn on_account_closed(&mut self, account_id: AccountId, balance: Balance) {
        log!("Closed @{} with {}", account_id, balance);
    }

    fn on_tokens_burned(&mut self, account_id: AccountId, amount: Balance) {
        log!("Account @{} burned {}", account_id, amount);
    }
}

near_contract_standards::impl_fungible_token_core!(Contract, token, on_tokens_burned);
near_contract_standards::impl_fungible_token_storage!(Contract, token, on_account_closed);

#[near_bindgen]
impl FungibleTokenMetadataProvider for Contract {
    fn ft_metadata(&self) -> FungibleTokenMetadata {
        self.metadata.get().unwrap()
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use near_sdk::test_utils::accounts;
    use near_sdk::testing_env;

    use super::test_utils::{get_context, new_fund, TOTAL_SUPPLY};
    use super::*;

    #[test]
    fn test_new() {
        let mut context = get_context(accounts(1));
        testing_env!(context.build());
        let contract = new_fund(accounts(1), accounts(1));
        testing_env!(context.is_view(true).build());
        assert_eq!(contract.ft_total_supply().0, TOTAL_SUPPLY);
        assert_eq!(contract.ft_balance_of(accounts(1)).0, TOTAL_SUPPLY);
    }

    #[test]
    #[should_panic(expected = "Already initialized")]
    fn test_double_init() {
        let context = get_context(accounts(1));
        testing_env!(context.build());
        let contract = new_fund(accounts(1), accounts(1));
        // Persist the state record as the deployed entry point would.
        env::state_write(&contract);
        let _second = new_fund(accounts(1), accounts(1));
    }

    #[test]
    #[should_panic(expected = "The contract is not initialized")]
    fn test_default() {
        let context = get_context(accounts(1));
        testing_env!(context.build());
        let _contract = Contract::default();
    }

    #[test]
    fn test_metadata() {
        let mut context = get_context(accounts(1));
        testing_env!(context.build());
        let contract = new_fund(accounts(1), accounts(1));
        testing_env!(context.is_view(true).build());
        let metadata = contract.ft_metadata();
        assert_eq!(metadata.symbol, "NIFT");
        assert_eq!(metadata.decimals, 24);
    }

    #[test]
    fn test_transfer() {
        let mut context = get_context(accounts(2));
        testing_env!(context.build());
        let mut contract = new_fund(accounts(2), accounts(2));
        testing_env!(context
            .storage_usage(env::storage_usage())
            .attached_deposit(contract.storage_balance_bounds().min.into())
            .predecessor_account_id(accounts(1))
            .build());
        // Paying for account registration, aka storage deposit.
        contract.storage_deposit(None, None);

        testing_env!(context
            .storage_usage(env::storage_usage())
            .attached_deposit(1)
            .predecessor_account_id(accounts(2))
            .build());
        let transfer_amount = TOTAL_SUPPLY / 3;
        contract.ft_transfer(accounts(1), transfer_amount.into(), None);

        testing_env!(context
            .storage_usage(env::storage_usage())
            .account_balance(env::account_balance())
            .is_view(true)
            .attached_deposit(0)
            .build());
        assert_eq!(
            contract.ft_balance_of(accounts(2)).0,
            TOTAL_SUPPLY - transfer_amount
        );
        assert_eq!(contract.ft_balance_of(accounts(1)).0, transfer_amount);
    }

    #[test]
    fn test_manager_holds_no_initial_supply() {
        let mut context = get_context(accounts(1));
        testing_env!(context.build());
        let contract = new_fund(accounts(1), accounts(3));
        testing_env!(context.is_view(true).build());
        assert_eq!(contract.ft_balance_of(accounts(3)).0, 0);
    }
}
