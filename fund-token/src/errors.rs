//! Panic messages shared across entry points.

pub const ERR_ALREADY_INITIALIZED: &str = "Already initialized";
pub const ERR_NOT_MANAGER: &str = "Only the token manager can call this method";
pub const ERR_ALLOCATION_LENGTH: &str = "Token list and allocation list differ in length";
pub const ERR_ALLOCATION_SUM: &str = "Token allocation weights must sum to 100";
pub const ERR_ALLOCATION_DUPLICATE: &str = "Duplicate token in allocation";
pub const ERR_ALLOCATION_ZERO_WEIGHT: &str = "Token allocation weight must be non-zero";
pub const ERR_TOTAL_SUPPLY_OVERFLOW: &str = "Total supply overflow";
pub const ERR_BALANCE_OVERFLOW: &str = "Balance overflow";
pub const ERR_BALANCE_INSUFFICIENT: &str = "Balance insufficient";
pub const ERR_BURN_ALL: &str = "Cannot burn the entire token supply";
pub const ERR_DEPOSIT_BELOW_MINIMUM: &str = "Attached deposit is below the minimum investment";
pub const ERR_NO_POOL: &str = "No swap pool registered for token";
