pub mod capex;
pub mod mass_balance;
pub mod opex;

pub use capex::CapexResults;
pub use mass_balance::{MassBalanceResults, ProcessStage, QuantityField, ValueSource};
pub use opex::{CostBucket, CostBuckets, OpexLineItem, OpexResults};
