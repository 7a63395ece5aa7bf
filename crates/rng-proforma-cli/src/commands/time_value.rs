use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use rng_proforma_core::time_value;

/// Arguments for IRR calculation
#[derive(Args)]
pub struct IrrArgs {
    /// Cash flows, index 0 = initial outlay (comma-separated,
    /// e.g. "-1000,400,400,400")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Vec<Decimal>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let irr = time_value::irr(&args.cash_flows);
    Ok(json!({
        "irr": irr,
        "cash_flow_count": args.cash_flows.len(),
    }))
}

/// Arguments for NPV calculation
#[derive(Args)]
pub struct NpvArgs {
    /// Discount rate (decimal, e.g. 0.08)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Decimal,

    /// Cash flows, index 0 = initial outlay (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Vec<Decimal>,
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let npv = time_value::npv(args.rate, &args.cash_flows);
    Ok(json!({
        "npv": npv,
        "rate": args.rate,
        "cash_flow_count": args.cash_flows.len(),
    }))
}
