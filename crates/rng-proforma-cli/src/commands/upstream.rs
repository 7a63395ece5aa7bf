use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use rng_proforma_core::feedstock::{self, Feedstock};
use rng_proforma_core::upstream::{opex, OpexResults};

use crate::input;

/// Arguments for opex classification
#[derive(Args)]
pub struct ClassifyOpexArgs {
    /// Path to an opex results file (JSON or YAML) with a line_items list
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_classify_opex(args: ClassifyOpexArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let opex_results: OpexResults = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <opex.{json,yaml}> or stdin required for classify-opex".into());
    };

    let buckets = opex::classify_opex(&opex_results.line_items);
    let total = buckets.total();
    Ok(json!({
        "buckets": buckets,
        "total_classified": total,
        "line_item_count": opex_results.line_items.len(),
    }))
}

/// Arguments for feedstock default derivation
#[derive(Args)]
pub struct FeedstockDefaultsArgs {
    /// Path to a feedstock list file (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_feedstock_defaults(
    args: FeedstockDefaultsArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let feedstocks: Vec<Feedstock> = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <feedstocks.{json,yaml}> or stdin required for feedstock-defaults".into());
    };

    let cost_drivers = feedstock::default_cost_drivers(&feedstocks);
    let total_annual_tons: Decimal = cost_drivers.iter().map(|c| c.tons_per_year).sum();
    Ok(json!({
        "cost_drivers": cost_drivers,
        "total_annual_tons": total_annual_tons,
        "blended_ci_score": feedstock::blended_carbon_intensity(&feedstocks),
    }))
}
