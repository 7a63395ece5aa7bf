use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rng_proforma_core::assumptions::{
    CreditMarketPricing, FinancialAssumptions, RevenueMarket, VoluntaryMarketPricing,
};
use rng_proforma_core::proforma::{run_pro_forma, ProFormaInput};
use rng_proforma_core::upstream::CapexResults;
use rng_proforma_core::ProFormaError;

use crate::input;

/// Arguments for the full pro-forma run
#[derive(Args)]
pub struct ProformaArgs {
    /// Path to a scenario file (JSON or YAML). Omit to read JSON from stdin.
    #[arg(long)]
    pub input: Option<String>,

    /// Override the total capital cost from the scenario
    #[arg(long)]
    pub capex: Option<Decimal>,

    /// Override the project life in operating years
    #[arg(long)]
    pub project_life: Option<u32>,

    /// Override the discount rate (decimal, e.g. 0.08)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Override the revenue market regime with seed pricing
    /// ("credit" or "voluntary")
    #[arg(long)]
    pub market: Option<String>,
}

pub fn run_proforma(args: ProformaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pf_input: ProFormaInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <scenario.{json,yaml}> or stdin required for proforma".into());
    };

    if let Some(capex) = args.capex {
        pf_input.capex = Some(CapexResults::from(capex));
    }

    let needs_assumptions =
        args.project_life.is_some() || args.discount_rate.is_some() || args.market.is_some();
    if needs_assumptions {
        let mut assumptions = pf_input
            .assumptions
            .take()
            .unwrap_or_else(|| FinancialAssumptions::seeded(&pf_input.feedstocks));
        if let Some(life) = args.project_life {
            assumptions.project_life_years = life;
        }
        if let Some(rate) = args.discount_rate {
            assumptions.discount_rate = rate;
        }
        if let Some(ref market) = args.market {
            assumptions.market = parse_market(market)?;
        }
        pf_input.assumptions = Some(assumptions);
    }

    let result = run_pro_forma(&pf_input);
    Ok(serde_json::to_value(result)?)
}

fn parse_market(flag: &str) -> Result<RevenueMarket, ProFormaError> {
    match flag.to_lowercase().as_str() {
        "credit" | "credit_market" => {
            Ok(RevenueMarket::CreditMarket(CreditMarketPricing::seed()))
        }
        "voluntary" | "voluntary_market" => {
            Ok(RevenueMarket::VoluntaryMarket(VoluntaryMarketPricing::seed()))
        }
        other => Err(ProFormaError::InvalidInput {
            field: "--market".into(),
            reason: format!("Unknown market '{other}'. Expected 'credit' or 'voluntary'"),
        }),
    }
}
