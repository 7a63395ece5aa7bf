//! Engine entry point: resolve assumptions, read the upstream result bags,
//! simulate, and reduce to metrics. One invocation is one synchronous,
//! deterministic function call; the engine always returns a result object,
//! expressing indeterminacy through nullable metrics and advisory warnings
//! rather than errors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::FinancialAssumptions;
use crate::feedstock::Feedstock;
use crate::types::{with_metadata, ComputationOutput, Money, Severity, Warning};
use crate::upstream::{
    mass_balance, opex, CapexResults, CostBuckets, MassBalanceResults, OpexResults, ValueSource,
};
use crate::ProFormaResult;

use super::metrics::{self, FinancialMetrics};
use super::simulator::{self, whole, ProFormaYear};

/// Everything one pro-forma run consumes. The upstream result bags belong
/// to the caller and are only read; each is optional, and absent inputs
/// degrade to defaults rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProFormaInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass_balance: Option<MassBalanceResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capex: Option<CapexResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opex: Option<OpexResults>,
    #[serde(default)]
    pub feedstocks: Vec<Feedstock>,
    /// Supplied assumptions; seeded from the feedstock slate when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<FinancialAssumptions>,
}

impl ProFormaInput {
    pub fn from_json(raw: &str) -> ProFormaResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// The base-year seeds the simulation actually ran from, with the fallback
/// strategy each extracted quantity came through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationBasis {
    pub total_capital_cost: Money,
    /// Classified base-year opex by bucket.
    pub base_opex: CostBuckets,
    pub biogas_flow_scfm: Decimal,
    pub biogas_flow_source: ValueSource,
    pub rng_mmbtu_per_day: Decimal,
    pub rng_production_source: ValueSource,
    /// Upstream-reported totals, passed through as diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_total_annual_opex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_net_annual_opex: Option<Money>,
}

/// Complete pro-forma result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaOutput {
    /// Project type tag passed through from the mass balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// The assumptions actually used (supplied or seeded).
    pub assumptions: FinancialAssumptions,
    pub years: Vec<ProFormaYear>,
    pub metrics: FinancialMetrics,
    pub basis: SimulationBasis,
}

/// Run the full pro-forma: extraction → classification → simulation →
/// metrics. Never fails; inspect the envelope's warnings and the nullable
/// metric fields instead of catching errors.
pub fn run_pro_forma(input: &ProFormaInput) -> ComputationOutput<ProFormaOutput> {
    let start = Instant::now();
    let mut warnings: Vec<Warning> = Vec::new();

    let assumptions = input
        .assumptions
        .clone()
        .unwrap_or_else(|| FinancialAssumptions::seeded(&input.feedstocks));

    let total_capital_cost = input
        .capex
        .as_ref()
        .map(CapexResults::total_project_cost)
        .unwrap_or(Decimal::ZERO);
    if total_capital_cost <= Decimal::ZERO {
        warnings.push(Warning::new(
            "capex.summary.total_project_cost",
            format!(
                "Total capital cost is {total_capital_cost}; return metrics will be degenerate"
            ),
            Severity::Warning,
        ));
    }

    let base_opex = input
        .opex
        .as_ref()
        .map(|o| opex::classify_opex(&o.line_items))
        .unwrap_or_default();

    let flow = mass_balance::biogas_flow_scfm(input.mass_balance.as_ref());
    if flow.source == ValueSource::Default {
        warnings.push(Warning::new(
            "mass_balance.summary",
            format!(
                "No biogas flow field found; using the {} scfm default",
                mass_balance::DEFAULT_BIOGAS_FLOW_SCFM
            ),
            Severity::Info,
        ));
    }

    let production = mass_balance::rng_production_mmbtu_per_day(
        input.mass_balance.as_ref(),
        flow.value,
    );
    if production.source == ValueSource::Estimated {
        warnings.push(Warning::new(
            "mass_balance.summary",
            "No RNG production field found; estimated from biogas flow",
            Severity::Info,
        ));
    }
    if production.value <= Decimal::ZERO {
        warnings.push(Warning::new(
            "mass_balance",
            "RNG production is non-positive; all revenue streams will be zero",
            Severity::Warning,
        ));
    }

    let years = simulator::simulate(
        &assumptions,
        total_capital_cost,
        &base_opex,
        flow.value,
        production.value,
    );

    let itc_proceeds =
        whole(total_capital_cost * assumptions.itc_rate * assumptions.itc_monetization);
    let metrics = metrics::summarize(
        &years,
        total_capital_cost,
        assumptions.discount_rate,
        itc_proceeds,
        assumptions.project_life_years,
    );

    if let Some(payback) = metrics.payback_year {
        let life = Decimal::from(assumptions.project_life_years);
        if Decimal::from(payback) > life * dec!(0.70) {
            warnings.push(Warning::new(
                "metrics.payback_year",
                format!(
                    "Payback in year {payback} exceeds 70% of the {life}-year project life"
                ),
                Severity::Warning,
            ));
        }
    }

    let (project_type, reported_total, reported_net) = (
        input
            .mass_balance
            .as_ref()
            .and_then(|mb| mb.project_type.clone()),
        input
            .opex
            .as_ref()
            .and_then(|o| o.summary.total_annual_opex),
        input.opex.as_ref().and_then(|o| o.summary.net_annual_opex),
    );

    let output = ProFormaOutput {
        project_type,
        assumptions: assumptions.clone(),
        years,
        metrics,
        basis: SimulationBasis {
            total_capital_cost,
            base_opex,
            biogas_flow_scfm: flow.value,
            biogas_flow_source: flow.source,
            rng_mmbtu_per_day: production.value,
            rng_production_source: production.source,
            reported_total_annual_opex: reported_total,
            reported_net_annual_opex: reported_net,
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "RNG project pro-forma: multi-year cash flow with IRR, NPV, MOIC, payback",
        &serde_json::json!({
            "project_life_years": assumptions.project_life_years,
            "construction_years": assumptions.construction_years,
            "discount_rate": assumptions.discount_rate.to_string(),
            "total_capital_cost": total_capital_cost.to_string(),
            "market": market_label(&assumptions),
        }),
        warnings,
        elapsed,
        output,
    )
}

fn market_label(assumptions: &FinancialAssumptions) -> &'static str {
    match assumptions.market {
        crate::assumptions::RevenueMarket::CreditMarket(_) => "credit_market",
        crate::assumptions::RevenueMarket::VoluntaryMarket(_) => "voluntary_market",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_input_still_returns_result() {
        let output = run_pro_forma(&ProFormaInput::default());
        let result = &output.result;
        assert_eq!(result.years.len(), 20);
        assert_eq!(
            result.basis.biogas_flow_scfm,
            mass_balance::DEFAULT_BIOGAS_FLOW_SCFM
        );
        assert_eq!(result.basis.rng_production_source, ValueSource::Estimated);
        // Zero capex must be flagged, never thrown.
        assert!(output
            .warnings
            .iter()
            .any(|w| w.field == "capex.summary.total_project_cost"));
        assert_eq!(result.metrics.moic, Decimal::ZERO);
    }

    #[test]
    fn test_from_json_rejects_malformed_payload() {
        assert!(ProFormaInput::from_json("{not json").is_err());
        assert!(ProFormaInput::from_json("{}").is_ok());
    }

    #[test]
    fn test_capex_flows_into_outlay_and_itc() {
        let input = ProFormaInput {
            capex: Some(CapexResults::from(dec!(10_000_000))),
            ..ProFormaInput::default()
        };
        let output = run_pro_forma(&input);
        let result = &output.result;
        assert_eq!(result.basis.total_capital_cost, dec!(10_000_000));
        // Default assumptions: ITC 30% monetized at 90%.
        assert_eq!(result.metrics.itc_proceeds, dec!(2_700_000));
    }
}
