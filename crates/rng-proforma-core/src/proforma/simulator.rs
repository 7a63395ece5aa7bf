//! Year-by-year cash-flow simulation.
//!
//! Year 0 is the capital outlay; years 1..N are operating years. The
//! simulation always runs the full configured project life. Every dollar
//! and physical field is rounded to the nearest whole unit when its
//! [`ProFormaYear`] record is built, and aggregates (total revenue, total
//! opex, EBITDA, net cash flow, cumulative cash flow) are derived from the
//! rounded components, so the published series is internally consistent to
//! the dollar.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::{FinancialAssumptions, RevenueMarket};
use crate::feedstock;
use crate::time_value;
use crate::types::Money;
use crate::upstream::CostBuckets;

const DAYS_PER_YEAR: Decimal = dec!(365);

/// One simulated operating year. Immutable once built; ordered ascending
/// by year. The sequence is the authoritative trace for all metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaYear {
    /// Operating year, 1-based.
    pub year: u32,
    pub calendar_year: i32,
    /// Biogas flow for the year (scfm, growth applied).
    pub biogas_flow_scfm: Decimal,
    /// RNG delivered for the year (MMBtu, uptime and growth applied).
    pub rng_mmbtu: Decimal,
    /// Environmental-credit sales net of brokerage (credit market only).
    pub credit_revenue: Money,
    /// Gas sales: hub-referenced commodity gas, or the bilateral contract
    /// price plus green premium in the voluntary market.
    pub gas_revenue: Money,
    /// Declining CI-gap production tax credit.
    pub tax_credit_revenue: Money,
    pub total_revenue: Money,
    pub utilities_opex: Money,
    pub labor_opex: Money,
    pub maintenance_opex: Money,
    pub chemicals_opex: Money,
    pub insurance_opex: Money,
    pub other_opex: Money,
    pub feedstock_opex: Money,
    pub total_opex: Money,
    pub ebitda: Money,
    /// Maintenance capital allowance (inflates; the capital base does not).
    pub maintenance_capex: Money,
    pub debt_service: Money,
    /// EBITDA − maintenance capex − debt service, plus ITC proceeds in
    /// year 1.
    pub net_cash_flow: Money,
    /// Running total, seeded at −(total capital cost).
    pub cumulative_cash_flow: Money,
}

/// Round to the nearest whole currency/physical unit.
pub(crate) fn whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn compound(rate: Decimal, elapsed_years: u32) -> Decimal {
    (Decimal::ONE + rate).powi(elapsed_years as i64)
}

/// Simulate the full project life.
///
/// `base_opex` holds base-year classified bucket costs; `rng_mmbtu_per_day`
/// and `biogas_flow_scfm` are the base-year production seeds.
pub fn simulate(
    assumptions: &FinancialAssumptions,
    total_capital_cost: Money,
    base_opex: &CostBuckets,
    biogas_flow_scfm: Decimal,
    rng_mmbtu_per_day: Decimal,
) -> Vec<ProFormaYear> {
    let life = assumptions.project_life_years;
    let mut years: Vec<ProFormaYear> = Vec::with_capacity(life as usize);

    let commissioning_year =
        assumptions.analysis_start_year + assumptions.construction_years as i32;
    let base_annual_mmbtu = rng_mmbtu_per_day * DAYS_PER_YEAR * assumptions.uptime;

    // Level annual debt payment, flat for every year inside the term.
    let annual_debt_payment = assumptions.debt.as_ref().map_or(Decimal::ZERO, |debt| {
        let principal = total_capital_cost * debt.loan_fraction;
        if principal > Decimal::ZERO {
            time_value::annuity_payment(principal, debt.interest_rate, debt.term_years)
        } else {
            Decimal::ZERO
        }
    });
    let debt_term = assumptions.debt.as_ref().map_or(0, |d| d.term_years);

    let itc_proceeds =
        total_capital_cost * assumptions.itc_rate * assumptions.itc_monetization;

    let mut cumulative = whole(-total_capital_cost);

    for year in 1..=life {
        let elapsed = year - 1;
        let inflation_mult = compound(assumptions.inflation_rate, elapsed);
        let growth_mult = compound(assumptions.production_growth, elapsed);

        let calendar_year = commissioning_year + elapsed as i32;
        let flow_scfm = biogas_flow_scfm * growth_mult;
        let annual_mmbtu = base_annual_mmbtu * growth_mult;

        // Revenue branches are mutually exclusive by construction.
        let (credit_revenue, gas_revenue) = match &assumptions.market {
            RevenueMarket::CreditMarket(pricing) => {
                let credits = annual_mmbtu * pricing.credits_per_mmbtu;
                let credit_price =
                    pricing.credit_price * compound(pricing.credit_price_escalator, elapsed);
                let gross = credits * credit_price;
                let credit_revenue = gross * (Decimal::ONE - pricing.brokerage_fee);

                let gas_price = pricing.gas_price * compound(pricing.gas_price_escalator, elapsed);
                let net_gas_price = (gas_price - pricing.wheeling_deduction).max(Decimal::ZERO);
                (credit_revenue, annual_mmbtu * net_gas_price)
            }
            RevenueMarket::VoluntaryMarket(pricing) => {
                let contract_price =
                    pricing.contract_gas_price * compound(pricing.gas_price_escalator, elapsed);
                let premium = pricing.green_premium * compound(pricing.premium_escalator, elapsed);
                let net_price =
                    (contract_price + premium - pricing.wheeling_deduction).max(Decimal::ZERO);
                (Decimal::ZERO, annual_mmbtu * net_price)
            }
        };

        let tax_credit_revenue = assumptions
            .emissions_credit
            .credit_for(calendar_year, annual_mmbtu);

        let credit_revenue = whole(credit_revenue);
        let gas_revenue = whole(gas_revenue);
        let tax_credit_revenue = whole(tax_credit_revenue);
        let total_revenue = credit_revenue + gas_revenue + tax_credit_revenue;

        // Utilities ride the electricity escalator; every other bucket and
        // the feedstock terms ride general inflation unless overridden.
        let electricity_mult = compound(assumptions.electricity_escalator, elapsed);
        let utilities_opex = whole(base_opex.utilities * electricity_mult);
        let labor_opex = whole(base_opex.labor * inflation_mult);
        let maintenance_opex = whole(base_opex.maintenance * inflation_mult);
        let chemicals_opex = whole(base_opex.chemicals * inflation_mult);
        let insurance_opex = whole(base_opex.insurance * inflation_mult);
        let other_opex = whole(base_opex.other * inflation_mult);

        let feedstock_opex = whole(
            assumptions
                .feedstock_costs
                .iter()
                .map(|cost| {
                    let escalator =
                        feedstock::effective_escalator(cost, assumptions.inflation_rate);
                    cost.tons_per_year * cost.cost_per_ton * compound(escalator, elapsed)
                })
                .sum::<Decimal>(),
        );

        let total_opex = utilities_opex
            + labor_opex
            + maintenance_opex
            + chemicals_opex
            + insurance_opex
            + other_opex
            + feedstock_opex;

        let ebitda = total_revenue - total_opex;

        let maintenance_capex = whole(
            total_capital_cost * assumptions.maintenance_capex_pct * inflation_mult,
        );

        let debt_service = if year <= debt_term {
            whole(annual_debt_payment)
        } else {
            Decimal::ZERO
        };

        let mut net_cash_flow = ebitda - maintenance_capex - debt_service;
        if year == 1 {
            net_cash_flow += whole(itc_proceeds);
        }

        cumulative += net_cash_flow;

        years.push(ProFormaYear {
            year,
            calendar_year,
            biogas_flow_scfm: whole(flow_scfm),
            rng_mmbtu: whole(annual_mmbtu),
            credit_revenue,
            gas_revenue,
            tax_credit_revenue,
            total_revenue,
            utilities_opex,
            labor_opex,
            maintenance_opex,
            chemicals_opex,
            insurance_opex,
            other_opex,
            feedstock_opex,
            total_opex,
            ebitda,
            maintenance_capex,
            debt_service,
            net_cash_flow,
            cumulative_cash_flow: cumulative,
        });
    }

    years
}
