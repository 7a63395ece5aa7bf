//! Economic assumptions for a pro-forma run.
//!
//! The engine trusts these values as supplied: rates are decimals
//! (0.05 = 5%), escalators may be negative, and no range re-validation
//! happens here. Exactly one revenue-market regime is active per run by
//! construction of the [`RevenueMarket`] sum type.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::feedstock::{self, Feedstock};
use crate::types::{Money, Rate};

/// Pricing for sales into the renewable-fuel credit market: production
/// generates credits sold at a brokered price, with the underlying
/// commodity gas sold separately at a hub-referenced price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditMarketPricing {
    /// Credit price at the analysis start ($/credit).
    pub credit_price: Money,
    /// Annual escalator on the credit price.
    pub credit_price_escalator: Rate,
    /// Credits generated per MMBtu delivered.
    pub credits_per_mmbtu: Decimal,
    /// Brokerage fee as a fraction of gross credit revenue.
    pub brokerage_fee: Rate,
    /// Commodity gas price at the analysis start ($/MMBtu).
    pub gas_price: Money,
    /// Annual escalator on the commodity gas price.
    pub gas_price_escalator: Rate,
    /// Wheeling / hub deduction ($/MMBtu) netted against gas sales.
    pub wheeling_deduction: Money,
}

/// Pricing for bilateral sales into the voluntary market: a contracted gas
/// price plus a green premium, net of the wheeling deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoluntaryMarketPricing {
    /// Contracted gas price at the analysis start ($/MMBtu).
    pub contract_gas_price: Money,
    /// Annual escalator on the contracted price.
    pub gas_price_escalator: Rate,
    /// Voluntary green premium at the analysis start ($/MMBtu).
    pub green_premium: Money,
    /// Annual escalator on the premium.
    pub premium_escalator: Rate,
    /// Wheeling / hub deduction ($/MMBtu) netted against sales.
    pub wheeling_deduction: Money,
}

impl CreditMarketPricing {
    /// Seed pricing for credit-market sales.
    pub fn seed() -> Self {
        CreditMarketPricing {
            credit_price: dec!(2.35),
            credit_price_escalator: dec!(0.01),
            credits_per_mmbtu: dec!(11.727),
            brokerage_fee: dec!(0.02),
            gas_price: dec!(3.50),
            gas_price_escalator: dec!(0.015),
            wheeling_deduction: dec!(0.35),
        }
    }
}

impl VoluntaryMarketPricing {
    /// Seed pricing for bilateral voluntary-market sales.
    pub fn seed() -> Self {
        VoluntaryMarketPricing {
            contract_gas_price: dec!(12.00),
            gas_price_escalator: dec!(0.02),
            green_premium: dec!(6.00),
            premium_escalator: dec!(0.02),
            wheeling_deduction: dec!(0.35),
        }
    }
}

/// Which revenue market the project sells into. The two regimes are
/// mutually exclusive; each variant carries only the pricing it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "market", rename_all = "snake_case")]
pub enum RevenueMarket {
    CreditMarket(CreditMarketPricing),
    VoluntaryMarket(VoluntaryMarketPricing),
}

/// Declining production tax credit tied to the gap between the project's
/// carbon-intensity score and a regulatory target, active through a sunset
/// year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsCreditProgram {
    pub enabled: bool,
    /// Project carbon-intensity score (volume-weighted across feedstocks).
    pub current_ci_score: Decimal,
    /// Regulatory target the gap is measured against.
    pub target_ci_score: Decimal,
    /// Credit value per gallon-equivalent of fuel.
    pub credit_price_per_gallon: Money,
    /// Gallon-equivalents per MMBtu delivered.
    pub gallons_per_mmbtu: Decimal,
    /// Fraction of the gross credit the project actually monetizes.
    pub monetization_fraction: Rate,
    /// Last calendar year the credit applies (inclusive).
    pub sunset_year: i32,
}

impl EmissionsCreditProgram {
    /// Credit dollars for one year's production, zero once the program is
    /// disabled or the calendar year is past sunset. The CI gap is floored
    /// at zero: scoring above the target earns nothing.
    pub fn credit_for(&self, calendar_year: i32, production_mmbtu: Decimal) -> Money {
        if !self.enabled || calendar_year > self.sunset_year || self.target_ci_score.is_zero() {
            return Decimal::ZERO;
        }
        let gap_fraction =
            ((self.target_ci_score - self.current_ci_score) / self.target_ci_score).max(Decimal::ZERO);
        gap_fraction
            * self.credit_price_per_gallon
            * self.gallons_per_mmbtu
            * self.monetization_fraction
            * production_mmbtu
    }
}

/// Per-feedstock annual cost driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedstockCost {
    pub name: String,
    pub cost_per_ton: Money,
    pub tons_per_year: Decimal,
    /// Overrides the general inflation rate when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalator: Option<Rate>,
}

/// Project debt sized as a fraction of total capital, amortized with level
/// annual payments over the term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtFinancing {
    pub loan_fraction: Rate,
    pub interest_rate: Rate,
    pub term_years: u32,
}

/// Flat economic configuration for one pro-forma run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    /// General inflation rate applied to non-utility opex and the
    /// maintenance-capex allowance.
    pub inflation_rate: Rate,
    /// Operating years simulated.
    pub project_life_years: u32,
    /// Construction years before operations begin.
    pub construction_years: u32,
    /// Calendar year the analysis starts; operating year 1 falls at
    /// `analysis_start_year + construction_years`.
    pub analysis_start_year: i32,
    /// Fraction of the year the plant is producing.
    pub uptime: Rate,
    /// Annual production growth applied to flow and energy output.
    pub production_growth: Rate,
    /// Escalator for the utility/energy opex bucket.
    pub electricity_escalator: Rate,
    /// Revenue market regime (mutually exclusive branches).
    #[serde(flatten)]
    pub market: RevenueMarket,
    /// Declining CI-gap production tax credit.
    pub emissions_credit: EmissionsCreditProgram,
    /// Investment tax credit rate on total capital cost.
    pub itc_rate: Rate,
    /// Fraction of the ITC actually monetized in year 1.
    pub itc_monetization: Rate,
    /// Annual maintenance capex as a fraction of total capital cost.
    pub maintenance_capex_pct: Rate,
    /// Discount rate for NPV.
    pub discount_rate: Rate,
    /// Per-feedstock cost drivers.
    #[serde(default)]
    pub feedstock_costs: Vec<FeedstockCost>,
    /// Debt financing; absent means all-equity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt: Option<DebtFinancing>,
}

impl Default for FinancialAssumptions {
    fn default() -> Self {
        FinancialAssumptions {
            inflation_rate: dec!(0.02),
            project_life_years: 20,
            construction_years: 2,
            analysis_start_year: chrono::Utc::now().year(),
            uptime: dec!(0.92),
            production_growth: Decimal::ZERO,
            electricity_escalator: dec!(0.025),
            market: RevenueMarket::CreditMarket(CreditMarketPricing::seed()),
            emissions_credit: EmissionsCreditProgram {
                enabled: true,
                current_ci_score: feedstock::DEFAULT_CARBON_INTENSITY,
                target_ci_score: dec!(50),
                credit_price_per_gallon: dec!(1.00),
                gallons_per_mmbtu: dec!(8.77),
                monetization_fraction: dec!(0.90),
                sunset_year: 2029,
            },
            itc_rate: dec!(0.30),
            itc_monetization: dec!(0.90),
            maintenance_capex_pct: dec!(0.015),
            discount_rate: dec!(0.08),
            feedstock_costs: Vec::new(),
            debt: None,
        }
    }
}

impl FinancialAssumptions {
    /// Defaults calibrated from the confirmed feedstock slate: cost drivers
    /// from the intake volumes and the blended carbon-intensity score wired
    /// into the emissions-credit program.
    pub fn seeded(feedstocks: &[Feedstock]) -> Self {
        let mut assumptions = FinancialAssumptions::default();
        assumptions.feedstock_costs = feedstock::default_cost_drivers(feedstocks);
        assumptions.emissions_credit.current_ci_score =
            feedstock::blended_carbon_intensity(feedstocks);
        assumptions
    }
}
