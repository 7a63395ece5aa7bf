//! Reduction of the simulated year series into summary investment metrics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value;
use crate::types::{Money, Multiple, Rate};

use super::simulator::{whole, ProFormaYear};

/// Summary investment metrics, computed once after the full year sequence
/// exists. IRR and payback are nullable: a project that never breaks even
/// has neither, and that is an expected outcome rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub irr: Option<Rate>,
    /// NPV of the full cash-flow vector at the configured discount rate.
    pub npv: Money,
    /// Sum of positive net cash flows over total capital cost; zero when
    /// capital cost is non-positive so the result stays machine-consumable.
    pub moic: Multiple,
    /// First operating year whose cumulative cash flow is non-negative.
    pub payback_year: Option<u32>,
    pub total_revenue: Money,
    pub total_opex: Money,
    pub total_ebitda: Money,
    /// Initial capital plus all maintenance capex.
    pub total_capex: Money,
    pub itc_proceeds: Money,
    pub average_annual_ebitda: Money,
}

/// Build the cash-flow vector (year 0 = −capital outlay) and reduce the
/// series to [`FinancialMetrics`].
pub fn summarize(
    years: &[ProFormaYear],
    total_capital_cost: Money,
    discount_rate: Rate,
    itc_proceeds: Money,
    project_life_years: u32,
) -> FinancialMetrics {
    // Year 0 is rounded the same way the simulator seeds its cumulative
    // total, so the vector and the published series agree to the dollar.
    let mut cash_flows: Vec<Money> = Vec::with_capacity(years.len() + 1);
    cash_flows.push(whole(-total_capital_cost));
    cash_flows.extend(years.iter().map(|y| y.net_cash_flow));

    let irr = time_value::irr(&cash_flows);
    let npv = time_value::npv(discount_rate, &cash_flows);

    let positive_flows: Money = years
        .iter()
        .map(|y| y.net_cash_flow)
        .filter(|ncf| ncf.is_sign_positive())
        .sum();
    let moic = if total_capital_cost > Decimal::ZERO {
        positive_flows / total_capital_cost
    } else {
        Decimal::ZERO
    };

    let payback_year = years
        .iter()
        .find(|y| y.cumulative_cash_flow >= Decimal::ZERO)
        .map(|y| y.year);

    let total_revenue: Money = years.iter().map(|y| y.total_revenue).sum();
    let total_opex: Money = years.iter().map(|y| y.total_opex).sum();
    let total_ebitda: Money = years.iter().map(|y| y.ebitda).sum();
    let maintenance_capex: Money = years.iter().map(|y| y.maintenance_capex).sum();

    let average_annual_ebitda = if project_life_years > 0 {
        total_ebitda / Decimal::from(project_life_years)
    } else {
        Decimal::ZERO
    };

    FinancialMetrics {
        irr,
        npv,
        moic,
        payback_year,
        total_revenue,
        total_opex,
        total_ebitda,
        total_capex: total_capital_cost + maintenance_capex,
        itc_proceeds,
        average_annual_ebitda,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Minimal year record: only the fields metrics reads are meaningful.
    fn year(n: u32, net_cash_flow: Decimal, cumulative: Decimal) -> ProFormaYear {
        ProFormaYear {
            year: n,
            calendar_year: 2026 + n as i32,
            biogas_flow_scfm: Decimal::ZERO,
            rng_mmbtu: Decimal::ZERO,
            credit_revenue: Decimal::ZERO,
            gas_revenue: Decimal::ZERO,
            tax_credit_revenue: Decimal::ZERO,
            total_revenue: net_cash_flow,
            utilities_opex: Decimal::ZERO,
            labor_opex: Decimal::ZERO,
            maintenance_opex: Decimal::ZERO,
            chemicals_opex: Decimal::ZERO,
            insurance_opex: Decimal::ZERO,
            other_opex: Decimal::ZERO,
            feedstock_opex: Decimal::ZERO,
            total_opex: Decimal::ZERO,
            ebitda: net_cash_flow,
            maintenance_capex: Decimal::ZERO,
            debt_service: Decimal::ZERO,
            net_cash_flow,
            cumulative_cash_flow: cumulative,
        }
    }

    fn flat_years(outlay: Decimal, ncf: Decimal, n: u32) -> Vec<ProFormaYear> {
        let mut cumulative = -outlay;
        (1..=n)
            .map(|y| {
                cumulative += ncf;
                year(y, ncf, cumulative)
            })
            .collect()
    }

    #[test]
    fn test_payback_exact_boundary() {
        // Outlay 1000, flat 200/yr: cumulative hits exactly 0 at year 5.
        let years = flat_years(dec!(1000), dec!(200), 10);
        let metrics = summarize(&years, dec!(1000), dec!(0.08), Decimal::ZERO, 10);
        assert_eq!(metrics.payback_year, Some(5));
    }

    #[test]
    fn test_payback_none_when_never_recovered() {
        let years = flat_years(dec!(10_000), dec!(200), 10);
        let metrics = summarize(&years, dec!(10_000), dec!(0.08), Decimal::ZERO, 10);
        assert_eq!(metrics.payback_year, None);
        assert_eq!(metrics.irr, None, "monotonic cash flow has no IRR root");
    }

    #[test]
    fn test_zero_capital_moic_is_zero() {
        let years = flat_years(Decimal::ZERO, dec!(500), 5);
        let metrics = summarize(&years, Decimal::ZERO, dec!(0.08), Decimal::ZERO, 5);
        assert_eq!(metrics.moic, Decimal::ZERO);
        assert_eq!(metrics.payback_year, Some(1));
    }

    #[test]
    fn test_moic_counts_positive_flows_only() {
        let mut years = flat_years(dec!(1000), dec!(400), 4);
        years[2].net_cash_flow = dec!(-100);
        let metrics = summarize(&years, dec!(1000), dec!(0.08), Decimal::ZERO, 4);
        // 400 + 400 + 400 = 1200 positive; the -100 year is excluded.
        assert_eq!(metrics.moic, dec!(1.2));
    }

    #[test]
    fn test_end_to_end_flat_project() {
        // 10M outlay, 1.5M/yr for 10 years: payback in year 7.
        let years = flat_years(dec!(10_000_000), dec!(1_500_000), 10);
        let metrics = summarize(&years, dec!(10_000_000), dec!(0.08), Decimal::ZERO, 10);
        assert_eq!(metrics.payback_year, Some(7));

        let irr = metrics.irr.expect("flat profitable project has an IRR");
        let mut flows = vec![dec!(-10_000_000)];
        flows.extend(std::iter::repeat(dec!(1_500_000)).take(10));
        assert!(time_value::npv(irr, &flows).abs() < time_value::CONVERGENCE_THRESHOLD);
        assert_eq!(metrics.moic, dec!(1.5));
    }

    #[test]
    fn test_totals_and_average() {
        let years = flat_years(dec!(1000), dec!(300), 4);
        let metrics = summarize(&years, dec!(1000), dec!(0.08), dec!(270), 4);
        assert_eq!(metrics.total_ebitda, dec!(1200));
        assert_eq!(metrics.average_annual_ebitda, dec!(300));
        assert_eq!(metrics.itc_proceeds, dec!(270));
        assert_eq!(metrics.total_capex, dec!(1000));
    }

    #[test]
    fn test_zero_life_average_guarded() {
        let metrics = summarize(&[], dec!(1000), dec!(0.08), Decimal::ZERO, 0);
        assert_eq!(metrics.average_annual_ebitda, Decimal::ZERO);
        assert_eq!(metrics.irr, None);
    }
}
