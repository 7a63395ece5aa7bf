use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rng_proforma_core::feedstock::{self, Feedstock};
use rng_proforma_core::upstream::{mass_balance, opex, MassBalanceResults, ValueSource};

// ===========================================================================
// Extraction: fallback chain order over the wire format
// ===========================================================================

#[test]
fn test_summary_beats_stage_streams() {
    let mb: MassBalanceResults = serde_json::from_value(serde_json::json!({
        "summary": {
            "biogas_flow_scfm": { "value": "1,850" }
        },
        "stages": [{
            "name": "digester",
            "outputs": {
                "biogas_flow": { "value": 999_999, "unit": "scf/day" }
            }
        }]
    }))
    .unwrap();

    let extracted = mass_balance::biogas_flow_scfm(Some(&mb));
    assert_eq!(extracted.value, dec!(1850));
    assert_eq!(extracted.source, ValueSource::Summary);
}

#[test]
fn test_stage_stream_fallback_normalizes_per_day_units() {
    let mb: MassBalanceResults = serde_json::from_value(serde_json::json!({
        "summary": {
            "digester_temperature": { "value": 98.5, "unit": "F" }
        },
        "stages": [{
            "name": "upgrading skid",
            "outputs": {
                "biogas_flow_rate": { "value": 720_000, "unit": "scf/day" }
            }
        }]
    }))
    .unwrap();

    let extracted = mass_balance::biogas_flow_scfm(Some(&mb));
    assert_eq!(extracted.value, dec!(500));
    assert_eq!(extracted.source, ValueSource::StageStream);
}

#[test]
fn test_unrelated_keys_are_ignored() {
    let mb: MassBalanceResults = serde_json::from_value(serde_json::json!({
        "summary": {
            "effluent_flow_gpm": { "value": 250 },
            "biogas_methane_pct": { "value": 62 }
        }
    }))
    .unwrap();

    // "biogas_methane_pct" has the domain keyword but no flow indicator.
    let extracted = mass_balance::biogas_flow_scfm(Some(&mb));
    assert_eq!(extracted.source, ValueSource::Default);
}

#[test]
fn test_rng_estimate_uses_extracted_flow() {
    let mb: MassBalanceResults = serde_json::from_value(serde_json::json!({
        "summary": {
            "biogas_flow": { "value": 1000, "unit": "scfm" }
        }
    }))
    .unwrap();

    let flow = mass_balance::biogas_flow_scfm(Some(&mb));
    let production = mass_balance::rng_production_mmbtu_per_day(Some(&mb), flow.value);
    // 1000 * 1440 * 600 * 0.97 * 0.98 / 1e6 = 821.3952
    assert_eq!(production.value, dec!(821.3952));
    assert_eq!(production.source, ValueSource::Estimated);
}

// ===========================================================================
// Classification: conservation across a realistic line-item mix
// ===========================================================================

#[test]
fn test_every_dollar_lands_in_exactly_one_bucket() {
    let opex_results: opex::OpexResults = serde_json::from_value(serde_json::json!({
        "line_items": [
            { "category": "Utilities", "description": "grid power", "annual_cost": 410_000 },
            { "category": "Plant Labor", "annual_cost": 680_000 },
            { "category": "", "description": "membrane replacement & repairs", "annual_cost": 150_000 },
            { "description": "polymer and reagents", "annual_cost": 96_000 },
            { "category": "Insurance", "annual_cost": 54_000 },
            { "category": "Permits & fees", "annual_cost": 22_500 },
            { "annual_cost": 10_000 }
        ],
        "summary": { "total_annual_opex": 1_422_500 }
    }))
    .unwrap();

    let buckets = opex::classify_opex(&opex_results.line_items);
    assert_eq!(buckets.utilities, dec!(410_000));
    assert_eq!(buckets.labor, dec!(680_000));
    assert_eq!(buckets.maintenance, dec!(150_000));
    assert_eq!(buckets.chemicals, dec!(96_000));
    assert_eq!(buckets.insurance, dec!(54_000));
    assert_eq!(buckets.other, dec!(32_500));

    let input_total: Decimal = opex_results
        .line_items
        .iter()
        .map(|i| i.annual_cost)
        .sum();
    assert_eq!(buckets.total(), input_total);
}

// ===========================================================================
// Feedstock economics: unit grid and blending
// ===========================================================================

#[test]
fn test_annual_tons_grid() {
    assert_eq!(feedstock::annual_tons(dec!(40), "tons/day"), dec!(14_600));
    assert_eq!(feedstock::annual_tons(dec!(40), "tons/week"), dec!(2_080));
    assert_eq!(feedstock::annual_tons(dec!(40), "tons/month"), dec!(480));
    assert_eq!(feedstock::annual_tons(dec!(40), "tons/year"), dec!(40));
    // 5,000 gal/day * 8.34 / 2000 lb/ton * 365
    assert_eq!(feedstock::annual_tons(dec!(5_000), "gal/day"), dec!(7_610.25));
    assert_eq!(feedstock::annual_tons(dec!(40), "truckloads"), dec!(40));
}

#[test]
fn test_blended_ci_mixed_slate() {
    let slate = vec![
        Feedstock {
            feedstock_type: "Dairy Manure".to_string(),
            volume: dec!(60),
            unit: "tons/day".to_string(),
        },
        Feedstock {
            feedstock_type: "Municipal Sludge".to_string(),
            volume: dec!(30),
            unit: "tons/day".to_string(),
        },
        Feedstock {
            feedstock_type: "mystery substrate".to_string(),
            volume: dec!(10),
            unit: "tons/day".to_string(),
        },
    ];
    // (10*60 + 30*30 + 25*10) / 100 = 17.5
    assert_eq!(feedstock::blended_carbon_intensity(&slate), dec!(17.5));
}
