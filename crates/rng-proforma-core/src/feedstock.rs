//! Feedstock economics: unit normalization to annual tons and blended
//! carbon-intensity scoring used to seed default assumptions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::FeedstockCost;
use crate::types::Rate;

const LB_PER_GALLON: Decimal = dec!(8.34);
const LB_PER_TON: Decimal = dec!(2000);

/// Carbon-intensity score when no feedstock type matches the lookup table,
/// and when no feedstock volume is supplied at all.
pub const DEFAULT_CARBON_INTENSITY: Decimal = dec!(25);

/// Per-feedstock-type carbon-intensity scores (kg CO2e per MMBtu scale).
/// Manure-based feedstocks score lowest; purpose-grown crops highest.
const CARBON_INTENSITY_SCORES: &[(&str, Decimal)] = &[
    ("dairy manure", dec!(10)),
    ("swine manure", dec!(14)),
    ("poultry litter", dec!(18)),
    ("food waste", dec!(20)),
    ("fats oils and grease", dec!(22)),
    ("wastewater sludge", dec!(28)),
    ("municipal sludge", dec!(30)),
    ("crop residue", dec!(35)),
    ("energy crops", dec!(38)),
];

/// One feedstock entry from the confirmed intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedstock {
    pub feedstock_type: String,
    pub volume: Decimal,
    pub unit: String,
}

/// Normalize a feedstock volume to annual tons.
///
/// Ton units are annualized by the period the unit implies (day ×365,
/// week ×52, month ×12, otherwise ×1). Gallon units convert by density
/// first (8.34 lb/gal, 2000 lb/ton), then the same period factor applies.
/// Any other unit passes through unconverted.
pub fn annual_tons(volume: Decimal, unit: &str) -> Decimal {
    let unit = unit.to_lowercase();
    let per_year = periods_per_year(&unit);

    if unit.contains("ton") {
        volume * per_year
    } else if unit.contains("gal") {
        volume * LB_PER_GALLON / LB_PER_TON * per_year
    } else {
        volume
    }
}

fn periods_per_year(unit: &str) -> Decimal {
    if unit.contains("day") {
        dec!(365)
    } else if unit.contains("week") {
        dec!(52)
    } else if unit.contains("month") {
        dec!(12)
    } else {
        Decimal::ONE
    }
}

/// Default per-feedstock cost drivers: annualized tonnage, zero seed
/// cost-per-ton, escalator left to the general inflation rate.
pub fn default_cost_drivers(feedstocks: &[Feedstock]) -> Vec<FeedstockCost> {
    feedstocks
        .iter()
        .map(|f| FeedstockCost {
            name: f.feedstock_type.clone(),
            cost_per_ton: Decimal::ZERO,
            tons_per_year: annual_tons(f.volume, &f.unit),
            escalator: None,
        })
        .collect()
}

/// Carbon-intensity score for a single feedstock name.
///
/// The lookup is case-insensitive and substring-matched in both directions,
/// so "Dairy Manure - Flush" hits "dairy manure" and the bare "manure"
/// doesn't miss entirely.
// TODO: tighten to whole-name matching once the intake form constrains
// feedstock type names to a fixed vocabulary; short names can currently
// match table keys by accident.
pub fn carbon_intensity_score(feedstock_type: &str) -> Decimal {
    let name = feedstock_type.to_lowercase();
    if name.is_empty() {
        return DEFAULT_CARBON_INTENSITY;
    }
    for (key, score) in CARBON_INTENSITY_SCORES {
        if name.contains(key) || key.contains(name.as_str()) {
            return *score;
        }
    }
    DEFAULT_CARBON_INTENSITY
}

/// Volume-weighted blended carbon-intensity score across all feedstocks.
/// Weights are the raw input volumes, not annualized tons. Zero total
/// weight yields the default score.
pub fn blended_carbon_intensity(feedstocks: &[Feedstock]) -> Decimal {
    let total_weight: Decimal = feedstocks.iter().map(|f| f.volume).sum();
    if total_weight.is_zero() {
        return DEFAULT_CARBON_INTENSITY;
    }

    let weighted: Decimal = feedstocks
        .iter()
        .map(|f| carbon_intensity_score(&f.feedstock_type) * f.volume)
        .sum();

    weighted / total_weight
}

/// Escalator applied to a feedstock cost entry: its own when configured,
/// the general inflation rate otherwise.
pub fn effective_escalator(cost: &FeedstockCost, inflation_rate: Rate) -> Rate {
    cost.escalator.unwrap_or(inflation_rate)
}
