//! Loosely-typed mass-balance results and the typed extractors over them.
//!
//! The upstream mass-balance generator reports a semi-structured bag of
//! named quantities. Rather than string-matching ad hoc at the point of
//! use, each physical quantity the engine needs is pulled out by an
//! extraction function with an explicit, ordered fallback chain:
//! summary map → process-stage output streams → fixed default / closed-form
//! estimate. The strategy that produced the value is reported alongside it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed conservative default when no biogas flow field is present (scfm).
pub const DEFAULT_BIOGAS_FLOW_SCFM: Decimal = dec!(300);

const MINUTES_PER_DAY: Decimal = dec!(1440);
const DAYS_PER_YEAR: Decimal = dec!(365);
const BIOGAS_HEAT_CONTENT_BTU_PER_SCF: Decimal = dec!(600);
const METHANE_RECOVERY_FRACTION: Decimal = dec!(0.97);
const CAPTURE_EFFICIENCY: Decimal = dec!(0.98);
const BTU_PER_MMBTU: Decimal = dec!(1_000_000);

/// A named quantity as reported upstream: a value that may arrive as a JSON
/// number or a formatted string, plus an optional unit label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityField {
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// One process stage with its named input/output streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStage {
    pub name: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, QuantityField>,
    #[serde(default)]
    pub outputs: BTreeMap<String, QuantityField>,
}

/// Mass-balance results as delivered by the upstream generator. Only the
/// biogas-flow and RNG-production related keys are read here; everything
/// else is ignored.
///
/// Maps are `BTreeMap` so key scans are order-stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MassBalanceResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BTreeMap<String, QuantityField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<ProcessStage>>,
}

/// Which strategy in an extractor's fallback chain produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Matched a field in the flat summary map.
    Summary,
    /// Matched a field in a process stage's output streams.
    StageStream,
    /// Derived from another extracted quantity by a closed-form estimate.
    Estimated,
    /// No usable field found; fixed conservative default.
    Default,
}

/// An extracted quantity together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extracted {
    pub value: Decimal,
    pub source: ValueSource,
}

/// Best-available biogas flow rate in scfm.
///
/// Search order: summary key containing "biogas" and a flow indicator
/// ("flow" or "scfm"), then equivalently-named stage output streams, then
/// the fixed 300 scfm default. Per-day units are normalized to per-minute.
pub fn biogas_flow_scfm(mass_balance: Option<&MassBalanceResults>) -> Extracted {
    let matcher = |key: &str| {
        let k = key.to_lowercase();
        k.contains("biogas") && (k.contains("flow") || k.contains("scfm"))
    };

    if let Some(mb) = mass_balance {
        if let Some(value) = scan_summary(mb, &matcher, normalize_flow_rate) {
            return Extracted {
                value,
                source: ValueSource::Summary,
            };
        }
        if let Some(value) = scan_stage_outputs(mb, &matcher, normalize_flow_rate) {
            return Extracted {
                value,
                source: ValueSource::StageStream,
            };
        }
    }

    Extracted {
        value: DEFAULT_BIOGAS_FLOW_SCFM,
        source: ValueSource::Default,
    }
}

/// Best-available RNG energy production rate in MMBtu/day.
///
/// Search order: summary then stage keys containing "rng" and an energy
/// indicator ("mmbtu", "production", or "energy"); per-year units are
/// normalized to per-day. Falls back to a closed-form estimate from the
/// biogas flow: flow × 1440 min/day × 600 Btu/scf × 0.97 methane recovery
/// × 0.98 capture efficiency, expressed in MMBtu.
pub fn rng_production_mmbtu_per_day(
    mass_balance: Option<&MassBalanceResults>,
    biogas_flow_scfm: Decimal,
) -> Extracted {
    let matcher = |key: &str| {
        let k = key.to_lowercase();
        k.contains("rng") && (k.contains("mmbtu") || k.contains("production") || k.contains("energy"))
    };

    if let Some(mb) = mass_balance {
        if let Some(value) = scan_summary(mb, &matcher, normalize_energy_rate) {
            return Extracted {
                value,
                source: ValueSource::Summary,
            };
        }
        if let Some(value) = scan_stage_outputs(mb, &matcher, normalize_energy_rate) {
            return Extracted {
                value,
                source: ValueSource::StageStream,
            };
        }
    }

    let estimate = biogas_flow_scfm
        * MINUTES_PER_DAY
        * BIOGAS_HEAT_CONTENT_BTU_PER_SCF
        * METHANE_RECOVERY_FRACTION
        * CAPTURE_EFFICIENCY
        / BTU_PER_MMBTU;

    Extracted {
        value: estimate,
        source: ValueSource::Estimated,
    }
}

fn scan_summary(
    mb: &MassBalanceResults,
    matcher: &dyn Fn(&str) -> bool,
    normalize: fn(Decimal, Option<&str>) -> Decimal,
) -> Option<Decimal> {
    let summary = mb.summary.as_ref()?;
    for (key, field) in summary {
        if !matcher(key) {
            continue;
        }
        if let Some(value) = parse_quantity(&field.value) {
            return Some(normalize(value, field.unit.as_deref()));
        }
        // Unparseable value: treat as absent and keep scanning.
    }
    None
}

fn scan_stage_outputs(
    mb: &MassBalanceResults,
    matcher: &dyn Fn(&str) -> bool,
    normalize: fn(Decimal, Option<&str>) -> Decimal,
) -> Option<Decimal> {
    let stages = mb.stages.as_ref()?;
    for stage in stages {
        for (key, field) in &stage.outputs {
            if !matcher(key) {
                continue;
            }
            if let Some(value) = parse_quantity(&field.value) {
                return Some(normalize(value, field.unit.as_deref()));
            }
        }
    }
    None
}

fn normalize_flow_rate(value: Decimal, unit: Option<&str>) -> Decimal {
    match unit {
        Some(u) if u.to_lowercase().contains("day") => value / MINUTES_PER_DAY,
        _ => value,
    }
}

fn normalize_energy_rate(value: Decimal, unit: Option<&str>) -> Decimal {
    match unit {
        Some(u) if u.to_lowercase().contains("year") || u.to_lowercase().contains("/yr") => {
            value / DAYS_PER_YEAR
        }
        _ => value,
    }
}

/// Parse an upstream quantity that may arrive as a JSON number or a
/// human-formatted string ("12,500.5"). Failures mean "field not found".
pub fn parse_quantity(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
        serde_json::Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<Decimal>().ok()
            }
        }
        _ => None,
    }
}
