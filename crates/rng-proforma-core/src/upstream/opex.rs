//! Operating-cost line items and their classification into canonical
//! buckets.
//!
//! Classification is a keyword cascade over free text, expressed as an
//! ordered rule table so the policy can be read, tested, and extended
//! without touching control flow. The category field always takes priority
//! over the description field; anything unmatched lands in Other. Every
//! dollar of input cost is assigned to exactly one bucket.

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Canonical operating-cost buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBucket {
    Utilities,
    Labor,
    Maintenance,
    Chemicals,
    Insurance,
    Other,
}

/// Ordered keyword → bucket rules, evaluated top to bottom.
const CLASSIFICATION_RULES: &[(&str, CostBucket)] = &[
    ("utilit", CostBucket::Utilities),
    ("energy", CostBucket::Utilities),
    ("electric", CostBucket::Utilities),
    ("power", CostBucket::Utilities),
    ("labor", CostBucket::Labor),
    ("staff", CostBucket::Labor),
    ("personnel", CostBucket::Labor),
    ("management", CostBucket::Labor),
    ("mainten", CostBucket::Maintenance),
    ("repair", CostBucket::Maintenance),
    ("r&m", CostBucket::Maintenance),
    ("consumab", CostBucket::Maintenance),
    ("chemical", CostBucket::Chemicals),
    ("reagent", CostBucket::Chemicals),
    ("insurance", CostBucket::Insurance),
];

/// One annual operating-cost line as reported upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpexLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub annual_cost: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpexSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_annual_opex: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_annual_opex: Option<Money>,
}

/// Operating-cost results as delivered by the upstream opex generator. The
/// summary totals are pass-through diagnostics only; the simulation works
/// from the classified line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpexResults {
    #[serde(default)]
    pub line_items: Vec<OpexLineItem>,
    #[serde(default)]
    pub summary: OpexSummary,
}

/// Base-year annual cost per canonical bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBuckets {
    pub utilities: Money,
    pub labor: Money,
    pub maintenance: Money,
    pub chemicals: Money,
    pub insurance: Money,
    pub other: Money,
}

impl CostBuckets {
    pub fn total(&self) -> Money {
        self.utilities + self.labor + self.maintenance + self.chemicals + self.insurance
            + self.other
    }

    fn slot(&mut self, bucket: CostBucket) -> &mut Money {
        match bucket {
            CostBucket::Utilities => &mut self.utilities,
            CostBucket::Labor => &mut self.labor,
            CostBucket::Maintenance => &mut self.maintenance,
            CostBucket::Chemicals => &mut self.chemicals,
            CostBucket::Insurance => &mut self.insurance,
            CostBucket::Other => &mut self.other,
        }
    }
}

/// Classify one line item: category keywords first, then description
/// keywords, else Other.
pub fn classify_line_item(item: &OpexLineItem) -> CostBucket {
    match_rules(item.category.as_deref())
        .or_else(|| match_rules(item.description.as_deref()))
        .unwrap_or(CostBucket::Other)
}

/// Partition a line-item list into bucket totals. The sum of the buckets
/// equals the sum of the inputs exactly.
pub fn classify_opex(items: &[OpexLineItem]) -> CostBuckets {
    let mut buckets = CostBuckets::default();
    for item in items {
        *buckets.slot(classify_line_item(item)) += item.annual_cost;
    }
    buckets
}

fn match_rules(text: Option<&str>) -> Option<CostBucket> {
    let text = text?.to_lowercase();
    if text.is_empty() {
        return None;
    }
    CLASSIFICATION_RULES
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, bucket)| *bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(category: Option<&str>, description: Option<&str>, cost: Decimal) -> OpexLineItem {
        OpexLineItem {
            category: category.map(String::from),
            description: description.map(String::from),
            annual_cost: cost,
        }
    }

    #[test]
    fn test_category_keywords() {
        assert_eq!(
            classify_line_item(&item(Some("Utilities"), None, dec!(1))),
            CostBucket::Utilities
        );
        assert_eq!(
            classify_line_item(&item(Some("Plant Staffing"), None, dec!(1))),
            CostBucket::Labor
        );
        assert_eq!(
            classify_line_item(&item(Some("R&M"), None, dec!(1))),
            CostBucket::Maintenance
        );
        assert_eq!(
            classify_line_item(&item(Some("Chemicals & Reagents"), None, dec!(1))),
            CostBucket::Chemicals
        );
        assert_eq!(
            classify_line_item(&item(Some("Insurance"), None, dec!(1))),
            CostBucket::Insurance
        );
    }

    #[test]
    fn test_description_fallback() {
        let line = item(Some("Misc"), Some("electricity for blowers"), dec!(1));
        assert_eq!(classify_line_item(&line), CostBucket::Utilities);
    }

    #[test]
    fn test_category_takes_priority_over_description() {
        // Category says labor, description mentions power: category wins.
        let line = item(Some("Labor"), Some("power plant operators"), dec!(1));
        assert_eq!(classify_line_item(&line), CostBucket::Labor);
    }

    #[test]
    fn test_unmatched_goes_to_other() {
        let line = item(Some("Permits"), Some("annual air permit fees"), dec!(1));
        assert_eq!(classify_line_item(&line), CostBucket::Other);
    }

    #[test]
    fn test_missing_text_goes_to_other() {
        assert_eq!(classify_line_item(&item(None, None, dec!(1))), CostBucket::Other);
    }

    #[test]
    fn test_bucket_conservation() {
        let items = vec![
            item(Some("Utilities"), None, dec!(120_000.55)),
            item(Some("Labor"), None, dec!(340_000)),
            item(None, Some("membrane repair"), dec!(85_500.45)),
            item(Some("Chemicals"), None, dec!(42_000)),
            item(Some("Insurance"), None, dec!(30_000)),
            item(Some("Misc"), Some("odor control media"), dec!(18_000)),
        ];
        let buckets = classify_opex(&items);
        let input_total: Decimal = items.iter().map(|i| i.annual_cost).sum();
        assert_eq!(buckets.total(), input_total);
    }
}
