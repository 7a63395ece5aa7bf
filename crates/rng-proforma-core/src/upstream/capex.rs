use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Capital-cost results as delivered by the upstream capex generator. The
/// engine reads only the summary total; line-item detail stays upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapexResults {
    #[serde(default)]
    pub summary: CapexSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapexSummary {
    #[serde(default)]
    pub total_project_cost: Money,
}

impl CapexResults {
    pub fn total_project_cost(&self) -> Money {
        self.summary.total_project_cost
    }
}

impl From<Money> for CapexResults {
    fn from(total: Money) -> Self {
        CapexResults {
            summary: CapexSummary {
                total_project_cost: total,
            },
        }
    }
}
