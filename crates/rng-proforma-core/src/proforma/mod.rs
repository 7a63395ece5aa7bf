pub mod engine;
pub mod metrics;
pub mod simulator;

pub use engine::{run_pro_forma, ProFormaInput, ProFormaOutput, SimulationBasis};
pub use metrics::FinancialMetrics;
pub use simulator::ProFormaYear;
