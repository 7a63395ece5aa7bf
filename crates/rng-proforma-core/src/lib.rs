pub mod assumptions;
pub mod error;
pub mod feedstock;
pub mod proforma;
pub mod time_value;
pub mod types;
pub mod upstream;

pub use error::ProFormaError;
pub use types::*;

/// Standard result type for fallible framing operations (deserialization,
/// host-boundary parsing). The engine itself is total; see
/// [`proforma::run_pro_forma`].
pub type ProFormaResult<T> = Result<T, ProFormaError>;
