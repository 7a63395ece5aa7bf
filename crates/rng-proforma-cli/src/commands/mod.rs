pub mod proforma;
pub mod time_value;
pub mod upstream;
