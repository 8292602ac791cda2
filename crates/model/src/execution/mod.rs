pub mod errors;
pub mod spec;
