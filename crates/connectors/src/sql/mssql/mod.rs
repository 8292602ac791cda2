pub mod params;
pub mod query;
pub mod utils;
pub mod writer;
