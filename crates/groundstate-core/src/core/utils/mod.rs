pub mod elements;
pub mod units;
