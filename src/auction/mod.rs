pub mod bids;
pub mod model;
