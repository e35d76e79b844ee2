pub mod geo;
pub mod reports;
pub mod tour_service;

pub use tour_service::*;
