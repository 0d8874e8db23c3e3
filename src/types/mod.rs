pub mod api;
pub mod reading;
pub mod station;
