mod cache;
mod clock;
mod config;
mod error;
mod flood_monitoring;
mod outcome;
mod readings;
mod stations;
mod types;
mod upstream;
mod utils;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod test_support;

pub use error::{FetchError, FloodMonitoringError, ParseError};
pub use flood_monitoring::*;

pub use clock::*;
pub use config::*;
pub use outcome::*;

pub use cache::ttl_cache::TtlCache;
pub use upstream::Upstream;

pub use types::reading::Reading;
pub use types::station::*;

pub use stations::catalog::*;
pub use stations::filter::*;

pub use readings::error::ExportError;
pub use readings::export::*;
pub use readings::fetcher::*;
pub use readings::summary::*;
