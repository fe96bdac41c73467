//! Nagios-style check that finds integer columns close to overflowing
//! their MySQL data type.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod plugin;
pub mod progress;
pub mod report;
pub mod scan;

pub use config::{AppConfig, ThresholdConfig};
pub use error::{Error, Result};
pub use plugin::{run_check, CheckOutcome};
pub use progress::{LogObserver, ScanObserver, SilentObserver};
pub use report::Status;
pub use scan::ScanCoordinator;
