pub mod bulk;
pub mod config;
pub mod duration;
pub mod estimate;

pub use bulk::{bulk_rise_window, BulkRiseWindow};
pub use config::EstimatorConfig;
pub use duration::{
    format_countdown, format_duration, format_elapsed, minutes_between, parse_timestamp,
};
pub use estimate::{estimate_bulk_rise, estimate_bulk_rise_minutes, BulkEstimate, EstimateBasis};
