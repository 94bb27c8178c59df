mod commands;
pub mod http_client;
mod location;

pub use commands::{OutputArgs, ReportArgs, ServerArgs};
pub use location::{run_devices, run_history, run_latest, run_report};
