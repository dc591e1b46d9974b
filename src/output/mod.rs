//! Console output utilities.

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{print_banner, print_config_summary, print_error, print_info, print_warning};
pub use progress::create_download_bar;
pub use stats::print_sync_summary;
