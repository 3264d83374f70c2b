mod export;
mod metrics;
mod style;
mod watch;

pub use export::{run_export_css, run_export_png};
pub use metrics::run_metrics;
pub use style::run_style;
pub use watch::run_watch;
