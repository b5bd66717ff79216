pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;
pub mod settings;

pub use constants::*;
pub use filename::{group_output_path, monthly_artifact_filename, FirstToken, GroupKeyStrategy};
pub use logging::init_tracing;
pub use progress::ProgressReporter;
pub use settings::Settings;
