// ─── Launch Configuration ───

mod classpath;
mod config;

pub use classpath::{build_classpath, classpath_separator};
pub use config::{build_launch_config, LaunchConfig, PlayerIdentity, RuntimeOptions};
