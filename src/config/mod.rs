//! Configuration loading for the HR administration engine.
//!
//! Settings live in a directory of YAML files: payroll amounts in
//! `payroll.yaml` and HTTP/logging settings in `server.yaml`.
//!
//! # Example
//!
//! ```no_run
//! use hr_admin::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", config.server().bind_address);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_DIR};
pub use types::{HrConfig, PayrollSettings, ServerSettings};
