//! Configuration types.
//!
//! These structures are deserialized from the YAML files in the
//! configuration directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed monthly amounts applied to every payslip of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSettings {
    /// Flat allowance added to every payslip.
    #[serde(default = "PayrollSettings::default_allowance")]
    pub allowance: Decimal,
    /// Flat deduction subtracted from every payslip.
    #[serde(default = "PayrollSettings::default_deduction")]
    pub deduction: Decimal,
}

impl PayrollSettings {
    fn default_allowance() -> Decimal {
        Decimal::from(1_000_000)
    }

    fn default_deduction() -> Decimal {
        Decimal::from(1_050_000)
    }
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            allowance: Self::default_allowance(),
            deduction: Self::default_deduction(),
        }
    }
}

/// HTTP server and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Socket address the API listens on.
    #[serde(default = "ServerSettings::default_bind_address")]
    pub bind_address: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "ServerSettings::default_log_filter")]
    pub log_filter: String,
}

impl ServerSettings {
    fn default_bind_address() -> String {
        "127.0.0.1:8080".to_string()
    }

    fn default_log_filter() -> String {
        "hr_admin=info".to_string()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            log_filter: Self::default_log_filter(),
        }
    }
}

/// The complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HrConfig {
    pub payroll: PayrollSettings,
    pub server: ServerSettings,
}
