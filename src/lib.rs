//! HR administration engine.
//!
//! This crate manages an organization's employees, departments and
//! positions, records daily attendance, runs the leave approval workflow
//! under role-based access control, and computes monthly payslips from
//! position salaries prorated by attendance.
//!
//! The pieces are plain services over repository traits ([`store`]), so
//! they can be driven from the HTTP API ([`api`]) or directly:
//!
//! ```
//! use std::sync::Arc;
//! use hr_admin::config::PayrollSettings;
//! use hr_admin::payroll::PayrollEngine;
//! use hr_admin::store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let engine = PayrollEngine::new(store.clone(), store.clone(), store, PayrollSettings::default());
//! let report = engine.run_monthly_payroll(4, 2024).unwrap();
//! assert_eq!(report.standard_working_days, 25);
//! ```

pub mod access;
pub mod api;
pub mod attendance;
pub mod config;
pub mod directory;
pub mod error;
pub mod leave;
pub mod models;
pub mod payroll;
pub mod store;
