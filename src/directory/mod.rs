//! The organizational directory: departments, positions and employees.
//!
//! Every write is authorized through [`crate::access`]. Employees are
//! created together with an argon2-hashed login credential.

mod password;
mod service;

pub use password::{hash_password, verify_password};
pub use service::DirectoryService;
