//! Persistence for the HR administration engine.
//!
//! Services talk to the store through the repository traits in this module.
//! [`MemoryStore`] implements all of them with per-call transactional
//! semantics, and [`Seed`] bootstraps it from YAML.

mod memory;
mod repository;
mod seed;

pub use memory::MemoryStore;
pub use repository::{
    AttendanceRepository, DirectoryRepository, IdentityRepository, LeaveRepository,
    PayslipRepository, UpsertOutcome,
};
pub use seed::{
    Seed, SeedAccount, SeedAttendance, SeedDepartment, SeedEmployee, SeedPosition, SeedSummary,
};
