//! Invigilation duty allocation: weighted round robin of staff over every
//! (exam slot, room) pair, with a rotation cursor shared across slots.

pub mod engine;
pub mod router;
pub mod service;

pub use engine::{plan_duties, rotation_order, DutyPlan};
pub use router::duty_router;
pub use service::{DutyAllocationError, DutyAllocationService};
