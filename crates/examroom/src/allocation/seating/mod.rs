//! Exam seating allocation: section-preserving bin packing of examinees
//! into rooms ordered by descending capacity.

pub mod engine;
pub mod router;
pub mod service;

pub use engine::{plan_seating, SeatingPlan};
pub use router::{seating_router, SeatAllocationRequest, SeatingChartQuery};
pub use service::{SeatAllocationError, SeatAllocationService};
