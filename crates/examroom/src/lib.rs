//! Exam room allocation core.
//!
//! Two stateless allocators over entity snapshots: a weighted round robin
//! that spreads invigilation duties across staff for every (slot, room)
//! pair, and a section-preserving bin packer that seats examinees into
//! rooms by descending capacity. Storage stays behind repository traits;
//! CSV sheet writers render the resulting rosters for download.

pub mod allocation;
pub mod config;
pub mod error;
pub mod report;
pub mod telemetry;
