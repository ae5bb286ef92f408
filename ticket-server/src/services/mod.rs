//! Services holding cross-request state

pub mod capacity;

pub use capacity::CapacityService;
