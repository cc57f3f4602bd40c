// crates/rp_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure planning algorithms. No I/O, no clock, no RNG: every output is a
//! deterministic function of the inputs and their order.

// Core inputs and domains
pub use rp_core::{
    rounding::Ratio,
    variables::{BufferStrategy, Milestones, RiskFraction},
    Tally,
};

// ----------------------------- Targets (public surface) ------------------------------

pub mod threshold;
pub mod requirement;
pub mod buffer;

pub use threshold::{pick_target, pick_target_for};
pub use requirement::{min_positive_needed, Requirement};
pub use buffer::{buffer_expected, buffer_strict, events_needed};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    // File modules (actual implementations)
    pub mod largest_remainder;

    pub use largest_remainder::{apportion, split_even, AllocError, Apportionment};
}

pub use allocation::{apportion, split_even, AllocError, Apportionment};
