//! The EPA algorithm for penetration depth computation.

pub use self::epa3::{EpaResult, EpaStatus, EPA, EPA_MAX_ITERATIONS};

mod epa3;
