/*!
 * Clock Module
 * Monotonic high-resolution timing
 */

mod monotonic;
pub mod types;

pub use monotonic::{ManualClock, MonotonicClock, SystemClock};
pub use types::TimingSample;
