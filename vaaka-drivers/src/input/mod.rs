//! Operator input drivers

mod latch;

pub use latch::StartStopLatch;
