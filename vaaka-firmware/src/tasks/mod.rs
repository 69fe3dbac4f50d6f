//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod heartbeat;
pub mod monitor;
pub mod sequence;
pub mod status;

pub use heartbeat::heartbeat_task;
pub use monitor::monitor_task;
pub use sequence::sequence_task;
pub use status::status_task;
