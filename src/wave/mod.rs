//! Component D — Wave Scheduler.

pub mod conflict;
pub mod dispatch;
pub mod partition;

pub use conflict::conflicts;
pub use dispatch::{adaptive_parallelism, permits_for_wave, wave_semaphore};
pub use partition::{partition_into_waves, WaveItem};
