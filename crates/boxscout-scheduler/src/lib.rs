//! boxscout-scheduler — the reconciliation control loop.
//!
//! A single loop runs one cycle at a time: fetch records, derive the target
//! list snapshot, converge the output directory. Cycles start on a periodic
//! timer or an external trigger, with an adaptive delay in between that
//! expands under bursty triggering and contracts when triggers are sparse.

pub mod backoff;
pub mod scheduler;

pub use backoff::Backoff;
pub use scheduler::{FetchCallback, Scheduler};
