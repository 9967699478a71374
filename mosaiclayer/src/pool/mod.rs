//! Partitioned worker pool and compositor.
//!
//! Source images are split round-robin across `concurrency` workers. Each
//! worker runs as its own tokio task; a request is fanned out to all of them
//! and their partial bitmaps are composited in worker-index order.
//!
//! ```text
//!                  request(rect, w, h)
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!     worker 0        worker 1   ...  worker N-1     (one task each)
//!          │               │               │
//!          └──────── join_all ─────────────┘
//!                          ▼
//!             composite: worker k overwrites
//!             worker 0..k-1 where alpha > 0
//! ```

mod compositor;
mod error;
mod partition;
#[allow(clippy::module_inception)]
mod pool;

pub use compositor::{composite, composite_reclaiming, overlay_onto};
pub use error::PoolError;
pub use partition::partition_round_robin;
pub use pool::{PoolConfig, WorkerPool, DEFAULT_CONCURRENCY, WORKER_CHANNEL_CAPACITY};
