//! # Progresso - Lock-Free Progress Counters for the Terminal
//!
//! A Rust library for tracking and displaying real-time progress of concurrent
//! operations in command-line tools. It is minimalistic, lock-free,
//! allocation-free in the steady state, and comes with in-place terminal
//! pretty-printing out of the box.
//!
//! ## The Problem
//!
//! A CLI tool running parallel work wants to report what it is doing:
//! how many items are done, skipped, failed, in flight. The natural structure
//! is a `Mutex<HashMap<String, i64>>`, but that puts a lock on the hot path of
//! every worker thread, and every read of the map for display contends with
//! the writers. The counters are also wanted on screen *while* the work runs,
//! updating in place rather than scrolling the terminal away.
//!
//! ## The Solution
//!
//! [`Progress`] is a concurrent map of named signed 64-bit counters built on
//! a **copy-on-write state** published through an atomic pointer:
//!
//! ```text
//!                         ┌────────────────────────────────────┐
//!   inc("done", 1) ─────► │ state (ArcSwap) ──► immutable map  │
//!   inc("errors", 1) ───► │                     name ──► slot  │
//!   set("total", 100) ──► │                     sorted keys    │
//!                         └────────────────────────────────────┘
//!                                           │
//!                                           ▼
//!                               slots are plain AtomicI64 cells,
//!                               mutated in place, never replaced
//! ```
//!
//! ### Design Principles
//!
//! 1. **Copy-on-write map, not a lock**: the key set of a progress report is
//!    small and stabilizes quickly. Structural changes (a new counter name)
//!    clone the whole state and publish it with a compare-and-swap; every
//!    other operation is a pointer load plus one atomic integer operation.
//!
//! 2. **Stable slot identity**: counters are independently heap-allocated
//!    atomic cells referenced from the state, never embedded in it. Replacing
//!    the state never invalidates a slot, so increments racing a key
//!    insertion always land.
//!
//! 3. **Pre-sorted keys**: each state carries its key set already sorted, so
//!    the display path never sorts. Inserting a key costs one binary search
//!    and one linear copy.
//!
//! 4. **Zero allocation after warm-up**: once the key set is stable, `inc`,
//!    `set`, `get` and iteration allocate nothing, and the renderer reuses
//!    one scratch buffer across renders.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use progresso::{Progress, Reporter};
//!
//! let progress = Arc::new(Progress::new());
//!
//! // Periodically pretty-print to stdout, updating in place.
//! let reporter = Reporter::spawn(
//!     Arc::clone(&progress),
//!     std::io::stdout(),
//!     Duration::from_millis(100),
//!     "Progress:",
//! );
//!
//! // From any number of worker threads:
//! progress.inc("done", 1);
//! progress.inc("errors", 1);
//! progress.set("total", 1000);
//!
//! // Stops the loop and prints one final static report before returning.
//! reporter.stop();
//! ```
//!
//! Example output:
//!
//! ```text
//! Progress:
//!   done      15
//!   errors     3
//!   total   1000
//! ```
//!
//! The in-place updates do not damage ordinary log output, as long as logs
//! are printed line by line.
//!
//! ## Thread Safety
//!
//! `Progress` is `Send + Sync`; share it across threads with `Arc<Progress>`.
//! Increments to one counter are atomic and never lost; key creation is
//! serialized by the compare-and-swap, so two threads racing to create the
//! same name end up sharing one slot. Reading two different counters close
//! together may observe a torn point-in-time view; per-counter reads are
//! always coherent.
//!
//! ## When to Use
//!
//! Use `Progress` when:
//! - multiple threads report progress under a small, mostly-stable set of
//!   counter names
//! - you want live terminal output without slowing the workers down
//!
//! This is not a general metrics library: there are no percentiles, rates or
//! histograms, only named signed 64-bit counters.
//!
//! ## Snapshot Export
//!
//! The optional [`snapshot`] module (features `serde` / `json`) captures the
//! whole counter set as a serializable value:
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | [`ProgressSnapshot`](snapshot::ProgressSnapshot), serializable with any serde format |
//! | `json`  | Adds `serde_json` for JSON export |

pub mod progress;
pub mod render;
pub mod report;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use progress::{Iter, Progress};
pub use render::{RenderError, Renderer};
pub use report::Reporter;

#[cfg(feature = "serde")]
pub use snapshot::{CounterSnapshot, ProgressSnapshot};
