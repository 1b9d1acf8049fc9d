//! Demand-paged virtual memory simulator.
//!
//! A fixed pool of physical frames is backed by a block [`disk::Disk`].
//! Accesses go through [`mmu::Mmu`], which traps on missing permissions
//! and resolves the fault by fetching, evicting and writing back pages
//! under a pluggable [`page_replacer::PageReplacer`].

pub mod config;
pub mod disk;
pub mod error;
pub mod frame_table;
pub mod mmu;
pub mod page_replacer;
pub mod page_table;
pub mod stats;

pub use config::VmConfig;
pub use error::VmError;
pub use mmu::{Eviction, FaultOutcome, Mmu};
pub use page_replacer::ReplacementPolicy;
pub use page_table::PAGE_SIZE;
pub use stats::Stats;
