use thiserror::Error;

/// Everything that can go wrong while configuring or running the simulator.
///
/// Configuration errors are reported before any fault is processed. The
/// frame-table variants signal a broken engine invariant and are never
/// recoverable; callers are expected to report them and stop.
#[derive(Error, Debug)]
pub enum VmError {
    #[error("at least one physical frame is required")]
    NoFrames,

    #[error("at least one virtual page is required")]
    NoPages,

    #[error("{what} count {count} is too large to address")]
    TooLarge { what: &'static str, count: usize },

    #[error("unknown replacement policy `{0}` (expected rand, fifo or custom)")]
    UnknownPolicy(String),

    #[error("disk holds {blocks} blocks but {npages} pages need backing")]
    DiskTooSmall { blocks: usize, npages: usize },

    #[error("frame {frame} is already occupied by page {page}")]
    FrameOccupied { frame: usize, page: usize },

    #[error("frame {0} is not occupied")]
    FrameFree(usize),

    #[error("replacement policy found no occupied frame to evict")]
    NoVictim,

    #[error("inconsistent memory state: {0}")]
    Inconsistent(String),

    #[error("virtual address {0:#x} is outside the address space")]
    AddressOutOfRange(usize),

    #[error("page {0} does not exist")]
    PageOutOfRange(usize),

    #[error("disk block {0} does not exist")]
    BlockOutOfRange(usize),

    #[error("block buffer is {actual} bytes, expected {expected}")]
    BlockSize { expected: usize, actual: usize },

    #[error("disk i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
