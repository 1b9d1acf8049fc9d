use std::fmt;

/// Counters reported when the run ends.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Stats {
    pub faults: u64,
    pub disk_reads: u64,
    pub disk_writes: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "faults: {} disk reads: {} disk writes: {}",
            self.faults, self.disk_reads, self.disk_writes
        )
    }
}
