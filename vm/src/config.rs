use crate::{error::VmError, page_replacer::ReplacementPolicy, page_table::PAGE_SIZE};

/// Everything needed to build an [`Mmu`](crate::mmu::Mmu).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    pub npages: usize,
    pub nframes: usize,
    pub policy: ReplacementPolicy,
    /// Seed for the random policy. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl VmConfig {
    pub fn new(npages: usize, nframes: usize, policy: ReplacementPolicy) -> Self {
        VmConfig {
            npages,
            nframes,
            policy,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), VmError> {
        if self.npages == 0 {
            return Err(VmError::NoPages);
        }
        if self.nframes == 0 {
            return Err(VmError::NoFrames);
        }
        byte_len("page", self.npages)?;
        byte_len("frame", self.nframes)?;
        Ok(())
    }
}

/// Bytes spanned by `count` pages or frames, if that fits in a `usize`.
pub fn byte_len(what: &'static str, count: usize) -> Result<usize, VmError> {
    count
        .checked_mul(PAGE_SIZE)
        .ok_or(VmError::TooLarge { what, count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_memory() {
        let config = VmConfig::new(4, 0, ReplacementPolicy::Fifo);
        assert!(matches!(config.validate(), Err(VmError::NoFrames)));

        let config = VmConfig::new(0, 2, ReplacementPolicy::Fifo);
        assert!(matches!(config.validate(), Err(VmError::NoPages)));
    }

    #[test]
    fn rejects_unaddressable_sizes() {
        let huge = usize::MAX / PAGE_SIZE + 1;

        let config = VmConfig::new(huge, 2, ReplacementPolicy::Fifo);
        assert!(matches!(
            config.validate(),
            Err(VmError::TooLarge { what: "page", .. })
        ));

        let config = VmConfig::new(4, huge, ReplacementPolicy::Fifo);
        assert!(matches!(
            config.validate(),
            Err(VmError::TooLarge { what: "frame", .. })
        ));

        assert_eq!(byte_len("page", 3).unwrap(), 3 * PAGE_SIZE);
    }

    #[test]
    fn seed_is_optional() {
        let config = VmConfig::new(4, 2, ReplacementPolicy::Random);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
        assert_eq!(config.with_seed(9).seed, Some(9));
    }
}
