use log::trace;

use crate::{error::VmError, page_table::PAGE_SIZE};

/// Block-addressed backing store. Block `n` holds page `n`.
pub trait Disk {
    fn block_count(&self) -> usize;

    fn read_block(&mut self, block: usize, target: &mut [u8]) -> Result<(), VmError>;

    fn write_block(&mut self, block: usize, buffer: &[u8]) -> Result<(), VmError>;
}

/// Checks a block request against a disk of `block_count` blocks.
pub fn check_block(block_count: usize, block: usize, len: usize) -> Result<(), VmError> {
    if block >= block_count {
        return Err(VmError::BlockOutOfRange(block));
    }

    if len != PAGE_SIZE {
        return Err(VmError::BlockSize {
            expected: PAGE_SIZE,
            actual: len,
        });
    }

    Ok(())
}

/// A disk that lives entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDisk {
    data: Vec<u8>,
}

impl MemoryDisk {
    pub fn new(nblocks: usize) -> Self {
        MemoryDisk {
            data: vec![0; nblocks * PAGE_SIZE],
        }
    }

    /// Fills every byte of block `n` with `fill(n)`.
    pub fn from_fn<F: Fn(usize) -> u8>(nblocks: usize, fill: F) -> Self {
        let mut disk = MemoryDisk::new(nblocks);

        for (block, chunk) in disk.data.chunks_mut(PAGE_SIZE).enumerate() {
            chunk.fill(fill(block));
        }

        disk
    }

    pub fn block(&self, block: usize) -> &[u8] {
        &self.data[block * PAGE_SIZE..(block + 1) * PAGE_SIZE]
    }
}

impl Disk for MemoryDisk {
    fn block_count(&self) -> usize {
        self.data.len() / PAGE_SIZE
    }

    fn read_block(&mut self, block: usize, target: &mut [u8]) -> Result<(), VmError> {
        check_block(self.block_count(), block, target.len())?;

        target.copy_from_slice(self.block(block));
        trace!("memory_disk: read block {}", block);

        Ok(())
    }

    fn write_block(&mut self, block: usize, buffer: &[u8]) -> Result<(), VmError> {
        check_block(self.block_count(), block, buffer.len())?;

        let start = block * PAGE_SIZE;
        self.data[start..start + PAGE_SIZE].copy_from_slice(buffer);
        trace!("memory_disk: wrote block {}", block);

        Ok(())
    }
}
