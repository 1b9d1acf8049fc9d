//! FileDisk - a `Disk` backed by a plain file on the host filesystem.
//!
//! There is no header: block `n` lives at byte offset `n * PAGE_SIZE`. The
//! file is truncated and resized on creation, so every block starts zeroed
//! and nothing is carried over from a previous run.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

use log::debug;
use vm::{
    disk::{check_block, Disk},
    VmError, PAGE_SIZE,
};

#[derive(Debug)]
pub struct FileDisk {
    file: File,
    nblocks: usize,
}

impl FileDisk {
    pub fn create<P: AsRef<Path>>(filename: P, nblocks: usize) -> std::io::Result<FileDisk> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(filename.as_ref())?;

        let len = nblocks.checked_mul(PAGE_SIZE).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} blocks do not fit in a disk file", nblocks),
            )
        })?;
        file.set_len(len as u64)?;

        debug!(
            "file_disk: {} blocks in {}",
            nblocks,
            filename.as_ref().display()
        );

        Ok(FileDisk { file, nblocks })
    }

    fn seek_block(&mut self, block: usize) -> std::io::Result<()> {
        self.file
            .seek(SeekFrom::Start((block * PAGE_SIZE) as u64))
            .map(|_| ())
    }
}

impl Disk for FileDisk {
    fn block_count(&self) -> usize {
        self.nblocks
    }

    fn read_block(&mut self, block: usize, target: &mut [u8]) -> Result<(), VmError> {
        check_block(self.nblocks, block, target.len())?;

        self.seek_block(block)?;
        self.file.read_exact(target)?;

        Ok(())
    }

    fn write_block(&mut self, block: usize, buffer: &[u8]) -> Result<(), VmError> {
        check_block(self.nblocks, block, buffer.len())?;

        self.seek_block(block)?;
        self.file.write_all(buffer)?;

        Ok(())
    }
}
