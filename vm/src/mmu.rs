use log::{debug, trace};

use crate::{
    config::{byte_len, VmConfig},
    disk::Disk,
    error::VmError,
    frame_table::FrameTable,
    page_replacer::{PageEvent, PageReplacer},
    page_table::{PageFlags, PageTable, PAGE_SIZE},
    stats::Stats,
};

/// A page pushed out of its frame to make room.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Eviction {
    pub page: usize,
    pub frame: usize,
    pub written_back: bool,
}

/// How a fault was resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaultOutcome {
    /// First write to a resident clean page; now writable and dirty.
    Upgraded { frame: usize },
    /// The page was fetched from disk into `frame`.
    Loaded {
        frame: usize,
        evicted: Option<Eviction>,
    },
}

pub struct Mmu<D: Disk, R: PageReplacer = Box<dyn PageReplacer>> {
    page_table: PageTable,
    frames: FrameTable,
    replacer: R,
    disk: D,
    stats: Stats,
}

impl<D: Disk> Mmu<D> {
    pub fn from_config(config: &VmConfig, disk: D) -> Result<Self, VmError> {
        config.validate()?;

        Mmu::new(
            config.npages,
            config.nframes,
            config.policy.build(config.seed),
            disk,
        )
    }
}

impl<D, R> Mmu<D, R>
where
    D: Disk,
    R: PageReplacer,
{
    pub fn new(npages: usize, nframes: usize, replacer: R, disk: D) -> Result<Self, VmError> {
        if npages == 0 {
            return Err(VmError::NoPages);
        }
        if nframes == 0 {
            return Err(VmError::NoFrames);
        }
        byte_len("page", npages)?;
        byte_len("frame", nframes)?;
        if disk.block_count() < npages {
            return Err(VmError::DiskTooSmall {
                blocks: disk.block_count(),
                npages,
            });
        }

        Ok(Mmu {
            page_table: PageTable::new(npages, nframes),
            frames: FrameTable::new(nframes),
            replacer,
            disk,
            stats: Stats::default(),
        })
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frame_table(&self) -> &FrameTable {
        &self.frames
    }

    pub fn disk(&self) -> &D {
        &self.disk
    }

    pub fn virtmem_len(&self) -> usize {
        self.page_table.virtmem_len()
    }

    /// Resolves a fault on `page_number`: either grants write access to a
    /// resident page or brings the page in, evicting a victim when every
    /// frame is taken.
    pub fn handle_page_fault(&mut self, page_number: usize) -> Result<FaultOutcome, VmError> {
        if page_number >= self.page_table.npages() {
            return Err(VmError::PageOutOfRange(page_number));
        }
        debug_assert!(!self.frames.is_empty());

        self.stats.faults += 1;
        debug!("mmu: page fault on page #{}", page_number);

        let entry = self.page_table.get_entry(page_number);

        if entry.is_mapped() {
            self.page_table.set_entry(
                page_number,
                entry.frame_index,
                entry.flags | PageFlags::WRITE,
            );
            self.frames.mark_dirty(entry.frame_index)?;

            debug!(
                "mmu: page {} now writable in frame {}",
                page_number, entry.frame_index
            );

            return Ok(FaultOutcome::Upgraded {
                frame: entry.frame_index,
            });
        }

        let (frame_idx, evicted) = match self.frames.first_free() {
            Some(free_idx) => (free_idx, None),
            None => {
                let eviction = self.evict()?;
                (eviction.frame, Some(eviction))
            }
        };

        self.disk
            .read_block(page_number, self.page_table.frame_mut(frame_idx))?;
        self.stats.disk_reads += 1;

        self.frames.allocate(frame_idx, page_number)?;
        self.page_table
            .set_entry(page_number, frame_idx, PageFlags::READ);
        self.replacer.page_event(PageEvent::Loaded(frame_idx));

        debug!("mmu: page {} loaded into frame {}", page_number, frame_idx);

        Ok(FaultOutcome::Loaded {
            frame: frame_idx,
            evicted,
        })
    }

    fn evict(&mut self) -> Result<Eviction, VmError> {
        let victim = self
            .replacer
            .pick_victim(&self.frames)
            .ok_or(VmError::NoVictim)?;

        let (evicted_page, dirty) = self.frames.free(victim)?;

        if dirty {
            let frame = self.page_table.frame(victim);
            trace!(
                "mmu: writing back page {} ({}..)",
                evicted_page,
                hex::encode(&frame[..16])
            );

            self.disk.write_block(evicted_page, frame)?;
            self.stats.disk_writes += 1;
        }

        self.page_table.clear_entry(evicted_page);

        debug!(
            "mmu: evicted page {} from frame {} (dirty={})",
            evicted_page, victim, dirty
        );

        Ok(Eviction {
            page: evicted_page,
            frame: victim,
            written_back: dirty,
        })
    }

    /// Walks the page table, faulting until `access` is granted.
    fn translate(&mut self, address: usize, access: PageFlags) -> Result<(usize, usize), VmError> {
        if address >= self.page_table.virtmem_len() {
            return Err(VmError::AddressOutOfRange(address));
        }

        let page_number = address / PAGE_SIZE;
        let page_offset = address % PAGE_SIZE;

        loop {
            let entry = self.page_table.get_entry(page_number);

            if entry.flags.contains(access) {
                self.replacer
                    .page_event(PageEvent::Touched(entry.frame_index));

                trace!(
                    "mmu: addr {:#x} -> page {} frame {} offset {:#x}",
                    address,
                    page_number,
                    entry.frame_index,
                    page_offset
                );

                return Ok((entry.frame_index, page_offset));
            }

            self.handle_page_fault(page_number)?;
        }
    }

    pub fn read(&mut self, address: usize) -> Result<u8, VmError> {
        let (frame_idx, page_offset) = self.translate(address, PageFlags::READ)?;

        Ok(self.page_table.frame(frame_idx)[page_offset])
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        let (frame_idx, page_offset) =
            self.translate(address, PageFlags::READ | PageFlags::WRITE)?;

        self.page_table.frame_mut(frame_idx)[page_offset] = value;

        Ok(())
    }

    /// Cross-checks the page table against the frame table.
    pub fn verify(&self) -> Result<(), VmError> {
        for page in 0..self.page_table.npages() {
            let entry = self.page_table.get_entry(page);
            if !entry.is_mapped() {
                continue;
            }

            if entry.frame_index >= self.frames.len() {
                return Err(VmError::Inconsistent(format!(
                    "page {} maps to missing frame {}",
                    page, entry.frame_index
                )));
            }

            let frame = self.frames.get(entry.frame_index);
            if frame.page != Some(page) {
                return Err(VmError::Inconsistent(format!(
                    "page {} maps to frame {} which holds {:?}",
                    page, entry.frame_index, frame.page
                )));
            }

            if frame.dirty != entry.flags.contains(PageFlags::WRITE) {
                return Err(VmError::Inconsistent(format!(
                    "frame {} dirty={} but page {} has flags {:?}",
                    entry.frame_index, frame.dirty, page, entry.flags
                )));
            }
        }

        for frame_idx in self.frames.occupied() {
            if let Some(page) = self.frames.get(frame_idx).page {
                let entry = self.page_table.get_entry(page);
                if !entry.is_mapped() || entry.frame_index != frame_idx {
                    return Err(VmError::Inconsistent(format!(
                        "frame {} holds page {} which is not mapped to it",
                        frame_idx, page
                    )));
                }
            }
        }

        Ok(())
    }
}
