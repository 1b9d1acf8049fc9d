use std::ops::Range;

/// Size in bytes of both a page and a frame.
pub const PAGE_SIZE: usize = 4096;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PageFlags: u8 {
        const READ = 0b01;
        const WRITE = 0b10;
    }
}

impl Default for PageFlags {
    fn default() -> Self {
        PageFlags::empty()
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct PageTableEntry {
    pub frame_index: usize,
    pub flags: PageFlags,
}

impl PageTableEntry {
    pub fn is_mapped(&self) -> bool {
        self.flags.contains(PageFlags::READ)
    }
}

/// Virtual to physical mapping plus the physical memory it points into.
pub struct PageTable {
    table: Vec<PageTableEntry>,
    memory: Vec<u8>,
    nframes: usize,
}

impl PageTable {
    pub fn new(npages: usize, nframes: usize) -> Self {
        PageTable {
            table: vec![PageTableEntry::default(); npages],
            memory: vec![0; nframes * PAGE_SIZE],
            nframes,
        }
    }

    pub fn npages(&self) -> usize {
        self.table.len()
    }

    pub fn nframes(&self) -> usize {
        self.nframes
    }

    pub fn get_entry(&self, page_number: usize) -> PageTableEntry {
        self.table[page_number]
    }

    pub fn set_entry(&mut self, page_number: usize, frame_index: usize, flags: PageFlags) {
        self.table[page_number] = PageTableEntry { frame_index, flags };
    }

    pub fn clear_entry(&mut self, page_number: usize) {
        self.table[page_number] = PageTableEntry::default();
    }

    fn frame_range(frame_index: usize) -> Range<usize> {
        Range {
            start: frame_index * PAGE_SIZE,
            end: (frame_index + 1) * PAGE_SIZE,
        }
    }

    pub fn frame(&self, frame_index: usize) -> &[u8] {
        &self.memory[Self::frame_range(frame_index)]
    }

    pub fn frame_mut(&mut self, frame_index: usize) -> &mut [u8] {
        &mut self.memory[Self::frame_range(frame_index)]
    }

    /// Total bytes of virtual address space.
    pub fn virtmem_len(&self) -> usize {
        self.npages() * PAGE_SIZE
    }

    pub fn physmem(&self) -> &[u8] {
        &self.memory
    }
}
