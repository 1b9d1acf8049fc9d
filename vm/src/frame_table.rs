use crate::error::VmError;

/// State of a single physical frame.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Frame {
    pub page: Option<usize>,
    pub dirty: bool,
}

impl Frame {
    pub fn is_occupied(&self) -> bool {
        self.page.is_some()
    }
}

/// Which page lives in which frame. Starts out all free.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
}

impl FrameTable {
    pub fn new(nframes: usize) -> Self {
        FrameTable {
            frames: vec![Frame::default(); nframes],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize) -> Frame {
        self.frames[frame]
    }

    pub fn is_free(&self, frame: usize) -> bool {
        !self.frames[frame].is_occupied()
    }

    /// Lowest-indexed free frame, if any.
    pub fn first_free(&self) -> Option<usize> {
        self.frames.iter().position(|f| !f.is_occupied())
    }

    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_occupied())
            .map(|(idx, _)| idx)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn allocate(&mut self, frame: usize, page: usize) -> Result<(), VmError> {
        let slot = &mut self.frames[frame];

        if let Some(current) = slot.page {
            return Err(VmError::FrameOccupied { frame, page: current });
        }

        *slot = Frame {
            page: Some(page),
            dirty: false,
        };

        Ok(())
    }

    pub fn mark_dirty(&mut self, frame: usize) -> Result<(), VmError> {
        let slot = &mut self.frames[frame];

        if !slot.is_occupied() {
            return Err(VmError::FrameFree(frame));
        }

        slot.dirty = true;

        Ok(())
    }

    /// Releases `frame`, handing back the page it held and its dirty bit.
    pub fn free(&mut self, frame: usize) -> Result<(usize, bool), VmError> {
        let slot = std::mem::take(&mut self.frames[frame]);

        match slot.page {
            Some(page) => Ok((page, slot.dirty)),
            None => Err(VmError::FrameFree(frame)),
        }
    }
}
