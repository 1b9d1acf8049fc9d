use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{error::VmError, frame_table::FrameTable};

/// Something happened to a frame that a replacer may want to remember.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// The page held by this frame was accessed.
    Touched(usize),
    /// This frame just went from free to occupied.
    Loaded(usize),
}

pub trait PageReplacer {
    fn page_event(&mut self, _event: PageEvent) {}

    /// Chooses an occupied frame to evict. `None` only when nothing is occupied.
    fn pick_victim(&mut self, frames: &FrameTable) -> Option<usize>;
}

impl<R: PageReplacer + ?Sized> PageReplacer for Box<R> {
    fn page_event(&mut self, event: PageEvent) {
        (**self).page_event(event)
    }

    fn pick_victim(&mut self, frames: &FrameTable) -> Option<usize> {
        (**self).pick_victim(frames)
    }
}

pub struct RandomPageReplacer {
    rng: StdRng,
}

impl RandomPageReplacer {
    pub fn new() -> Self {
        RandomPageReplacer {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPageReplacer {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPageReplacer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageReplacer for RandomPageReplacer {
    fn pick_victim(&mut self, frames: &FrameTable) -> Option<usize> {
        let occupied: Vec<usize> = frames.occupied().collect();

        occupied.choose(&mut self.rng).copied()
    }
}

#[derive(Default)]
pub struct FIFOPageReplacer {
    fifo: VecDeque<usize>,
}

impl FIFOPageReplacer {
    pub fn new() -> Self {
        FIFOPageReplacer {
            fifo: VecDeque::new(),
        }
    }
}

impl PageReplacer for FIFOPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        if let PageEvent::Loaded(idx) = event {
            self.fifo.push_back(idx)
        }
    }

    fn pick_victim(&mut self, _frames: &FrameTable) -> Option<usize> {
        self.fifo.pop_front()
    }
}

/// Second chance: the hand sweeps the frames, clearing reference bits,
/// and evicts the first occupied frame whose bit is already clear.
#[derive(Default)]
pub struct ClockPageReplacer {
    hand: usize,
    referenced: Vec<bool>,
}

impl ClockPageReplacer {
    pub fn new() -> Self {
        ClockPageReplacer {
            hand: 0,
            referenced: Vec::new(),
        }
    }

    fn reference(&mut self, frame: usize) {
        if frame >= self.referenced.len() {
            self.referenced.resize(frame + 1, false);
        }
        self.referenced[frame] = true;
    }
}

impl PageReplacer for ClockPageReplacer {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Touched(frame) | PageEvent::Loaded(frame) => self.reference(frame),
        }
    }

    fn pick_victim(&mut self, frames: &FrameTable) -> Option<usize> {
        let nframes = frames.len();
        if frames.occupied_count() == 0 {
            return None;
        }

        self.referenced.resize(nframes.max(self.referenced.len()), false);

        // Two sweeps clear every bit, so a victim always turns up.
        for _ in 0..=2 * nframes {
            let idx = self.hand % nframes;
            self.hand = (idx + 1) % nframes;

            if frames.is_free(idx) {
                continue;
            }

            if self.referenced[idx] {
                self.referenced[idx] = false;
            } else {
                return Some(idx);
            }
        }

        None
    }
}

/// Replacement algorithm selected on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Random,
    Fifo,
    Custom,
}

impl ReplacementPolicy {
    pub fn build(self, seed: Option<u64>) -> Box<dyn PageReplacer> {
        match self {
            ReplacementPolicy::Random => match seed {
                Some(seed) => Box::new(RandomPageReplacer::with_seed(seed)),
                None => Box::new(RandomPageReplacer::new()),
            },
            ReplacementPolicy::Fifo => Box::new(FIFOPageReplacer::new()),
            ReplacementPolicy::Custom => Box::new(ClockPageReplacer::new()),
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rand" => Ok(ReplacementPolicy::Random),
            "fifo" => Ok(ReplacementPolicy::Fifo),
            "custom" => Ok(ReplacementPolicy::Custom),
            other => Err(VmError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplacementPolicy::Random => "rand",
            ReplacementPolicy::Fifo => "fifo",
            ReplacementPolicy::Custom => "custom",
        };

        f.write_str(name)
    }
}
