//! Synthetic workloads. Each one walks the whole virtual address space
//! through the MMU with a different access pattern and returns a checksum.

use std::str::FromStr;

use anyhow::anyhow;
use rand::{rngs::StdRng, Rng};
use vm::{disk::Disk, page_replacer::PageReplacer, Mmu, VmError};

const PASSES: usize = 10;
const DELTA_SWAPS: usize = 100_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Program {
    /// Sequential fill, then repeated sequential sums.
    Alpha,
    /// Random fill, then an in-place heap sort.
    Beta,
    /// Dot product of the two halves of memory, repeated.
    Gamma,
    /// Random fill, then random pairwise swaps.
    Delta,
}

impl FromStr for Program {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(Program::Alpha),
            "beta" => Ok(Program::Beta),
            "gamma" => Ok(Program::Gamma),
            "delta" => Ok(Program::Delta),
            other => Err(anyhow!("unknown program: {}", other)),
        }
    }
}

impl Program {
    pub fn run<D, R>(self, mmu: &mut Mmu<D, R>, rng: &mut StdRng) -> Result<u64, VmError>
    where
        D: Disk,
        R: PageReplacer,
    {
        match self {
            Program::Alpha => alpha(mmu),
            Program::Beta => beta(mmu, rng),
            Program::Gamma => gamma(mmu),
            Program::Delta => delta(mmu, rng),
        }
    }
}

fn checksum<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>) -> Result<u64, VmError> {
    let mut total = 0u64;
    for addr in 0..mmu.virtmem_len() {
        total += mmu.read(addr)? as u64;
    }
    Ok(total)
}

fn random_fill<D: Disk, R: PageReplacer>(
    mmu: &mut Mmu<D, R>,
    rng: &mut StdRng,
) -> Result<(), VmError> {
    for addr in 0..mmu.virtmem_len() {
        mmu.write(addr, rng.gen())?;
    }
    Ok(())
}

fn swap<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>, a: usize, b: usize) -> Result<(), VmError> {
    let va = mmu.read(a)?;
    let vb = mmu.read(b)?;
    mmu.write(a, vb)?;
    mmu.write(b, va)
}

fn alpha<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>) -> Result<u64, VmError> {
    for addr in 0..mmu.virtmem_len() {
        mmu.write(addr, (addr % 256) as u8)?;
    }

    let mut total = 0;
    for _ in 0..PASSES {
        total += checksum(mmu)?;
    }
    Ok(total)
}

fn sift_down<D: Disk, R: PageReplacer>(
    mmu: &mut Mmu<D, R>,
    mut root: usize,
    end: usize,
) -> Result<(), VmError> {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return Ok(());
        }
        if child + 1 < end && mmu.read(child)? < mmu.read(child + 1)? {
            child += 1;
        }
        if mmu.read(root)? >= mmu.read(child)? {
            return Ok(());
        }
        swap(mmu, root, child)?;
        root = child;
    }
}

fn beta<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>, rng: &mut StdRng) -> Result<u64, VmError> {
    random_fill(mmu, rng)?;

    let len = mmu.virtmem_len();
    for start in (0..len / 2).rev() {
        sift_down(mmu, start, len)?;
    }
    for end in (1..len).rev() {
        swap(mmu, 0, end)?;
        sift_down(mmu, 0, end)?;
    }

    checksum(mmu)
}

fn gamma<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>) -> Result<u64, VmError> {
    let half = mmu.virtmem_len() / 2;

    for i in 0..half {
        mmu.write(i, (i % 256) as u8)?;
        mmu.write(half + i, (255 - i % 256) as u8)?;
    }

    let mut total = 0u64;
    for _ in 0..PASSES {
        for i in 0..half {
            total += mmu.read(i)? as u64 * mmu.read(half + i)? as u64;
        }
    }
    Ok(total)
}

fn delta<D: Disk, R: PageReplacer>(mmu: &mut Mmu<D, R>, rng: &mut StdRng) -> Result<u64, VmError> {
    random_fill(mmu, rng)?;

    let len = mmu.virtmem_len();
    for _ in 0..DELTA_SWAPS {
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        swap(mmu, a, b)?;
    }

    checksum(mmu)
}
