use vm::{
    disk::MemoryDisk,
    page_replacer::{ClockPageReplacer, FIFOPageReplacer, PageReplacer, RandomPageReplacer},
    Eviction, FaultOutcome, Mmu, ReplacementPolicy, Stats, VmConfig, PAGE_SIZE,
};

fn addr(page: usize) -> usize {
    page * PAGE_SIZE
}

fn pattern_disk(npages: usize) -> MemoryDisk {
    MemoryDisk::from_fn(npages, |b| (b & 0xF) as u8)
}

#[test]
fn fifo_reads_evict_oldest_page() {
    let mut mmu = Mmu::new(4, 2, FIFOPageReplacer::new(), pattern_disk(4)).unwrap();

    assert_eq!(
        mmu.handle_page_fault(0).unwrap(),
        FaultOutcome::Loaded { frame: 0, evicted: None }
    );
    assert_eq!(
        mmu.handle_page_fault(1).unwrap(),
        FaultOutcome::Loaded { frame: 1, evicted: None }
    );
    assert_eq!(
        mmu.handle_page_fault(2).unwrap(),
        FaultOutcome::Loaded {
            frame: 0,
            evicted: Some(Eviction { page: 0, frame: 0, written_back: false }),
        }
    );

    assert_eq!(
        mmu.stats(),
        Stats { faults: 3, disk_reads: 3, disk_writes: 0 }
    );
    mmu.verify().unwrap();
}

#[test]
fn fifo_write_before_eviction_costs_one_write() {
    let config = VmConfig::new(4, 2, ReplacementPolicy::Fifo);
    let mut mmu = Mmu::from_config(&config, pattern_disk(4)).unwrap();

    mmu.read(addr(0)).unwrap();
    mmu.read(addr(1)).unwrap();
    mmu.write(addr(0) + 1, 0x42).unwrap();
    assert_eq!(mmu.stats().faults, 3);
    assert_eq!(mmu.stats().disk_reads, 2);

    assert_eq!(mmu.read(addr(2)).unwrap(), 2);

    assert_eq!(
        mmu.stats(),
        Stats { faults: 4, disk_reads: 3, disk_writes: 1 }
    );
    assert_eq!(mmu.disk().block(0)[1], 0x42);
    mmu.verify().unwrap();
}

#[test]
fn no_eviction_until_memory_is_full() {
    let mut mmu = Mmu::new(8, 4, FIFOPageReplacer::new(), pattern_disk(8)).unwrap();

    for page in 0..4 {
        match mmu.handle_page_fault(page).unwrap() {
            FaultOutcome::Loaded { evicted: None, .. } => {}
            other => panic!("page {} unexpectedly resolved as {:?}", page, other),
        }
    }

    match mmu.handle_page_fault(4).unwrap() {
        FaultOutcome::Loaded { evicted: Some(ev), .. } => assert_eq!(ev.page, 0),
        other => panic!("expected an eviction, got {:?}", other),
    }
}

fn ping_pong<R: PageReplacer>(replacer: R) -> Stats {
    let mut mmu = Mmu::new(2, 1, replacer, pattern_disk(2)).unwrap();

    mmu.read(addr(0)).unwrap();
    mmu.write(addr(1), 7).unwrap();
    mmu.read(addr(0)).unwrap();
    mmu.read(addr(1)).unwrap();
    mmu.verify().unwrap();

    mmu.stats()
}

#[test]
fn single_frame_always_evicts_the_resident_page() {
    // Only the eviction of the written page 1 (on the second touch of page 0)
    // costs a write.
    let expected = Stats { faults: 5, disk_reads: 4, disk_writes: 1 };

    assert_eq!(ping_pong(FIFOPageReplacer::new()), expected);
    assert_eq!(ping_pong(RandomPageReplacer::with_seed(5)), expected);
    assert_eq!(ping_pong(ClockPageReplacer::new()), expected);
}

#[test]
fn evicted_page_round_trips_through_disk() {
    let mut mmu = Mmu::new(3, 1, FIFOPageReplacer::new(), pattern_disk(3)).unwrap();

    for offset in 0..PAGE_SIZE {
        mmu.write(addr(1) + offset, (offset % 251) as u8).unwrap();
    }
    mmu.read(addr(2)).unwrap();
    mmu.read(addr(0)).unwrap();

    for offset in (0..PAGE_SIZE).step_by(97) {
        assert_eq!(mmu.read(addr(1) + offset).unwrap(), (offset % 251) as u8);
    }

    // Never written, so page 2 comes back with its initial content.
    assert_eq!(mmu.read(addr(2) + 9).unwrap(), 2);
}

#[test]
fn clock_keeps_recently_touched_pages() {
    let mut mmu = Mmu::new(4, 2, ClockPageReplacer::new(), pattern_disk(4)).unwrap();

    mmu.read(addr(0)).unwrap();
    mmu.read(addr(1)).unwrap();
    // Both referenced: the sweep clears them and takes frame 0 (page 0).
    mmu.read(addr(2)).unwrap();
    assert!(!mmu.page_table().get_entry(0).is_mapped());

    // Page 2 was just loaded and touched, page 1 was not touched since the sweep.
    mmu.read(addr(3)).unwrap();
    assert!(!mmu.page_table().get_entry(1).is_mapped());
    assert!(mmu.page_table().get_entry(2).is_mapped());
    mmu.verify().unwrap();
}
