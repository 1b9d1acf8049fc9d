use proptest::prelude::*;
use vm::{disk::MemoryDisk, FaultOutcome, Mmu, ReplacementPolicy, VmConfig, PAGE_SIZE};

fn policy() -> impl Strategy<Value = ReplacementPolicy> {
    prop_oneof![
        Just(ReplacementPolicy::Random),
        Just(ReplacementPolicy::Fifo),
        Just(ReplacementPolicy::Custom),
    ]
}

proptest! {
    #[test]
    fn tables_stay_consistent(
        policy in policy(),
        nframes in 1usize..5,
        accesses in prop::collection::vec((0usize..8, any::<bool>(), any::<u8>()), 1..150),
    ) {
        let config = VmConfig::new(8, nframes, policy).with_seed(17);
        let mut mmu = Mmu::from_config(&config, MemoryDisk::new(8)).unwrap();
        let mut expected = vec![0u8; 8];

        for (page, is_write, value) in accesses {
            if is_write {
                mmu.write(page * PAGE_SIZE, value).unwrap();
                expected[page] = value;
            } else {
                prop_assert_eq!(mmu.read(page * PAGE_SIZE).unwrap(), expected[page]);
            }
            prop_assert!(mmu.verify().is_ok());
            prop_assert!(mmu.frame_table().occupied_count() <= nframes);
        }

        let stats = mmu.stats();
        prop_assert!(stats.disk_writes <= stats.disk_reads);
        prop_assert!(stats.disk_reads <= stats.faults);
    }

    #[test]
    fn distinct_pages_fill_memory_before_evicting(nframes in 1usize..6) {
        let config = VmConfig::new(8, nframes, ReplacementPolicy::Fifo);
        let mut mmu = Mmu::from_config(&config, MemoryDisk::new(8)).unwrap();

        for page in 0..nframes {
            let evicted = matches!(
                mmu.handle_page_fault(page).unwrap(),
                FaultOutcome::Loaded { evicted: Some(_), .. }
            );
            prop_assert!(!evicted);
        }

        match mmu.handle_page_fault(nframes).unwrap() {
            FaultOutcome::Loaded { evicted: Some(ev), .. } => prop_assert_eq!(ev.page, 0),
            other => prop_assert!(false, "expected eviction, got {:?}", other),
        }
    }
}
