mod file_disk;
mod programs;

use std::{env, process};

use anyhow::{bail, Context};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use vm::{Mmu, ReplacementPolicy, VmConfig};

use crate::{file_disk::FileDisk, programs::Program};

const DISK_NAME: &str = "myvirtualdisk";
const SEED_VAR: &str = "VIRTMEM_SEED";

const USAGE: &str = "use: virtmem <npages> <nframes> <rand|fifo|custom> <alpha|beta|gamma|delta>";

struct Args {
    config: VmConfig,
    program: Program,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    if args.len() != 5 {
        bail!("{}", USAGE);
    }

    let npages: usize = args[1]
        .parse()
        .with_context(|| format!("invalid page count `{}`", args[1]))?;
    let nframes: usize = args[2]
        .parse()
        .with_context(|| format!("invalid frame count `{}`", args[2]))?;
    let policy: ReplacementPolicy = args[3].parse()?;
    let program: Program = args[4].parse()?;

    let mut config = VmConfig::new(npages, nframes, policy);
    if let Ok(seed) = env::var(SEED_VAR) {
        let seed = seed
            .parse()
            .with_context(|| format!("{} must be an unsigned integer", SEED_VAR))?;
        config = config.with_seed(seed);
    }
    config.validate()?;

    Ok(Args { config, program })
}

/// The replacement policy owns `seed` itself; the workload draws from the next one.
fn workload_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let Args { config, program } = args;

    let disk = FileDisk::create(DISK_NAME, config.npages)
        .context("couldn't create virtual disk")?;
    let mut mmu = Mmu::from_config(&config, disk)?;

    let mut rng = workload_rng(config.seed);

    info!(
        "virtmem: {} pages, {} frames, policy {}, program {:?}",
        config.npages, config.nframes, config.policy, program
    );

    let result = program.run(&mut mmu, &mut rng)?;
    info!("virtmem: {:?} result is {}", program, result);

    println!("{}", mmu.stats());

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let outcome = parse_args(&args).and_then(run);

    if let Err(err) = outcome {
        eprintln!("virtmem: {:#}", err);
        process::exit(1);
    }
}
