use std::{env, process};

use anyhow::Context;
use log::info;

use policy_scorer::{Dataset, Learner, ScorerSpec};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <config.json> <dataset.json>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(config_path: &str, dataset_path: &str) -> anyhow::Result<()> {
    let spec = ScorerSpec::from_path(config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;
    let dataset = Dataset::from_path(dataset_path)
        .with_context(|| format!("failed to load dataset from {dataset_path}"))?;

    info!("loaded {} examples, dim={}", dataset.len(), spec.dim);

    let learner = Learner::from_spec(&spec)?;
    let (epochs, last) = learner.run(&dataset)?;
    for stats in epochs {
        println!("{stats}");
    }
    println!("final {last}");

    let hasher = learner.hasher();
    println!(
        "hash collisions={} non_collisions={} ratio={:.4}",
        hasher.collisions(),
        hasher.non_collisions(),
        hasher.collision_ratio()
    );

    Ok(())
}
