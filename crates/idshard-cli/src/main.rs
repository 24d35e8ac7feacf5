#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Command, GenerateConfig, ImportConfig, VerifyConfig};
use idshard::{FsSink, Pipeline, import_shard, verify_tree};
use telemetry::init_telemetry;

// Using mimalloc for the multi-gigabyte ID buffer and the many small path
// allocations made while writing the tree.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_telemetry()?;

    match args.command {
        Command::Generate(args) => generate(GenerateConfig::try_from(args)?),
        Command::Verify(args) => verify(VerifyConfig::try_from(args)?),
        Command::Import(args) => import(ImportConfig::try_from(args)?),
    }
}

fn generate(config: GenerateConfig) -> anyhow::Result<()> {
    if cfg!(debug_assertions) {
        tracing::info!("Starting generation with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting generation into {} with {} ids per file",
            config.root.display(),
            config.layout.ids_per_file
        );
    }
    if config.seed.is_some() {
        tracing::warn!("Using a fixed shuffle seed; output order is reproducible");
    }

    let pipeline = Pipeline {
        root: config.root,
        layout: config.layout,
        fill_threads: config.fill_threads,
        seed: config.seed,
    };
    let report = pipeline.run(FsSink).context("generation failed")?;

    let timings = report.timings;
    tracing::info!(
        first = report.first_len,
        rest = report.rest_len,
        ids = report.written.ids,
        files = report.written.files,
        directories = report.written.directories,
        filter_ms = timings.filter.as_millis() as u64,
        fill_ms = timings.synthesize.as_millis() as u64,
        shuffle_ms = timings.shuffle.as_millis() as u64,
        write_ms = timings.write.as_millis() as u64,
        "All done, total used {}ms",
        timings.total().as_millis()
    );
    Ok(())
}

fn verify(config: VerifyConfig) -> anyhow::Result<()> {
    tracing::info!("Verifying shard tree at {}", config.root.display());

    let report = verify_tree(&config.root, config.layout).context("verification failed")?;
    if report.files == 0 {
        anyhow::bail!("no shard files found under {}", config.root.display());
    }

    tracing::info!(
        files = report.files,
        ids = report.ids,
        expected = report.expected,
        complete = report.is_complete(),
        "Shard tree is valid"
    );
    Ok(())
}

fn import(config: ImportConfig) -> anyhow::Result<()> {
    tracing::info!("Importing {} into {}", config.shard.display(), config.db.display());

    let report = import_shard(&config.db, &config.shard).context("import failed")?;

    tracing::info!(
        rows = report.rows,
        batches = report.batches,
        "Chunk loaded into unused_device_ids"
    );
    Ok(())
}
