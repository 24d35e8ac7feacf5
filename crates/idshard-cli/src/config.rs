use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use idshard::{IDS_PER_FILE, ShardLayout};
use std::path::PathBuf;

/// Command-line interface for the `idshard` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file in the working directory). The digit ranges and the blacklist are
/// fixed and cannot be configured.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idshard",
    version,
    about = "Generate, shuffle and shard the 9-digit composite ID space"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate every ID, shuffle them and write the shard tree.
    Generate(GenerateArgs),
    /// Read a shard tree back and check it for malformed or duplicate IDs.
    Verify(VerifyArgs),
    /// Load one chunk file into the SQLite device-ID database.
    Import(ImportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Root directory of the shard tree. Must not exist yet.
    ///
    /// Environment variable: `IDSHARD_ROOT`
    #[arg(long, env = "IDSHARD_ROOT", default_value = "./ids")]
    pub root: PathBuf,

    /// Maximum number of IDs written to each chunk file.
    ///
    /// Environment variable: `IDS_PER_FILE`
    #[arg(long, env = "IDS_PER_FILE", default_value_t = IDS_PER_FILE)]
    pub ids_per_file: usize,

    /// Threads used to fill the ID buffer. `0` uses every available core.
    ///
    /// Environment variable: `FILL_THREADS`
    #[arg(long, env = "FILL_THREADS", default_value_t = 1)]
    pub fill_threads: usize,

    /// Fixed shuffle seed for reproducible output. When omitted the shuffle is
    /// seeded from the operating system's entropy source.
    ///
    /// Environment variable: `SHUFFLE_SEED`
    #[arg(long, env = "SHUFFLE_SEED")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Root directory of the shard tree.
    ///
    /// Environment variable: `IDSHARD_ROOT`
    #[arg(long, env = "IDSHARD_ROOT", default_value = "./ids")]
    pub root: PathBuf,

    /// Number of IDs each full chunk file is expected to hold.
    ///
    /// Environment variable: `IDS_PER_FILE`
    #[arg(long, env = "IDS_PER_FILE", default_value_t = IDS_PER_FILE)]
    pub ids_per_file: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// SQLite database file. Created, together with its tables, if missing.
    ///
    /// Environment variable: `IDSHARD_DB`
    #[arg(long, env = "IDSHARD_DB", default_value = "./ids.sqlite")]
    pub db: PathBuf,

    /// Chunk file to import, e.g. `ids/a/a/id_aa0`.
    #[arg(long = "id")]
    pub id: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub root: PathBuf,
    pub layout: ShardLayout,
    pub fill_threads: usize,
    pub seed: Option<u64>,
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.ids_per_file == 0 {
            bail!("IDS_PER_FILE must be greater than 0");
        }

        let fill_threads = match args.fill_threads {
            0 => num_cpus::get(),
            n => n,
        };

        Ok(Self {
            root: args.root,
            layout: ShardLayout::new(args.ids_per_file),
            fill_threads,
            seed: args.seed,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub root: PathBuf,
    pub layout: ShardLayout,
}

impl TryFrom<VerifyArgs> for VerifyConfig {
    type Error = anyhow::Error;

    fn try_from(args: VerifyArgs) -> Result<Self, Self::Error> {
        if args.ids_per_file == 0 {
            bail!("IDS_PER_FILE must be greater than 0");
        }
        Ok(Self {
            root: args.root,
            layout: ShardLayout::new(args.ids_per_file),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub db: PathBuf,
    pub shard: PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = anyhow::Error;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        if args.id.is_dir() {
            bail!("--id must name a chunk file, not a directory");
        }
        Ok(Self {
            db: args.db,
            shard: args.id,
        })
    }
}
