//! Mount a BSON file as a read-only filesystem.
//!
//! Usage:
//!   befuddle <MOUNTPOINT> <INPUTFILE> [--single] [--fs-name NAME] [--allow-other] [--attr-ttl SECS] [-v]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use befuddle_vfs::{load_file, mount, BsonFs, INodeManager, InputMode, VfsError, VfsOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Mount a BSON file (or mongodump output) as a read-only filesystem.
#[derive(Debug, Parser)]
#[command(name = "befuddle", version)]
struct CliArgs {
    /// Directory to mount at.
    mountpoint: PathBuf,

    /// BSON file to expose.
    inputfile: PathBuf,

    /// Treat the input as one document instead of a document stream.
    #[arg(long)]
    single: bool,

    /// Filesystem name shown in the mount table.
    #[arg(long, default_value = "befuddle")]
    fs_name: String,

    /// Allow other users to access the mount.
    #[arg(long)]
    allow_other: bool,

    /// Seconds the kernel may cache attributes.
    #[arg(long, default_value_t = 1)]
    attr_ttl: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl CliArgs {
    /// Build VFS options from the command line.
    fn options(&self) -> VfsOptions {
        let input_mode: InputMode = if self.single {
            InputMode::Single
        } else {
            InputMode::Dump
        };
        VfsOptions::default()
            .with_input_mode(input_mode)
            .with_fs_name(self.fs_name.clone())
            .with_allow_other(self.allow_other)
            .with_attr_ttl(Duration::from_secs(self.attr_ttl))
    }
}

/// Install the tracing subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level: &str = if verbose { "debug" } else { "info" };
    let filter: EnvFilter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: &CliArgs) -> Result<(), VfsError> {
    let options: VfsOptions = args.options();
    let inodes: INodeManager = load_file(&args.inputfile, &options)?;
    mount(BsonFs::new(inodes, options), &args.mountpoint)
}

fn main() -> ExitCode {
    let args: CliArgs = CliArgs::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "befuddle failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_both_positionals() {
        assert!(CliArgs::try_parse_from(["befuddle", "/mnt"]).is_err());
        assert!(CliArgs::try_parse_from(["befuddle", "/mnt", "in.bson", "extra"]).is_err());
    }

    #[test]
    fn test_options_from_args() {
        let args: CliArgs =
            CliArgs::try_parse_from(["befuddle", "/mnt", "in.bson", "--single", "--attr-ttl", "5"])
                .unwrap();
        let options: VfsOptions = args.options();
        assert_eq!(options.input_mode, InputMode::Single);
        assert_eq!(options.attr_ttl, Duration::from_secs(5));
        assert_eq!(options.fs_name, "befuddle");
    }
}
