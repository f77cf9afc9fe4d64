use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn rustc / cargo JSON diagnostics into CI annotations.", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        env = "INPUT_PATH",
        help = "The .rs file to verify, or the crate directory with --verify-crate."
    )]
    pub path: Option<PathBuf>,

    #[arg(
        long = "verify-crate",
        env = "INPUT_VERIFY-CRATE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool),
        help = "Verify a whole crate through the cargo wrapper instead of a single file."
    )]
    pub verify_crate: Option<bool>,

    #[arg(
        long = "annotation-path",
        env = "INPUT_ANNOTATIONPATH",
        help = "Prefix for crate-relative file names in annotations."
    )]
    pub annotation_path: Option<PathBuf>,

    #[arg(
        long,
        short = 'i',
        help = "Read an already captured diagnostic stream from FILE ('-' for stdin) instead of running the verifier."
    )]
    pub input: Option<PathBuf>,

    #[arg(long, short = 'c', help = "TOML config file.")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "keep-abort-summaries",
        default_value_t = false,
        help = "Also annotate the 'aborting due to N previous errors' summaries."
    )]
    pub keep_abort_summaries: bool,

    #[arg(long, help = "Edition passed to the compiler driver (default: 2018).")]
    pub edition: Option<String>,

    #[arg(long, help = "Compiler driver for single files (default: prusti-rustc).")]
    pub rustc: Option<String>,

    #[arg(long, help = "Cargo wrapper for crates (default: cargo-prusti).")]
    pub cargo: Option<String>,

    #[arg(last = true, help = "Additional arguments passed to the verifier.")]
    pub extra: Vec<String>,
}
