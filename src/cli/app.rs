use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "hexdet")]
#[command(about = "Binary file forensics toolkit")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Worker threads for batch scans (0 = rayon default)
    #[arg(long, default_value = "0", global = true)]
    pub threads: usize,

    /// Append an NDJSON audit trail of every write to this file
    #[arg(long = "audit-log", global = true)]
    pub audit_log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the file type and print a full analysis report
    Analyze {
        /// Path to the evidence file
        #[arg(short, long)]
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Analyze every file in a directory and print a summary table
    Scan {
        /// Evidence directory
        #[arg(short, long)]
        dir: String,

        /// Only include files with this extension (repeatable)
        #[arg(short, long = "ext")]
        extensions: Vec<String>,

        /// Print the full report for every file, not just the summary
        #[arg(short, long)]
        verbose: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Extract printable strings
    Strings {
        /// Path to the evidence file
        #[arg(short, long)]
        file: String,

        /// Minimum string length
        #[arg(short = 'n', long = "min-length", default_value = "4")]
        min_length: usize,

        /// Show the byte offset of each string
        #[arg(long)]
        offsets: bool,

        /// Keyword to highlight, case-insensitive (repeatable; defaults to a
        /// built-in list of message keywords)
        #[arg(long = "highlight")]
        highlight: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Hex dump of a byte range
    Dump {
        /// Path to the evidence file
        #[arg(short, long)]
        file: String,

        /// Byte offset to start dumping
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Number of bytes to dump
        #[arg(short, long, default_value = "256")]
        length: usize,

        /// Output raw binary bytes (no formatting)
        #[arg(long)]
        raw: bool,
    },

    /// Compare the header against a canonical signature
    Diagnose {
        /// Path to the evidence file
        #[arg(short, long)]
        file: String,

        /// Expected type (PNG, JPEG, GIF, PDF, ZIP)
        #[arg(short = 't', long = "type")]
        file_type: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Patch the header with a canonical signature
    Repair {
        /// Path to the corrupted file
        #[arg(short, long)]
        file: String,

        /// Target type (PNG, JPEG, GIF, PDF, ZIP)
        #[arg(short = 't', long = "type")]
        file_type: Option<String>,

        /// Choose the target type from evidence in the file
        #[arg(long)]
        auto: bool,

        /// Where to write the repaired file (default: <name>_repaired.<ext>)
        #[arg(long = "out")]
        out: Option<String>,

        /// Diagnose only, do not write anything
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Verify the written file afterwards
        #[arg(long)]
        verify: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check which canonical signature a file starts with
    Verify {
        /// Path to the file to verify
        #[arg(short, long)]
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Overwrite header bytes to produce corrupted test evidence
    Corrupt {
        /// Path to the file to corrupt in place
        #[arg(short, long)]
        file: String,

        /// Number of bytes to overwrite
        #[arg(short, long, default_value = "4")]
        bytes: usize,

        /// Offset of the first byte to overwrite
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Write zeros instead of random bytes
        #[arg(long)]
        zero: bool,

        /// Skip creating a backup before corrupting
        #[arg(long = "no-backup")]
        no_backup: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}
