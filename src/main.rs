#[cfg(not(feature = "cli"))]
compile_error!("The `hexdet` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;
use std::sync::Arc;

use hexdet::cli;
use hexdet::cli::app::{Cli, ColorMode, Commands};
use hexdet::util::audit::AuditLogger;
use hexdet::HexdetError;

fn main() {
    let cli = Cli::parse();

    // Configure rayon thread pool if --threads was specified
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok(); // Ignore if already initialized
    }

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, HexdetError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| HexdetError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let audit_logger: Option<Arc<AuditLogger>> = match &cli.audit_log {
        Some(path) => {
            let logger = match AuditLogger::open(path) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            };
            let args: Vec<String> = std::env::args().collect();
            let _ = logger.start_session(args);
            Some(Arc::new(logger))
        }
        None => None,
    };

    let result = match cli.command {
        Commands::Analyze { file, json } => {
            cli::analyze::execute(&cli::analyze::AnalyzeOptions { file, json }, &mut writer)
        }

        Commands::Scan {
            dir,
            extensions,
            verbose,
            json,
        } => cli::scan::execute(
            &cli::scan::ScanOptions {
                dir,
                extensions,
                verbose,
                json,
            },
            &mut writer,
        ),

        Commands::Strings {
            file,
            min_length,
            offsets,
            highlight,
            json,
        } => cli::strings::execute(
            &cli::strings::StringsOptions {
                file,
                min_length,
                offsets,
                highlight,
                json,
            },
            &mut writer,
        ),

        Commands::Dump {
            file,
            offset,
            length,
            raw,
        } => cli::dump::execute(
            &cli::dump::DumpOptions {
                file,
                offset,
                length,
                raw,
            },
            &mut writer,
        ),

        Commands::Diagnose {
            file,
            file_type,
            json,
        } => cli::diagnose::execute(
            &cli::diagnose::DiagnoseOptions {
                file,
                file_type,
                json,
            },
            &mut writer,
        ),

        Commands::Repair {
            file,
            file_type,
            auto,
            out,
            dry_run,
            verify,
            json,
        } => cli::repair::execute(
            &cli::repair::RepairOptions {
                file,
                file_type,
                auto,
                out,
                dry_run,
                verify,
                json,
                audit_logger: audit_logger.clone(),
            },
            &mut writer,
        ),

        Commands::Verify { file, json } => {
            cli::verify::execute(&cli::verify::VerifyOptions { file, json }, &mut writer)
        }

        Commands::Corrupt {
            file,
            bytes,
            offset,
            zero,
            no_backup,
        } => cli::corrupt::execute(
            &cli::corrupt::CorruptOptions {
                file,
                bytes,
                offset,
                zero,
                no_backup,
                audit_logger: audit_logger.clone(),
            },
            &mut writer,
        ),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "hexdet", &mut std::io::stdout());
            Ok(())
        }
    };

    // End audit session if logger was created
    if let Some(ref logger) = audit_logger {
        let _ = logger.end_session();
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
