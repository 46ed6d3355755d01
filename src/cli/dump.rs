use std::io::Write;

use crate::cli::wprintln;
use crate::forensic::inspector::FileInspector;
use crate::util::hex::format_offset;
use crate::HexdetError;

/// Options for the `hexdet dump` subcommand.
pub struct DumpOptions {
    pub file: String,
    pub offset: usize,
    pub length: usize,
    pub raw: bool,
}

pub fn execute(opts: &DumpOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let mut inspector = FileInspector::new();
    let file_size = inspector.load(&opts.file)?;

    if opts.offset >= file_size && file_size > 0 {
        return Err(HexdetError::Argument(format!(
            "Offset {} is beyond file size {}",
            opts.offset, file_size
        )));
    }

    let end = opts.offset.saturating_add(opts.length).min(file_size);
    let dump_len = end.saturating_sub(opts.offset);

    if opts.raw {
        writer
            .write_all(&inspector.data()[opts.offset.min(end)..end])
            .map_err(|e| HexdetError::Io(format!("Cannot write to stdout: {}", e)))?;
        return Ok(());
    }

    wprintln!(
        writer,
        "Hex dump of {} at offset {} ({} bytes):",
        opts.file,
        format_offset(opts.offset as u64),
        dump_len
    )?;
    wprintln!(writer)?;
    wprintln!(writer, "{}", inspector.hexdump(opts.offset, opts.length))?;

    Ok(())
}
