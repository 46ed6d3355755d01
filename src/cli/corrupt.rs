use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cli::wprintln;
use crate::forensic::buffer;
use crate::forensic::repair::BytePatch;
use crate::util::audit::AuditLogger;
use crate::util::fs::create_backup;
use crate::util::hex::format_bytes;
use crate::HexdetError;

/// Options for the `hexdet corrupt` subcommand.
pub struct CorruptOptions {
    /// File to corrupt in place.
    pub file: String,
    /// Number of bytes to overwrite.
    pub bytes: usize,
    /// Offset of the first overwritten byte.
    pub offset: usize,
    /// Write zeros instead of random bytes.
    pub zero: bool,
    /// Skip the `.bak` copy.
    pub no_backup: bool,
    /// Audit logger for recording write operations.
    pub audit_logger: Option<Arc<AuditLogger>>,
}

/// Overwrite `count` bytes starting at `offset`, clipped to the buffer.
///
/// Returns the bytes whose value actually changed.
pub fn corrupt_bytes(
    data: &mut [u8],
    offset: usize,
    count: usize,
    mut next: impl FnMut() -> u8,
) -> Vec<BytePatch> {
    let end = offset.saturating_add(count).min(data.len());
    let mut patches = Vec::new();
    for (i, slot) in data.iter_mut().enumerate().take(end).skip(offset) {
        let new = next();
        if *slot != new {
            patches.push(BytePatch {
                offset: i,
                old: *slot,
                new,
            });
        }
        *slot = new;
    }
    patches
}

/// Damage header bytes of a file in place to produce test evidence.
pub fn execute(opts: &CorruptOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let path = Path::new(&opts.file);
    let mut data = buffer::read_all(path)?;

    if opts.offset >= data.len() {
        return Err(HexdetError::Argument(format!(
            "Offset {} is beyond file size {}",
            opts.offset,
            data.len()
        )));
    }

    if !opts.no_backup {
        let backup = create_backup(&opts.file)?;
        wprintln!(writer, "Backup created: {}", backup.display())?;
        if let Some(ref logger) = opts.audit_logger {
            let _ = logger.log_backup(&opts.file, &backup.display().to_string());
        }
    }

    let patches = if opts.zero {
        corrupt_bytes(&mut data, opts.offset, opts.bytes, || 0)
    } else {
        corrupt_bytes(&mut data, opts.offset, opts.bytes, rand::random::<u8>)
    };
    let end = opts.offset.saturating_add(opts.bytes).min(data.len());

    wprintln!(
        writer,
        "Writing {} bytes of {} data to {} at offset {}...",
        end - opts.offset,
        if opts.zero { "zero" } else { "random" },
        opts.file,
        opts.offset
    )?;

    buffer::write_all(path, &data)?;

    if let Some(ref logger) = opts.audit_logger {
        let _ = logger.log_patches(&opts.file, "corrupt", &patches);
        let _ = logger.log_file_write(&opts.file, "corrupt", data.len() as u64, None);
    }

    wprintln!(writer, "Data written: {}", format_bytes(&data[opts.offset..end]))?;
    for p in &patches {
        wprintln!(writer, "  Byte {}: {:02x} -> {:02x}", p.offset, p.old, p.new)?;
    }
    wprintln!(writer, "Completed.")?;

    Ok(())
}
