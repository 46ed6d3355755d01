//! Hex dump formatting utilities.
//!
//! Helpers for formatting byte offsets and hex strings, and for producing a
//! traditional hex dump with an offset column and an ASCII sidebar.

/// Bytes shown per hex dump line.
pub const BYTES_PER_LINE: usize = 16;

/// Width of the hex column: 16 two-digit bytes separated by single spaces.
const HEX_COLUMN_WIDTH: usize = BYTES_PER_LINE * 3 - 1;

/// Format a byte offset as "decimal (0xhex)".
pub fn format_offset(offset: u64) -> String {
    format!("{} (0x{:x})", offset, offset)
}

/// Format bytes as a compact hex string (e.g., "4a2f00ff").
pub fn format_bytes(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Format bytes as space-separated hex (e.g., "89 50 4e 47").
pub fn format_spaced(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render bytes as ASCII, replacing anything outside `0x20..0x7F` with `.`.
pub fn ascii_preview(data: &[u8]) -> String {
    data.iter()
        .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
        .collect()
}

/// Produce a hex dump of `data` whose first byte sits at `base_offset`.
///
/// Output format (16 bytes per line):
/// ```text
/// 00000000  89 50 4e 47 0d 0a 1a 0a 00 00 00 0d 49 48 44 52  |.PNG........IHDR|
/// ```
/// A short final line is padded so the ASCII column stays aligned.
pub fn hex_dump(data: &[u8], base_offset: u64) -> String {
    let mut lines = Vec::new();

    for (i, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let offset = base_offset + (i * BYTES_PER_LINE) as u64;
        lines.push(format!(
            "{:08x}  {:<width$}  |{}|",
            offset,
            format_spaced(chunk),
            ascii_preview(chunk),
            width = HEX_COLUMN_WIDTH
        ));
    }

    lines.join("\n")
}

/// Hex dump of the half-open range `[start, start + length)` of `data`.
///
/// The range is clipped to the buffer; a `start` at or past the end renders
/// nothing. Offsets in the output are absolute.
pub fn render(data: &[u8], start: usize, length: usize) -> String {
    if start >= data.len() {
        return String::new();
    }
    let end = start.saturating_add(length).min(data.len());
    hex_dump(&data[start..end], start as u64)
}
