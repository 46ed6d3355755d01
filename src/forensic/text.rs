//! Printable-byte predicates and the plain-text heuristic.

/// Number of leading bytes sampled by [`looks_like_text`] unless told otherwise.
pub const DEFAULT_SAMPLE_SIZE: usize = 512;

/// Fraction of printable bytes a sample must exceed to count as text.
pub const TEXT_RATIO_THRESHOLD: f64 = 0.85;

/// Printable ASCII, `0x20..=0x7E`.
pub fn is_printable(byte: u8) -> bool {
    (32..=126).contains(&byte)
}

/// Printable ASCII plus tab, newline and carriage return.
pub fn is_text_byte(byte: u8) -> bool {
    is_printable(byte) || matches!(byte, b'\t' | b'\n' | b'\r')
}

/// Decide whether the first `sample_size` bytes of `data` look like text.
///
/// An empty sample is never text. The ratio test is strict: a sample that
/// is exactly 85% printable does not qualify.
pub fn looks_like_text(data: &[u8], sample_size: usize) -> bool {
    let sample = &data[..sample_size.min(data.len())];
    if sample.is_empty() {
        return false;
    }

    let printable = sample.iter().filter(|&&b| is_text_byte(b)).count();
    printable as f64 / sample.len() as f64 > TEXT_RATIO_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(printable: usize, total: usize) -> Vec<u8> {
        let mut data = vec![b'a'; printable];
        data.resize(total, 0x00);
        data
    }

    #[test]
    fn test_ninety_percent_is_text() {
        assert!(looks_like_text(&sample(461, 512), 512));
    }

    #[test]
    fn test_half_printable_is_not_text() {
        assert!(!looks_like_text(&sample(256, 512), 512));
    }

    #[test]
    fn test_exact_threshold_is_not_text() {
        // 85 of 100 is exactly 0.85; the comparison is strict.
        assert!(!looks_like_text(&sample(85, 100), 512));
        assert!(looks_like_text(&sample(86, 100), 512));
    }

    #[test]
    fn test_empty_is_not_text() {
        assert!(!looks_like_text(&[], 512));
        assert!(!looks_like_text(b"hello", 0));
    }

    #[test]
    fn test_only_sample_window_counts() {
        let mut data = vec![b'x'; 512];
        data.extend(vec![0u8; 4096]);
        assert!(looks_like_text(&data, 512));
        assert!(!looks_like_text(&data, 4096));
    }

    #[test]
    fn test_whitespace_controls_count_as_text() {
        assert!(looks_like_text(b"a\tb\r\nc\n", 512));
        assert!(is_text_byte(b'\t'));
        assert!(!is_printable(b'\t'));
        assert!(!is_printable(0x7f));
    }
}
