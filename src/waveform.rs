//! Sample-sequence formatting for waveform uploads.
//!
//! The instrument imports waveforms from text files holding one decimal
//! sample per line; the file content travels inside an IEEE-488.2 style
//! definite-length block on `MMEMory:DOWNload:DATA`.

/// Number of samples in the convenience square pattern.
const DEFAULT_SQUARE_LEN: usize = 20;

/// Serialize samples as CR/LF-delimited decimal text, the record format
/// expected by the waveform import.
pub fn records(samples: &[f64]) -> String {
    samples
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Alternating 0/1 pattern used as upload payload when the caller supplies
/// no samples. A bench convenience, not a production path.
pub fn default_square() -> Vec<f64> {
    let mut samples = Vec::with_capacity(DEFAULT_SQUARE_LEN);
    while samples.len() < DEFAULT_SQUARE_LEN {
        samples.push(0.0);
        samples.push(1.0);
    }
    samples
}

/// Definite-length block header: `#`, the digit count of the payload
/// length, then the length itself. The payload length is a character
/// count, so it must be computed on the serialized text.
pub fn block_prefix(payload_len: usize) -> String {
    let len = payload_len.to_string();
    format!("#{}{}", len.len(), len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_crlf_joined() {
        assert_eq!(records(&[0.0, 1.0, 0.0, 1.0]), "0\r\n1\r\n0\r\n1");
        assert_eq!(records(&[1.5, -0.25]), "1.5\r\n-0.25");
        assert_eq!(records(&[]), "");
    }

    #[test]
    fn default_square_alternates() {
        let samples = default_square();
        assert_eq!(samples.len(), DEFAULT_SQUARE_LEN);
        for pair in samples.chunks(2) {
            assert_eq!(pair, [0.0, 1.0]);
        }
    }

    #[test]
    fn block_prefix_counts_digits() {
        assert_eq!(block_prefix(7), "#17");
        assert_eq!(block_prefix(10), "#210");
        assert_eq!(block_prefix(999), "#3999");
        assert_eq!(block_prefix(123456), "#6123456");
    }
}
