use std::fmt::Write as _;

/// Receives a hex dump of each block as it is consumed, for callers that
/// want to inspect the raw bytes behind a decoded section without
/// re-reading the input themselves.
///
/// This is independent of the `log` feature: it's always available and
/// carries the actual bytes, not a summary of the values extracted from
/// them.
pub trait DiagnosticSink {
    fn on_block(&mut self, label: &str, bytes: &[u8]);
}

/// Default sink: discards everything. Used when a caller passes no sink.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn on_block(&mut self, _label: &str, _bytes: &[u8]) {}
}

/// Formats `bytes` as a classic 16-byte hex dump with an ASCII gutter.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", row * 16);
        for b in chunk {
            let _ = write!(out, "{:02x} ", b);
        }
        for _ in chunk.len()..16 {
            out.push_str("   ");
        }
        out.push_str(" |");
        for &b in chunk {
            let c = if (0x20..0x7f).contains(&b) { b as char } else { '.' };
            out.push(c);
        }
        out.push_str("|\n");
    }
    out
}
