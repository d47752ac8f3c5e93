use crate::byte_reader::{ByteReader, Endian};
use crate::error::{Result, Section};

/// One record from the signature block's element list: the raw
/// null-terminated text, plus whether it is one of the `DSET`/`TTAB`
/// element kinds this crate skips without interpreting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRecord {
    pub text: String,
    pub skipped: bool,
}

fn is_skipped(text: &str) -> bool {
    text.starts_with("DSET") || text.starts_with("TTAB")
}

/// Decoded signature block: an ASCII-hex preamble (`preambleSize`,
/// `numElements`) followed by that many null-terminated element records
/// starting at `preambleSize`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureBlock {
    pub preamble_size: u32,
    pub element_count: u32,
    pub records: Vec<SignatureRecord>,
}

impl SignatureBlock {
    /// Reads the 4-ASCII-hex-digit `preambleSize` and `numElements` fields,
    /// skips the informational byte and null-terminated encoding name that
    /// follow, then seeks to `preambleSize` and reads `numElements`
    /// null-terminated records. Records are consumed identically whether
    /// or not they carry a `DSET`/`TTAB` prefix — only `skipped` differs.
    pub fn decode(bytes: &[u8]) -> Result<SignatureBlock> {
        #[cfg(feature = "log")]
        log::trace!("decoding signature block, {} bytes", bytes.len());

        let mut reader = ByteReader::new(bytes, Endian::Big);
        let preamble_size = reader.read_ascii_hex(4, Section::Signature)?;
        let element_count = reader.read_ascii_hex(4, Section::Signature)?;

        reader.seek(preamble_size as u64);
        let mut records = Vec::with_capacity(element_count as usize);
        for _ in 0..element_count {
            let raw = reader.read_cstring(Section::Signature)?;
            let text = String::from_utf8_lossy(&raw).into_owned();
            let skipped = is_skipped(&text);
            records.push(SignatureRecord { text, skipped });
        }

        #[cfg(feature = "log")]
        log::debug!("signature block: preamble_size={} {} records", preamble_size, records.len());

        Ok(SignatureBlock { preamble_size, element_count, records })
    }
}
