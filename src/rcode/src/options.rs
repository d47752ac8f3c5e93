/// Character set used to decode string-pool bytes into `String`.
///
/// Legacy r-code produced by older OpenEdge releases may carry a codepage
/// other than UTF-8; this crate only implements the common case but keeps
/// the choice explicit so callers aren't silently assuming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Utf8
    }
}

impl Charset {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Caller-configurable limits and choices for a single `decode` call.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Any single segment larger than this is treated as `InvalidFormat`
    /// rather than allocated, guarding against a corrupt size field
    /// driving an unbounded allocation.
    pub max_section_size: u32,
    pub charset: Charset,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_section_size: 64 * 1024 * 1024,
            charset: Charset::default(),
        }
    }
}
