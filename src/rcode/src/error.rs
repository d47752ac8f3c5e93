use std::borrow::Cow;
use std::fmt;

pub type Result<A, E = Error> = std::result::Result<A, E>;

/// Names the section being read when a short read occurs, so callers can
/// match on where a truncated buffer gave out instead of parsing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    V12Tail,
    SegmentTable,
    Signature,
    Body,
    Debug,
    TypeBlock,
    TypeBlockRecord,
    StringPool,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::V12Tail => "v12 tail",
            Section::SegmentTable => "segment table",
            Section::Signature => "signature block",
            Section::Body => "body segment",
            Section::Debug => "debug segment",
            Section::TypeBlock => "type block",
            Section::TypeBlockRecord => "type block record",
            Section::StringPool => "string pool",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("short read in {0}")]
    ShortRead(Section),

    #[error("invalid format: {0}")]
    InvalidFormat(Cow<'static, str>),

    #[error("unsupported r-code version {0}")]
    UnsupportedVersion(u16),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_format(reason: impl Into<Cow<'static, str>>) -> Error {
        Error::InvalidFormat(reason.into())
    }
}
