//! Decoder for OpenEdge/Progress ABL r-code: the compiled-class binary
//! format consumed by static analysis tooling. Given a whole r-code image
//! as bytes, `RCodeInfo::decode` walks the header, segment table,
//! signature block and type block and returns an owned, thread-safe
//! description of the class or interface it defines.

pub mod byte_reader;
pub mod diagnostics;
pub mod error;
pub mod header;
pub mod model;
pub mod options;
pub mod rcode_info;
pub mod segments;
pub mod signature;
pub mod type_block;

#[cfg(test)]
mod testutil;

pub use byte_reader::{ByteReader, Endian};
pub use diagnostics::{hex_dump, DiagnosticSink, NullSink};
pub use error::{Error, Result, Section};
pub use header::{HeaderDecoder, HeaderInfo};
pub use model::*;
pub use options::{Charset, DecodeOptions};
pub use rcode_info::RCodeInfo;
pub use segments::{OffsetsTable, SegmentOffset, SegmentTable, SegmentVisitor};
pub use signature::{SignatureBlock, SignatureRecord};
pub use type_block::TypeBlockDecoder;
