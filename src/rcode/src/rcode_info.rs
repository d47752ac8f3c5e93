use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::error::{Error, Result, Section};
use crate::header::{HeaderDecoder, HeaderInfo};
use crate::model::TypeInfo;
use crate::options::DecodeOptions;
use crate::segments::{OffsetsTable, SegmentTable, SegmentVisitor};
use crate::signature::SignatureBlock;
use crate::type_block::TypeBlockDecoder;

struct NoopVisitor;
impl SegmentVisitor for NoopVisitor {}

fn read_block<'a>(
    bytes: &'a [u8],
    start: usize,
    len: usize,
    max_section_size: u32,
    section: Section,
) -> Result<&'a [u8]> {
    if len as u64 > max_section_size as u64 {
        return Err(Error::invalid_format(format!(
            "{} size {} exceeds the {} byte limit",
            section, len, max_section_size
        )));
    }
    let end = start.checked_add(len).ok_or(Error::ShortRead(section))?;
    bytes.get(start..end).ok_or(Error::ShortRead(section))
}

/// Everything decoded from one r-code image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RCodeInfo {
    pub header: HeaderInfo,
    pub offsets: OffsetsTable,
    pub signature: SignatureBlock,
    /// `None` for a procedure r-code (no type block present).
    pub type_info: Option<TypeInfo>,
}

impl RCodeInfo {
    /// `true` iff a type block was decoded (the image defines a class or
    /// interface rather than a procedure).
    pub fn is_class(&self) -> bool {
        self.type_info.is_some()
    }

    /// Decodes an r-code image in strict sequential order: header (plus
    /// the v12 tail), signature block, segment table, one-shot body read,
    /// then the type block. There is no backtracking between stages — each
    /// one consumes exactly the bytes the previous stage told it to expect.
    pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<RCodeInfo> {
        Self::decode_with(bytes, options, &mut NoopVisitor, &mut NullSink)
    }

    /// Same pipeline as `decode`, but routes the four body segments
    /// through `visitor` and every consumed block through `sink`.
    pub fn decode_with(
        bytes: &[u8],
        options: &DecodeOptions,
        visitor: &mut dyn SegmentVisitor,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RCodeInfo> {
        let (header, mut reader) = HeaderDecoder::decode(bytes)?;
        let header_end = reader.position() as usize;
        sink.on_block("header", &bytes[..header_end]);

        let signature_start = header_end;
        let signature_bytes = read_block(
            bytes,
            signature_start,
            header.signature_size as usize,
            options.max_section_size,
            Section::Signature,
        )?;
        sink.on_block("signature", signature_bytes);
        let signature = SignatureBlock::decode(signature_bytes)?;
        let signature_end = signature_start + signature_bytes.len();
        reader.seek(signature_end as u64);

        let segment_table_start = signature_end;
        let offsets = SegmentTable::decode(&mut reader, &header)?;
        let segment_table_end = reader.position() as usize;
        sink.on_block("segment_table", &bytes[segment_table_start..segment_table_end]);

        let body_start = segment_table_end;
        let body = read_block(
            bytes,
            body_start,
            header.rcode_size as usize,
            options.max_section_size,
            Section::Body,
        )?;
        sink.on_block("body", body);
        let body_end = body_start + body.len();
        reader.seek(body_end as u64);

        if let Some(slice) = SegmentTable::slice(body, offsets.initial_value, options.max_section_size)? {
            visitor.on_initial_value(slice)?;
        }
        if let Some(slice) = SegmentTable::slice(body, offsets.action, options.max_section_size)? {
            visitor.on_action(slice)?;
        }
        if let Some(slice) = SegmentTable::slice(body, offsets.ecode, options.max_section_size)? {
            visitor.on_ecode(slice)?;
        }
        if let Some(slice) = SegmentTable::slice(body, offsets.debug, options.max_section_size)? {
            visitor.on_debug(slice)?;
        }

        let type_info = if header.type_block_size > 0 {
            let type_block_start = body_end;
            let type_block_bytes = read_block(
                bytes,
                type_block_start,
                header.type_block_size as usize,
                options.max_section_size,
                Section::TypeBlock,
            )?;
            sink.on_block("type_block", type_block_bytes);
            Some(TypeBlockDecoder::decode(type_block_bytes, &header, options)?)
        } else {
            None
        };

        #[cfg(feature = "log")]
        log::debug!(
            "decoded r-code: version={} is_class={}",
            header.version,
            type_info.is_some()
        );

        Ok(RCodeInfo {
            header,
            offsets,
            signature,
            type_info,
        })
    }
}
