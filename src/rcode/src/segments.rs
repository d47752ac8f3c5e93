use crate::byte_reader::ByteReader;
use crate::error::{Error, Result, Section};
use crate::header::HeaderInfo;

/// Fixed byte layout of the segment table, relative to its own start.
/// Offset/size pairs are columnar (all four offsets, then all four sizes)
/// rather than interleaved.
const OFFSET_INITIAL_VALUE: u64 = 0;
const OFFSET_ACTION: u64 = 4;
const OFFSET_ECODE: u64 = 8;
const OFFSET_DEBUG: u64 = 12;
const SIZE_INITIAL_VALUE: u64 = 16;
const SIZE_ACTION: u64 = 20;
const SIZE_ECODE: u64 = 24;
const SIZE_DEBUG: u64 = 28;
const SIZE_IPACS: u64 = 32;
const SIZE_FRAME: u64 = 34;
const SIZE_TEXT: u64 = 36;

/// Minimum byte size of the fixed fields; a larger `segmentTableSize` just
/// means trailing padding this crate doesn't interpret.
const FIXED_SIZE: u64 = 38;

/// Offset and size of one of the four body segments: a signed byte offset
/// into the body buffer (a negative offset marks a segment that isn't
/// present) paired with an unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOffset {
    pub offset: i32,
    pub size: u32,
}

impl SegmentOffset {
    pub fn is_present(&self) -> bool {
        self.offset >= 0 && self.size > 0
    }
}

/// Decoded segment table: the four body segments plus the three trailing
/// size-only fields. None of these address the file directly — the four
/// offset/size pairs are relative into the `rcodeSize`-byte body buffer
/// read immediately after this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetsTable {
    pub initial_value: SegmentOffset,
    pub action: SegmentOffset,
    pub ecode: SegmentOffset,
    pub debug: SegmentOffset,
    pub ipacs_size: u16,
    pub frame_size: u16,
    pub text_size: u16,
}

pub struct SegmentTable;

impl SegmentTable {
    /// Reads the fixed-shape segment table: four `i32` offset / `u32` size
    /// pairs at fixed byte offsets, followed by three `u16` sizes, then
    /// seeks the reader to the end of the `segmentTableSize`-byte block
    /// (skipping any trailing padding beyond the fixed fields).
    pub fn decode(reader: &mut ByteReader, header: &HeaderInfo) -> Result<OffsetsTable> {
        let start = reader.position();
        if (header.segment_table_size as u64) < FIXED_SIZE {
            return Err(Error::invalid_format(format!(
                "segment table size {} is smaller than the fixed layout ({} bytes)",
                header.segment_table_size, FIXED_SIZE
            )));
        }

        #[cfg(feature = "log")]
        log::trace!("decoding segment table, {} bytes", header.segment_table_size);

        reader.seek(start + OFFSET_INITIAL_VALUE);
        let off_initial_value = reader.read_i32(Section::SegmentTable)?;
        reader.seek(start + OFFSET_ACTION);
        let off_action = reader.read_i32(Section::SegmentTable)?;
        reader.seek(start + OFFSET_ECODE);
        let off_ecode = reader.read_i32(Section::SegmentTable)?;
        reader.seek(start + OFFSET_DEBUG);
        let off_debug = reader.read_i32(Section::SegmentTable)?;

        reader.seek(start + SIZE_INITIAL_VALUE);
        let size_initial_value = reader.read_u32(Section::SegmentTable)?;
        reader.seek(start + SIZE_ACTION);
        let size_action = reader.read_u32(Section::SegmentTable)?;
        reader.seek(start + SIZE_ECODE);
        let size_ecode = reader.read_u32(Section::SegmentTable)?;
        reader.seek(start + SIZE_DEBUG);
        let size_debug = reader.read_u32(Section::SegmentTable)?;

        reader.seek(start + SIZE_IPACS);
        let ipacs_size = reader.read_u16(Section::SegmentTable)?;
        reader.seek(start + SIZE_FRAME);
        let frame_size = reader.read_u16(Section::SegmentTable)?;
        reader.seek(start + SIZE_TEXT);
        let text_size = reader.read_u16(Section::SegmentTable)?;

        reader.seek(start + header.segment_table_size as u64);

        let table = OffsetsTable {
            initial_value: SegmentOffset { offset: off_initial_value, size: size_initial_value },
            action: SegmentOffset { offset: off_action, size: size_action },
            ecode: SegmentOffset { offset: off_ecode, size: size_ecode },
            debug: SegmentOffset { offset: off_debug, size: size_debug },
            ipacs_size,
            frame_size,
            text_size,
        };

        #[cfg(feature = "log")]
        log::debug!("segment table: {:?}", table);

        Ok(table)
    }

    /// Slices out the raw bytes of one segment from the already fully-read
    /// body buffer, enforcing the oversize guard from `DecodeOptions`.
    /// Returns `None` when the segment is absent.
    pub fn slice<'a>(body: &'a [u8], segment: SegmentOffset, max_section_size: u32) -> Result<Option<&'a [u8]>> {
        if !segment.is_present() {
            return Ok(None);
        }
        if segment.size > max_section_size {
            return Err(Error::invalid_format(format!(
                "segment size {} exceeds the {} byte limit",
                segment.size, max_section_size
            )));
        }
        let start = segment.offset as usize;
        let end = start
            .checked_add(segment.size as usize)
            .ok_or_else(|| Error::invalid_format("segment offset/size overflow"))?;
        body.get(start..end).map(Some).ok_or_else(|| {
            Error::invalid_format(format!(
                "segment [{}..{}) is out of bounds of a {}-byte body",
                start,
                end,
                body.len()
            ))
        })
    }
}

/// Capability hook for processing the four body segments without forcing
/// every caller to decode payloads they don't need. `TypeBlock` and
/// `SignatureBlock` have their own dedicated decoders and aren't routed
/// through this trait.
pub trait SegmentVisitor {
    fn on_initial_value(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn on_action(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn on_ecode(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    /// Debug segment format is undocumented; the default implementation
    /// ignores it.
    fn on_debug(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }
}
