use crate::byte_reader::{ByteReader, Endian};
use crate::error::{Error, Result, Section};

/// Canonical magic number, stored big-endian in the file. A little-endian
/// r-code image stores the same four bytes in the reverse order, so
/// endianness is detected by trying both interpretations of the first four
/// bytes rather than by a separate flag.
pub const MAGIC: u32 = 0x56CE_D309;

/// Size in bytes of the primary header, identical for v11 and v12 images.
pub const HEADER_SIZE: usize = 68;

/// Size in bytes of the trailer that v12 images append after the primary
/// header. v11 images have no trailer.
pub const V12_TAIL_SIZE: usize = 16;

/// Version numbers below this belong to a pre-v11 r-code generation this
/// crate doesn't decode.
pub const MIN_SUPPORTED_VERSION: u16 = 1100;

/// Version numbers at or above this select the v12 header shape (primary
/// header plus 16-byte tail) instead of v11's bare 68-byte header.
pub const V12_VERSION_THRESHOLD: u16 = 1200;

const VERSION_OFFSET: usize = 14;
const VERSION_MASK: u16 = 0x3FFF;
const IS_64_BIT_BIT: u16 = 0x4000;

const TIMESTAMP_OFFSET: usize = 4;
const DIGEST_OFFSET_V11: usize = 10;
const DIGEST_OFFSET_V12: usize = 22;
const SEGMENT_TABLE_SIZE_OFFSET: usize = 0x1E;
const SIGNATURE_SIZE_OFFSET: usize = 56;
const TYPE_BLOCK_SIZE_OFFSET: usize = 60;
const RCODE_SIZE_OFFSET_V11: usize = 64;
const RCODE_SIZE_OFFSET_V12_TAIL: usize = 12;

/// Decoded primary header plus, for v12 images, the fields carried in the
/// trailing 16 bytes.
///
/// | Field                | v11 offset | v12 offset        |
/// | -------------------- | ---------- | ----------------- |
/// | `version`            | 14         | 14                |
/// | `timestamp`          | 4          | 4                 |
/// | `digest_offset`      | 10         | 22                |
/// | `segment_table_size` | 0x1E       | 0x1E              |
/// | `signature_size`     | 56         | 56                |
/// | `type_block_size`    | 60         | 60                |
/// | `rcode_size`         | 64         | tail offset 12    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub endian: Endian,
    /// Full 14-bit version number, e.g. `1210`.
    pub version: u16,
    pub is_64_bit: bool,
    pub timestamp: u32,
    pub digest_offset: u16,
    pub segment_table_size: u16,
    pub signature_size: u32,
    pub type_block_size: u32,
    pub rcode_size: u32,
}

impl HeaderInfo {
    pub fn is_v12(&self) -> bool {
        self.version >= V12_VERSION_THRESHOLD
    }
}

fn read_u16_at(bytes: &[u8], offset: usize, endian: Endian) -> Result<u16> {
    let raw: [u8; 2] = bytes
        .get(offset..offset + 2)
        .ok_or(Error::ShortRead(Section::Header))?
        .try_into()
        .unwrap();
    Ok(match endian {
        Endian::Big => u16::from_be_bytes(raw),
        Endian::Little => u16::from_le_bytes(raw),
    })
}

fn read_u32_at(bytes: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    let raw: [u8; 4] = bytes
        .get(offset..offset + 4)
        .ok_or(Error::ShortRead(Section::Header))?
        .try_into()
        .unwrap();
    Ok(match endian {
        Endian::Big => u32::from_be_bytes(raw),
        Endian::Little => u32::from_le_bytes(raw),
    })
}

pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Detects endianness from the magic, then decodes the primary header
    /// and (for v12) its tail. Returns the decoded header and a reader
    /// positioned immediately after everything the header occupies, ready
    /// for the signature block.
    pub fn decode<'a>(bytes: &'a [u8]) -> Result<(HeaderInfo, ByteReader<'a>)> {
        if bytes.len() < 4 {
            return Err(Error::ShortRead(Section::Header));
        }
        let raw: [u8; 4] = bytes[0..4].try_into().unwrap();
        let endian = if u32::from_be_bytes(raw) == MAGIC {
            Endian::Big
        } else if u32::from_le_bytes(raw) == MAGIC {
            Endian::Little
        } else {
            return Err(Error::invalid_format("bad r-code magic number"));
        };

        #[cfg(feature = "log")]
        log::trace!("decoding header, {} bytes available, endian {:?}", bytes.len(), endian);

        if bytes.len() < HEADER_SIZE {
            return Err(Error::ShortRead(Section::Header));
        }

        let version_word = read_u16_at(bytes, VERSION_OFFSET, endian)?;
        let version = version_word & VERSION_MASK;
        let is_64_bit = version_word & IS_64_BIT_BIT != 0;

        if version < MIN_SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let is_v12 = version >= V12_VERSION_THRESHOLD;

        let timestamp = read_u32_at(bytes, TIMESTAMP_OFFSET, endian)?;
        let digest_offset = read_u16_at(
            bytes,
            if is_v12 { DIGEST_OFFSET_V12 } else { DIGEST_OFFSET_V11 },
            endian,
        )?;
        let segment_table_size = read_u16_at(bytes, SEGMENT_TABLE_SIZE_OFFSET, endian)?;
        let signature_size = read_u32_at(bytes, SIGNATURE_SIZE_OFFSET, endian)?;
        let type_block_size = read_u32_at(bytes, TYPE_BLOCK_SIZE_OFFSET, endian)?;

        let (rcode_size, reader_start) = if is_v12 {
            if bytes.len() < HEADER_SIZE + V12_TAIL_SIZE {
                return Err(Error::ShortRead(Section::V12Tail));
            }
            let tail_offset = HEADER_SIZE + RCODE_SIZE_OFFSET_V12_TAIL;
            let rcode_size = read_u32_at(bytes, tail_offset, endian)?;
            (rcode_size, HEADER_SIZE + V12_TAIL_SIZE)
        } else {
            let rcode_size = read_u32_at(bytes, RCODE_SIZE_OFFSET_V11, endian)?;
            (rcode_size, HEADER_SIZE)
        };

        let mut reader = ByteReader::new(bytes, endian);
        reader.seek(reader_start as u64);

        let info = HeaderInfo {
            endian,
            version,
            is_64_bit,
            timestamp,
            digest_offset,
            segment_table_size,
            signature_size,
            type_block_size,
            rcode_size,
        };

        #[cfg(feature = "log")]
        log::debug!(
            "header: version={} is_64_bit={} signature_size={} segment_table_size={} rcode_size={} type_block_size={}",
            info.version, info.is_64_bit, info.signature_size, info.segment_table_size, info.rcode_size, info.type_block_size
        );

        Ok((info, reader))
    }
}
