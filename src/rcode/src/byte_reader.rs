use std::io::{Cursor, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{Error, Result, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Sequential cursor over an in-memory r-code buffer.
///
/// Every read advances the position; there is no seeking back. Short reads
/// are reported as `Error::ShortRead(section)` rather than the raw
/// `std::io::Error`, so a decoder can attribute the failure to the segment
/// it was reading.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], endian: Endian) -> ByteReader<'a> {
        ByteReader {
            cursor: Cursor::new(bytes),
            endian,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn remaining(&self) -> u64 {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position())
    }

    pub fn seek(&mut self, position: u64) {
        self.cursor.set_position(position);
    }

    pub fn read_u8(&mut self, section: Section) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| Error::ShortRead(section))
    }

    pub fn read_u16(&mut self, section: Section) -> Result<u16> {
        match self.endian {
            Endian::Little => self.cursor.read_u16::<LittleEndian>(),
            Endian::Big => self.cursor.read_u16::<BigEndian>(),
        }
        .map_err(|_| Error::ShortRead(section))
    }

    pub fn read_u32(&mut self, section: Section) -> Result<u32> {
        match self.endian {
            Endian::Little => self.cursor.read_u32::<LittleEndian>(),
            Endian::Big => self.cursor.read_u32::<BigEndian>(),
        }
        .map_err(|_| Error::ShortRead(section))
    }

    pub fn read_i32(&mut self, section: Section) -> Result<i32> {
        match self.endian {
            Endian::Little => self.cursor.read_i32::<LittleEndian>(),
            Endian::Big => self.cursor.read_i32::<BigEndian>(),
        }
        .map_err(|_| Error::ShortRead(section))
    }

    pub fn read_u64(&mut self, section: Section) -> Result<u64> {
        match self.endian {
            Endian::Little => self.cursor.read_u64::<LittleEndian>(),
            Endian::Big => self.cursor.read_u64::<BigEndian>(),
        }
        .map_err(|_| Error::ShortRead(section))
    }

    /// Reads a pointer-sized field: 4 bytes widened to `u64` normally, or
    /// 8 bytes read directly when the r-code was produced by a 64-bit
    /// runtime (`HeaderInfo::is_64_bit`).
    pub fn read_word(&mut self, is_64_bit: bool, section: Section) -> Result<u64> {
        if is_64_bit {
            self.read_u64(section)
        } else {
            self.read_u32(section).map(u64::from)
        }
    }

    pub fn read_exact(&mut self, len: usize, section: Section) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| Error::ShortRead(section))?;
        Ok(buf)
    }

    /// Reads a null-terminated byte string starting at the current
    /// position, leaving the cursor just past the terminator.
    pub fn read_cstring(&mut self, section: Section) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let b = self.read_u8(section)?;
            if b == 0 {
                break;
            }
            out.push(b);
        }
        Ok(out)
    }

    /// Reads `length` bytes as ASCII and parses them as a hexadecimal
    /// integer, the encoding the signature block's preamble fields use
    /// instead of binary integers.
    pub fn read_ascii_hex(&mut self, length: usize, section: Section) -> Result<u32> {
        let bytes = self.read_exact(length, section)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| Error::invalid_format("ascii hex field is not valid utf-8"))?;
        u32::from_str_radix(text, 16).map_err(|_| Error::invalid_format("ascii hex field is not hexadecimal"))
    }
}
