use crate::error::{Error, Result};
use crate::options::Charset;

/// The type block's self-referencing string pool: every name in the block
/// (type name, member names, class references) is stored as an absolute
/// byte offset into this same buffer, pointing at a null-terminated run of
/// bytes. Offset `0` denotes an absent/empty name rather than the byte at
/// index zero (the leading record itself starts there).
pub struct StringPool<'a> {
    bytes: &'a [u8],
    charset: Charset,
}

impl<'a> StringPool<'a> {
    pub fn new(bytes: &'a [u8], charset: Charset) -> StringPool<'a> {
        StringPool { bytes, charset }
    }

    pub fn resolve(&self, offset: u32) -> Result<String> {
        if offset == 0 {
            return Ok(String::new());
        }
        let start = offset as usize;
        let slice = self.bytes.get(start..).ok_or_else(|| {
            Error::invalid_format(format!(
                "string pool offset {} is out of bounds of a {}-byte pool",
                start,
                self.bytes.len()
            ))
        })?;
        let end = slice
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::invalid_format(format!("string pool entry at offset {} has no terminator", start)))?;
        Ok(self.charset.decode(&slice[..end]))
    }

    pub fn resolve_optional(&self, offset: u32) -> Result<Option<String>> {
        if offset == 0 {
            return Ok(None);
        }
        self.resolve(offset).map(Some)
    }
}
