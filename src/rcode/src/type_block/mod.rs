mod string_pool;
mod v11;
mod v12;

pub use string_pool::StringPool;

use crate::byte_reader::ByteReader;
use crate::error::{Error, Result, Section};
use crate::header::HeaderInfo;
use crate::model::{
    AccessFlags, DataType, FieldElement, Flags, IndexComponent, IndexElement, ParameterElement, ParameterMode,
    PrimitiveDataType, PropertyAccessor, CLASS_TAG, NOT_COMPUTED_TAG,
};
use crate::model::TypeInfo;
use crate::options::DecodeOptions;

pub struct TypeBlockDecoder;

impl TypeBlockDecoder {
    /// Dispatches to the v11 or v12 record layout based on the image's
    /// version, sharing everything else (string pool, data type and
    /// parameter decoding) between the two.
    pub fn decode(bytes: &[u8], header: &HeaderInfo, options: &DecodeOptions) -> Result<TypeInfo> {
        #[cfg(feature = "log")]
        log::trace!("decoding type block, {} bytes, v12={}", bytes.len(), header.is_v12());

        if header.is_v12() {
            v12::decode(bytes, header.endian, header.is_64_bit, options.charset)
        } else {
            v11::decode(bytes, header.endian, header.is_64_bit, options.charset)
        }
    }
}

/// Reads a `(tag: u32, class_name_offset: u32)` pair and resolves it to a
/// `DataType`. Width is fixed regardless of `is_64_bit` — only the
/// pointer-sized block-offset fields (parameter/field/index blocks) vary.
pub(super) fn read_data_type(reader: &mut ByteReader, pool: &StringPool) -> Result<DataType> {
    let tag = reader.read_u32(Section::TypeBlockRecord)?;
    let class_offset = reader.read_u32(Section::TypeBlockRecord)?;
    match tag {
        CLASS_TAG => Ok(DataType::Class(pool.resolve(class_offset)?)),
        NOT_COMPUTED_TAG => Ok(DataType::NotComputed),
        _ => {
            let primitive = PrimitiveDataType::from_tag(tag)
                .ok_or_else(|| Error::invalid_format(format!("unknown data type tag {}", tag)))?;
            Ok(DataType::Primitive(primitive))
        }
    }
}

pub(super) fn read_parameter(reader: &mut ByteReader, pool: &StringPool) -> Result<ParameterElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let data_type = read_data_type(reader, pool)?;
    let mode_tag = reader.read_u8(Section::TypeBlockRecord)?;
    let extent = reader.read_i32(Section::TypeBlockRecord)?;
    let mode = ParameterMode::from_tag(mode_tag)
        .ok_or_else(|| Error::invalid_format(format!("unknown parameter mode {}", mode_tag)))?;
    Ok(ParameterElement {
        name: pool.resolve(name_offset)?,
        data_type,
        mode,
        extent,
    })
}

/// Follows a pointer-sized offset to a separately-located parameter block,
/// reads `count` fixed-stride parameter records, then restores the
/// reader's position so the caller can continue walking the sequential
/// member-record array it was in.
pub(super) fn read_parameters(
    reader: &mut ByteReader,
    block_offset: u64,
    count: u16,
    pool: &StringPool,
) -> Result<Vec<ParameterElement>> {
    let resume = reader.position();
    reader.seek(block_offset);
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_parameter(reader, pool)?);
    }
    reader.seek(resume);
    Ok(out)
}

/// Reads a property's optional getter/setter bodies from the variable-stride
/// block a zero-or-nonzero pointer-sized field in the property record
/// refers to. `block_offset == 0` means the property has neither. Each
/// accessor is a presence byte, followed by its access flags when present.
pub(super) fn read_property_accessors(
    reader: &mut ByteReader,
    block_offset: u64,
) -> Result<(Option<PropertyAccessor>, Option<PropertyAccessor>)> {
    if block_offset == 0 {
        return Ok((None, None));
    }
    let resume = reader.position();
    reader.seek(block_offset);

    let has_getter = reader.read_u8(Section::TypeBlockRecord)? != 0;
    let getter = if has_getter {
        let access = reader.read_u16(Section::TypeBlockRecord)?;
        Some(PropertyAccessor { access: AccessFlags::new(access) })
    } else {
        None
    };

    let has_setter = reader.read_u8(Section::TypeBlockRecord)? != 0;
    let setter = if has_setter {
        let access = reader.read_u16(Section::TypeBlockRecord)?;
        Some(PropertyAccessor { access: AccessFlags::new(access) })
    } else {
        None
    };

    reader.seek(resume);
    Ok((getter, setter))
}

pub(super) fn read_field(reader: &mut ByteReader, pool: &StringPool) -> Result<FieldElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let data_type = read_data_type(reader, pool)?;
    let extent = reader.read_i32(Section::TypeBlockRecord)?;
    let label_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let initial_value_offset = reader.read_u32(Section::TypeBlockRecord)?;
    Ok(FieldElement {
        name: pool.resolve(name_offset)?,
        data_type,
        extent,
        label: pool.resolve(label_offset)?,
        initial_value: pool.resolve(initial_value_offset)?,
    })
}

pub(super) fn read_fields(
    reader: &mut ByteReader,
    block_offset: u64,
    count: u16,
    pool: &StringPool,
) -> Result<Vec<FieldElement>> {
    let resume = reader.position();
    reader.seek(block_offset);
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_field(reader, pool)?);
    }
    reader.seek(resume);
    Ok(out)
}

pub(super) fn read_index_component(reader: &mut ByteReader) -> Result<IndexComponent> {
    let field_position = reader.read_u16(Section::TypeBlockRecord)?;
    let ascending = reader.read_u8(Section::TypeBlockRecord)? != 0;
    Ok(IndexComponent { field_position, ascending })
}

pub(super) fn read_index(reader: &mut ByteReader, pool: &StringPool) -> Result<IndexElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let flags = reader.read_u32(Section::TypeBlockRecord)?;
    let component_count = reader.read_u16(Section::TypeBlockRecord)?;
    let mut components = Vec::with_capacity(component_count as usize);
    for _ in 0..component_count {
        components.push(read_index_component(reader)?);
    }
    Ok(IndexElement {
        name: pool.resolve(name_offset)?,
        flags: Flags(flags),
        components,
    })
}

/// Indexes are stored back-to-back starting at `block_offset`; each record
/// is itself variable-length (its component list is inline), so they are
/// read sequentially rather than at a fixed stride.
pub(super) fn read_indexes(
    reader: &mut ByteReader,
    block_offset: u64,
    count: u16,
    pool: &StringPool,
) -> Result<Vec<IndexElement>> {
    let resume = reader.position();
    reader.seek(block_offset);
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_index(reader, pool)?);
    }
    reader.seek(resume);
    Ok(out)
}
