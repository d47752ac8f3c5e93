use crate::byte_reader::{ByteReader, Endian};
use crate::error::{Result, Section};
use crate::model::{AccessFlags, EventElement, Flags, MethodElement, PropertyElement, TableElement, TypeInfo, VariableElement};
use crate::options::Charset;

use super::string_pool::StringPool;
use super::{read_data_type, read_fields, read_indexes, read_parameters, read_property_accessors};

/// v12 type block leading record, 30 bytes: identical to the v11 layout
/// (see `v11::decode`) with one field appended.
///
/// | Offset | Size | Field               |
/// | ------ | ---- | ------------------- |
/// | 0..24  |      | same as v11          |
/// | 24     | 2    | access flags         |
/// | 26     | 4    | digest offset        |
///
/// `digest offset` points into the string pool at the type's source
/// digest; this crate doesn't expose it on `TypeInfo` (no consumer needs
/// it yet) but still consumes the bytes so the reader lands in the right
/// place for the interface table that follows.
///
/// Method records additionally carry a trailing `u32 source_line` not
/// present in v11.
pub(super) fn decode(bytes: &[u8], endian: Endian, is_64_bit: bool, charset: Charset) -> Result<TypeInfo> {
    let pool = StringPool::new(bytes, charset);
    let mut reader = ByteReader::new(bytes, endian);

    let class_name_offset = reader.read_u32(Section::TypeBlock)?;
    let package_name_offset = reader.read_u32(Section::TypeBlock)?;
    let parent_name_offset = reader.read_u32(Section::TypeBlock)?;
    let interface_count = reader.read_u16(Section::TypeBlock)?;
    let method_count = reader.read_u16(Section::TypeBlock)?;
    let property_count = reader.read_u16(Section::TypeBlock)?;
    let variable_count = reader.read_u16(Section::TypeBlock)?;
    let event_count = reader.read_u16(Section::TypeBlock)?;
    let table_count = reader.read_u16(Section::TypeBlock)?;
    let access_flags = reader.read_u16(Section::TypeBlock)?;
    let _digest_offset = reader.read_u32(Section::TypeBlock)?;

    let type_name = build_type_name(&pool, package_name_offset, class_name_offset)?;
    let parent_type_name = pool.resolve_optional(parent_name_offset)?;

    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let offset = reader.read_u32(Section::TypeBlock)?;
        interfaces.push(pool.resolve(offset)?);
    }

    let mut methods = Vec::with_capacity(method_count as usize);
    for _ in 0..method_count {
        methods.push(read_method(&mut reader, &pool, is_64_bit)?);
    }

    let mut properties = Vec::with_capacity(property_count as usize);
    for _ in 0..property_count {
        properties.push(read_property(&mut reader, &pool, is_64_bit)?);
    }

    let mut variables = Vec::with_capacity(variable_count as usize);
    for _ in 0..variable_count {
        variables.push(read_variable(&mut reader, &pool)?);
    }

    let mut events = Vec::with_capacity(event_count as usize);
    for _ in 0..event_count {
        events.push(read_event(&mut reader, &pool, is_64_bit)?);
    }

    let mut tables = Vec::with_capacity(table_count as usize);
    for _ in 0..table_count {
        tables.push(read_table(&mut reader, &pool, is_64_bit)?);
    }

    Ok(TypeInfo {
        type_name,
        parent_type_name,
        interfaces,
        access: AccessFlags::new(access_flags),
        methods,
        properties,
        variables,
        events,
        tables,
    })
}

fn build_type_name(pool: &StringPool, package_offset: u32, class_offset: u32) -> Result<String> {
    let class_name = pool.resolve(class_offset)?;
    match pool.resolve_optional(package_offset)? {
        Some(package) if !package.is_empty() => Ok(format!("{}.{}", package, class_name)),
        _ => Ok(class_name),
    }
}

fn read_method(reader: &mut ByteReader, pool: &StringPool, is_64_bit: bool) -> Result<MethodElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let access_flags = reader.read_u16(Section::TypeBlockRecord)?;
    let return_type = read_data_type(reader, pool)?;
    let parameter_count = reader.read_u16(Section::TypeBlockRecord)?;
    let parameter_block_offset = reader.read_word(is_64_bit, Section::TypeBlockRecord)?;
    let source_line = reader.read_u32(Section::TypeBlockRecord)?;
    let parameters = read_parameters(reader, parameter_block_offset, parameter_count, pool)?;

    Ok(MethodElement {
        name: pool.resolve(name_offset)?,
        access: AccessFlags::new(access_flags),
        return_type,
        parameters,
        source_line: Some(source_line),
    })
}

fn read_property(reader: &mut ByteReader, pool: &StringPool, is_64_bit: bool) -> Result<PropertyElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let access_flags = reader.read_u16(Section::TypeBlockRecord)?;
    let data_type = read_data_type(reader, pool)?;
    let extent = reader.read_i32(Section::TypeBlockRecord)?;
    let accessor_block_offset = reader.read_word(is_64_bit, Section::TypeBlockRecord)?;
    let (getter, setter) = read_property_accessors(reader, accessor_block_offset)?;
    Ok(PropertyElement {
        name: pool.resolve(name_offset)?,
        access: AccessFlags::new(access_flags),
        data_type,
        extent,
        getter,
        setter,
    })
}

fn read_variable(reader: &mut ByteReader, pool: &StringPool) -> Result<VariableElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let access_flags = reader.read_u16(Section::TypeBlockRecord)?;
    let data_type = read_data_type(reader, pool)?;
    let extent = reader.read_i32(Section::TypeBlockRecord)?;
    Ok(VariableElement {
        name: pool.resolve(name_offset)?,
        access: AccessFlags::new(access_flags),
        data_type,
        extent,
    })
}

fn read_event(reader: &mut ByteReader, pool: &StringPool, is_64_bit: bool) -> Result<EventElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let access_flags = reader.read_u16(Section::TypeBlockRecord)?;
    let parameter_count = reader.read_u16(Section::TypeBlockRecord)?;
    let parameter_block_offset = reader.read_word(is_64_bit, Section::TypeBlockRecord)?;
    let parameters = read_parameters(reader, parameter_block_offset, parameter_count, pool)?;
    Ok(EventElement {
        name: pool.resolve(name_offset)?,
        access: AccessFlags::new(access_flags),
        parameters,
    })
}

fn read_table(reader: &mut ByteReader, pool: &StringPool, is_64_bit: bool) -> Result<TableElement> {
    let name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let flags = reader.read_u32(Section::TypeBlockRecord)?;
    let buffer_name_offset = reader.read_u32(Section::TypeBlockRecord)?;
    let field_count = reader.read_u16(Section::TypeBlockRecord)?;
    let field_block_offset = reader.read_word(is_64_bit, Section::TypeBlockRecord)?;
    let index_count = reader.read_u16(Section::TypeBlockRecord)?;
    let index_block_offset = reader.read_word(is_64_bit, Section::TypeBlockRecord)?;
    let fields = read_fields(reader, field_block_offset, field_count, pool)?;
    let indexes = read_indexes(reader, index_block_offset, index_count, pool)?;
    Ok(TableElement {
        name: pool.resolve(name_offset)?,
        flags: Flags(flags),
        buffer_name: pool.resolve(buffer_name_offset)?,
        fields,
        indexes,
    })
}
