//! Synthetic r-code byte-stream builders used only by `#[cfg(test)]` unit
//! tests throughout this crate. There are no binary fixture files; every
//! seed scenario is assembled field-by-field here, the way
//! `examples/jac3km4-pdb-sdk/examples/fake_pdb.rs` builds a synthetic PDB.

use crate::header::{HEADER_SIZE, MAGIC, V12_TAIL_SIZE};
use crate::model::{AccessFlags, NOT_COMPUTED_TAG, ParameterMode, PrimitiveDataType};

fn write_u16(out: &mut Vec<u8>, value: u16, big_endian: bool) {
    if big_endian {
        out.extend_from_slice(&value.to_be_bytes());
    } else {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn write_u32(out: &mut Vec<u8>, value: u32, big_endian: bool) {
    if big_endian {
        out.extend_from_slice(&value.to_be_bytes());
    } else {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn write_i32(out: &mut Vec<u8>, value: i32, big_endian: bool) {
    write_u32(out, value as u32, big_endian)
}

fn write_word(out: &mut Vec<u8>, value: u64, is_64_bit: bool, big_endian: bool) {
    if is_64_bit {
        if big_endian {
            out.extend_from_slice(&value.to_be_bytes());
        } else {
            out.extend_from_slice(&value.to_le_bytes());
        }
    } else {
        write_u32(out, value as u32, big_endian);
    }
}

fn write_u16_at(out: &mut [u8], offset: usize, value: u16, big_endian: bool) {
    let bytes = if big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
    out[offset..offset + 2].copy_from_slice(&bytes);
}

fn write_u32_at(out: &mut [u8], offset: usize, value: u32, big_endian: bool) {
    let bytes = if big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
    out[offset..offset + 4].copy_from_slice(&bytes);
}

fn write_i32_at(out: &mut [u8], offset: usize, value: i32, big_endian: bool) {
    write_u32_at(out, offset, value as u32, big_endian)
}

fn mode_to_tag(mode: ParameterMode) -> u8 {
    match mode {
        ParameterMode::Input => 0,
        ParameterMode::Output => 1,
        ParameterMode::InputOutput => 2,
        ParameterMode::Buffer => 3,
        ParameterMode::Return => 4,
    }
}

/// Builds a primary header (plus, for v12, its 16-byte tail) at the exact
/// byte offsets `HeaderDecoder::decode` reads.
pub struct HeaderBuilder {
    version: u16,
    is_v12: bool,
    is_64_bit: bool,
    big_endian: bool,
    timestamp: u32,
    digest_offset: u16,
    segment_table_size: u16,
    signature_size: u32,
    type_block_size: u32,
    rcode_size: u32,
}

impl HeaderBuilder {
    pub fn new(version: u16, is_v12: bool) -> HeaderBuilder {
        HeaderBuilder {
            version,
            is_v12,
            is_64_bit: false,
            big_endian: true,
            timestamp: 0,
            digest_offset: 0x10,
            segment_table_size: 38,
            signature_size: 8,
            type_block_size: 0,
            rcode_size: 0,
        }
    }

    pub fn timestamp(mut self, v: u32) -> Self {
        self.timestamp = v;
        self
    }

    pub fn segment_table_size(mut self, v: u16) -> Self {
        self.segment_table_size = v;
        self
    }

    pub fn signature_size(mut self, v: u32) -> Self {
        self.signature_size = v;
        self
    }

    pub fn type_block_size(mut self, v: u32) -> Self {
        self.type_block_size = v;
        self
    }

    pub fn rcode_size(mut self, v: u32) -> Self {
        self.rcode_size = v;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        let magic = if self.big_endian { MAGIC.to_be_bytes() } else { MAGIC.to_le_bytes() };
        out[0..4].copy_from_slice(&magic);

        let mut version_word = self.version;
        if self.is_64_bit {
            version_word |= 0x4000;
        }
        write_u16_at(&mut out, 14, version_word, self.big_endian);
        write_u32_at(&mut out, 4, self.timestamp, self.big_endian);
        let digest_offset_pos = if self.is_v12 { 22 } else { 10 };
        write_u16_at(&mut out, digest_offset_pos, self.digest_offset, self.big_endian);
        write_u16_at(&mut out, 0x1E, self.segment_table_size, self.big_endian);
        write_u32_at(&mut out, 56, self.signature_size, self.big_endian);
        write_u32_at(&mut out, 60, self.type_block_size, self.big_endian);

        if self.is_v12 {
            let mut tail = vec![0u8; V12_TAIL_SIZE];
            write_u32_at(&mut tail, 12, self.rcode_size, self.big_endian);
            out.extend_from_slice(&tail);
        } else {
            write_u32_at(&mut out, 64, self.rcode_size, self.big_endian);
        }
        out
    }
}

/// Builds a fixed-shape segment table: four offset/size pairs plus three
/// trailing size-only fields, matching `SegmentTable::decode`.
pub struct SegmentTableBuilder {
    initial_value: (i32, u32),
    action: (i32, u32),
    ecode: (i32, u32),
    debug: (i32, u32),
    ipacs: u16,
    frame: u16,
    text: u16,
    big_endian: bool,
}

impl SegmentTableBuilder {
    pub fn new() -> SegmentTableBuilder {
        SegmentTableBuilder {
            initial_value: (-1, 0),
            action: (-1, 0),
            ecode: (-1, 0),
            debug: (-1, 0),
            ipacs: 0,
            frame: 0,
            text: 0,
            big_endian: true,
        }
    }

    pub fn initial_value(mut self, offset: i32, size: u32) -> Self {
        self.initial_value = (offset, size);
        self
    }

    pub fn action(mut self, offset: i32, size: u32) -> Self {
        self.action = (offset, size);
        self
    }

    pub fn ecode(mut self, offset: i32, size: u32) -> Self {
        self.ecode = (offset, size);
        self
    }

    pub fn debug(mut self, offset: i32, size: u32) -> Self {
        self.debug = (offset, size);
        self
    }

    pub fn ipacs(mut self, v: u16) -> Self {
        self.ipacs = v;
        self
    }

    pub fn frame(mut self, v: u16) -> Self {
        self.frame = v;
        self
    }

    pub fn text(mut self, v: u16) -> Self {
        self.text = v;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let be = self.big_endian;
        let mut out = vec![0u8; 38];
        write_i32_at(&mut out, 0, self.initial_value.0, be);
        write_i32_at(&mut out, 4, self.action.0, be);
        write_i32_at(&mut out, 8, self.ecode.0, be);
        write_i32_at(&mut out, 12, self.debug.0, be);
        write_u32_at(&mut out, 16, self.initial_value.1, be);
        write_u32_at(&mut out, 20, self.action.1, be);
        write_u32_at(&mut out, 24, self.ecode.1, be);
        write_u32_at(&mut out, 28, self.debug.1, be);
        write_u16_at(&mut out, 32, self.ipacs, be);
        write_u16_at(&mut out, 34, self.frame, be);
        write_u16_at(&mut out, 36, self.text, be);
        out
    }
}

/// Builds a signature block: the ASCII-hex preamble followed by however
/// many null-terminated element records were added.
pub struct SignatureBuilder {
    records: Vec<String>,
}

impl SignatureBuilder {
    pub fn new() -> SignatureBuilder {
        SignatureBuilder { records: Vec::new() }
    }

    pub fn record(mut self, text: &str) -> Self {
        self.records.push(text.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut preamble_tail = Vec::new();
        preamble_tail.extend_from_slice(&[0u8; 4]); // informational field, unused by this decoder
        preamble_tail.extend_from_slice(b"UTF-8");
        preamble_tail.push(0); // null-terminated encoding name

        let preamble_size = 8 + preamble_tail.len();
        let mut out = Vec::new();
        out.extend_from_slice(format!("{:04X}", preamble_size).as_bytes());
        out.extend_from_slice(format!("{:04X}", self.records.len()).as_bytes());
        out.extend_from_slice(&preamble_tail);
        assert_eq!(out.len(), preamble_size);

        for record in &self.records {
            out.extend_from_slice(record.as_bytes());
            out.push(0);
        }
        out
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
}

impl PoolWriter {
    fn new() -> PoolWriter {
        PoolWriter { bytes: vec![0] }
    }

    fn add(&mut self, s: &str) -> u32 {
        let offset = self.bytes.len() as u32;
        self.bytes.extend_from_slice(s.as_bytes());
        self.bytes.push(0);
        offset
    }
}

struct MethodSpec {
    name: String,
    access: u16,
    parameters: Vec<(String, ParameterMode, i32)>,
}

pub struct MethodSpecBuilder {
    name: String,
    access: u16,
    parameters: Vec<(String, ParameterMode, i32)>,
}

impl MethodSpecBuilder {
    pub fn parameter(mut self, name: &str, mode: ParameterMode, extent: i32) -> Self {
        self.parameters.push((name.to_string(), mode, extent));
        self
    }
}

struct PropertySpec {
    name: String,
    access: u16,
    has_getter: bool,
    has_setter: bool,
}

struct FieldSpec {
    name: String,
    label: String,
    initial_value: String,
}

struct IndexSpec {
    name: String,
    components: Vec<(u16, bool)>,
}

struct TableSpec {
    name: String,
    fields: Vec<FieldSpec>,
    indexes: Vec<IndexSpec>,
}

pub struct TableSpecBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    indexes: Vec<IndexSpec>,
}

impl TableSpecBuilder {
    pub fn field(mut self, name: &str, label: &str, initial_value: &str) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            label: label.to_string(),
            initial_value: initial_value.to_string(),
        });
        self
    }

    pub fn index(mut self, name: &str, components: &[(u16, bool)]) -> Self {
        self.indexes.push(IndexSpec { name: name.to_string(), components: components.to_vec() });
        self
    }
}

/// Builds a single type block (the payload of the type block segment) for
/// one class, matching the v11/v12 record layouts documented in
/// `type_block::v11`/`v12`.
pub struct TypeBlockBuilder {
    is_v12: bool,
    big_endian: bool,
    is_64_bit: bool,
    access: u16,
    class_name: String,
    package_name: Option<String>,
    interfaces: Vec<String>,
    methods: Vec<MethodSpec>,
    properties: Vec<PropertySpec>,
    tables: Vec<TableSpec>,
}

impl TypeBlockBuilder {
    pub fn v11(class_name: &str, package_name: Option<&str>) -> TypeBlockBuilder {
        TypeBlockBuilder {
            is_v12: false,
            big_endian: true,
            is_64_bit: false,
            access: AccessFlags::PUBLIC,
            class_name: class_name.to_string(),
            package_name: package_name.map(String::from),
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn v12(class_name: &str, package_name: Option<&str>) -> TypeBlockBuilder {
        let mut builder = TypeBlockBuilder::v11(class_name, package_name);
        builder.is_v12 = true;
        builder
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn method(
        mut self,
        name: &str,
        access: u16,
        configure: impl FnOnce(MethodSpecBuilder) -> MethodSpecBuilder,
    ) -> Self {
        let built = configure(MethodSpecBuilder { name: name.to_string(), access, parameters: Vec::new() });
        self.methods.push(MethodSpec { name: built.name, access: built.access, parameters: built.parameters });
        self
    }

    pub fn property(mut self, name: &str, access: u16, has_getter: bool, has_setter: bool) -> Self {
        self.properties.push(PropertySpec { name: name.to_string(), access, has_getter, has_setter });
        self
    }

    pub fn table(mut self, name: &str, configure: impl FnOnce(TableSpecBuilder) -> TableSpecBuilder) -> Self {
        let built = configure(TableSpecBuilder { name: name.to_string(), fields: Vec::new(), indexes: Vec::new() });
        self.tables.push(TableSpec { name: built.name, fields: built.fields, indexes: built.indexes });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let be = self.big_endian;
        let word_size: usize = if self.is_64_bit { 8 } else { 4 };
        let leading_size = if self.is_v12 { 30 } else { 26 };
        let interfaces_size = self.interfaces.len() * 4;

        let method_fixed_stride = 16 + word_size + if self.is_v12 { 4 } else { 0 };
        let property_fixed_stride = 18 + word_size;
        let table_fixed_stride = 16 + 2 * word_size;

        let methods_size = self.methods.len() * method_fixed_stride;
        let properties_size = self.properties.len() * property_fixed_stride;
        let tables_size = self.tables.len() * table_fixed_stride;

        const PARAM_STRIDE: usize = 17;
        const INDEX_COMPONENT_STRIDE: usize = 3;

        let mut running = leading_size + interfaces_size + methods_size + properties_size + tables_size;

        let mut method_param_block_offset = Vec::with_capacity(self.methods.len());
        for m in &self.methods {
            method_param_block_offset.push(running as u64);
            running += m.parameters.len() * PARAM_STRIDE;
        }

        let mut property_accessor_block_offset = Vec::with_capacity(self.properties.len());
        for p in &self.properties {
            if p.has_getter || p.has_setter {
                property_accessor_block_offset.push(running as u64);
                running += 1 + if p.has_getter { 2 } else { 0 };
                running += 1 + if p.has_setter { 2 } else { 0 };
            } else {
                property_accessor_block_offset.push(0);
            }
        }

        let mut table_field_block_offset = Vec::with_capacity(self.tables.len());
        let mut table_index_block_offset = Vec::with_capacity(self.tables.len());
        for t in &self.tables {
            table_field_block_offset.push(running as u64);
            running += t.fields.len() * 24;
            table_index_block_offset.push(running as u64);
            for idx in &t.indexes {
                running += 4 + 4 + 2 + idx.components.len() * INDEX_COMPONENT_STRIDE;
            }
        }

        let pool_base = running as u32;

        let mut pool = PoolWriter::new();
        let class_offset = pool_base + pool.add(&self.class_name);
        let package_offset = self.package_name.as_deref().map(|p| pool_base + pool.add(p)).unwrap_or(0);
        let interface_offsets: Vec<u32> = self.interfaces.iter().map(|i| pool_base + pool.add(i)).collect();

        struct ResolvedParam {
            name_offset: u32,
            mode_tag: u8,
            extent: i32,
        }
        struct ResolvedMethod {
            name_offset: u32,
            access: u16,
            params: Vec<ResolvedParam>,
        }
        let mut resolved_methods = Vec::new();
        for m in &self.methods {
            let name_offset = pool_base + pool.add(&m.name);
            let params = m
                .parameters
                .iter()
                .map(|(n, mode, extent)| ResolvedParam {
                    name_offset: pool_base + pool.add(n),
                    mode_tag: mode_to_tag(*mode),
                    extent: *extent,
                })
                .collect();
            resolved_methods.push(ResolvedMethod { name_offset, access: m.access, params });
        }

        struct ResolvedProperty {
            name_offset: u32,
            access: u16,
            has_getter: bool,
            has_setter: bool,
        }
        let mut resolved_properties = Vec::new();
        for p in &self.properties {
            let name_offset = pool_base + pool.add(&p.name);
            resolved_properties.push(ResolvedProperty {
                name_offset,
                access: p.access,
                has_getter: p.has_getter,
                has_setter: p.has_setter,
            });
        }

        struct ResolvedField {
            name_offset: u32,
            label_offset: u32,
            initial_value_offset: u32,
        }
        struct ResolvedIndex {
            name_offset: u32,
            components: Vec<(u16, bool)>,
        }
        struct ResolvedTable {
            name_offset: u32,
            buffer_name_offset: u32,
            fields: Vec<ResolvedField>,
            indexes: Vec<ResolvedIndex>,
        }
        let mut resolved_tables = Vec::new();
        for t in &self.tables {
            let name_offset = pool_base + pool.add(&t.name);
            let buffer_name_offset = 0; // unnamed default buffer in these fixtures
            let fields = t
                .fields
                .iter()
                .map(|f| ResolvedField {
                    name_offset: pool_base + pool.add(&f.name),
                    label_offset: if f.label.is_empty() { 0 } else { pool_base + pool.add(&f.label) },
                    initial_value_offset: if f.initial_value.is_empty() {
                        0
                    } else {
                        pool_base + pool.add(&f.initial_value)
                    },
                })
                .collect();
            let indexes = t
                .indexes
                .iter()
                .map(|idx| ResolvedIndex { name_offset: pool_base + pool.add(&idx.name), components: idx.components.clone() })
                .collect();
            resolved_tables.push(ResolvedTable { name_offset, buffer_name_offset, fields, indexes });
        }

        let mut out = Vec::new();
        write_u32(&mut out, class_offset, be);
        write_u32(&mut out, package_offset, be);
        write_u32(&mut out, 0, be); // parent_name_offset: none, root class
        write_u16(&mut out, interface_offsets.len() as u16, be);
        write_u16(&mut out, resolved_methods.len() as u16, be);
        write_u16(&mut out, resolved_properties.len() as u16, be);
        write_u16(&mut out, 0, be); // variable_count
        write_u16(&mut out, 0, be); // event_count
        write_u16(&mut out, resolved_tables.len() as u16, be);
        write_u16(&mut out, self.access, be);
        if self.is_v12 {
            write_u32(&mut out, 0, be); // digest_offset
        }
        for off in &interface_offsets {
            write_u32(&mut out, *off, be);
        }

        for (i, rm) in resolved_methods.iter().enumerate() {
            write_u32(&mut out, rm.name_offset, be);
            write_u16(&mut out, rm.access, be);
            write_u32(&mut out, NOT_COMPUTED_TAG, be); // return type: not computed
            write_u32(&mut out, 0, be);
            write_u16(&mut out, rm.params.len() as u16, be);
            write_word(&mut out, method_param_block_offset[i], self.is_64_bit, be);
            if self.is_v12 {
                write_u32(&mut out, 42, be); // source_line
            }
        }

        for rp in &resolved_properties {
            write_u32(&mut out, rp.name_offset, be);
            write_u16(&mut out, rp.access, be);
            write_u32(&mut out, PrimitiveDataType::Character.to_tag(), be);
            write_u32(&mut out, 0, be);
            write_i32(&mut out, 0, be); // extent
            write_word(&mut out, 0, self.is_64_bit, be); // placeholder, overwritten below
        }
        // accessor-block offsets depend on property index, fill in after the loop above
        // so the offset table and the accessor data stay in the same scan order.
        {
            let property_record_start = leading_size + interfaces_size + methods_size;
            for (i, offset) in property_accessor_block_offset.iter().enumerate() {
                let record_start = property_record_start + i * property_fixed_stride;
                let field_start = record_start + 4 + 2 + 8 + 4;
                write_word_at(&mut out, field_start, *offset, self.is_64_bit, be);
            }
        }

        for (i, rt) in resolved_tables.iter().enumerate() {
            write_u32(&mut out, rt.name_offset, be);
            write_u32(&mut out, 0, be); // flags
            write_u32(&mut out, rt.buffer_name_offset, be);
            write_u16(&mut out, rt.fields.len() as u16, be);
            write_word(&mut out, table_field_block_offset[i], self.is_64_bit, be);
            write_u16(&mut out, rt.indexes.len() as u16, be);
            write_word(&mut out, table_index_block_offset[i], self.is_64_bit, be);
        }

        for rm in &resolved_methods {
            for p in &rm.params {
                write_u32(&mut out, p.name_offset, be);
                write_u32(&mut out, PrimitiveDataType::Integer.to_tag(), be);
                write_u32(&mut out, 0, be);
                out.push(p.mode_tag);
                write_i32(&mut out, p.extent, be);
            }
        }

        for (i, rp) in resolved_properties.iter().enumerate() {
            if rp.has_getter || rp.has_setter {
                out.push(if rp.has_getter { 1 } else { 0 });
                if rp.has_getter {
                    write_u16(&mut out, AccessFlags::PUBLIC, be);
                }
                out.push(if rp.has_setter { 1 } else { 0 });
                if rp.has_setter {
                    write_u16(&mut out, AccessFlags::PUBLIC, be);
                }
            }
            let _ = i;
        }

        for rt in &resolved_tables {
            for f in &rt.fields {
                write_u32(&mut out, f.name_offset, be);
                write_u32(&mut out, PrimitiveDataType::Character.to_tag(), be);
                write_u32(&mut out, 0, be);
                write_i32(&mut out, 0, be); // extent
                write_u32(&mut out, f.label_offset, be);
                write_u32(&mut out, f.initial_value_offset, be);
            }
            for idx in &rt.indexes {
                write_u32(&mut out, idx.name_offset, be);
                write_u32(&mut out, 0, be); // flags
                write_u16(&mut out, idx.components.len() as u16, be);
                for (pos, asc) in &idx.components {
                    write_u16(&mut out, *pos, be);
                    out.push(if *asc { 1 } else { 0 });
                }
            }
        }

        assert_eq!(out.len(), pool_base as usize);
        out.extend_from_slice(&pool.bytes);
        out
    }
}

fn write_word_at(out: &mut [u8], offset: usize, value: u64, is_64_bit: bool, big_endian: bool) {
    if is_64_bit {
        let bytes = if big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
        out[offset..offset + 8].copy_from_slice(&bytes);
    } else {
        write_u32_at(out, offset, value as u32, big_endian);
    }
}

/// Builds a complete r-code image: header, signature block, segment table,
/// an optional body (the initial-value segment), and a type block for one
/// class.
pub struct RCodeBuilder {
    is_v12: bool,
    class_name: String,
    initial_value: Option<Vec<u8>>,
    include_type_block: bool,
}

impl RCodeBuilder {
    pub fn v11(class_name: &str) -> RCodeBuilder {
        RCodeBuilder {
            is_v12: false,
            class_name: class_name.to_string(),
            initial_value: None,
            include_type_block: true,
        }
    }

    pub fn v12(class_name: &str) -> RCodeBuilder {
        let mut builder = RCodeBuilder::v11(class_name);
        builder.is_v12 = true;
        builder
    }

    pub fn initial_value(mut self, bytes: &[u8]) -> Self {
        self.initial_value = Some(bytes.to_vec());
        self
    }

    pub fn without_type_block(mut self) -> Self {
        self.include_type_block = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let version = if self.is_v12 { 1200 } else { 1150 };
        let type_block_bytes = if self.include_type_block {
            if self.is_v12 {
                TypeBlockBuilder::v12(&self.class_name, None).build()
            } else {
                TypeBlockBuilder::v11(&self.class_name, None).build()
            }
        } else {
            Vec::new()
        };
        let signature_bytes = SignatureBuilder::new().build();
        let body_bytes = self.initial_value.clone().unwrap_or_default();

        let initial_value_offset = if body_bytes.is_empty() { -1 } else { 0 };
        let segment_table_bytes = SegmentTableBuilder::new()
            .initial_value(initial_value_offset, body_bytes.len() as u32)
            .action(-1, 0)
            .ecode(-1, 0)
            .debug(-1, 0)
            .ipacs(0)
            .frame(0)
            .text(0)
            .build();

        let header_bytes = HeaderBuilder::new(version, self.is_v12)
            .signature_size(signature_bytes.len() as u32)
            .segment_table_size(segment_table_bytes.len() as u16)
            .rcode_size(body_bytes.len() as u32)
            .type_block_size(if self.include_type_block { type_block_bytes.len() as u32 } else { 0 })
            .build();

        let mut out = Vec::new();
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(&signature_bytes);
        out.extend_from_slice(&segment_table_bytes);
        out.extend_from_slice(&body_bytes);
        if self.include_type_block {
            out.extend_from_slice(&type_block_bytes);
        }
        out
    }
}
