/// Access and modifier flags carried by a type and each of its members.
///
/// A private `u16` with named `const` bit values and a `check_flag`
/// helper: `PUBLIC`/`PROTECTED`/`PRIVATE` are mutually exclusive
/// visibility bits, the rest compose freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessFlags(u16);

impl AccessFlags {
    pub const PUBLIC: u16 = 0x0001;
    pub const PROTECTED: u16 = 0x0002;
    pub const PRIVATE: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const ABSTRACT: u16 = 0x0010;
    pub const OVERRIDE: u16 = 0x0020;
    pub const FINAL: u16 = 0x0040;

    pub fn new(value: u16) -> AccessFlags {
        AccessFlags(value)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn check_flag(&self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    pub fn is_public(&self) -> bool {
        self.check_flag(Self::PUBLIC)
    }

    pub fn is_protected(&self) -> bool {
        self.check_flag(Self::PROTECTED)
    }

    pub fn is_private(&self) -> bool {
        self.check_flag(Self::PRIVATE)
    }

    pub fn is_static(&self) -> bool {
        self.check_flag(Self::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.check_flag(Self::ABSTRACT)
    }

    pub fn is_override(&self) -> bool {
        self.check_flag(Self::OVERRIDE)
    }

    pub fn is_final(&self) -> bool {
        self.check_flag(Self::FINAL)
    }
}

impl From<u16> for AccessFlags {
    fn from(value: u16) -> Self {
        AccessFlags(value)
    }
}

/// Raw flag bits that this crate stores but doesn't interpret (table and
/// index flags have no named bits attested anywhere in the format). Kept
/// distinct from `AccessFlags` so a reader can't mistake an uninterpreted
/// bitset for one whose bits are actually named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(pub u32);

impl From<u32> for Flags {
    fn from(value: u32) -> Self {
        Flags(value)
    }
}

/// Scalar ABL data types. `CLASS` and the unresolved sentinel live on
/// `DataType` instead of here, since both carry information beyond a bare
/// tag (a class name, or nothing at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveDataType {
    Character,
    Integer,
    Int64,
    Decimal,
    Logical,
    Date,
    DateTime,
    DateTimeTz,
    Handle,
    Memptr,
    LongChar,
    Raw,
    Rowid,
    Recid,
    Blob,
    Clob,
    Byte,
    Short,
    UnsignedShort,
    UnsignedInteger,
    UnsignedInt64,
    Unknown,
}

impl PrimitiveDataType {
    pub fn from_tag(tag: u32) -> Option<PrimitiveDataType> {
        use PrimitiveDataType::*;
        Some(match tag {
            0 => Character,
            1 => Integer,
            2 => Int64,
            3 => Decimal,
            4 => Logical,
            5 => Date,
            6 => DateTime,
            7 => DateTimeTz,
            8 => Handle,
            9 => Memptr,
            10 => LongChar,
            11 => Raw,
            12 => Rowid,
            13 => Recid,
            14 => Blob,
            15 => Clob,
            16 => Byte,
            17 => Short,
            18 => UnsignedShort,
            19 => UnsignedInteger,
            20 => UnsignedInt64,
            21 => Unknown,
            _ => return None,
        })
    }

    pub fn to_tag(self) -> u32 {
        use PrimitiveDataType::*;
        match self {
            Character => 0,
            Integer => 1,
            Int64 => 2,
            Decimal => 3,
            Logical => 4,
            Date => 5,
            DateTime => 6,
            DateTimeTz => 7,
            Handle => 8,
            Memptr => 9,
            LongChar => 10,
            Raw => 11,
            Rowid => 12,
            Recid => 13,
            Blob => 14,
            Clob => 15,
            Byte => 16,
            Short => 17,
            UnsignedShort => 18,
            UnsignedInteger => 19,
            UnsignedInt64 => 20,
            Unknown => 21,
        }
    }
}

/// Tags used in the type block to select between a primitive, a class
/// reference and the unresolved sentinel; any other value is looked up via
/// `PrimitiveDataType::from_tag`.
pub const CLASS_TAG: u32 = 0xFFFF_FFFE;
pub const NOT_COMPUTED_TAG: u32 = 0xFFFF_FFFF;

/// A resolved data type: a scalar primitive, a named class reference, or
/// `NotComputed` — the sentinel the format uses for a type that wasn't
/// resolved at compile time (and, by convention in this decoder, for a
/// method with no return value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Primitive(PrimitiveDataType),
    Class(String),
    NotComputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMode {
    Input,
    Output,
    InputOutput,
    Buffer,
    Return,
}

impl ParameterMode {
    pub fn from_tag(tag: u8) -> Option<ParameterMode> {
        use ParameterMode::*;
        Some(match tag {
            0 => Input,
            1 => Output,
            2 => InputOutput,
            3 => Buffer,
            4 => Return,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterElement {
    pub name: String,
    pub data_type: DataType,
    pub mode: ParameterMode,
    /// Array extent: `0` scalar, `>0` fixed-length array, `-32767`
    /// undetermined-length array.
    pub extent: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodElement {
    pub name: String,
    pub access: AccessFlags,
    pub return_type: DataType,
    pub parameters: Vec<ParameterElement>,
    /// Source line of the method definition; only present in v12 images.
    pub source_line: Option<u32>,
}

/// A property's getter or setter accessor body. The format carries nothing
/// about an accessor beyond its own access flags — the signature is
/// inherited from the owning property's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyAccessor {
    pub access: AccessFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyElement {
    pub name: String,
    pub access: AccessFlags,
    pub data_type: DataType,
    pub extent: i32,
    pub getter: Option<PropertyAccessor>,
    pub setter: Option<PropertyAccessor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableElement {
    pub name: String,
    pub access: AccessFlags,
    pub data_type: DataType,
    pub extent: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventElement {
    pub name: String,
    pub access: AccessFlags,
    pub parameters: Vec<ParameterElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldElement {
    pub name: String,
    pub data_type: DataType,
    pub extent: i32,
    pub label: String,
    pub initial_value: String,
}

/// One index component: a 1-based position into the owning table's
/// `fields`, plus whether the component sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexComponent {
    pub field_position: u16,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexElement {
    pub name: String,
    pub flags: Flags,
    pub components: Vec<IndexComponent>,
}

/// A temp-table or dataset definition carried in the type block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableElement {
    pub name: String,
    pub flags: Flags,
    /// Name of the buffer this table definition backs, empty for an
    /// unnamed default buffer.
    pub buffer_name: String,
    pub fields: Vec<FieldElement>,
    pub indexes: Vec<IndexElement>,
}

/// Decoded type-block contents: everything a class or interface file
/// contributes to static analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: String,
    pub parent_type_name: Option<String>,
    pub interfaces: Vec<String>,
    pub access: AccessFlags,
    pub methods: Vec<MethodElement>,
    pub properties: Vec<PropertyElement>,
    pub variables: Vec<VariableElement>,
    pub events: Vec<EventElement>,
    pub tables: Vec<TableElement>,
}
