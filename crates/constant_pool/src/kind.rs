use std::{convert::TryFrom, fmt};

/// How many bytes of a constant's body are known before decoding it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Layout {
    /// Fixed body length. The body is isolated so decoding can never run into the next constant.
    Bounded(usize),
    /// Body read straight from the stream: either a primitive of known width or
    /// a self-describing length prefix.
    Unbounded,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum ConstantKind {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}
impl ConstantKind {
    pub const ALL: [ConstantKind; 17] = [
        ConstantKind::Utf8,
        ConstantKind::Integer,
        ConstantKind::Float,
        ConstantKind::Long,
        ConstantKind::Double,
        ConstantKind::Class,
        ConstantKind::String,
        ConstantKind::FieldRef,
        ConstantKind::MethodRef,
        ConstantKind::InterfaceMethodRef,
        ConstantKind::NameAndType,
        ConstantKind::MethodHandle,
        ConstantKind::MethodType,
        ConstantKind::Dynamic,
        ConstantKind::InvokeDynamic,
        ConstantKind::Module,
        ConstantKind::Package,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn layout(self) -> Layout {
        const INDEX: usize = std::mem::size_of::<u16>();

        match self {
            ConstantKind::Utf8
            | ConstantKind::Integer
            | ConstantKind::Float
            | ConstantKind::Long
            | ConstantKind::Double => Layout::Unbounded,
            ConstantKind::Class
            | ConstantKind::String
            | ConstantKind::MethodType
            | ConstantKind::Module
            | ConstantKind::Package => Layout::Bounded(INDEX),
            ConstantKind::FieldRef
            | ConstantKind::MethodRef
            | ConstantKind::InterfaceMethodRef
            | ConstantKind::NameAndType
            | ConstantKind::Dynamic
            | ConstantKind::InvokeDynamic => Layout::Bounded(INDEX + INDEX),
            ConstantKind::MethodHandle => Layout::Bounded(std::mem::size_of::<u8>() + INDEX),
        }
    }

    /// Number of constant pool indices taken up by a constant of this kind.
    ///
    /// All 8-byte constants take up two entries in the constant_pool table; the
    /// index following them is valid but considered unusable.
    pub fn slots(self) -> usize {
        match self {
            ConstantKind::Long | ConstantKind::Double => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConstantKind::Utf8 => "CONSTANT_Utf8",
            ConstantKind::Integer => "CONSTANT_Integer",
            ConstantKind::Float => "CONSTANT_Float",
            ConstantKind::Long => "CONSTANT_Long",
            ConstantKind::Double => "CONSTANT_Double",
            ConstantKind::Class => "CONSTANT_Class",
            ConstantKind::String => "CONSTANT_String",
            ConstantKind::FieldRef => "CONSTANT_Fieldref",
            ConstantKind::MethodRef => "CONSTANT_Methodref",
            ConstantKind::InterfaceMethodRef => "CONSTANT_InterfaceMethodref",
            ConstantKind::NameAndType => "CONSTANT_NameAndType",
            ConstantKind::MethodHandle => "CONSTANT_MethodHandle",
            ConstantKind::MethodType => "CONSTANT_MethodType",
            ConstantKind::Dynamic => "CONSTANT_Dynamic",
            ConstantKind::InvokeDynamic => "CONSTANT_InvokeDynamic",
            ConstantKind::Module => "CONSTANT_Module",
            ConstantKind::Package => "CONSTANT_Package",
        }
    }
}

impl TryFrom<u8> for ConstantKind {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        ConstantKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == value)
            .ok_or(value)
    }
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
