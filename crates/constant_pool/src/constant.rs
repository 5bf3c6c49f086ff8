use std::{convert::TryFrom, fmt};

use crate::{
    types::{self, ConstantType},
    ConstantKind, ConstantVisitor,
};

#[derive(Debug, PartialEq, Clone)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(String),
    String(String),
    FieldRef(MemberRef),
    MethodRef(MemberRef),
    InterfaceMethodRef(MemberRef),
    NameAndType(NameAndType),
    MethodHandle(MethodHandle),
    MethodType(String),
    Dynamic(DynamicRef),
    InvokeDynamic(DynamicRef),
    Module(String),
    Package(String),
}
impl Constant {
    pub fn kind(&self) -> ConstantKind {
        match self {
            Constant::Utf8(_) => ConstantKind::Utf8,
            Constant::Integer(_) => ConstantKind::Integer,
            Constant::Float(_) => ConstantKind::Float,
            Constant::Long(_) => ConstantKind::Long,
            Constant::Double(_) => ConstantKind::Double,
            Constant::Class(_) => ConstantKind::Class,
            Constant::String(_) => ConstantKind::String,
            Constant::FieldRef(_) => ConstantKind::FieldRef,
            Constant::MethodRef(_) => ConstantKind::MethodRef,
            Constant::InterfaceMethodRef(_) => ConstantKind::InterfaceMethodRef,
            Constant::NameAndType(_) => ConstantKind::NameAndType,
            Constant::MethodHandle(_) => ConstantKind::MethodHandle,
            Constant::MethodType(_) => ConstantKind::MethodType,
            Constant::Dynamic(_) => ConstantKind::Dynamic,
            Constant::InvokeDynamic(_) => ConstantKind::InvokeDynamic,
            Constant::Module(_) => ConstantKind::Module,
            Constant::Package(_) => ConstantKind::Package,
        }
    }

    /// Calls the one visitor method matching this constant's kind.
    pub fn accept<V: ConstantVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Constant::Utf8(value) => visitor.visit_utf8(value),
            Constant::Integer(value) => visitor.visit_integer(*value),
            Constant::Float(value) => visitor.visit_float(*value),
            Constant::Long(value) => visitor.visit_long(*value),
            Constant::Double(value) => visitor.visit_double(*value),
            Constant::Class(name) => visitor.visit_class(name),
            Constant::String(value) => visitor.visit_string(value),
            Constant::FieldRef(reference) => visitor.visit_field_ref(reference),
            Constant::MethodRef(reference) => visitor.visit_method_ref(reference),
            Constant::InterfaceMethodRef(reference) => {
                visitor.visit_interface_method_ref(reference)
            }
            Constant::NameAndType(name_and_type) => visitor.visit_name_and_type(name_and_type),
            Constant::MethodHandle(handle) => visitor.visit_method_handle(handle),
            Constant::MethodType(descriptor) => visitor.visit_method_type(descriptor),
            Constant::Dynamic(dynamic) => visitor.visit_dynamic(dynamic),
            Constant::InvokeDynamic(dynamic) => visitor.visit_invoke_dynamic(dynamic),
            Constant::Module(name) => visitor.visit_module(name),
            Constant::Package(name) => visitor.visit_package(name),
        }
    }
}

/// A symbolic reference to a field or method, as named by `CONSTANT_Fieldref`,
/// `CONSTANT_Methodref` and `CONSTANT_InterfaceMethodref`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MemberRef {
    /// Binary name of the class or interface declaring the member, in internal form.
    pub class: String,
    pub name_and_type: NameAndType,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NameAndType {
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodHandle {
    pub kind: ReferenceKind,
    pub reference: MemberRef,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DynamicRef {
    // Index into the bootstrap_methods array of the BootstrapMethods attribute, which lives
    // outside of the constant pool and is therefore left unresolved.
    pub bootstrap_method_attr_index: u16,
    pub name_and_type: NameAndType,
}

const FIELD_REFS: &[ConstantType<MemberRef>] = &[types::FIELD_REF];
const METHOD_REFS: &[ConstantType<MemberRef>] = &[types::METHOD_REF];
const INTERFACE_METHOD_REFS: &[ConstantType<MemberRef>] = &[types::INTERFACE_METHOD_REF];
const ANY_METHOD_REFS: &[ConstantType<MemberRef>] =
    &[types::METHOD_REF, types::INTERFACE_METHOD_REF];

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum ReferenceKind {
    GetField = 1,
    GetStatic = 2,
    PutField = 3,
    PutStatic = 4,
    InvokeVirtual = 5,
    InvokeStatic = 6,
    InvokeSpecial = 7,
    NewInvokeSpecial = 8,
    InvokeInterface = 9,
}
impl ReferenceKind {
    /// The constant kinds a method handle of this kind may point at.
    pub fn accepted_types(self) -> &'static [ConstantType<MemberRef>] {
        match self {
            ReferenceKind::GetField
            | ReferenceKind::GetStatic
            | ReferenceKind::PutField
            | ReferenceKind::PutStatic => FIELD_REFS,
            ReferenceKind::InvokeVirtual | ReferenceKind::NewInvokeSpecial => METHOD_REFS,
            ReferenceKind::InvokeStatic | ReferenceKind::InvokeSpecial => ANY_METHOD_REFS,
            ReferenceKind::InvokeInterface => INTERFACE_METHOD_REFS,
        }
    }
}

impl TryFrom<u8> for ReferenceKind {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ReferenceKind::GetField),
            2 => Ok(ReferenceKind::GetStatic),
            3 => Ok(ReferenceKind::PutField),
            4 => Ok(ReferenceKind::PutStatic),
            5 => Ok(ReferenceKind::InvokeVirtual),
            6 => Ok(ReferenceKind::InvokeStatic),
            7 => Ok(ReferenceKind::InvokeSpecial),
            8 => Ok(ReferenceKind::NewInvokeSpecial),
            9 => Ok(ReferenceKind::InvokeInterface),
            _ => Err(value),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::GetField => "REF_getField",
            ReferenceKind::GetStatic => "REF_getStatic",
            ReferenceKind::PutField => "REF_putField",
            ReferenceKind::PutStatic => "REF_putStatic",
            ReferenceKind::InvokeVirtual => "REF_invokeVirtual",
            ReferenceKind::InvokeStatic => "REF_invokeStatic",
            ReferenceKind::InvokeSpecial => "REF_invokeSpecial",
            ReferenceKind::NewInvokeSpecial => "REF_newInvokeSpecial",
            ReferenceKind::InvokeInterface => "REF_invokeInterface",
        };
        f.write_str(name)
    }
}
