//! Typed views onto [`Constant`]s, used to look constants up by their expected kind.
//!
//! ```
//! use std::io::Cursor;
//! use classpool_constant_pool::{types, ConstantPool};
//!
//! let bytes = [0, 3, 1, 0, 3, b'F', b'o', b'o', 7, 0, 1];
//! let mut pool = ConstantPool::new(Cursor::new(bytes)).unwrap();
//!
//! assert_eq!("Foo", pool.get(2, types::CLASS).unwrap());
//! assert!(pool.get(2, types::UTF8).is_err());
//! ```

use std::{borrow::Borrow, fmt};

use crate::{Constant, ConstantKind, DynamicRef, MemberRef, MethodHandle, NameAndType};

/// Pairs a constant kind with the checked projection of its value.
///
/// Two types are equal when they describe the same kind.
pub struct ConstantType<T: ?Sized> {
    kind: ConstantKind,
    cast: fn(&Constant) -> Option<&T>,
}
impl<T: ?Sized> ConstantType<T> {
    const fn new(kind: ConstantKind, cast: fn(&Constant) -> Option<&T>) -> Self {
        Self { kind, cast }
    }

    pub fn kind(&self) -> ConstantKind {
        self.kind
    }

    pub fn is(&self, constant: &Constant) -> bool {
        constant.kind() == self.kind
    }

    /// Returns the constant's value if it is of this type.
    pub fn cast<'c>(&self, constant: &'c Constant) -> Option<&'c T> {
        (self.cast)(constant)
    }
}

impl<T: ?Sized> Clone for ConstantType<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: ?Sized> Copy for ConstantType<T> {}

impl<T: ?Sized> PartialEq for ConstantType<T> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}
impl<T: ?Sized> Eq for ConstantType<T> {}

impl<T: ?Sized> fmt::Debug for ConstantType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstantType").field(&self.kind).finish()
    }
}

macro_rules! constant_type {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub const $name: ConstantType<$ty> = {
            fn cast(constant: &Constant) -> Option<&$ty> {
                match constant {
                    Constant::$variant(value) => Some(Borrow::borrow(value)),
                    _ => None,
                }
            }

            ConstantType::new(ConstantKind::$variant, cast)
        };
    };
}

constant_type!(UTF8, Utf8, str);
constant_type!(INTEGER, Integer, i32);
constant_type!(FLOAT, Float, f32);
constant_type!(LONG, Long, i64);
constant_type!(DOUBLE, Double, f64);
constant_type!(CLASS, Class, str);
constant_type!(STRING, String, str);
constant_type!(FIELD_REF, FieldRef, MemberRef);
constant_type!(METHOD_REF, MethodRef, MemberRef);
constant_type!(INTERFACE_METHOD_REF, InterfaceMethodRef, MemberRef);
constant_type!(NAME_AND_TYPE, NameAndType, NameAndType);
constant_type!(METHOD_HANDLE, MethodHandle, MethodHandle);
constant_type!(METHOD_TYPE, MethodType, str);
constant_type!(DYNAMIC, Dynamic, DynamicRef);
constant_type!(INVOKE_DYNAMIC, InvokeDynamic, DynamicRef);
constant_type!(MODULE, Module, str);
constant_type!(PACKAGE, Package, str);
