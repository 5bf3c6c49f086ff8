use std::{convert::TryFrom, io::Read};

use bitflags::bitflags;

use crate::{
    context::ParsingContext, mutf8, types, ClassFileError, ClassFileVersion, Constant,
    ConstantKind, DynamicRef, Layout, MemberRef, MethodHandle, NameAndType, ReferenceKind, Result,
};

bitflags! {
    /// A set of constant kinds, one bit per tag.
    pub struct ConstantKinds: u32 {
        const UTF8 = 1 << 1;
        const INTEGER = 1 << 3;
        const FLOAT = 1 << 4;
        const LONG = 1 << 5;
        const DOUBLE = 1 << 6;
        const CLASS = 1 << 7;
        const STRING = 1 << 8;
        const FIELD_REF = 1 << 9;
        const METHOD_REF = 1 << 10;
        const INTERFACE_METHOD_REF = 1 << 11;
        const NAME_AND_TYPE = 1 << 12;
        const METHOD_HANDLE = 1 << 15;
        const METHOD_TYPE = 1 << 16;
        const DYNAMIC = 1 << 17;
        const INVOKE_DYNAMIC = 1 << 18;
        const MODULE = 1 << 19;
        const PACKAGE = 1 << 20;

        // Kinds introduced with JVMS table 4.4-B
        const SINCE_45_3 = Self::UTF8.bits
            | Self::INTEGER.bits
            | Self::FLOAT.bits
            | Self::LONG.bits
            | Self::DOUBLE.bits
            | Self::CLASS.bits
            | Self::STRING.bits
            | Self::FIELD_REF.bits
            | Self::METHOD_REF.bits
            | Self::INTERFACE_METHOD_REF.bits
            | Self::NAME_AND_TYPE.bits;
        const SINCE_51_0 = Self::METHOD_HANDLE.bits
            | Self::METHOD_TYPE.bits
            | Self::INVOKE_DYNAMIC.bits;
        const SINCE_53_0 = Self::MODULE.bits | Self::PACKAGE.bits;
        const SINCE_55_0 = Self::DYNAMIC.bits;
    }
}

impl From<ConstantKind> for ConstantKinds {
    fn from(kind: ConstantKind) -> Self {
        ConstantKinds::from_bits_truncate(1 << kind.tag())
    }
}

/// The table of constant kinds a pool is willing to decode, keyed by tag.
///
/// A registry is immutable once built and owned by the pool that uses it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Registry {
    kinds: ConstantKinds,
}
impl Registry {
    pub fn new(kinds: ConstantKinds) -> Self {
        Self { kinds }
    }

    pub fn all() -> Self {
        Self::new(ConstantKinds::all())
    }

    /// The kinds a class file of the given version may contain.
    pub fn for_version(version: ClassFileVersion) -> Self {
        let mut kinds = ConstantKinds::SINCE_45_3;
        if version >= ClassFileVersion::new(51, 0) {
            kinds |= ConstantKinds::SINCE_51_0;
        }
        if version >= ClassFileVersion::new(53, 0) {
            kinds |= ConstantKinds::SINCE_53_0;
        }
        if version >= ClassFileVersion::new(55, 0) {
            kinds |= ConstantKinds::SINCE_55_0;
        }
        Self::new(kinds)
    }

    pub fn kinds(&self) -> ConstantKinds {
        self.kinds
    }

    pub fn lookup(&self, tag: u8) -> Option<ConstantKind> {
        let kind = ConstantKind::try_from(tag).ok()?;
        if self.kinds.contains(kind.into()) {
            Some(kind)
        } else {
            None
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::all()
    }
}

/// The body of a constant, as read off the stream.
pub(crate) enum Body {
    /// Utf8 and numeric constants refer to nothing and are decoded right away.
    Decoded(Constant),
    /// The isolated bytes of a bounded constant, decoded with [`decode`] once its value is needed.
    Isolated(Vec<u8>),
}

/// Reads the body of a constant whose tag has already been read.
pub(crate) fn read_body<R: Read>(
    kind: ConstantKind,
    ctx: &mut ParsingContext<'_, R>,
) -> Result<Body> {
    match kind.layout() {
        Layout::Unbounded => Ok(Body::Decoded(decode_body(kind, ctx)?)),
        Layout::Bounded(length) => Ok(Body::Isolated(ctx.isolate(length)?)),
    }
}

/// Decodes an isolated body, resolving the constants it refers to.
pub(crate) fn decode<R: Read>(
    kind: ConstantKind,
    mut ctx: ParsingContext<'_, R>,
) -> Result<Constant> {
    let constant = decode_body(kind, &mut ctx)?;
    ctx.finish()?;

    Ok(constant)
}

fn decode_body<R: Read>(
    kind: ConstantKind,
    ctx: &mut ParsingContext<'_, R>,
) -> Result<Constant> {
    Ok(match kind {
        ConstantKind::Utf8 => Constant::Utf8(parse_utf8(ctx)?),
        ConstantKind::Integer => Constant::Integer(ctx.read_i32()?),
        ConstantKind::Float => Constant::Float(ctx.read_f32()?),
        ConstantKind::Long => Constant::Long(ctx.read_i64()?),
        ConstantKind::Double => Constant::Double(ctx.read_f64()?),
        ConstantKind::Class => Constant::Class(parse_indirect_utf8(ctx)?),
        ConstantKind::String => Constant::String(parse_indirect_utf8(ctx)?),
        ConstantKind::FieldRef => Constant::FieldRef(parse_member_ref(ctx)?),
        ConstantKind::MethodRef => Constant::MethodRef(parse_member_ref(ctx)?),
        ConstantKind::InterfaceMethodRef => Constant::InterfaceMethodRef(parse_member_ref(ctx)?),
        ConstantKind::NameAndType => Constant::NameAndType(parse_name_and_type(ctx)?),
        ConstantKind::MethodHandle => Constant::MethodHandle(parse_method_handle(ctx)?),
        ConstantKind::MethodType => Constant::MethodType(parse_indirect_utf8(ctx)?),
        ConstantKind::Dynamic => Constant::Dynamic(parse_dynamic_ref(ctx)?),
        ConstantKind::InvokeDynamic => Constant::InvokeDynamic(parse_dynamic_ref(ctx)?),
        ConstantKind::Module => Constant::Module(parse_indirect_utf8(ctx)?),
        ConstantKind::Package => Constant::Package(parse_indirect_utf8(ctx)?),
    })
}

fn parse_utf8<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<String> {
    let length = ctx.read_u16()?;
    let bytes = ctx.read_bytes(length as usize)?;

    mutf8::decode(&bytes).ok_or(ClassFileError::InvalidModifiedUtf8 { index: ctx.index() })
}

fn parse_indirect_utf8<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<String> {
    let index = ctx.read_u16()?;

    Ok(ctx.pool().get(index, types::UTF8)?.to_owned())
}

fn parse_member_ref<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<MemberRef> {
    let class_index = ctx.read_u16()?;
    let class = ctx.pool().get(class_index, types::CLASS)?.to_owned();
    let name_and_type_index = ctx.read_u16()?;
    let name_and_type = ctx
        .pool()
        .get(name_and_type_index, types::NAME_AND_TYPE)?
        .clone();

    Ok(MemberRef {
        class,
        name_and_type,
    })
}

fn parse_name_and_type<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<NameAndType> {
    let name = parse_indirect_utf8(ctx)?;
    let descriptor = parse_indirect_utf8(ctx)?;

    Ok(NameAndType { name, descriptor })
}

fn parse_method_handle<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<MethodHandle> {
    let kind = ReferenceKind::try_from(ctx.read_u8()?)
        .map_err(ClassFileError::InvalidReferenceKind)?;
    let reference_index = ctx.read_u16()?;
    let reference = ctx
        .pool()
        .get_one_of(reference_index, kind.accepted_types())?
        .clone();

    Ok(MethodHandle { kind, reference })
}

fn parse_dynamic_ref<R: Read>(ctx: &mut ParsingContext<'_, R>) -> Result<DynamicRef> {
    let bootstrap_method_attr_index = ctx.read_u16()?;
    let name_and_type_index = ctx.read_u16()?;
    let name_and_type = ctx
        .pool()
        .get(name_and_type_index, types::NAME_AND_TYPE)?
        .clone();

    Ok(DynamicRef {
        bootstrap_method_attr_index,
        name_and_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_tags() {
        let registry = Registry::all();
        for kind in ConstantKind::ALL {
            assert_eq!(Some(kind), registry.lookup(kind.tag()));
        }
    }

    #[test]
    fn test_lookup_unknown_tags() {
        let registry = Registry::all();
        for tag in [0, 2, 13, 14, 21, 255] {
            assert_eq!(None, registry.lookup(tag));
        }
    }

    #[test]
    fn test_interface_method_ref_and_package_have_own_tags() {
        let registry = Registry::all();
        assert_eq!(Some(ConstantKind::InterfaceMethodRef), registry.lookup(11));
        assert_eq!(Some(ConstantKind::Package), registry.lookup(20));
    }

    #[test]
    fn test_java_8_registry() {
        let registry = Registry::for_version(ClassFileVersion::new(52, 0));
        assert_eq!(Some(ConstantKind::InvokeDynamic), registry.lookup(18));
        assert_eq!(None, registry.lookup(ConstantKind::Module.tag()));
        assert_eq!(None, registry.lookup(ConstantKind::Dynamic.tag()));
    }

    #[test]
    fn test_java_1_registry() {
        let registry = Registry::for_version(ClassFileVersion::new(45, 3));
        assert_eq!(Some(ConstantKind::InterfaceMethodRef), registry.lookup(11));
        assert_eq!(None, registry.lookup(ConstantKind::MethodHandle.tag()));
    }

    #[test]
    fn test_java_11_registry_is_complete() {
        let registry = Registry::for_version(ClassFileVersion::new(55, 0));
        assert_eq!(Registry::all(), registry);
    }

    #[test]
    fn test_bounded_layouts() {
        assert_eq!(Layout::Bounded(2), ConstantKind::Class.layout());
        assert_eq!(Layout::Bounded(3), ConstantKind::MethodHandle.layout());
        assert_eq!(Layout::Bounded(4), ConstantKind::InvokeDynamic.layout());
        assert_eq!(Layout::Unbounded, ConstantKind::Double.layout());
    }
}
