use std::{fmt, io::Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{ClassFileError, Result};

const MAGIC_IDENTIFIER: u32 = 0xCAFEBABE;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct ClassFileVersion {
    pub major: u16,
    pub minor: u16,
}
impl ClassFileVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ClassFileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Reads the magic identifier and version of a class file, leaving `r` positioned at the
/// constant pool.
pub fn read_header(mut r: impl Read) -> Result<ClassFileVersion> {
    match r.read_u32::<BigEndian>()? {
        MAGIC_IDENTIFIER => {}
        magic_identifier => return Err(ClassFileError::InvalidMagicIdentifier(magic_identifier)),
    }

    let minor = r.read_u16::<BigEndian>()?;
    let major = r.read_u16::<BigEndian>()?;
    Ok(ClassFileVersion { major, minor })
}
