use thiserror::Error;

use crate::ConstantKind;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Invalid constant pool tag: {0}")]
    InvalidConstantTag(u8),
    #[error("Truncated {kind} at index {index}")]
    TruncatedConstant { index: u16, kind: ConstantKind },
    #[error("Malformed {kind} at index {index}")]
    MalformedConstant { index: u16, kind: ConstantKind },
    #[error("Invalid method handle reference kind: {0}")]
    InvalidReferenceKind(u8),
    #[error("Invalid modified UTF-8 at index {index}")]
    InvalidModifiedUtf8 { index: u16 },
    #[error("Invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("Constant pool index {0} is unusable")]
    UnusableIndex(u16),
    #[error("Constant pool is unreadable after an earlier decoding failure")]
    Poisoned,
    #[error("Expected {}, found {found} at index {index}", join_kinds(.expected))]
    UnexpectedConstant {
        index: u16,
        expected: Vec<ConstantKind>,
        found: ConstantKind,
    },
    #[error("Constant pool is closed")]
    Closed,
}
impl ClassFileError {
    /// Whether the error stems from malformed input rather than from how the pool was used.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ClassFileError::InvalidMagicIdentifier(_)
                | ClassFileError::InvalidConstantTag(_)
                | ClassFileError::TruncatedConstant { .. }
                | ClassFileError::MalformedConstant { .. }
                | ClassFileError::InvalidReferenceKind(_)
                | ClassFileError::InvalidModifiedUtf8 { .. }
                | ClassFileError::InvalidIndex(_)
                | ClassFileError::UnusableIndex(_)
                | ClassFileError::Poisoned
        )
    }
}

fn join_kinds(kinds: &[ConstantKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}
