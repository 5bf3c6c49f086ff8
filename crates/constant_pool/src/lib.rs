// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4

mod constant;
mod context;
mod error;
mod header;
mod kind;
mod mutf8;
mod pool;
mod registry;
pub mod types;
mod visitor;

pub use constant::{Constant, DynamicRef, MemberRef, MethodHandle, NameAndType, ReferenceKind};
pub use error::ClassFileError;
pub use header::{read_header, ClassFileVersion};
pub use kind::{ConstantKind, Layout};
pub use pool::ConstantPool;
pub use registry::{ConstantKinds, Registry};
pub use types::ConstantType;
pub use visitor::ConstantVisitor;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
