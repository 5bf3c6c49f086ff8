use std::{fmt, io::Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{
    context::ParsingContext,
    header::read_header,
    registry::{self, Body},
    types::ConstantType,
    ClassFileError, ClassFileVersion, Constant, ConstantKind, ConstantVisitor, Registry, Result,
};

enum Slot {
    /// A bounded constant whose body has been read but whose references are not resolved yet.
    Unresolved { kind: ConstantKind, body: Vec<u8> },
    Resolved(Constant),
    /// The index following a `CONSTANT_Long` or `CONSTANT_Double`.
    Unusable,
}

/// A constant pool that is decoded lazily from a stream.
///
/// Constant boundaries are only known once a constant has been read, so looking up index `n`
/// reads every constant up to and including `n` that has not been read yet. Reading never follows
/// references: the bodies of constants referring to other constants are kept as raw bytes and
/// resolved when their value is first asked for. Those references may point further down the
/// stream, in which case the pool reads (and caches) up to the referenced constant.
///
/// The pool reads exactly the bytes it needs and never buffers ahead, so that the stream handed
/// back by [`ConstantPool::close`] is positioned right after the last constant read. Wrap
/// unbuffered sources such as files in a [`BufReader`](std::io::BufReader).
///
/// Indices are 1-based, as in the class file format: the valid indices are `1..count()`.
pub struct ConstantPool<R> {
    pub(crate) reader: Option<R>,
    count: u16,
    registry: Registry,
    slots: Vec<Slot>,
    poisoned: bool,
}
impl<R: Read> ConstantPool<R> {
    /// Reads the constant pool count from `reader`, accepting every known constant kind.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_registry(reader, Registry::all())
    }

    pub fn with_registry(mut reader: R, registry: Registry) -> Result<Self> {
        let count = reader.read_u16::<BigEndian>()?;
        log::debug!("Opened constant pool with count {}", count);

        Ok(Self {
            reader: Some(reader),
            count,
            registry,
            slots: Vec::with_capacity(count.saturating_sub(1) as usize),
            poisoned: false,
        })
    }

    /// Reads a class file header followed by the constant pool count, accepting only the
    /// constant kinds allowed by the class file's version.
    pub fn from_class_file(mut reader: R) -> Result<(ClassFileVersion, Self)> {
        let version = read_header(&mut reader)?;
        let pool = Self::with_registry(reader, Registry::for_version(version))?;

        Ok((version, pool))
    }

    /// The `constant_pool_count` read from the stream, one more than the number of entries.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Number of indices read so far, including unusable ones.
    pub fn resolved(&self) -> usize {
        self.slots.len()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    pub fn reader(&self) -> Result<&R> {
        self.reader.as_ref().ok_or(ClassFileError::Closed)
    }

    pub fn get<T: ?Sized>(&mut self, index: u16, ty: ConstantType<T>) -> Result<&T> {
        self.get_one_of(index, &[ty])
    }

    /// Looks up a constant that may be of any of the given types.
    ///
    /// The kind is checked before the constant's own references are resolved.
    pub fn get_one_of<T: ?Sized>(
        &mut self,
        index: u16,
        types: &[ConstantType<T>],
    ) -> Result<&T> {
        let found = self.kind_at(index)?;
        let mismatch = || ClassFileError::UnexpectedConstant {
            index,
            expected: types.iter().map(|ty| ty.kind()).collect(),
            found,
        };
        if !types.iter().any(|ty| ty.kind() == found) {
            return Err(mismatch());
        }

        let constant = self.get_untyped(index)?;
        types
            .iter()
            .find_map(|ty| ty.cast(constant))
            .ok_or_else(mismatch)
    }

    pub fn get_untyped(&mut self, index: u16) -> Result<&Constant> {
        self.fill(index)?;
        self.resolve(index)?;

        match &self.slots[index as usize - 1] {
            Slot::Resolved(constant) => Ok(constant),
            _ => Err(ClassFileError::UnusableIndex(index)),
        }
    }

    /// Reads and resolves every remaining constant.
    pub fn resolve_all(&mut self) -> Result<()> {
        self.check_closed()?;

        for index in 1..self.count {
            match self.get_untyped(index) {
                Ok(_) | Err(ClassFileError::UnusableIndex(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Walks the pool in index order, handing each constant to `visitor`.
    ///
    /// Stops at the first constant that cannot be decoded; constants before it have already been
    /// visited by then.
    pub fn accept<V: ConstantVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        self.check_closed()?;

        for index in 1..self.count {
            match self.get_untyped(index) {
                Ok(constant) => constant.accept(visitor),
                Err(ClassFileError::UnusableIndex(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// The constants resolved so far, with their indices.
    pub fn constants(&self) -> Result<impl Iterator<Item = (u16, &Constant)> + '_> {
        self.check_closed()?;

        Ok(self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Slot::Resolved(constant) => Some((i as u16 + 1, constant)),
                _ => None,
            }))
    }

    /// Releases the stream, handing it back positioned after the last constant read.
    pub fn close(&mut self) -> Result<R> {
        let reader = self.reader.take().ok_or(ClassFileError::Closed)?;
        log::debug!(
            "Closed constant pool after reading {} of {} entries",
            self.slots.len(),
            self.count.saturating_sub(1)
        );

        Ok(reader)
    }

    fn check_closed(&self) -> Result<()> {
        match self.reader {
            Some(_) => Ok(()),
            None => Err(ClassFileError::Closed),
        }
    }

    /// Reads constants off the stream until `index` has been read.
    fn fill(&mut self, index: u16) -> Result<()> {
        self.check_closed()?;
        if index == 0 || index >= self.count {
            return Err(ClassFileError::InvalidIndex(index));
        }

        while self.slots.len() < index as usize {
            self.next_entry()?;
        }

        Ok(())
    }

    /// The kind of an already read constant, without resolving it.
    fn kind_at(&mut self, index: u16) -> Result<ConstantKind> {
        self.fill(index)?;

        match &self.slots[index as usize - 1] {
            Slot::Unresolved { kind, .. } => Ok(*kind),
            Slot::Resolved(constant) => Ok(constant.kind()),
            Slot::Unusable => Err(ClassFileError::UnusableIndex(index)),
        }
    }

    /// Resolves the references of an already read constant.
    ///
    /// A failure leaves the constant unresolved without poisoning the pool, since its bytes have
    /// been read in full either way.
    fn resolve(&mut self, index: u16) -> Result<()> {
        let slot = index as usize - 1;
        let (kind, body) = match &self.slots[slot] {
            Slot::Unresolved { kind, body } => (*kind, body.clone()),
            Slot::Resolved(_) => return Ok(()),
            Slot::Unusable => return Err(ClassFileError::UnusableIndex(index)),
        };

        let constant = registry::decode(kind, ParsingContext::isolated(self, index, kind, body))?;
        log::trace!("#{} = {} {:?}", index, kind, constant);
        self.slots[slot] = Slot::Resolved(constant);

        Ok(())
    }

    fn next_entry(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(ClassFileError::Poisoned);
        }

        let result = self.read_entry();
        if let Err(e) = &result {
            log::warn!("Failed to read constant pool: {}", e);
            self.poisoned = true;
        }
        result
    }

    fn read_entry(&mut self) -> Result<()> {
        let reader = self.reader.as_mut().ok_or(ClassFileError::Closed)?;
        let tag = reader.read_u8()?;
        let kind = self
            .registry
            .lookup(tag)
            .ok_or(ClassFileError::InvalidConstantTag(tag))?;

        let index = self.slots.len() as u16 + 1;
        let slot = match registry::read_body(kind, &mut ParsingContext::new(self, index, kind))? {
            Body::Decoded(constant) => {
                log::trace!("#{} = {} {:?}", index, kind, constant);
                Slot::Resolved(constant)
            }
            Body::Isolated(body) => Slot::Unresolved { kind, body },
        };
        self.slots.push(slot);
        (1..kind.slots()).for_each(|_| self.slots.push(Slot::Unusable));

        Ok(())
    }
}

impl<R> fmt::Debug for ConstantPool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstantPool")
            .field("count", &self.count)
            .field("resolved", &self.slots.len())
            .field("closed", &self.reader.is_none())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
