use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{ClassFileError, ConstantKind, ConstantPool, Result};

type Endian = BigEndian;

/// The state needed to decode one constant: the pool to resolve indices against, and where to
/// read the constant's bytes from.
///
/// Without a slice, bytes come straight from the pool's stream; this is how constants are read,
/// and nothing is looked up in the pool then. A slice holds the isolated body of a bounded
/// constant being resolved, and reading past its end is a malformed constant rather than an I/O
/// error.
pub(crate) struct ParsingContext<'p, R> {
    pool: &'p mut ConstantPool<R>,
    slice: Option<Cursor<Vec<u8>>>,
    index: u16,
    kind: ConstantKind,
}
impl<'p, R: Read> ParsingContext<'p, R> {
    pub(crate) fn new(pool: &'p mut ConstantPool<R>, index: u16, kind: ConstantKind) -> Self {
        Self {
            pool,
            slice: None,
            index,
            kind,
        }
    }

    /// A context confined to the isolated body of a bounded constant.
    pub(crate) fn isolated(
        pool: &'p mut ConstantPool<R>,
        index: u16,
        kind: ConstantKind,
        body: Vec<u8>,
    ) -> Self {
        Self {
            pool,
            slice: Some(Cursor::new(body)),
            index,
            kind,
        }
    }

    /// Reads exactly `length` bytes, the body of a bounded constant.
    pub(crate) fn isolate(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut body = vec![0u8; length];
        self.read_exact(&mut body).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ClassFileError::TruncatedConstant {
                index: self.index,
                kind: self.kind,
            },
            _ => e.into(),
        })?;

        Ok(body)
    }

    /// Ensures an isolated body was consumed completely.
    pub(crate) fn finish(self) -> Result<()> {
        match &self.slice {
            Some(slice) if (slice.position() as usize) < slice.get_ref().len() => {
                Err(self.malformed())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn pool(&mut self) -> &mut ConstantPool<R> {
        &mut *self.pool
    }

    pub(crate) fn index(&self) -> u16 {
        self.index
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        self.read_with(|r| ReadBytesExt::read_u8(r))
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        self.read_with(|r| ReadBytesExt::read_u16::<Endian>(r))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        self.read_with(|r| ReadBytesExt::read_i32::<Endian>(r))
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        self.read_with(|r| ReadBytesExt::read_f32::<Endian>(r))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        self.read_with(|r| ReadBytesExt::read_i64::<Endian>(r))
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        self.read_with(|r| ReadBytesExt::read_f64::<Endian>(r))
    }

    pub(crate) fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; length];
        self.read_with(|r| r.read_exact(&mut bytes))?;
        Ok(bytes)
    }

    fn read_with<T>(&mut self, f: impl FnOnce(&mut Self) -> io::Result<T>) -> Result<T> {
        f(self).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof if self.slice.is_some() => self.malformed(),
            _ => e.into(),
        })
    }

    fn malformed(&self) -> ClassFileError {
        ClassFileError::MalformedConstant {
            index: self.index,
            kind: self.kind,
        }
    }
}

impl<R: Read> Read for ParsingContext<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.slice {
            Some(slice) => slice.read(buf),
            None => match self.pool.reader.as_mut() {
                Some(reader) => reader.read(buf),
                None => Err(io::Error::new(
                    io::ErrorKind::Other,
                    "constant pool stream already released",
                )),
            },
        }
    }
}
