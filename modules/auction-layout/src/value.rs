use std::io;

use anchor_lang::prelude::Pubkey;

/// Decoded field value. The variant mirrors the [Layout](crate::Layout) it was read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Pubkey(Pubkey),
    Option(Option<Box<Value>>),
    Vec(Vec<Value>),
    Struct(Record),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Pubkey(_) => "pubkey",
            Self::Option(_) => "option",
            Self::Vec(_) => "vec",
            Self::Struct(_) => "struct",
        }
    }

    pub fn as_u8(&self) -> io::Result<u8> {
        match self {
            Self::U8(value) => Ok(*value),
            other => Err(mismatch("u8", other)),
        }
    }

    pub fn as_u16(&self) -> io::Result<u16> {
        match self {
            Self::U16(value) => Ok(*value),
            other => Err(mismatch("u16", other)),
        }
    }

    pub fn as_u32(&self) -> io::Result<u32> {
        match self {
            Self::U32(value) => Ok(*value),
            other => Err(mismatch("u32", other)),
        }
    }

    pub fn as_u64(&self) -> io::Result<u64> {
        match self {
            Self::U64(value) => Ok(*value),
            other => Err(mismatch("u64", other)),
        }
    }

    pub fn as_bool(&self) -> io::Result<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_bytes(&self) -> io::Result<&[u8]> {
        match self {
            Self::Bytes(value) => Ok(value),
            other => Err(mismatch("bytes", other)),
        }
    }

    pub fn as_array<const N: usize>(&self) -> io::Result<[u8; N]> {
        self.as_bytes()?.try_into().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected {N} bytes, found {}", self.as_bytes().map_or(0, <[u8]>::len)),
            )
        })
    }

    pub fn as_pubkey(&self) -> io::Result<Pubkey> {
        match self {
            Self::Pubkey(value) => Ok(*value),
            other => Err(mismatch("pubkey", other)),
        }
    }

    pub fn as_option(&self) -> io::Result<Option<&Value>> {
        match self {
            Self::Option(value) => Ok(value.as_deref()),
            other => Err(mismatch("option", other)),
        }
    }

    pub fn as_vec(&self) -> io::Result<&[Value]> {
        match self {
            Self::Vec(value) => Ok(value),
            other => Err(mismatch("vec", other)),
        }
    }

    pub fn as_record(&self) -> io::Result<&Record> {
        match self {
            Self::Struct(value) => Ok(value),
            other => Err(mismatch("struct", other)),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("expected {expected} value, found {}", found.kind()),
    )
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::U8(value)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::U16(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Pubkey> for Value {
    fn from(value: Pubkey) -> Self {
        Self::Pubkey(value)
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Struct(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Vec(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Self::Option(value.map(|inner| Box::new(inner.into())))
    }
}

/// Ordered set of named values, one per schema field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style [Record::push].
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<Value>) {
        self.fields.push((name, value.into()));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn get(&self, name: &str) -> io::Result<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (*field == name).then_some(value))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, format!("missing field `{name}`"))
            })
    }

    pub fn u8(&self, name: &str) -> io::Result<u8> {
        self.get(name)?.as_u8()
    }

    pub fn u16(&self, name: &str) -> io::Result<u16> {
        self.get(name)?.as_u16()
    }

    pub fn u32(&self, name: &str) -> io::Result<u32> {
        self.get(name)?.as_u32()
    }

    pub fn u64(&self, name: &str) -> io::Result<u64> {
        self.get(name)?.as_u64()
    }

    pub fn bool(&self, name: &str) -> io::Result<bool> {
        self.get(name)?.as_bool()
    }

    pub fn pubkey(&self, name: &str) -> io::Result<Pubkey> {
        self.get(name)?.as_pubkey()
    }

    pub fn array<const N: usize>(&self, name: &str) -> io::Result<[u8; N]> {
        self.get(name)?.as_array()
    }

    pub fn optional(&self, name: &str) -> io::Result<Option<&Value>> {
        self.get(name)?.as_option()
    }

    pub fn list(&self, name: &str) -> io::Result<&[Value]> {
        self.get(name)?.as_vec()
    }

    pub fn record(&self, name: &str) -> io::Result<&Record> {
        self.get(name)?.as_record()
    }
}
