use std::io;

use crate::{
    codec::{self, invalid_data, invalid_input},
    layout::{fields_fixed_size, fields_min_size},
    Field, Record,
};

/// Account descriptor: an optional discriminator followed by the top-level fields.
///
/// Field order is the program's in-memory order. Reordering fields changes the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub discriminator: Option<&'static [u8]>,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            discriminator: None,
            fields,
        }
    }

    pub const fn with_discriminator(self, discriminator: &'static [u8]) -> Self {
        Self {
            discriminator: Some(discriminator),
            ..self
        }
    }

    fn discriminator_len(&self) -> usize {
        self.discriminator.map_or(0, <[u8]>::len)
    }

    /// Total account size when no field depends on runtime values.
    pub fn fixed_size(&self) -> Option<usize> {
        fields_fixed_size(self.fields)?.checked_add(self.discriminator_len())
    }

    /// Smallest valid encoding of this schema, discriminator included.
    pub fn min_size(&self) -> usize {
        fields_min_size(self.fields).saturating_add(self.discriminator_len())
    }

    /// Byte offset of the top-level field `name`, discriminator included. Only known when every
    /// field before it is fixed-size.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = self.discriminator_len();
        for field in self.fields {
            if field.name == name {
                return Some(offset);
            }
            offset = offset.checked_add(field.layout.fixed_size()?)?;
        }
        None
    }

    /// Exact encoded size of `record`, which always equals the length of [Schema::encode]'s
    /// output.
    pub fn byte_size(&self, record: &Record) -> io::Result<usize> {
        codec::fields_size(self.fields, record)?
            .checked_add(self.discriminator_len())
            .ok_or_else(|| invalid_input("encoded size overflows usize"))
    }

    pub fn encode(&self, record: &Record) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.byte_size(record)?);
        if let Some(discriminator) = self.discriminator {
            buf.extend_from_slice(discriminator);
        }
        codec::write_fields(self.fields, record, &mut buf)?;
        Ok(buf)
    }

    /// Decode the leading bytes of `data`. Bytes after the last field are ignored, because
    /// accounts are often allocated larger than their content.
    pub fn decode(&self, data: &[u8]) -> io::Result<Record> {
        let min_size = self.min_size();
        if data.len() < min_size {
            return Err(invalid_data(format!(
                "{}: expected at least {min_size} bytes, found {}",
                self.name,
                data.len()
            )));
        }

        let mut buf = data;
        if let Some(expected) = self.discriminator {
            let found = codec::take(&mut buf, expected.len())?;
            if found != expected {
                return Err(invalid_data(format!(
                    "{}: discriminator mismatch: expected {}, found {}",
                    self.name,
                    hex::encode(expected),
                    hex::encode(found)
                )));
            }
        }

        codec::read_fields(self.fields, &mut buf)
            .map_err(|e| invalid_data(format!("{}: {e}", self.name)))
    }
}
