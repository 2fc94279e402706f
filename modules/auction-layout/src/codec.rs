use std::io::{self, Write};

use anchor_lang::prelude::{AnchorDeserialize, AnchorSerialize, Pubkey};

use crate::{
    layout::{Field, Layout, OPTION_FLAG_LEN, PUBKEY_LEN, VEC_LENGTH_LEN},
    Record, Value,
};

pub(crate) fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

pub(crate) fn invalid_input(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

/// Split `len` bytes off the front of `buf`.
pub(crate) fn take<'a>(buf: &mut &'a [u8], len: usize) -> io::Result<&'a [u8]> {
    if buf.len() < len {
        return Err(invalid_data(format!(
            "unexpected end of buffer: need {len} bytes, {} remaining",
            buf.len()
        )));
    }
    let (head, rest) = buf.split_at(len);
    *buf = rest;
    Ok(head)
}

fn read_flag(buf: &mut &[u8], what: &str) -> io::Result<bool> {
    match u8::deserialize(buf)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(invalid_data(format!("invalid {what} byte {other}"))),
    }
}

pub(crate) fn read_fields(fields: &[Field], buf: &mut &[u8]) -> io::Result<Record> {
    let mut record = Record::with_capacity(fields.len());
    for field in fields {
        let value = read_value(&field.layout, buf)
            .map_err(|e| invalid_data(format!("field `{}`: {e}", field.name)))?;
        record.push(field.name, value);
    }
    Ok(record)
}

pub(crate) fn read_value(layout: &Layout, buf: &mut &[u8]) -> io::Result<Value> {
    let value = match layout {
        Layout::U8 => Value::U8(AnchorDeserialize::deserialize(buf)?),
        Layout::U16 => Value::U16(AnchorDeserialize::deserialize(buf)?),
        Layout::U32 => Value::U32(AnchorDeserialize::deserialize(buf)?),
        Layout::U64 => Value::U64(AnchorDeserialize::deserialize(buf)?),
        Layout::Bool => Value::Bool(read_flag(buf, "bool")?),
        Layout::Bytes(len) => Value::Bytes(take(buf, *len)?.to_vec()),
        Layout::Pubkey => {
            let mut key = [0; PUBKEY_LEN];
            key.copy_from_slice(take(buf, PUBKEY_LEN)?);
            Value::Pubkey(Pubkey::new_from_array(key))
        }
        Layout::Option(inner) => {
            if read_flag(buf, "option flag")? {
                Value::Option(Some(Box::new(read_value(inner, buf)?)))
            } else {
                Value::Option(None)
            }
        }
        Layout::Vec(inner) => {
            let len = usize::try_from(u32::deserialize(buf)?)
                .map_err(|_| invalid_data("vector length overflows usize"))?;

            // Reject lengths the remaining buffer cannot possibly hold before allocating.
            let needed = len.saturating_mul(inner.min_size());
            if needed > buf.len() {
                return Err(invalid_data(format!(
                    "vector of {len} elements needs at least {needed} bytes, {} remaining",
                    buf.len()
                )));
            }

            let mut elements = Vec::with_capacity(len.min(buf.len()));
            for _ in 0..len {
                elements.push(read_value(inner, buf)?);
            }
            Value::Vec(elements)
        }
        Layout::Struct(fields) => Value::Struct(read_fields(fields, buf)?),
    };

    Ok(value)
}

fn check_field_names(fields: &[Field], record: &Record) -> io::Result<()> {
    if fields.len() != record.len() {
        return Err(invalid_input(format!(
            "record has {} fields, layout expects {}",
            record.len(),
            fields.len()
        )));
    }
    match fields
        .iter()
        .zip(record.iter())
        .find(|(field, (name, _))| field.name != *name)
    {
        Some((field, (name, _))) => Err(invalid_input(format!(
            "field `{name}` found where `{}` is expected",
            field.name
        ))),
        None => Ok(()),
    }
}

fn kind_mismatch(layout: &Layout, value: &Value) -> io::Error {
    invalid_input(format!("{layout:?} cannot encode {} value", value.kind()))
}

pub(crate) fn write_fields<W: Write>(
    fields: &[Field],
    record: &Record,
    writer: &mut W,
) -> io::Result<()> {
    check_field_names(fields, record)?;
    for (field, (name, value)) in fields.iter().zip(record.iter()) {
        write_value(&field.layout, value, writer)
            .map_err(|e| io::Error::new(e.kind(), format!("field `{name}`: {e}")))?;
    }
    Ok(())
}

pub(crate) fn write_value<W: Write>(
    layout: &Layout,
    value: &Value,
    writer: &mut W,
) -> io::Result<()> {
    match (layout, value) {
        (Layout::U8, Value::U8(inner)) => inner.serialize(writer),
        (Layout::U16, Value::U16(inner)) => inner.serialize(writer),
        (Layout::U32, Value::U32(inner)) => inner.serialize(writer),
        (Layout::U64, Value::U64(inner)) => inner.serialize(writer),
        (Layout::Bool, Value::Bool(inner)) => u8::from(*inner).serialize(writer),
        (Layout::Bytes(len), Value::Bytes(inner)) => {
            if inner.len() != *len {
                return Err(invalid_input(format!(
                    "expected {len} bytes, found {}",
                    inner.len()
                )));
            }
            writer.write_all(inner)
        }
        (Layout::Pubkey, Value::Pubkey(inner)) => writer.write_all(inner.as_ref()),
        (Layout::Option(_), Value::Option(None)) => 0u8.serialize(writer),
        (Layout::Option(layout), Value::Option(Some(inner))) => {
            1u8.serialize(writer)?;
            write_value(layout, inner, writer)
        }
        (Layout::Vec(layout), Value::Vec(elements)) => {
            let len = u32::try_from(elements.len())
                .map_err(|_| invalid_input("vector length overflows u32"))?;
            len.serialize(writer)?;
            elements
                .iter()
                .try_for_each(|element| write_value(layout, element, writer))
        }
        (Layout::Struct(fields), Value::Struct(record)) => write_fields(fields, record, writer),
        (layout, value) => Err(kind_mismatch(layout, value)),
    }
}

pub(crate) fn fields_size(fields: &[Field], record: &Record) -> io::Result<usize> {
    check_field_names(fields, record)?;
    fields
        .iter()
        .zip(record.iter())
        .try_fold(0usize, |acc, (field, (_, value))| {
            checked_add(acc, value_size(&field.layout, value)?)
        })
}

pub(crate) fn value_size(layout: &Layout, value: &Value) -> io::Result<usize> {
    match (layout, value) {
        (Layout::Option(_), Value::Option(None)) => Ok(OPTION_FLAG_LEN),
        (Layout::Option(layout), Value::Option(Some(inner))) => {
            checked_add(OPTION_FLAG_LEN, value_size(layout, inner)?)
        }
        (Layout::Vec(layout), Value::Vec(elements)) => elements
            .iter()
            .try_fold(VEC_LENGTH_LEN, |acc, element| {
                checked_add(acc, value_size(layout, element)?)
            }),
        (Layout::Struct(fields), Value::Struct(record)) => fields_size(fields, record),
        (Layout::Bytes(len), Value::Bytes(inner)) if inner.len() == *len => Ok(*len),
        (layout, value) if layout_matches(layout, value) => Ok(layout.min_size()),
        (layout, value) => Err(kind_mismatch(layout, value)),
    }
}

fn layout_matches(layout: &Layout, value: &Value) -> bool {
    matches!(
        (layout, value),
        (Layout::U8, Value::U8(_))
            | (Layout::U16, Value::U16(_))
            | (Layout::U32, Value::U32(_))
            | (Layout::U64, Value::U64(_))
            | (Layout::Bool, Value::Bool(_))
            | (Layout::Pubkey, Value::Pubkey(_))
    )
}

fn checked_add(lhs: usize, rhs: usize) -> io::Result<usize> {
    lhs.checked_add(rhs)
        .ok_or_else(|| invalid_input("encoded size overflows usize"))
}
