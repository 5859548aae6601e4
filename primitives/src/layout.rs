// Copyright (C) 2019-2021 Crust Network Technologies Ltd.
// This file is part of Crust.

//! Struct layout engine: a data-driven binary decoder/encoder for
//! `StructDecl`s.
//!
//! Fixed-width fields sit at their declared offsets and must be packed back to
//! back. A variable-width field (`DynamicBytes`, `Option`, `Sequence`) may only
//! be the last field; its extent is given by a SCALE `Compact<u32>` length
//! prefix (or the option tag), never by "rest of the buffer". All integers are
//! little endian.

use codec::{Compact, Decode, Encode};
use sp_core::U256;
use sp_std::{collections::btree_set::BTreeSet, prelude::*, vec};

use crate::{
    abi::{DecodedStruct, Parameter, StructDecl, Type, Value},
    constants::{
        abi::MAX_UINT_BITS,
        layout::{MAX_TYPE_DEPTH, OPTION_NONE_TAG, OPTION_SOME_TAG},
    },
    error::{CodecError, LayoutError, TypeMismatchError},
    gateway::GatewayABIConfig,
};

/// Validated shape of a `StructDecl` under a given ABI.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StructLayout {
    /// Offset of the first field, bytes before it are ignored
    pub start: usize,
    /// End of the last fixed-width field
    pub fixed_end: usize,
    /// Whether the last field is variable width
    pub variable_tail: bool,
    widths: Vec<Option<usize>>,
}

impl StructLayout {
    pub fn compute(decl: &StructDecl, abi: &GatewayABIConfig) -> Result<Self, LayoutError> {
        if decl.fields.len() != decl.offsets.len() {
            return Err(LayoutError::OffsetCountMismatch {
                fields: decl.fields.len() as u32,
                offsets: decl.offsets.len() as u32,
            });
        }

        let mut names = BTreeSet::new();
        let mut widths = Vec::with_capacity(decl.fields.len());
        // End of the previous field, `None` once a variable field was seen
        let mut cursor: Option<usize> = None;
        let mut previous: Option<&Parameter> = None;

        for (field, &offset) in decl.fields.iter().zip(decl.offsets.iter()) {
            let offset = offset as usize;
            if !names.insert(&field.name) {
                return Err(LayoutError::DuplicateField { field: field.name.clone() });
            }

            if let Some(prev) = previous {
                if offset < decl.offsets[widths.len() - 1] as usize {
                    return Err(LayoutError::UnsortedOffsets { field: field.name.clone() });
                }
                match cursor {
                    None => {
                        return Err(LayoutError::VariableWidthNotLast { field: prev.name.clone() })
                    },
                    Some(end) if end != offset => {
                        return Err(LayoutError::WidthMismatch {
                            field: field.name.clone(),
                            expected: end as u32,
                            declared: offset as u32,
                        })
                    },
                    _ => {},
                }
            }

            let width = field_width(field, abi)?;
            cursor = width.map(|w| offset + w);
            widths.push(width);
            previous = Some(field);
        }

        let start = decl.offsets.first().map(|o| *o as usize).unwrap_or_default();
        let variable_tail = matches!(widths.last(), Some(None));
        let fixed_end = match (cursor, decl.offsets.last()) {
            (Some(end), _) => end,
            (None, Some(last)) => *last as usize,
            (None, None) => 0,
        };

        Ok(StructLayout { start, fixed_end, variable_tail, widths })
    }

    /// Shortest buffer that can possibly decode.
    pub fn min_len(&self) -> usize {
        // a variable tail needs at least its tag or length prefix byte
        self.fixed_end + self.variable_tail as usize
    }
}

fn uint_width(bits: u16) -> Option<usize> {
    if bits == 0 || bits % 8 != 0 || bits > MAX_UINT_BITS {
        None
    } else {
        Some(bits as usize / 8)
    }
}

/// `Ok(None)` for variable width types, `Err(())` for unsupported ones.
fn type_width(ty: &Type, abi: &GatewayABIConfig) -> Result<Option<usize>, ()> {
    let fixed = |width: Option<usize>| width.filter(|w| *w > 0).map(Some).ok_or(());
    match ty {
        Type::Bool => Ok(Some(1)),
        Type::Uint(bits) => fixed(uint_width(*bits)),
        Type::Bytes(len) => fixed(Some(*len as usize)),
        Type::Address => fixed(Some(abi.address_length as usize)),
        Type::Value => fixed(uint_width(abi.value_type_size)),
        Type::BlockNumber => fixed(uint_width(abi.block_number_type_size)),
        Type::Hash => fixed(Some(abi.hash_size as usize)),
        Type::Enum(variants) if !variants.is_empty() && variants.len() <= 256 => Ok(Some(1)),
        Type::Enum(_) => Err(()),
        Type::DynamicBytes => Ok(None),
        Type::Option(inner) | Type::Sequence(inner) => type_width(inner, abi).map(|_| None),
    }
}

/// Encoded width of `field` under `abi`, `None` when it varies with the value.
pub fn field_width(field: &Parameter, abi: &GatewayABIConfig) -> Result<Option<usize>, LayoutError> {
    if field.ty.depth() > MAX_TYPE_DEPTH {
        return Err(LayoutError::TypeTooDeep { field: field.name.clone() });
    }
    type_width(&field.ty, abi).map_err(|_| LayoutError::UnsupportedWidth { field: field.name.clone() })
}

/// Decodes `bytes` into a field name to value mapping.
pub fn decode_struct(
    bytes: &[u8],
    decl: &StructDecl,
    abi: &GatewayABIConfig,
) -> Result<DecodedStruct, LayoutError> {
    let layout = decl.layout(abi)?;
    let mut values = DecodedStruct::new();
    let mut end = layout.start.min(bytes.len());

    for ((field, &offset), width) in decl.fields.iter().zip(decl.offsets.iter()).zip(layout.widths.iter()) {
        let offset = offset as usize;
        let mut input = match width {
            Some(width) => bytes.get(offset..offset + width),
            None => bytes.get(offset..).filter(|rest| !rest.is_empty()),
        }
        .ok_or_else(|| LayoutError::BufferTooShort {
            field: field.name.clone(),
            needed: (offset + width.unwrap_or(1)) as u32,
            available: bytes.len() as u32,
        })?;

        let available = input.len();
        let value = read_value(&field.ty, &mut input, abi, &field.name)?;
        end = offset + available - input.len();
        values.insert(field.name.clone(), value);
    }

    match bytes.len().checked_sub(end) {
        Some(0) | None => Ok(values),
        Some(left) => Err(LayoutError::TrailingBytes(left as u32)),
    }
}

fn read_exact<'a>(input: &mut &'a [u8], len: usize, field: &[u8]) -> Result<&'a [u8], LayoutError> {
    if input.len() < len {
        return Err(LayoutError::BufferTooShort {
            field: field.to_vec(),
            needed: len as u32,
            available: input.len() as u32,
        });
    }
    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head)
}

fn read_byte(input: &mut &[u8], field: &[u8]) -> Result<u8, LayoutError> {
    read_exact(input, 1, field).map(|byte| byte[0])
}

fn read_compact(input: &mut &[u8], field: &[u8]) -> Result<usize, LayoutError> {
    <Compact<u32>>::decode(input)
        .map(|len| len.0 as usize)
        .map_err(|_| LayoutError::InvalidLengthPrefix { field: field.to_vec() })
}

fn read_uint(input: &mut &[u8], bits: u16, field: &[u8]) -> Result<Value, LayoutError> {
    let width = uint_width(bits).ok_or_else(|| LayoutError::UnsupportedWidth { field: field.to_vec() })?;
    read_exact(input, width, field).map(|raw| Value::Uint(U256::from_little_endian(raw)))
}

fn read_value(
    ty: &Type,
    input: &mut &[u8],
    abi: &GatewayABIConfig,
    field: &[u8],
) -> Result<Value, LayoutError> {
    match ty {
        Type::Bool => match read_byte(input, field)? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            byte => Err(LayoutError::InvalidBool { field: field.to_vec(), byte }),
        },
        Type::Uint(bits) => read_uint(input, *bits, field),
        Type::Value => read_uint(input, abi.value_type_size, field),
        Type::BlockNumber => read_uint(input, abi.block_number_type_size, field),
        Type::Bytes(len) => read_exact(input, *len as usize, field).map(|raw| Value::Bytes(raw.to_vec())),
        Type::Address => {
            read_exact(input, abi.address_length as usize, field).map(|raw| Value::Bytes(raw.to_vec()))
        },
        Type::Hash => read_exact(input, abi.hash_size as usize, field).map(|raw| Value::Bytes(raw.to_vec())),
        Type::DynamicBytes => {
            let len = read_compact(input, field)?;
            read_exact(input, len, field).map(|raw| Value::Bytes(raw.to_vec()))
        },
        Type::Enum(variants) => {
            let discriminant = read_byte(input, field)?;
            if discriminant as usize >= variants.len() {
                return Err(LayoutError::InvalidEnumDiscriminant { field: field.to_vec(), discriminant });
            }
            Ok(Value::Enum(discriminant))
        },
        Type::Option(inner) => match read_byte(input, field)? {
            OPTION_NONE_TAG => Ok(Value::none()),
            OPTION_SOME_TAG => read_value(inner, input, abi, field).map(Value::some),
            tag => Err(LayoutError::InvalidOptionTag { field: field.to_vec(), tag }),
        },
        Type::Sequence(inner) => {
            let count = read_compact(input, field)?;
            // every item takes at least one byte
            let mut items = Vec::with_capacity(count.min(input.len()));
            for _ in 0..count {
                items.push(read_value(inner, input, abi, field)?);
            }
            Ok(Value::Sequence(items))
        },
    }
}

/// Encodes `values` following `decl`. Bytes before the first offset are zero.
pub fn encode_struct(
    values: &DecodedStruct,
    decl: &StructDecl,
    abi: &GatewayABIConfig,
) -> Result<Vec<u8>, CodecError> {
    let layout = decl.layout(abi)?;
    if let Some(unknown) = values.keys().find(|name| !decl.fields.iter().any(|f| &f.name == *name)) {
        return Err(TypeMismatchError::UnknownField(unknown.clone()).into());
    }

    let mut out = vec![0u8; layout.start];
    out.reserve(layout.min_len().saturating_sub(layout.start));
    for field in decl.fields.iter() {
        let value = values
            .get(&field.name)
            .ok_or_else(|| TypeMismatchError::MissingField(field.name.clone()))?;
        write_value(&field.ty, value, abi, &field.name, &mut out)?;
    }
    Ok(out)
}

fn type_kind(ty: &Type) -> &'static str {
    match ty {
        Type::Bool => "bool",
        Type::Uint(_) | Type::Value | Type::BlockNumber => "uint",
        Type::Bytes(_) | Type::DynamicBytes | Type::Address | Type::Hash => "bytes",
        Type::Enum(_) => "enum",
        Type::Option(_) => "option",
        Type::Sequence(_) => "sequence",
    }
}

fn write_uint(value: &U256, bits: u16, field: &[u8], out: &mut Vec<u8>) -> Result<(), TypeMismatchError> {
    if value.bits() > bits as usize {
        return Err(TypeMismatchError::ValueOverflow { field: field.to_vec(), bits: bits as u32 });
    }
    out.extend((0..bits as usize / 8).map(|i| value.byte(i)));
    Ok(())
}

fn write_fixed_bytes(bytes: &[u8], len: u16, field: &[u8], out: &mut Vec<u8>) -> Result<(), TypeMismatchError> {
    if bytes.len() != len as usize {
        return Err(TypeMismatchError::LengthMismatch {
            field: field.to_vec(),
            expected: len as u32,
            actual: bytes.len() as u32,
        });
    }
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_value(
    ty: &Type,
    value: &Value,
    abi: &GatewayABIConfig,
    field: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), TypeMismatchError> {
    match (ty, value) {
        (Type::Bool, Value::Bool(flag)) => out.push(*flag as u8),
        (Type::Uint(bits), Value::Uint(v)) => write_uint(v, *bits, field, out)?,
        (Type::Value, Value::Uint(v)) => write_uint(v, abi.value_type_size, field, out)?,
        (Type::BlockNumber, Value::Uint(v)) => write_uint(v, abi.block_number_type_size, field, out)?,
        (Type::Bytes(len), Value::Bytes(bytes)) => write_fixed_bytes(bytes, *len, field, out)?,
        (Type::Address, Value::Bytes(bytes)) => write_fixed_bytes(bytes, abi.address_length, field, out)?,
        (Type::Hash, Value::Bytes(bytes)) => write_fixed_bytes(bytes, abi.hash_size, field, out)?,
        (Type::DynamicBytes, Value::Bytes(bytes)) => {
            Compact(bytes.len() as u32).encode_to(out);
            out.extend_from_slice(bytes);
        },
        (Type::Enum(variants), Value::Enum(index)) => {
            if *index as usize >= variants.len() {
                return Err(TypeMismatchError::EnumOutOfRange { field: field.to_vec(), index: *index });
            }
            out.push(*index);
        },
        (Type::Option(_), Value::Option(None)) => out.push(OPTION_NONE_TAG),
        (Type::Option(inner), Value::Option(Some(value))) => {
            out.push(OPTION_SOME_TAG);
            write_value(inner, value, abi, field, out)?;
        },
        (Type::Sequence(inner), Value::Sequence(items)) => {
            Compact(items.len() as u32).encode_to(out);
            for item in items.iter() {
                write_value(inner, item, abi, field, out)?;
            }
        },
        (ty, _) => {
            return Err(TypeMismatchError::Incompatible { field: field.to_vec(), expected: type_kind(ty) })
        },
    }
    Ok(())
}
