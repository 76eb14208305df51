//! Numeric array elements.
//!
//! Arrays are stored as element text, either as whitespace separated decimal
//! values (`format="ascii"`) or as hex-encoded little-endian 8-byte values
//! (`format="binary"`).

use hm_engine::tree::Element;
use hm_engine::{Encoding, EngineError, Result};

const FORMAT_ATTR: &str = "format";
const TYPE_ATTR: &str = "type";

/// Build a `f64` array element.
pub(crate) fn float_array(name: &str, values: &[f64], encoding: Encoding) -> Element {
    let text = match encoding {
        Encoding::Ascii => join(values.iter().map(|v| v.to_string())),
        Encoding::Binary => {
            let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            hex::encode(bytes)
        }
    };
    array_element(name, "double", encoding, text)
}

/// Build an `i64` array element.
pub(crate) fn int_array(name: &str, values: &[i64], encoding: Encoding) -> Element {
    let text = match encoding {
        Encoding::Ascii => join(values.iter().map(|v| v.to_string())),
        Encoding::Binary => {
            let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            hex::encode(bytes)
        }
    };
    array_element(name, "int", encoding, text)
}

/// Convenience for index arrays.
pub(crate) fn index_array(name: &str, values: &[usize], encoding: Encoding) -> Element {
    let values: Vec<i64> = values.iter().map(|&v| to_i64(v)).collect();
    int_array(name, &values, encoding)
}

fn array_element(name: &str, kind: &str, encoding: Encoding, text: String) -> Element {
    Element::new(name)
        .with_attribute(FORMAT_ATTR, encoding.as_str())
        .with_attribute(TYPE_ATTR, kind)
        .with_text(text)
}

fn join(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(" ")
}

fn encoding_of(element: &Element) -> Result<Encoding> {
    element
        .attribute(FORMAT_ATTR)
        .map_or(Ok(Encoding::Ascii), str::parse)
}

fn binary_words(element: &Element) -> Result<Vec<[u8; 8]>> {
    let bytes = hex::decode(element.text.trim())
        .map_err(|e| EngineError::malformed(&element.name, format!("bad hex data: {e}")))?;
    if bytes.len() % 8 != 0 {
        return Err(EngineError::malformed(
            &element.name,
            format!("binary length {} is not a multiple of 8", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

pub(crate) fn read_floats(element: &Element) -> Result<Vec<f64>> {
    match encoding_of(element)? {
        Encoding::Ascii => element
            .text
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    EngineError::malformed(&element.name, format!("'{token}' is not a number"))
                })
            })
            .collect(),
        Encoding::Binary => Ok(binary_words(element)?
            .into_iter()
            .map(f64::from_le_bytes)
            .collect()),
    }
}

pub(crate) fn read_ints(element: &Element) -> Result<Vec<i64>> {
    match encoding_of(element)? {
        Encoding::Ascii => element
            .text
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| {
                    EngineError::malformed(&element.name, format!("'{token}' is not an integer"))
                })
            })
            .collect(),
        Encoding::Binary => Ok(binary_words(element)?
            .into_iter()
            .map(i64::from_le_bytes)
            .collect()),
    }
}

/// Read a non-negative index array.
pub(crate) fn read_indices(element: &Element) -> Result<Vec<usize>> {
    read_ints(element)?
        .into_iter()
        .map(|v| {
            usize::try_from(v).map_err(|_| {
                EngineError::malformed(&element.name, format!("negative index {v}"))
            })
        })
        .collect()
}

/// Read a boundary type array.
pub(crate) fn read_btypes(element: &Element) -> Result<Vec<i32>> {
    read_ints(element)?
        .into_iter()
        .map(|v| {
            i32::try_from(v).map_err(|_| {
                EngineError::malformed(&element.name, format!("boundary type {v} out of range"))
            })
        })
        .collect()
}

pub(crate) fn btype_array(
    name: &str,
    btypes: impl Iterator<Item = i32>,
    encoding: Encoding,
) -> Element {
    let values: Vec<i64> = btypes.map(i64::from).collect();
    int_array(name, &values, encoding)
}

/// Read an array of optional cell indices where `-1` means "none".
pub(crate) fn read_optional_indices(element: &Element) -> Result<Vec<Option<usize>>> {
    read_ints(element)?
        .into_iter()
        .map(|v| match v {
            -1 => Ok(None),
            v => usize::try_from(v).map(Some).map_err(|_| {
                EngineError::malformed(&element.name, format!("invalid cell index {v}"))
            }),
        })
        .collect()
}

pub(crate) fn optional_index(value: Option<usize>) -> i64 {
    value.map_or(-1, to_i64)
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Count element such as `<N_VERTICES>12</N_VERTICES>`.
pub(crate) fn count_element(name: &str, count: usize) -> Element {
    Element::new(name).with_text(count.to_string())
}

pub(crate) fn required<'a>(parent: &'a Element, name: &str) -> Result<&'a Element> {
    parent
        .child(name)
        .ok_or_else(|| EngineError::malformed(&parent.name, format!("missing <{name}>")))
}

pub(crate) fn read_count(parent: &Element, name: &str) -> Result<usize> {
    let element = required(parent, name)?;
    element.text.trim().parse().map_err(|_| {
        EngineError::malformed(name, format!("'{}' is not a count", element.text.trim()))
    })
}

/// Number of array entries for `count` items of `width` values each.
pub(crate) fn scaled_len(count: usize, width: usize, element: &str) -> Result<usize> {
    count.checked_mul(width).ok_or_else(|| {
        EngineError::malformed(element, format!("{count} items of {width} values overflow"))
    })
}

/// Check that an array has exactly `expected` entries.
pub(crate) fn expect_len<T>(values: Vec<T>, expected: usize, element: &str) -> Result<Vec<T>> {
    if values.len() == expected {
        Ok(values)
    } else {
        Err(EngineError::malformed(
            element,
            format!("expected {expected} values, found {}", values.len()),
        ))
    }
}
