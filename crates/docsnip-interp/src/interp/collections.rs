// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Subscripting and membership on containers.

use crate::value::Value;

use super::RuntimeError;

/// Resolve a possibly negative index against `len`.
fn normalize_index(index: &Value, len: usize, what: &str) -> Result<usize, RuntimeError> {
    let Some(i) = index.as_int() else {
        return Err(RuntimeError::TypeError(format!(
            "{} indices must be integers, not {}",
            what,
            index.type_name()
        )));
    };
    let resolved = if i < 0 { i + len as i64 } else { i };
    if resolved < 0 || resolved >= len as i64 {
        return Err(RuntimeError::IndexError(format!("{} index out of range", what)));
    }
    Ok(resolved as usize)
}

pub(crate) fn index_get(object: &Value, index: &Value) -> Result<Value, RuntimeError> {
    match object {
        Value::List(list) => {
            let list = list.borrow();
            let i = normalize_index(index, list.len(), "list")?;
            Ok(list[i].clone())
        }
        Value::Tuple(items) => {
            let i = normalize_index(index, items.len(), "tuple")?;
            Ok(items[i].clone())
        }
        Value::Str(s) => {
            let len = s.chars().count();
            let i = normalize_index(index, len, "string")?;
            Ok(s.chars().nth(i).map(|c| Value::str(c.encode_utf8(&mut [0; 4]))).unwrap_or(Value::None))
        }
        Value::Range(range) => {
            let i = normalize_index(index, range.len(), "range object")?;
            Ok(range.get(i).map(Value::Int).unwrap_or(Value::None))
        }
        Value::Dict(dict) => dict
            .borrow()
            .get(index)?
            .ok_or_else(|| RuntimeError::KeyError(index.repr())),
        other => Err(RuntimeError::TypeError(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

pub(crate) fn index_set(object: &Value, index: &Value, value: Value) -> Result<(), RuntimeError> {
    match object {
        Value::List(list) => {
            let mut list = list.borrow_mut();
            let i = normalize_index(index, list.len(), "list assignment")?;
            list[i] = value;
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(index.clone(), value),
        other => Err(RuntimeError::TypeError(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

pub(crate) fn delete_index(object: &Value, index: &Value) -> Result<(), RuntimeError> {
    match object {
        Value::List(list) => {
            let mut list = list.borrow_mut();
            let i = normalize_index(index, list.len(), "list assignment")?;
            list.remove(i);
            Ok(())
        }
        Value::Dict(dict) => match dict.borrow_mut().remove(index)? {
            Some(_) => Ok(()),
            None => Err(RuntimeError::KeyError(index.repr())),
        },
        other => Err(RuntimeError::TypeError(format!(
            "'{}' object does not support item deletion",
            other.type_name()
        ))),
    }
}

/// Membership test for `in` / `not in`.
pub(crate) fn contains(container: &Value, item: &Value) -> Result<bool, RuntimeError> {
    match container {
        Value::List(list) => Ok(list.borrow().iter().any(|v| v.py_eq(item))),
        Value::Tuple(items) => Ok(items.iter().any(|v| v.py_eq(item))),
        Value::Dict(dict) => dict.borrow().contains(item),
        Value::Str(s) => match item {
            Value::Str(needle) => Ok(s.contains(needle.as_ref())),
            other => Err(RuntimeError::TypeError(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::Range(range) => Ok(item.as_int().is_some_and(|n| range.contains(n))
            || matches!(item, Value::Float(f) if f.fract() == 0.0 && range.contains(*f as i64))),
        other => Err(RuntimeError::TypeError(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_indices_wrap() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(index_get(&list, &Value::Int(-1)).unwrap().to_string(), "3");
        let err = index_get(&list, &Value::Int(3)).unwrap_err();
        assert_eq!(err.kind(), "IndexError");
        assert_eq!(err.to_string(), "list index out of range");
    }

    #[test]
    fn string_indexing_is_by_character() {
        let s = Value::str("héllo");
        assert_eq!(index_get(&s, &Value::Int(1)).unwrap().to_string(), "é");
    }

    #[test]
    fn tuples_are_immutable() {
        let t = Value::tuple(vec![Value::Int(1)]);
        let err = index_set(&t, &Value::Int(0), Value::None).unwrap_err();
        assert_eq!(err.to_string(), "'tuple' object does not support item assignment");
    }

    #[test]
    fn membership() {
        assert!(contains(&Value::str("hello"), &Value::str("ell")).unwrap());
        assert!(contains(&Value::str("hello"), &Value::Int(1)).is_err());
        let list = Value::list(vec![Value::Float(2.0)]);
        assert!(contains(&list, &Value::Int(2)).unwrap());
    }
}
