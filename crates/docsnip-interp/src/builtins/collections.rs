// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! List and dict methods.

use std::cell::RefCell;
use std::rc::Rc;

use crate::interp::RuntimeError;
use crate::value::{Args, Dict, Value};

use super::{no_such_method, sort_values, take_reverse};

pub(super) fn call_list_method(
    list: &Rc<RefCell<Vec<Value>>>,
    method: &str,
    mut args: Args,
) -> Result<Value, RuntimeError> {
    let reverse = if method == "sort" { take_reverse(&mut args) } else { false };
    args.reject_keywords(method)?;
    match method {
        "append" => {
            args.expect_count(method, 1, 1)?;
            list.borrow_mut().extend(args.positional);
            Ok(Value::None)
        }
        "extend" => {
            args.expect_count(method, 1, 1)?;
            let items = args.positional[0].iterate()?;
            list.borrow_mut().extend(items);
            Ok(Value::None)
        }
        "insert" => {
            args.expect_count(method, 2, 2)?;
            let mut items = list.borrow_mut();
            let len = items.len() as i64;
            let index = args.positional[0].as_int().ok_or_else(|| {
                RuntimeError::TypeError(format!(
                    "'{}' object cannot be interpreted as an integer",
                    args.positional[0].type_name()
                ))
            })?;
            let at = if index < 0 { (index + len).max(0) } else { index.min(len) };
            items.insert(at as usize, args.positional[1].clone());
            Ok(Value::None)
        }
        "pop" => {
            args.expect_count(method, 0, 1)?;
            let mut items = list.borrow_mut();
            if items.is_empty() {
                return Err(RuntimeError::IndexError("pop from empty list".to_string()));
            }
            let len = items.len() as i64;
            let index = match args.get(0) {
                Some(v) => v.as_int().ok_or_else(|| {
                    RuntimeError::TypeError(format!(
                        "'{}' object cannot be interpreted as an integer",
                        v.type_name()
                    ))
                })?,
                None => -1,
            };
            let at = if index < 0 { index + len } else { index };
            if at < 0 || at >= len {
                return Err(RuntimeError::IndexError("pop index out of range".to_string()));
            }
            Ok(items.remove(at as usize))
        }
        "index" => {
            args.expect_count(method, 1, 1)?;
            let needle = &args.positional[0];
            list.borrow()
                .iter()
                .position(|v| v.py_eq(needle))
                .map(|i| Value::Int(i as i64))
                .ok_or_else(|| RuntimeError::ValueError(format!("{} is not in list", needle.repr())))
        }
        "count" => {
            args.expect_count(method, 1, 1)?;
            let needle = &args.positional[0];
            let n = list.borrow().iter().filter(|v| v.py_eq(needle)).count();
            Ok(Value::Int(n as i64))
        }
        "remove" => {
            args.expect_count(method, 1, 1)?;
            let needle = &args.positional[0];
            let mut items = list.borrow_mut();
            match items.iter().position(|v| v.py_eq(needle)) {
                Some(i) => {
                    items.remove(i);
                    Ok(Value::None)
                }
                None => Err(RuntimeError::ValueError("list.remove(x): x not in list".to_string())),
            }
        }
        "reverse" => {
            args.expect_count(method, 0, 0)?;
            list.borrow_mut().reverse();
            Ok(Value::None)
        }
        "sort" => {
            args.expect_count(method, 0, 0)?;
            let mut items = std::mem::take(&mut *list.borrow_mut());
            let sorted = sort_values(&mut items, reverse);
            *list.borrow_mut() = items;
            sorted.map(|()| Value::None)
        }
        _ => Err(no_such_method(&Value::List(list.clone()), method)),
    }
}

pub(super) fn call_dict_method(
    dict: &Rc<RefCell<Dict>>,
    method: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    args.reject_keywords(method)?;
    match method {
        "keys" => {
            args.expect_count(method, 0, 0)?;
            Ok(Value::list(dict.borrow().keys()))
        }
        "values" => {
            args.expect_count(method, 0, 0)?;
            Ok(Value::list(dict.borrow().values()))
        }
        "items" => {
            args.expect_count(method, 0, 0)?;
            Ok(Value::list(dict.borrow().items()))
        }
        "get" => {
            args.expect_count(method, 1, 2)?;
            let found = dict.borrow().get(&args.positional[0])?;
            Ok(found.or_else(|| args.get(1).cloned()).unwrap_or(Value::None))
        }
        "pop" => {
            args.expect_count(method, 1, 2)?;
            let key = &args.positional[0];
            let removed = dict.borrow_mut().remove(key)?;
            match (removed, args.get(1)) {
                (Some(value), _) => Ok(value),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(RuntimeError::KeyError(key.repr())),
            }
        }
        "update" => {
            args.expect_count(method, 1, 1)?;
            let Value::Dict(other) = &args.positional[0] else {
                return Err(RuntimeError::TypeError(format!(
                    "'{}' object is not a mapping",
                    args.positional[0].type_name()
                )));
            };
            let entries: Vec<(Value, Value)> = other
                .borrow()
                .entries()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let mut target = dict.borrow_mut();
            for (k, v) in entries {
                target.insert(k, v)?;
            }
            Ok(Value::None)
        }
        _ => Err(no_such_method(&Value::Dict(dict.clone()), method)),
    }
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn run(src: &str) -> Vec<String> {
        let mut interp = Interpreter::new();
        interp.begin_capture();
        interp.run_source(src).unwrap();
        interp.end_capture()
    }

    #[test]
    fn list_mutation_is_shared() {
        let out = run("\
a = [3, 1]
b = a
b.append(2)
a.extend([5])
a.insert(0, 9)
print(a)
print(a.pop(), a.pop(0), a)
a.sort()
print(a, a.index(2), a.count(1))
a.reverse()
a.remove(3)
print(a)
");
        assert_eq!(
            out,
            vec!["[9, 3, 1, 2, 5]", "5 9 [3, 1, 2]", "[1, 2, 3] 1 1", "[2, 1]"]
        );
    }

    #[test]
    fn list_errors() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.run_source("[].pop()").unwrap_err().kind(), "IndexError");
        assert_eq!(interp.run_source("[1].index(2)").unwrap_err().kind(), "ValueError");
        assert_eq!(interp.run_source("[1, 'a'].sort()").unwrap_err().kind(), "TypeError");
        assert_eq!(interp.run_source("[].frobnicate()").unwrap_err().kind(), "AttributeError");
    }

    #[test]
    fn dict_methods() {
        let out = run("\
d = {'a': 1}
d['b'] = 2
print(d.keys(), d.values(), d.items())
print(d.get('a'), d.get('z'), d.get('z', 0))
print(d.pop('a'), d)
d.update({'c': 3})
print(d, len(d), 'c' in d)
");
        assert_eq!(
            out,
            vec![
                "['a', 'b'] [1, 2] [('a', 1), ('b', 2)]",
                "1 None 0",
                "1 {'b': 2}",
                "{'b': 2, 'c': 3} 2 True",
            ]
        );
    }

    #[test]
    fn missing_key_pop_is_a_key_error() {
        let err = Interpreter::new().run_source("{}.pop('x')").unwrap_err();
        assert_eq!(err.kind(), "KeyError");
        assert_eq!(err.error.to_string(), "'x'");
    }
}
