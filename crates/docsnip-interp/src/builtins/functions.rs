// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Global builtin functions.

use docsnip_ast::expr::BinOp;

use crate::interp::{Interpreter, RuntimeError};
use crate::value::{Args, Builtin, Range, Value};

use super::{sort_values, take_reverse};

macro_rules! builtin {
    ($name:literal, $func:ident) => {
        Builtin { name: $name, func: $func }
    };
}

pub(super) const BUILTINS: &[Builtin] = &[
    builtin!("print", print),
    builtin!("len", len),
    builtin!("str", str),
    builtin!("repr", repr),
    builtin!("int", int),
    builtin!("float", float),
    builtin!("bool", bool),
    builtin!("abs", abs),
    builtin!("min", min),
    builtin!("max", max),
    builtin!("sum", sum),
    builtin!("round", round),
    builtin!("range", range),
    builtin!("list", list),
    builtin!("tuple", tuple),
    builtin!("sorted", sorted),
    builtin!("enumerate", enumerate),
    builtin!("zip", zip),
];

fn text_keyword(args: &mut Args, name: &str, default: &str) -> Result<String, RuntimeError> {
    match args.take_keyword(name) {
        None | Some(Value::None) => Ok(default.to_string()),
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(other) => Err(RuntimeError::TypeError(format!(
            "{} must be None or a string, not {}",
            name,
            other.type_name()
        ))),
    }
}

fn print(interp: &mut Interpreter, mut args: Args) -> Result<Value, RuntimeError> {
    let sep = text_keyword(&mut args, "sep", " ")?;
    let end = text_keyword(&mut args, "end", "\n")?;
    args.reject_keywords("print")?;
    let text = args
        .positional
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(&sep);
    interp.emit(&text, &end);
    Ok(Value::None)
}

fn len(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("len", 1, 1)?;
    let n = match &args.positional[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(l) => l.borrow().len(),
        Value::Tuple(t) => t.len(),
        Value::Dict(d) => d.borrow().len(),
        Value::Range(r) => r.len(),
        other => {
            return Err(RuntimeError::TypeError(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(n as i64))
}

fn str(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("str", 0, 1)?;
    Ok(Value::str(&args.get(0).map(Value::to_string).unwrap_or_default()))
}

fn repr(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("repr", 1, 1)?;
    Ok(Value::str(&args.positional[0].repr()))
}

fn int(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("int", 0, 1)?;
    match args.get(0) {
        None => Ok(Value::Int(0)),
        Some(Value::Int(n)) => Ok(Value::Int(*n)),
        Some(Value::Bool(b)) => Ok(Value::Int(*b as i64)),
        Some(Value::Float(f)) => {
            if f.is_nan() {
                Err(RuntimeError::ValueError("cannot convert float NaN to integer".to_string()))
            } else if f.is_infinite() || f.abs() >= 9.2e18 {
                Err(RuntimeError::Overflow("cannot convert float infinity to integer".to_string()))
            } else {
                Ok(Value::Int(f.trunc() as i64))
            }
        }
        Some(Value::Str(s)) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeError::ValueError(format!(
                "invalid literal for int() with base 10: {}",
                Value::Str(s.clone()).repr()
            ))
        }),
        Some(other) => Err(RuntimeError::TypeError(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn float(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("float", 0, 1)?;
    match args.get(0) {
        None => Ok(Value::Float(0.0)),
        Some(Value::Str(s)) => {
            let text = s.trim();
            let parsed = match text.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Some(f64::INFINITY),
                "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
                "nan" => Some(f64::NAN),
                _ => text.parse::<f64>().ok(),
            };
            parsed.map(Value::Float).ok_or_else(|| {
                RuntimeError::ValueError(format!(
                    "could not convert string to float: {}",
                    Value::Str(s.clone()).repr()
                ))
            })
        }
        Some(other) => match other.as_number() {
            Some(n) => Ok(Value::Float(n.to_f64())),
            None => Err(RuntimeError::TypeError(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            ))),
        },
    }
}

fn bool(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("bool", 0, 1)?;
    Ok(Value::Bool(args.get(0).is_some_and(Value::is_truthy)))
}

fn abs(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("abs", 1, 1)?;
    match &args.positional[0] {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::Overflow("integer result too large".to_string())),
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RuntimeError::TypeError(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

/// Shared body of `min` and `max`: one iterable, or two or more values.
fn extreme(name: &str, args: Args, keep_new: fn(std::cmp::Ordering) -> bool) -> Result<Value, RuntimeError> {
    args.reject_keywords(name)?;
    let candidates = match args.positional.as_slice() {
        [] => return Err(RuntimeError::TypeError(format!("{} expected at least 1 argument, got 0", name))),
        [iterable] => iterable.iterate()?,
        many => many.to_vec(),
    };
    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(RuntimeError::ValueError(format!("{}() arg is an empty sequence", name)));
    };
    for item in iter {
        if item.compare(&best, "<")?.is_some_and(keep_new) {
            best = item;
        }
    }
    Ok(best)
}

fn min(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    extreme("min", args, |o| o == std::cmp::Ordering::Less)
}

fn max(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    extreme("max", args, |o| o == std::cmp::Ordering::Greater)
}

fn sum(interp: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("sum", 1, 2)?;
    let mut total = args.get(1).cloned().unwrap_or(Value::Int(0));
    if let Value::Str(_) = total {
        return Err(RuntimeError::TypeError(
            "sum() can't sum strings [use ''.join(seq) instead]".to_string(),
        ));
    }
    for item in args.positional[0].iterate()? {
        total = interp.eval_binop(BinOp::Add, &total, &item)?;
    }
    Ok(total)
}

fn round(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("round", 1, 2)?;
    let digits = match args.get(1) {
        None | Some(Value::None) => None,
        Some(v) => Some(v.as_int().ok_or_else(|| {
            RuntimeError::TypeError(format!(
                "'{}' object cannot be interpreted as an integer",
                v.type_name()
            ))
        })?),
    };
    match (&args.positional[0], digits) {
        (Value::Int(n), _) => Ok(Value::Int(*n)),
        (Value::Bool(b), _) => Ok(Value::Int(*b as i64)),
        (Value::Float(f), None) => {
            let rounded = f.round_ties_even();
            if !rounded.is_finite() || rounded.abs() >= 9.2e18 {
                return Err(RuntimeError::Overflow("cannot convert float infinity to integer".to_string()));
            }
            Ok(Value::Int(rounded as i64))
        }
        (Value::Float(f), Some(d)) => {
            let scale = 10f64.powi(d.clamp(-308, 308) as i32);
            Ok(Value::Float((f * scale).round_ties_even() / scale))
        }
        (other, _) => Err(RuntimeError::TypeError(format!(
            "type {} doesn't define __round__ method",
            other.type_name()
        ))),
    }
}

fn range(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("range", 1, 3)?;
    args.reject_keywords("range")?;
    let mut bounds = Vec::with_capacity(3);
    for arg in &args.positional {
        bounds.push(arg.as_int().ok_or_else(|| {
            RuntimeError::TypeError(format!(
                "'{}' object cannot be interpreted as an integer",
                arg.type_name()
            ))
        })?);
    }
    let (start, stop, step) = match *bounds.as_slice() {
        [] => (0, 0, 1),
        [stop] => (0, stop, 1),
        [start, stop] => (start, stop, 1),
        [start, stop, step, ..] => (start, stop, step),
    };
    if step == 0 {
        return Err(RuntimeError::ValueError("range() arg 3 must not be zero".to_string()));
    }
    Ok(Value::Range(Range { start, stop, step }))
}

fn list(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("list", 0, 1)?;
    match args.get(0) {
        Some(iterable) => Ok(Value::list(iterable.iterate()?)),
        None => Ok(Value::list(Vec::new())),
    }
}

fn tuple(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.expect_count("tuple", 0, 1)?;
    match args.get(0) {
        Some(iterable) => Ok(Value::tuple(iterable.iterate()?)),
        None => Ok(Value::tuple(Vec::new())),
    }
}

fn sorted(_: &mut Interpreter, mut args: Args) -> Result<Value, RuntimeError> {
    let reverse = take_reverse(&mut args);
    args.reject_keywords("sorted")?;
    args.expect_count("sorted", 1, 1)?;
    let mut items = args.positional[0].iterate()?;
    sort_values(&mut items, reverse)?;
    Ok(Value::list(items))
}

fn enumerate(_: &mut Interpreter, mut args: Args) -> Result<Value, RuntimeError> {
    let start = match args.take_keyword("start") {
        Some(v) => v.as_int().ok_or_else(|| {
            RuntimeError::TypeError(format!(
                "'{}' object cannot be interpreted as an integer",
                v.type_name()
            ))
        })?,
        None => 0,
    };
    args.reject_keywords("enumerate")?;
    args.expect_count("enumerate", 1, 1)?;
    let pairs = args.positional[0]
        .iterate()?
        .into_iter()
        .zip(start..)
        .map(|(item, i)| Value::tuple(vec![Value::Int(i), item]))
        .collect();
    Ok(Value::list(pairs))
}

fn zip(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.reject_keywords("zip")?;
    let columns = args
        .positional
        .iter()
        .map(Value::iterate)
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let zipped = (0..rows)
        .map(|i| Value::tuple(columns.iter().map(|col| col[i].clone()).collect()))
        .collect();
    Ok(Value::list(zipped))
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn eval(src: &str) -> String {
        let mut interp = Interpreter::new();
        interp.run_source(&format!("result = {}", src)).unwrap();
        interp.global("result").map(|v| v.repr()).unwrap_or_default()
    }

    fn eval_err(src: &str) -> String {
        let err = Interpreter::new().run_source(&format!("result = {}", src)).unwrap_err();
        format!("{}: {}", err.kind(), err.error)
    }

    #[test]
    fn print_honours_sep_and_end() {
        let mut interp = Interpreter::new();
        interp.begin_capture();
        interp.run_source("print('a', 'b', sep='-', end='')\nprint(None, 2.0, [1])").unwrap();
        assert_eq!(interp.end_capture(), vec!["a-bNone 2.0 [1]"]);

        interp.begin_capture();
        interp.run_source("print(1e20, end='!\\n')\nprint()").unwrap();
        assert_eq!(interp.end_capture(), vec!["1e+20!", ""]);
    }

    #[test]
    fn conversions() {
        assert_eq!(eval("int(' 42 ')"), "42");
        assert_eq!(eval("int(-2.7)"), "-2");
        assert_eq!(eval("float('1.5')"), "1.5");
        assert_eq!(eval("str(1.0)"), "'1.0'");
        assert_eq!(eval("repr('x')"), "\"'x'\"");
        assert_eq!(eval("bool([])"), "False");
        assert_eq!(
            eval_err("int('abc')"),
            "ValueError: invalid literal for int() with base 10: 'abc'"
        );
    }

    #[test]
    fn aggregates() {
        assert_eq!(eval("len('héllo')"), "5");
        assert_eq!(eval("min(3, 1, 2)"), "1");
        assert_eq!(eval("max([3, 1, 2])"), "3");
        assert_eq!(eval("sum([1, 2, 3.5])"), "6.5");
        assert_eq!(eval("sum([[1], [2]], [])"), "[1, 2]");
        assert_eq!(eval_err("max([])"), "ValueError: max() arg is an empty sequence");
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(eval("round(2.5)"), "2");
        assert_eq!(eval("round(3.5)"), "4");
        assert_eq!(eval("round(1.2345, 2)"), "1.23");
    }

    #[test]
    fn ranges_and_sequences() {
        assert_eq!(eval("list(range(5))"), "[0, 1, 2, 3, 4]");
        assert_eq!(eval("list(range(10, 0, -3))"), "[10, 7, 4, 1]");
        assert_eq!(eval("sorted([3, 1, 2], reverse=True)"), "[3, 2, 1]");
        assert_eq!(eval("enumerate('ab', start=1)"), "[(1, 'a'), (2, 'b')]");
        assert_eq!(eval("zip([1, 2, 3], 'ab')"), "[(1, 'a'), (2, 'b')]");
        assert_eq!(eval("tuple([1])"), "(1,)");
        assert_eq!(eval_err("range(1, 2, 0)"), "ValueError: range() arg 3 must not be zero");
    }
}
