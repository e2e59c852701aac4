// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Binary and unary operators.

use std::cmp::Ordering;

use docsnip_ast::expr::{BinOp, UnaryOp};

use crate::value::{Number, Value};

use super::collections::contains;
use super::{Interpreter, RuntimeError};

impl Interpreter {
    /// Evaluate a non-short-circuiting binary operation.
    pub(crate) fn eval_binop(&self, op: BinOp, l: &Value, r: &Value) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Eq => return Ok(Value::Bool(l.py_eq(r))),
            BinOp::Ne => return Ok(Value::Bool(!l.py_eq(r))),
            BinOp::Is => return Ok(Value::Bool(l.is_identical(r))),
            BinOp::IsNot => return Ok(Value::Bool(!l.is_identical(r))),
            BinOp::In => return Ok(Value::Bool(contains(r, l)?)),
            BinOp::NotIn => return Ok(Value::Bool(!contains(r, l)?)),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = l.compare(r, op.symbol())?;
                let holds = match (op, ordering) {
                    (_, None) => false,
                    (BinOp::Lt, Some(o)) => o == Ordering::Less,
                    (BinOp::Le, Some(o)) => o != Ordering::Greater,
                    (BinOp::Gt, Some(o)) => o == Ordering::Greater,
                    (_, Some(o)) => o != Ordering::Less,
                };
                return Ok(Value::Bool(holds));
            }
            _ => {}
        }

        if let (Some(a), Some(b)) = (l.as_number(), r.as_number()) {
            return arithmetic(op, a, b);
        }

        match (op, l, r) {
            (BinOp::Add, Value::Str(a), Value::Str(b)) => {
                let mut s = String::with_capacity(a.len() + b.len());
                s.push_str(a);
                s.push_str(b);
                Ok(Value::str(&s))
            }
            (BinOp::Add, Value::List(a), Value::List(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::list(items))
            }
            (BinOp::Add, Value::Tuple(a), Value::Tuple(b)) => {
                Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
            }
            (BinOp::Mul, Value::Str(s), n) | (BinOp::Mul, n, Value::Str(s)) if n.as_int().is_some() => {
                let times = n.as_int().unwrap_or(0).max(0) as usize;
                Ok(Value::str(&s.repeat(times)))
            }
            (BinOp::Mul, Value::List(items), n) | (BinOp::Mul, n, Value::List(items)) if n.as_int().is_some() => {
                let times = n.as_int().unwrap_or(0).max(0) as usize;
                let items = items.borrow();
                let mut repeated = Vec::with_capacity(items.len() * times);
                for _ in 0..times {
                    repeated.extend(items.iter().cloned());
                }
                Ok(Value::list(repeated))
            }
            _ => Err(unsupported(op, l, r)),
        }
    }

    pub(super) fn eval_unary(&self, op: UnaryOp, value: &Value) -> Result<Value, RuntimeError> {
        match (op, value.as_number()) {
            (UnaryOp::Not, _) => Ok(Value::Bool(!value.is_truthy())),
            (UnaryOp::Neg, Some(Number::Int(n))) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::Overflow("integer negation overflowed".to_string())),
            (UnaryOp::Neg, Some(Number::Float(f))) => Ok(Value::Float(-f)),
            (UnaryOp::Pos, Some(Number::Int(n))) => Ok(Value::Int(n)),
            (UnaryOp::Pos, Some(Number::Float(f))) => Ok(Value::Float(f)),
            (op, None) => Err(RuntimeError::TypeError(format!(
                "bad operand type for unary {}: '{}'",
                if op == UnaryOp::Neg { "-" } else { "+" },
                value.type_name()
            ))),
        }
    }
}

fn unsupported(op: BinOp, l: &Value, r: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        l.type_name(),
        r.type_name()
    ))
}

fn overflow() -> RuntimeError {
    RuntimeError::Overflow("integer result too large".to_string())
}

fn arithmetic(op: BinOp, a: Number, b: Number) -> Result<Value, RuntimeError> {
    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        return int_arithmetic(op, x, y);
    }
    let (x, y) = (a.to_f64(), b.to_f64());
    let value = match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div => {
            if y == 0.0 {
                return Err(RuntimeError::ZeroDivision("float division by zero".to_string()));
            }
            x / y
        }
        BinOp::FloorDiv => {
            if y == 0.0 {
                return Err(RuntimeError::ZeroDivision("float floor division by zero".to_string()));
            }
            (x / y).floor()
        }
        BinOp::Mod => {
            if y == 0.0 {
                return Err(RuntimeError::ZeroDivision("float modulo".to_string()));
            }
            x - y * (x / y).floor()
        }
        BinOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(RuntimeError::ZeroDivision(
                    "0.0 cannot be raised to a negative power".to_string(),
                ));
            }
            x.powf(y)
        }
        _ => return Err(RuntimeError::TypeError(format!("unsupported operator {}", op.symbol()))),
    };
    Ok(Value::Float(value))
}

fn int_arithmetic(op: BinOp, x: i64, y: i64) -> Result<Value, RuntimeError> {
    let value = match op {
        BinOp::Add => x.checked_add(y).ok_or_else(overflow)?,
        BinOp::Sub => x.checked_sub(y).ok_or_else(overflow)?,
        BinOp::Mul => x.checked_mul(y).ok_or_else(overflow)?,
        BinOp::Div => {
            if y == 0 {
                return Err(RuntimeError::ZeroDivision("division by zero".to_string()));
            }
            return Ok(Value::Float(x as f64 / y as f64));
        }
        BinOp::FloorDiv => {
            if y == 0 {
                return Err(RuntimeError::ZeroDivision(
                    "integer division or modulo by zero".to_string(),
                ));
            }
            let q = x.checked_div(y).ok_or_else(overflow)?;
            if x % y != 0 && ((x < 0) != (y < 0)) { q - 1 } else { q }
        }
        BinOp::Mod => {
            if y == 0 {
                return Err(RuntimeError::ZeroDivision(
                    "integer division or modulo by zero".to_string(),
                ));
            }
            let r = x.checked_rem(y).ok_or_else(overflow)?;
            if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r }
        }
        BinOp::Pow => {
            if y < 0 {
                if x == 0 {
                    return Err(RuntimeError::ZeroDivision(
                        "0.0 cannot be raised to a negative power".to_string(),
                    ));
                }
                return Ok(Value::Float((x as f64).powf(y as f64)));
            }
            let exp = u32::try_from(y).map_err(|_| overflow())?;
            x.checked_pow(exp).ok_or_else(overflow)?
        }
        _ => return Err(RuntimeError::TypeError(format!("unsupported operator {}", op.symbol()))),
    };
    Ok(Value::Int(value))
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
        let mut interp = Interpreter::new();
        let err = interp.run_source(&format!("result = {}", src)).unwrap_err();
        format!("{}: {}", err.kind(), err.error)
    }

    #[test]
    fn integer_arithmetic_follows_floor_semantics() {
        assert_eq!(eval("7 // 2"), "3");
        assert_eq!(eval("-7 // 2"), "-4");
        assert_eq!(eval("-7 % 3"), "2");
        assert_eq!(eval("7 % -3"), "-2");
        assert_eq!(eval("7 / 2"), "3.5");
        assert_eq!(eval("2 ** 10"), "1024");
        assert_eq!(eval("2 ** -1"), "0.5");
        assert_eq!(eval("-2 ** 2"), "-4");
    }

    #[test]
    fn mixed_and_boolean_arithmetic() {
        assert_eq!(eval("1 + 2.5"), "3.5");
        assert_eq!(eval("True + True"), "2");
        assert_eq!(eval("6 / 3"), "2.0");
    }

    #[test]
    fn sequences() {
        assert_eq!(eval("'ab' * 3"), "'ababab'");
        assert_eq!(eval("[1] + [2]"), "[1, 2]");
        assert_eq!(eval("(1,) + (2,)"), "(1, 2)");
        assert_eq!(eval("[0] * 3"), "[0, 0, 0]");
    }

    #[test]
    fn comparisons_and_membership() {
        assert_eq!(eval("1 < 2 and 'a' < 'b'"), "True");
        assert_eq!(eval("[1, 2] < [1, 3]"), "True");
        assert_eq!(eval("2 in [1, 2]"), "True");
        assert_eq!(eval("'z' not in 'abc'"), "True");
        assert_eq!(eval("None is None"), "True");
        assert_eq!(eval("0 or 'default'"), "'default'");
    }

    #[test]
    fn membership_in_ranges_wider_than_an_int() {
        let wide = "range(-6000000000000000000, 6000000000000000000)";
        assert_eq!(eval(&format!("4000000000000000000 in {wide}")), "True");
        assert_eq!(eval(&format!("6000000000000000000 in {wide}")), "False");

        let stepped = "range(-6000000000000000000, 6000000000000000000, 4000000000000000000)";
        assert_eq!(
            eval(&format!("list({stepped})")),
            "[-6000000000000000000, -2000000000000000000, 2000000000000000000]"
        );
        assert_eq!(eval(&format!("2000000000000000000 in {stepped}")), "True");
        assert_eq!(eval(&format!("0 in {stepped}")), "False");
    }

    #[test]
    fn operator_errors() {
        assert_eq!(eval_err("1 / 0"), "ZeroDivisionError: division by zero");
        assert_eq!(
            eval_err("1 + 'a'"),
            "TypeError: unsupported operand type(s) for +: 'int' and 'str'"
        );
        assert_eq!(
            eval_err("1 < 'a'"),
            "TypeError: '<' not supported between instances of 'int' and 'str'"
        );
        assert_eq!(eval_err("2 ** 64").split(':').next(), Some("OverflowError"));
    }
}
