// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The `math` module.

use std::f64::consts;

use crate::interp::{Interpreter, RuntimeError};
use crate::value::{Args, Module, Value};

pub(super) fn module() -> Module {
    Module::new("math")
        .with_value("pi", Value::Float(consts::PI))
        .with_value("e", Value::Float(consts::E))
        .with_value("tau", Value::Float(consts::TAU))
        .with_value("inf", Value::Float(f64::INFINITY))
        .with_function("sqrt", sqrt)
        .with_function("floor", floor)
        .with_function("ceil", ceil)
        .with_function("pow", pow)
        .with_function("fabs", fabs)
        .with_function("log", log)
        .with_function("exp", exp)
}

/// The single numeric argument of a one-argument math function.
fn float_arg(args: &Args, name: &str) -> Result<f64, RuntimeError> {
    args.reject_keywords(name)?;
    args.expect_count(name, 1, 1)?;
    number_arg(&args.positional[0])
}

fn number_arg(value: &Value) -> Result<f64, RuntimeError> {
    value.as_number().map(|n| n.to_f64()).ok_or_else(|| {
        RuntimeError::TypeError(format!("must be real number, not {}", value.type_name()))
    })
}

fn domain_error() -> RuntimeError {
    RuntimeError::ValueError("math domain error".to_string())
}

/// Round toward an integer result, rejecting values with no integer form.
fn to_int(x: f64) -> Result<Value, RuntimeError> {
    if x.is_nan() {
        return Err(RuntimeError::ValueError("cannot convert float NaN to integer".to_string()));
    }
    if x.is_infinite() || x.abs() >= 9.2e18 {
        return Err(RuntimeError::Overflow("cannot convert float infinity to integer".to_string()));
    }
    Ok(Value::Int(x as i64))
}

fn sqrt(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    let x = float_arg(&args, "sqrt")?;
    if x < 0.0 {
        return Err(domain_error());
    }
    Ok(Value::Float(x.sqrt()))
}

fn floor(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    if let Some(Value::Int(n)) = args.get(0) {
        return Ok(Value::Int(*n));
    }
    to_int(float_arg(&args, "floor")?.floor())
}

fn ceil(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    if let Some(Value::Int(n)) = args.get(0) {
        return Ok(Value::Int(*n));
    }
    to_int(float_arg(&args, "ceil")?.ceil())
}

fn pow(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.reject_keywords("pow")?;
    args.expect_count("pow", 2, 2)?;
    let base = number_arg(&args.positional[0])?;
    let exp = number_arg(&args.positional[1])?;
    if base == 0.0 && exp < 0.0 {
        return Err(domain_error());
    }
    Ok(Value::Float(base.powf(exp)))
}

fn fabs(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    Ok(Value::Float(float_arg(&args, "fabs")?.abs()))
}

fn log(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    args.reject_keywords("log")?;
    args.expect_count("log", 1, 2)?;
    let x = number_arg(&args.positional[0])?;
    if x <= 0.0 {
        return Err(domain_error());
    }
    match args.get(1) {
        Some(base) => {
            let base = number_arg(base)?;
            if base <= 0.0 || base == 1.0 {
                return Err(domain_error());
            }
            Ok(Value::Float(x.ln() / base.ln()))
        }
        None => Ok(Value::Float(x.ln())),
    }
}

fn exp(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
    let x = float_arg(&args, "exp")?;
    let y = x.exp();
    if y.is_infinite() && x.is_finite() {
        return Err(RuntimeError::Overflow("math range error".to_string()));
    }
    Ok(Value::Float(y))
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn eval(src: &str) -> String {
        let mut interp = Interpreter::new();
        interp.run_source(&format!("import math\nresult = {}", src)).unwrap();
        interp.global("result").map(|v| v.repr()).unwrap_or_default()
    }

    #[test]
    fn constants_and_functions() {
        assert_eq!(eval("math.sqrt(16)"), "4.0");
        assert_eq!(eval("math.floor(-2.5)"), "-3");
        assert_eq!(eval("math.ceil(2.1)"), "3");
        assert_eq!(eval("math.pow(2, 3)"), "8.0");
        assert_eq!(eval("math.log(8, 2)"), "3.0");
        assert_eq!(eval("round(math.pi, 2)"), "3.14");
    }

    #[test]
    fn domain_errors() {
        let err = Interpreter::new().run_source("import math\nmath.sqrt(-1)").unwrap_err();
        assert_eq!(err.kind(), "ValueError");
        assert_eq!(err.error.to_string(), "math domain error");
    }
}
