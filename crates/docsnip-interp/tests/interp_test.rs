// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end programs run through the public interpreter API.

use docsnip_interp::{Args, Interpreter, Module, RuntimeError, Value};

fn run_captured(interp: &mut Interpreter, src: &str) -> Vec<String> {
    interp.begin_capture();
    let result = interp.run_source(src);
    let lines = interp.end_capture();
    if let Err(e) = result {
        panic!("unexpected failure: {}\noutput so far: {:?}", e, lines);
    }
    lines
}

#[test]
fn fizzbuzz() {
    let src = "\
for i in range(1, 16):
    if i % 15 == 0:
        print('FizzBuzz')
    elif i % 3 == 0:
        print('Fizz')
    elif i % 5 == 0:
        print('Buzz')
    else:
        print(i)
";
    let out = run_captured(&mut Interpreter::new(), src);
    assert_eq!(out.len(), 15);
    assert_eq!(out[2], "Fizz");
    assert_eq!(out[4], "Buzz");
    assert_eq!(out[14], "FizzBuzz");
}

#[test]
fn recursion_and_loops() {
    let src = "\
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)

total = 0
n = 0
while True:
    n += 1
    if n % 2:
        continue
    total += fib(n)
    if n >= 10:
        break
print(total)
";
    // fib(2)+fib(4)+fib(6)+fib(8)+fib(10) = 1+3+8+21+55
    assert_eq!(run_captured(&mut Interpreter::new(), src), vec!["88"]);
}

#[test]
fn state_flows_across_sources() {
    let mut interp = Interpreter::new();
    run_captured(&mut interp, "import math\ndef area(r):\n    return math.pi * r ** 2\n");
    run_captured(&mut interp, "cache = {}\ncache['unit'] = area(1)\n");
    let out = run_captured(&mut interp, "print(round(cache['unit'], 4))");
    assert_eq!(out, vec!["3.1416"]);
}

#[test]
fn failed_source_keeps_earlier_effects() {
    let mut interp = Interpreter::new();
    interp.begin_capture();
    let err = interp.run_source("seen = []\nseen.append(1)\nprint('before')\nseen[5]\nseen.append(2)").unwrap_err();
    assert_eq!(interp.end_capture(), vec!["before"]);
    assert_eq!(err.kind(), "IndexError");
    assert_eq!(err.line, Some(4));
    assert_eq!(interp.global("seen").map(Value::repr).as_deref(), Some("[1]"));
}

#[test]
fn exceptions_carry_kind_and_message() {
    let src = "\
def checked(x):
    if x < 0:
        raise ValueError('negative: {}'.format(x))
    return x

try:
    checked(-3)
except (TypeError, ValueError) as err:
    print(repr(err))
    print(err.args)
";
    assert_eq!(
        run_captured(&mut Interpreter::new(), src),
        vec!["ValueError('negative: -3')", "('negative: -3',)"]
    );
}

#[test]
fn assertions() {
    let mut interp = Interpreter::new();
    interp.run_source("assert 1 + 1 == 2").unwrap();
    let err = interp.run_source("assert [] , 'list was empty'").unwrap_err();
    assert_eq!(err.kind(), "AssertionError");
    assert_eq!(err.error.to_string(), "list was empty");
}

#[test]
fn unpacking_and_del() {
    let src = "\
pairs = {'x': 1, 'y': 2}
for key, value in pairs.items():
    print(key, value)
a, (b, c) = 1, (2, 3)
a, b = b, a
print(a, b, c)
del pairs['x']
print(pairs)
";
    assert_eq!(
        run_captured(&mut Interpreter::new(), src),
        vec!["x 1", "y 2", "2 1 3", "{'y': 2}"]
    );
    let err = Interpreter::new().run_source("a, b = [1, 2, 3]").unwrap_err();
    assert_eq!(err.kind(), "ValueError");
}

#[test]
fn undefined_names() {
    let err = Interpreter::new().run_source("print(missing)").unwrap_err();
    assert_eq!(err.kind(), "NameError");
    assert_eq!(err.error.to_string(), "name 'missing' is not defined");
}

#[test]
fn host_module_with_custom_kind() {
    fn checked_sqrt(_: &mut Interpreter, args: Args) -> Result<Value, RuntimeError> {
        match args.get(0).and_then(Value::as_int) {
            Some(n) if n >= 0 => Ok(Value::Float((n as f64).sqrt())),
            _ => Err(RuntimeError::ValueError("expected a non-negative int".to_string())),
        }
    }

    let mut interp = Interpreter::new();
    interp.register_module(
        Module::new("geometry")
            .with_value("UNIT", Value::Int(1))
            .with_function("checked_sqrt", checked_sqrt),
    );
    interp.register_kind("GeometryError", "ValueError").unwrap();
    let out = run_captured(
        &mut interp,
        "\
from geometry import checked_sqrt, UNIT
print(checked_sqrt(9) + UNIT)
try:
    raise GeometryError('degenerate')
except ValueError as e:
    print(e)
",
    );
    assert_eq!(out, vec!["4.0", "degenerate"]);
}

#[test]
fn syntax_errors_do_not_run_anything() {
    let mut interp = Interpreter::new();
    let err = interp.run_source("ran = True\nif x\n    pass\n").unwrap_err();
    assert_eq!(err.kind(), "SyntaxError");
    assert!(interp.global("ran").is_none());
}
