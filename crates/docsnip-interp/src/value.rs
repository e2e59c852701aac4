// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use docsnip_ast::decl::FnDecl;

use crate::interp::{Interpreter, RuntimeError};

/// Signature of a host function callable from scripts.
pub type NativeFn = fn(&mut Interpreter, Args) -> Result<Value, RuntimeError>;

/// A runtime value.
///
/// Containers are reference types: assigning a list to a second name aliases
/// it, and mutation through either name is visible through both.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<Vec<Value>>),
    Dict(Rc<RefCell<Dict>>),
    Range(Range),
    /// A function defined with `def`.
    Function(Rc<Function>),
    /// A host function (`print`, `len`, `math.sqrt`, ...).
    Builtin(Builtin),
    Module(Rc<Module>),
    /// An error kind such as `ValueError`; calling it builds an exception.
    Kind(Rc<str>),
    Exception(Rc<Exception>),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(items))
    }

    pub fn dict(dict: Dict) -> Value {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }

    /// Name of the value's type as shown in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Range(_) => "range",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin_function_or_method",
            Value::Module(_) => "module",
            Value::Kind(_) => "type",
            Value::Exception(e) => &e.kind,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            Value::Range(r) => r.len() > 0,
            _ => true,
        }
    }

    /// Integer view used for indexing; booleans count as 0 and 1.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Bool(b) => Some(Number::Int(*b as i64)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Quoted representation, as `repr()` produces.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            Value::Exception(e) if e.message.is_empty() => format!("{}()", e.kind),
            Value::Exception(e) => format!("{}({})", e.kind, quote(&e.message)),
            _ => self.to_string(),
        }
    }

    /// Materialize the items produced by iterating over this value.
    pub fn iterate(&self) -> Result<Vec<Value>, RuntimeError> {
        match self {
            Value::List(l) => Ok(l.borrow().clone()),
            Value::Tuple(t) => Ok(t.as_ref().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.encode_utf8(&mut [0; 4]))).collect()),
            Value::Dict(d) => Ok(d.borrow().keys()),
            Value::Range(r) => Ok(r.iter().map(Value::Int).collect()),
            other => Err(RuntimeError::TypeError(format!(
                "'{}' object is not iterable",
                other.type_name()
            ))),
        }
    }

    /// Structural equality (`==`).
    pub fn py_eq(&self, other: &Value) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.eq_number(b);
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || seq_eq(&a.borrow(), &b.borrow())
            }
            (Value::Tuple(a), Value::Tuple(b)) => seq_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b) || a.borrow().eq_dict(&b.borrow()),
            (Value::Range(a), Value::Range(b)) => a.iter().eq(b.iter()),
            (Value::Kind(a), Value::Kind(b)) => a == b,
            _ => self.is_identical(other),
        }
    }

    /// Object identity (`is`). Scalars compare by value.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::Kind(a), Value::Kind(b)) => a == b,
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`. `None` means unordered (NaN).
    pub(crate) fn compare(&self, other: &Value, op: &str) -> Result<Option<Ordering>, RuntimeError> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return Ok(a.cmp_number(b));
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (Value::List(a), Value::List(b)) => seq_cmp(&a.borrow(), &b.borrow(), op),
            (Value::Tuple(a), Value::Tuple(b)) => seq_cmp(a, b, op),
            _ => Err(RuntimeError::TypeError(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op,
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(l) => write!(f, "[{}]", join_reprs(&l.borrow())),
            Value::Tuple(t) if t.len() == 1 => write!(f, "({},)", t[0].repr()),
            Value::Tuple(t) => write!(f, "({})", join_reprs(t)),
            Value::Dict(d) => {
                let d = d.borrow();
                let items: Vec<String> = d
                    .entries()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Value::Range(r) if r.step == 1 => write!(f, "range({}, {})", r.start, r.stop),
            Value::Range(r) => write!(f, "range({}, {}, {})", r.start, r.stop, r.step),
            Value::Function(func) => write!(f, "<function {}>", func.decl.name),
            Value::Builtin(b) => write!(f, "<built-in function {}>", b.name),
            Value::Module(m) => write!(f, "<module '{}'>", m.name),
            Value::Kind(name) => write!(f, "<class '{}'>", name),
            Value::Exception(e) => write!(f, "{}", e.message),
        }
    }
}

/// Python's float repr: the shortest digits that round-trip, in positional
/// form when the decimal exponent is in `-4..16` (always with a fractional
/// part) and scientific form otherwise (`1e+20`, `1e-05`).
pub(crate) fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let scientific = format!("{:e}", x);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let positional = format!("{}", x);
        if positional.contains('.') {
            positional
        } else {
            positional + ".0"
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

fn join_reprs(items: &[Value]) -> String {
    items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
}

fn seq_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y))
}

fn seq_cmp(a: &[Value], b: &[Value], op: &str) -> Result<Option<Ordering>, RuntimeError> {
    for (x, y) in a.iter().zip(b) {
        if !x.py_eq(y) {
            return x.compare(y, op);
        }
    }
    Ok(Some(a.len().cmp(&b.len())))
}

/// Numeric view of ints, floats, and bools.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn eq_number(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        }
    }

    fn cmp_number(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

/// A lazy integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    pub fn len(&self) -> usize {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        let (lo, hi, step) = if step > 0 { (start, stop, step) } else { (stop, start, -step) };
        if hi <= lo {
            return 0;
        }
        ((hi - lo + step - 1) / step) as usize
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        (index < self.len()).then(|| self.nth(index))
    }

    pub fn contains(&self, n: i64) -> bool {
        let in_bounds = if self.step > 0 {
            n >= self.start && n < self.stop
        } else {
            n <= self.start && n > self.stop
        };
        in_bounds && (n as i128 - self.start as i128) % self.step as i128 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map(move |i| self.nth(i))
    }

    /// Element `index`, which must be below `len()`. Wide ranges need the
    /// intermediate product in i128; the result always fits in i64.
    fn nth(&self, index: usize) -> i64 {
        (self.start as i128 + self.step as i128 * index as i128) as i64
    }
}

/// A `def` function with its default values evaluated at definition time.
#[derive(Debug)]
pub struct Function {
    pub decl: Rc<FnDecl>,
    pub defaults: Vec<Option<Value>>,
}

/// A host function with the name it is reported under.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// An importable module: a name and a table of attributes.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    attrs: IndexMap<String, Value>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attrs: IndexMap::new() }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn with_function(self, name: &'static str, func: NativeFn) -> Self {
        self.with_value(name, Value::Builtin(Builtin { name, func }))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }
}

/// A raised (or constructed) exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    pub kind: String,
    pub message: String,
}

/// Arguments to a host function.
#[derive(Debug, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self { positional, keywords: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Remove and return a keyword argument.
    pub fn take_keyword(&mut self, name: &str) -> Option<Value> {
        let pos = self.keywords.iter().position(|(k, _)| k == name)?;
        Some(self.keywords.remove(pos).1)
    }

    /// Fail if any keyword arguments remain unconsumed.
    pub fn reject_keywords(&self, func: &str) -> Result<(), RuntimeError> {
        match self.keywords.first() {
            Some((name, _)) => Err(RuntimeError::TypeError(format!(
                "{}() got an unexpected keyword argument '{}'",
                func, name
            ))),
            None => Ok(()),
        }
    }

    /// Check the positional count is within `min..=max`.
    pub fn expect_count(&self, func: &str, min: usize, max: usize) -> Result<(), RuntimeError> {
        let n = self.positional.len();
        if n >= min && n <= max {
            return Ok(());
        }
        let expected = if min == max {
            format!("exactly {}", min)
        } else if n < min {
            format!("at least {}", min)
        } else {
            format!("at most {}", max)
        };
        let plural = if min == max && min == 1 { "" } else { "s" };
        Err(RuntimeError::TypeError(format!(
            "{}() takes {} argument{} ({} given)",
            func, expected, plural, n
        )))
    }
}

/// Insertion-ordered dictionary keyed by hashable values.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: IndexMap<DictKey, (Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let k = DictKey::from_value(key)?;
        Ok(self.entries.get(&k).map(|(_, v)| v.clone()))
    }

    pub fn contains(&self, key: &Value) -> Result<bool, RuntimeError> {
        Ok(self.entries.contains_key(&DictKey::from_value(key)?))
    }

    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let k = DictKey::from_value(&key)?;
        match self.entries.get_mut(&k) {
            Some(slot) => slot.1 = value,
            None => {
                self.entries.insert(k, (key, value));
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let k = DictKey::from_value(key)?;
        Ok(self.entries.shift_remove(&k).map(|(_, v)| v))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.values().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.values().map(|(_, v)| v.clone()).collect()
    }

    pub fn items(&self) -> Vec<Value> {
        self.entries
            .values()
            .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
            .collect()
    }

    fn eq_dict(&self, other: &Dict) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|(k, (_, v))| {
                other.entries.get(k).is_some_and(|(_, ov)| v.py_eq(ov))
            })
    }
}

/// Hashable projection of a value. Equal numbers share a key (`1 == 1.0 == True`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DictKey {
    None,
    Int(i64),
    Float(u64),
    Str(Rc<str>),
    Tuple(Vec<DictKey>),
    Kind(Rc<str>),
}

impl DictKey {
    fn from_value(value: &Value) -> Result<DictKey, RuntimeError> {
        match value {
            Value::None => Ok(DictKey::None),
            Value::Bool(b) => Ok(DictKey::Int(*b as i64)),
            Value::Int(n) => Ok(DictKey::Int(*n)),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => Ok(DictKey::Int(*f as i64)),
            Value::Float(f) => Ok(DictKey::Float(f.to_bits())),
            Value::Str(s) => Ok(DictKey::Str(s.clone())),
            Value::Tuple(t) => Ok(DictKey::Tuple(
                t.iter().map(DictKey::from_value).collect::<Result<_, _>>()?,
            )),
            Value::Kind(k) => Ok(DictKey::Kind(k.clone())),
            other => Err(RuntimeError::TypeError(format!(
                "unhashable type: '{}'",
                other.type_name()
            ))),
        }
    }
}
