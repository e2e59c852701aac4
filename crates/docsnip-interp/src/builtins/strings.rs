// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! String methods.

use std::rc::Rc;

use crate::interp::RuntimeError;
use crate::value::{format_float, Args, Value};

use super::{no_such_method, str_arg};

pub(super) fn call_str_method(s: &Rc<str>, method: &str, args: Args) -> Result<Value, RuntimeError> {
    if method == "format" {
        return format(s, args);
    }
    args.reject_keywords(method)?;
    match method {
        "upper" => {
            args.expect_count(method, 0, 0)?;
            Ok(Value::str(&s.to_uppercase()))
        }
        "lower" => {
            args.expect_count(method, 0, 0)?;
            Ok(Value::str(&s.to_lowercase()))
        }
        "strip" | "lstrip" | "rstrip" => {
            args.expect_count(method, 0, 1)?;
            let chars: Option<Vec<char>> = match args.get(0) {
                None | Some(Value::None) => None,
                Some(_) => Some(str_arg(&args, 0, method)?.chars().collect()),
            };
            let is_stripped = |c: char| match &chars {
                Some(set) => set.contains(&c),
                None => c.is_whitespace(),
            };
            let stripped = match method {
                "strip" => s.trim_matches(is_stripped),
                "lstrip" => s.trim_start_matches(is_stripped),
                _ => s.trim_end_matches(is_stripped),
            };
            Ok(Value::str(stripped))
        }
        "split" => {
            args.expect_count(method, 0, 2)?;
            let max = match args.get(1) {
                Some(v) => v.as_int().filter(|n| *n >= 0).map(|n| n as usize),
                None => None,
            };
            let parts: Vec<Value> = match args.get(0) {
                None | Some(Value::None) => split_whitespace(s, max),
                Some(_) => {
                    let sep = str_arg(&args, 0, method)?;
                    if sep.is_empty() {
                        return Err(RuntimeError::ValueError("empty separator".to_string()));
                    }
                    match max {
                        Some(n) => s.splitn(n + 1, sep).map(Value::str).collect(),
                        None => s.split(sep).map(Value::str).collect(),
                    }
                }
            };
            Ok(Value::list(parts))
        }
        "join" => {
            args.expect_count(method, 1, 1)?;
            let mut pieces = Vec::new();
            for (i, item) in args.positional[0].iterate()?.into_iter().enumerate() {
                match item {
                    Value::Str(piece) => pieces.push(piece),
                    other => {
                        return Err(RuntimeError::TypeError(format!(
                            "sequence item {}: expected str instance, {} found",
                            i,
                            other.type_name()
                        )))
                    }
                }
            }
            let joined = pieces.iter().map(|p| &**p).collect::<Vec<&str>>().join(&**s);
            Ok(Value::str(&joined))
        }
        "replace" => {
            args.expect_count(method, 2, 3)?;
            let old = str_arg(&args, 0, method)?;
            let new = str_arg(&args, 1, method)?;
            let replaced = match args.get(2).and_then(Value::as_int) {
                Some(n) if n >= 0 => s.replacen(old, new, n as usize),
                _ => s.replace(old, new),
            };
            Ok(Value::str(&replaced))
        }
        "startswith" | "endswith" => {
            args.expect_count(method, 1, 1)?;
            let candidates = match &args.positional[0] {
                Value::Tuple(items) => items.as_ref().clone(),
                other => vec![other.clone()],
            };
            for candidate in candidates {
                let Value::Str(affix) = candidate else {
                    return Err(RuntimeError::TypeError(format!(
                        "{} first arg must be str or a tuple of str, not {}",
                        method,
                        candidate.type_name()
                    )));
                };
                let hit = if method == "startswith" {
                    s.starts_with(&*affix)
                } else {
                    s.ends_with(&*affix)
                };
                if hit {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        "find" => {
            args.expect_count(method, 1, 1)?;
            let needle = str_arg(&args, 0, method)?;
            let index = s
                .find(needle)
                .map(|byte| s[..byte].chars().count() as i64)
                .unwrap_or(-1);
            Ok(Value::Int(index))
        }
        "count" => {
            args.expect_count(method, 1, 1)?;
            let needle = str_arg(&args, 0, method)?;
            let n = if needle.is_empty() {
                s.chars().count() + 1
            } else {
                s.matches(needle).count()
            };
            Ok(Value::Int(n as i64))
        }
        _ => Err(no_such_method(&Value::Str(s.clone()), method)),
    }
}

fn split_whitespace(s: &str, max: Option<usize>) -> Vec<Value> {
    let Some(max) = max else {
        return s.split_whitespace().map(Value::str).collect();
    };
    let mut parts = Vec::new();
    let mut rest = s.trim_start();
    while !rest.is_empty() {
        if parts.len() == max {
            parts.push(Value::str(rest));
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        parts.push(Value::str(&rest[..end]));
        rest = rest[end..].trim_start();
    }
    parts
}

/// `str.format` with positional (`{}`, `{0}`) and keyword (`{name}`) fields.
fn format(template: &str, args: Args) -> Result<Value, RuntimeError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut auto_index = 0;
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(RuntimeError::ValueError(
                    "Single '}' encountered in format string".to_string(),
                ))
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => {
                            return Err(RuntimeError::ValueError(
                                "Single '{' encountered in format string".to_string(),
                            ))
                        }
                    }
                }
                let (name, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                let value = if name.is_empty() {
                    let value = positional(&args, auto_index)?;
                    auto_index += 1;
                    value
                } else if let Ok(index) = name.parse::<usize>() {
                    positional(&args, index)?
                } else {
                    args.keywords
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| RuntimeError::KeyError(Value::str(name).repr()))?
                };
                out.push_str(&apply_spec(value, spec)?);
            }
            c => out.push(c),
        }
    }
    Ok(Value::str(&out))
}

fn positional(args: &Args, index: usize) -> Result<&Value, RuntimeError> {
    args.get(index).ok_or_else(|| {
        RuntimeError::IndexError(format!(
            "Replacement index {} out of range for positional args tuple",
            index
        ))
    })
}

/// Apply a `[[fill]align][width][,][.precision][type]` format spec.
fn apply_spec(value: &Value, spec: &str) -> Result<String, RuntimeError> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let invalid = || {
        RuntimeError::ValueError(format!(
            "Invalid format specifier '{}' for object of type '{}'",
            spec,
            value.type_name()
        ))
    };

    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;
    let mut fill = ' ';
    let mut align = None;
    if chars.len() >= 2 && matches!(chars[1], '<' | '>' | '^') {
        fill = chars[0];
        align = Some(chars[1]);
        i = 2;
    } else if matches!(chars.first(), Some('<' | '>' | '^')) {
        align = Some(chars[0]);
        i = 1;
    }
    if align.is_none() && chars.get(i) == Some(&'0') {
        fill = '0';
        align = Some('=');
        i += 1;
    }
    let digits = |i: &mut usize| {
        let start = *i;
        while chars.get(*i).is_some_and(char::is_ascii_digit) {
            *i += 1;
        }
        chars[start..*i].iter().collect::<String>().parse::<usize>().ok()
    };
    let width = digits(&mut i).unwrap_or(0);
    let grouping = chars.get(i) == Some(&',');
    if grouping {
        i += 1;
    }
    let precision = if chars.get(i) == Some(&'.') {
        i += 1;
        Some(digits(&mut i).ok_or_else(invalid)?)
    } else {
        None
    };
    let ty = chars.get(i).copied();
    if i + usize::from(ty.is_some()) != chars.len() {
        return Err(invalid());
    }

    let number = value.as_number().filter(|_| !matches!(value, Value::Bool(_)) || ty.is_some());
    let body = match (ty, number) {
        (Some('f' | 'F'), Some(n)) => format!("{:.*}", precision.unwrap_or(6), n.to_f64()),
        (Some('%'), Some(n)) => format!("{:.*}%", precision.unwrap_or(6), n.to_f64() * 100.0),
        (Some('e'), Some(n)) => format_exponent(n.to_f64(), precision.unwrap_or(6)),
        (Some('d'), Some(_)) => match value.as_int() {
            Some(n) => n.to_string(),
            None => return Err(invalid()),
        },
        (None | Some('g'), Some(n)) if precision.is_some() && matches!(value, Value::Float(_)) => {
            format_general(n.to_f64(), precision.unwrap_or(6).max(1), ty.is_none())
        }
        (None, _) | (Some('s'), _) => {
            let text = match value {
                Value::Float(f) => format_float(*f),
                other => other.to_string(),
            };
            match precision {
                Some(p) if !matches!(value, Value::Float(_) | Value::Int(_)) => text.chars().take(p).collect(),
                _ => text,
            }
        }
        _ => return Err(invalid()),
    };
    let body = if grouping { group_thousands(&body) } else { body };

    let len = body.chars().count();
    if len >= width {
        return Ok(body);
    }
    let pad = width - len;
    let align = align.unwrap_or(if number.is_some() { '>' } else { '<' });
    let fill_str = |n: usize| std::iter::repeat(fill).take(n).collect::<String>();
    Ok(match align {
        '<' => format!("{}{}", body, fill_str(pad)),
        '^' => format!("{}{}{}", fill_str(pad / 2), body, fill_str(pad - pad / 2)),
        '=' => match body.strip_prefix('-') {
            Some(rest) => format!("-{}{}", fill_str(pad), rest),
            None => format!("{}{}", fill_str(pad), body),
        },
        _ => format!("{}{}", fill_str(pad), body),
    })
}

fn format_exponent(x: f64, precision: usize) -> String {
    let text = format!("{:.*e}", precision, x);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// Significant-digit formatting; `keep_point` keeps a `.0` on fixed-point results.
fn format_general(x: f64, precision: usize, keep_point: bool) -> String {
    if !x.is_finite() {
        return format_float(x);
    }
    let sci = format!("{:.*e}", precision - 1, x);
    let exp: i64 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exp < -4 || exp >= precision as i64 {
        let trimmed = match sci.split_once('e') {
            Some((mantissa, _)) if mantissa.contains('.') => {
                mantissa.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            Some((mantissa, _)) => mantissa.to_string(),
            None => sci.clone(),
        };
        return format!("{}e{}{:02}", trimmed, if exp < 0 { '-' } else { '+' }, exp.abs());
    }
    let decimals = (precision as i64 - 1 - exp).max(0) as usize;
    let fixed = format!("{:.*}", decimals, x);
    let mut trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    };
    if keep_point && !trimmed.contains('.') {
        trimmed.push_str(".0");
    }
    trimmed
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac) = match rest.find('.') {
        Some(dot) => rest.split_at(dot),
        None => (rest, ""),
    };
    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn eval(src: &str) -> String {
        let mut interp = Interpreter::new();
        interp.run_source(&format!("result = {}", src)).unwrap();
        interp.global("result").map(|v| v.repr()).unwrap_or_default()
    }

    #[test]
    fn case_and_whitespace() {
        assert_eq!(eval("'Hello'.upper()"), "'HELLO'");
        assert_eq!(eval("'  x  '.strip()"), "'x'");
        assert_eq!(eval("'xxhixx'.strip('x')"), "'hi'");
        assert_eq!(eval("'  x'.lstrip()"), "'x'");
    }

    #[test]
    fn split_and_join() {
        assert_eq!(eval("' a  b c '.split()"), "['a', 'b', 'c']");
        assert_eq!(eval("'a,b,,c'.split(',')"), "['a', 'b', '', 'c']");
        assert_eq!(eval("'a b c'.split(None, 1)"), "['a', 'b c']");
        assert_eq!(eval("'-'.join(['a', 'b'])"), "'a-b'");
        assert!(Interpreter::new().run_source("'-'.join([1])").is_err());
    }

    #[test]
    fn search() {
        assert_eq!(eval("'banana'.replace('a', 'o')"), "'bonono'");
        assert_eq!(eval("'banana'.find('n')"), "2");
        assert_eq!(eval("'banana'.count('a')"), "3");
        assert_eq!(eval("'file.md'.endswith(('.md', '.txt'))"), "True");
    }

    #[test]
    fn format_fields() {
        assert_eq!(eval("'{} + {} = {}'.format(1, 2, 3)"), "'1 + 2 = 3'");
        assert_eq!(eval("'{1}{0}'.format('a', 'b')"), "'ba'");
        assert_eq!(eval("'{name}!'.format(name='docs')"), "'docs!'");
        assert_eq!(eval("'{{}}'.format()"), "'{}'");
        assert_eq!(eval("'{:.2f}'.format(3.14159)"), "'3.14'");
        assert_eq!(eval("'{:>5}|'.format('ab')"), "'   ab|'");
        assert_eq!(eval("'{:05d}'.format(-42)"), "'-0042'");
        assert_eq!(eval("'{:,}'.format(1234567)"), "'1,234,567'");
        assert_eq!(eval("'{:.1%}'.format(0.25)"), "'25.0%'");
        assert_eq!(eval("'{:.2e}'.format(1234.5)"), "'1.23e+03'");
        assert_eq!(eval("'{:.3}'.format(3.14159)"), "'3.14'");
        assert_eq!(eval("'{:.2}'.format(3.0)"), "'3.0'");
    }

    #[test]
    fn format_errors() {
        let mut interp = Interpreter::new();
        let err = interp.run_source("'{}'.format()").unwrap_err();
        assert_eq!(err.kind(), "IndexError");
        let err = interp.run_source("'{'.format()").unwrap_err();
        assert_eq!(err.kind(), "ValueError");
        let err = interp.run_source("'{x}'.format()").unwrap_err();
        assert_eq!(err.kind(), "KeyError");
    }
}
