//! Binary and unary operator implementations on values.
//!
//! Nil operands never reach these functions; the evaluator applies the nil
//! rules before dispatching here.

use regex::Regex;

use crate::evaluator::RuntimeError;
use crate::syntax::OpCode;
use crate::values::{Value, ValueList};

fn invalid(op: OpCode, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::operands(op.symbol(), left.tag(), Some(right.tag()))
}

fn truth(b: bool) -> Value {
    Value::Int(b as i64)
}

/// Evaluate a binary operator on two present values.
pub(super) fn eval_binary(op: OpCode, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod => {
            eval_arithmetic(op, left, right)
        }
        OpCode::Eq => Ok(truth(left.equals(&right))),
        OpCode::Ne => Ok(truth(!left.equals(&right))),
        OpCode::Lt => less_than(op, &left, &right).map(truth),
        OpCode::Gt => less_than(op, &right, &left).map(truth),
        OpCode::Le => less_than(op, &right, &left).map(|b| truth(!b)),
        OpCode::Ge => less_than(op, &left, &right).map(|b| truth(!b)),
        OpCode::Match => glob_match(op, &left, &right).map(truth),
        OpCode::NoMatch => glob_match(op, &left, &right).map(|b| truth(!b)),
        OpCode::Contains => eval_contains(left, right).map(truth),
        OpCode::StrCat => eval_strcat(left, right),
        OpCode::Union | OpCode::Intersect => match (left, right) {
            (Value::List(l), Value::List(r)) => {
                let result = if op == OpCode::Union {
                    l.union(r)
                } else {
                    l.intersect(r)
                };
                Ok(Value::List(result?))
            }
            (l, r) => Err(invalid(op, &l, &r)),
        },
        _ => Err(invalid(op, &left, &right)),
    }
}

/// Evaluate a unary operator on a present value.
pub(super) fn eval_unary(op: OpCode, operand: Value) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (OpCode::LogNot, v) => Ok(truth(!v.is_true())),
        (OpCode::Neg, Value::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
        (OpCode::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (op, v) => Err(RuntimeError::operands(op.symbol(), v.tag(), None)),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

fn eval_arithmetic(op: OpCode, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_binary_int(op, a, b).map(Value::Int),
        (Value::Int(a), Value::Float(b)) => eval_binary_float(op, a as f64, b).map(Value::Float),
        (Value::Float(a), Value::Int(b)) => eval_binary_float(op, a, b as f64).map(Value::Float),
        (Value::Float(a), Value::Float(b)) => eval_binary_float(op, a, b).map(Value::Float),
        (Value::List(a), Value::List(b)) if op == OpCode::Sub => {
            Ok(Value::List(a.difference(b)?))
        }
        (l, r) => Err(invalid(op, &l, &r)),
    }
}

/// Evaluate an arithmetic operator on two integers.
///
/// Uses wrapping arithmetic to prevent panics on overflow.
/// Division or modulo by zero returns an error.
pub(super) fn eval_binary_int(op: OpCode, left: i64, right: i64) -> Result<i64, RuntimeError> {
    match op {
        OpCode::Add => Ok(left.wrapping_add(right)),
        OpCode::Sub => Ok(left.wrapping_sub(right)),
        OpCode::Mul => Ok(left.wrapping_mul(right)),
        OpCode::Div | OpCode::Mod if right == 0 => Err(RuntimeError::DivisionByZero),
        // wrapping_div handles i64::MIN / -1
        OpCode::Div => Ok(left.wrapping_div(right)),
        OpCode::Mod => Ok(left.wrapping_rem(right)),
        _ => Err(RuntimeError::operands(
            op.symbol(),
            crate::values::ValueTag::Int,
            Some(crate::values::ValueTag::Int),
        )),
    }
}

/// Evaluate an arithmetic operator on two floats.
///
/// A zero divisor is an error, as for integers; `%` is the C `fmod`.
pub(super) fn eval_binary_float(op: OpCode, left: f64, right: f64) -> Result<f64, RuntimeError> {
    match op {
        OpCode::Add => Ok(left + right),
        OpCode::Sub => Ok(left - right),
        OpCode::Mul => Ok(left * right),
        OpCode::Div | OpCode::Mod if right == 0.0 => Err(RuntimeError::DivisionByZero),
        OpCode::Div => Ok(left / right),
        OpCode::Mod => Ok(left % right),
        _ => Err(RuntimeError::operands(
            op.symbol(),
            crate::values::ValueTag::Float,
            Some(crate::values::ValueTag::Float),
        )),
    }
}

// ============================================================================
// Comparison and matching
// ============================================================================

/// The one primitive ordering; `>`, `<=` and `>=` are derived from it.
fn less_than(op: OpCode, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a < b),
        (Value::Float(a), Value::Float(b)) => Ok(a < b),
        (Value::Str(a), Value::Str(b)) => Ok(a < b),
        (l, r) => Err(invalid(op, l, r)),
    }
}

/// Shell-style glob match of `text` against `pattern`.
fn glob_match(op: OpCode, text: &Value, pattern: &Value) -> Result<bool, RuntimeError> {
    let (Value::Str(text), Value::Str(pattern)) = (text, pattern) else {
        return Err(invalid(op, text, pattern));
    };
    let regex = Regex::new(&glob_to_regex(pattern)).map_err(|_| RuntimeError::BadPattern {
        pattern: pattern.clone(),
    })?;
    Ok(regex.is_match(text))
}

/// Translates `*`, `?`, `[...]`, `[!...]` and backslash escapes.
fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::from("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    re.push_str(&regex::escape(next.encode_utf8(&mut [0; 4])));
                } else {
                    re.push_str(r"\\");
                }
            }
            '[' => {
                let rest = chars.as_str();
                match bracket_class(rest) {
                    Some((class, consumed)) => {
                        re.push_str(&class);
                        chars = rest[consumed..].chars();
                    }
                    None => re.push_str(r"\["),
                }
            }
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

/// Parses the body of a bracket expression following `[`. Returns the regex
/// class and the number of bytes consumed, or `None` if it never closes.
fn bracket_class(rest: &str) -> Option<(String, usize)> {
    let mut class = String::from("[");
    let mut body = rest;
    if let Some(stripped) = body.strip_prefix('!') {
        class.push('^');
        body = stripped;
    }
    for (i, c) in body.char_indices() {
        match c {
            // A leading `]` is a member, not the terminator.
            ']' if i > 0 => {
                class.push(']');
                return Some((class, rest.len() - body.len() + i + 1));
            }
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            c => class.push(c),
        }
    }
    None
}

// ============================================================================
// Sequences
// ============================================================================

/// `haystack contains needle`.
fn eval_contains(haystack: Value, needle: Value) -> Result<bool, RuntimeError> {
    match (haystack, needle) {
        (Value::List(h), Value::List(n)) => {
            if let (Some(ht), Some(nt)) = (h.membertype(), n.membertype()) {
                if ht != nt {
                    return Err(invalid(OpCode::Contains, &Value::List(h), &Value::List(n)));
                }
            }
            Ok(appears_in(n.members(), h.members()))
        }
        (Value::Tuple(h), Value::Tuple(n)) => Ok(appears_in(&n, &h)),
        (h, n) => Err(invalid(OpCode::Contains, &h, &n)),
    }
}

/// Scans `haystack` for `needle` as a contiguous run. After a mismatch the
/// scan resumes with the next element without retrying the one that broke
/// the run, so `[1, 2]` is not found in `[1, 1, 2]`.
fn appears_in(needle: &[Value], haystack: &[Value]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let mut matched = 0;
    for item in haystack {
        if item.equals(&needle[matched]) {
            matched += 1;
            if matched == needle.len() {
                return true;
            }
        } else {
            matched = 0;
        }
    }
    false
}

fn eval_strcat(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Str(mut l), Value::Str(r)) => {
            l.push_str(&r);
            Ok(Value::Str(l))
        }
        (Value::List(l), Value::List(r)) => Ok(Value::List(ValueList::concat(l, r)?)),
        (l, r) => Err(invalid(OpCode::StrCat, &l, &r)),
    }
}
