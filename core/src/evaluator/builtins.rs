//! Builtin function registry.

use chrono::DateTime;

use crate::{
    evaluator::{EvalResult, Evaluator, RuntimeError},
    syntax::Span,
    values::{Builtin, Value, ValueList},
};

fn bad_argument(builtin: Builtin, expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::BadArgument {
        builtin: builtin.name(),
        expected,
        found: format!("{:?}", found.tag()),
    }
}

impl Evaluator<'_> {
    pub(super) fn call_builtin(&mut self, builtin: Builtin, arg: Value, span: Option<&Span>) -> EvalResult {
        self.tracer
            .step(format_args!("call {}({})", builtin.name(), arg));
        let result = match builtin {
            Builtin::First => project(builtin, arg, 0),
            Builtin::Second => project(builtin, arg, 1),
            Builtin::Third => project(builtin, arg, 2),
            Builtin::Ctime => ctime(arg),
            Builtin::Filter => return self.filter(arg, span),
        };
        Ok(match result {
            Ok(v) => Some(v),
            Err(e) => self.report(e, span),
        })
    }

    /// `filter((predicate, list))` keeps the members for which the
    /// predicate is true.
    fn filter(&mut self, arg: Value, span: Option<&Span>) -> EvalResult {
        let (predicate, list) = match arg {
            Value::Tuple(mut fields) if fields.len() == 2 => {
                let list = fields.pop();
                let predicate = fields.pop();
                match (predicate, list) {
                    (Some(Value::Lambda(p)), Some(Value::List(l))) => (p, l),
                    (p, l) => {
                        let found = Value::Tuple(p.into_iter().chain(l).collect());
                        return Ok(self.report(
                            bad_argument(Builtin::Filter, "(lambda, list)", &found),
                            span,
                        ));
                    }
                }
            }
            other => {
                return Ok(self.report(
                    bad_argument(Builtin::Filter, "(lambda, list)", &other),
                    span,
                ));
            }
        };

        let mut output = ValueList::new();
        for member in list {
            let keep = self
                .call_lambda(&predicate, member.clone())?
                .is_some_and(|v| v.is_true());
            if keep {
                // Members already share one tag.
                if let Err(e) = output.push(member) {
                    self.report(e, span);
                }
            }
        }
        Ok(Some(Value::List(output)))
    }
}

/// Tuple projection. `first` of a non-tuple is an error, as is a tuple too
/// narrow for the requested position.
fn project(builtin: Builtin, arg: Value, position: usize) -> Result<Value, RuntimeError> {
    match arg {
        Value::Tuple(mut fields) => {
            if fields.len() > position {
                Ok(fields.swap_remove(position))
            } else {
                Err(bad_argument(builtin, "a wider tuple", &Value::Tuple(fields)))
            }
        }
        other => Err(bad_argument(builtin, "a tuple", &other)),
    }
}

/// Formats a Unix timestamp, given as an int or a string of digits.
fn ctime(arg: Value) -> Result<Value, RuntimeError> {
    let seconds = match &arg {
        Value::Int(i) => Some(*i),
        Value::Str(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
        _ => None,
    };
    let time = seconds.and_then(|s| DateTime::from_timestamp(s, 0));
    match time {
        Some(time) => Ok(Value::Str(time.format("%a %b %e %H:%M:%S %Y").to_string())),
        None => Err(bad_argument(Builtin::Ctime, "a timestamp", &arg)),
    }
}
