//! Textual rendering of values.

use core::fmt;

use crate::values::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write_quoted(f, s),
            Value::Pnode(p) => write!(f, "(pnode {})", p),
            Value::Range(left, right) => write!(f, "({}..{})", left, right),
            Value::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
            Value::List(list) => {
                write!(f, "[")?;
                for (i, member) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "]")
            }
            Value::All => write!(f, "**"),
            Value::Index(index) => write!(f, "<index {}>", index.name()),
            Value::Lambda(lambda) => write!(f, "<lambda {}>", lambda.id),
            Value::Builtin(builtin) => write!(f, "{}", builtin.name()),
        }
    }
}

/// Printable ASCII passes through; newline and tab are escaped, anything
/// else becomes a `\(hh)` byte escape.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for byte in s.bytes() {
        match byte {
            b'\n' => write!(f, "\\n")?,
            b'\t' => write!(f, "\\t")?,
            32..=126 => write!(f, "{}", byte as char)?,
            _ => write!(f, "\\({:02x})", byte)?,
        }
    }
    write!(f, "\"")
}
