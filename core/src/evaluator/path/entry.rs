//! Flattening a path expression into a sequence of matchers.

use core::fmt;

use crate::syntax::{Expr, OpCode};

/// How many consecutive objects one entry consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MatchMode {
    One,
    Optional,
    Star,
    Plus,
}

impl MatchMode {
    pub fn repeats(self) -> bool {
        matches!(self, MatchMode::Star | MatchMode::Plus)
    }

    /// Whether the entry may match zero objects.
    pub fn skippable(self) -> bool {
        matches!(self, MatchMode::Star | MatchMode::Optional)
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::One => "one",
            MatchMode::Optional => "zero/one",
            MatchMode::Star => "zero-or-more",
            MatchMode::Plus => "one-or-more",
        })
    }
}

/// What an object must satisfy at one position.
#[derive(Debug, Clone, Copy)]
pub(super) enum Matcher<'e> {
    /// The implicit entry inserted by a long join; matches anything.
    Any,
    Expr(&'e Expr),
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PathEntry<'e> {
    pub mode: MatchMode,
    pub matcher: Matcher<'e>,
    /// Whether the object matched here is part of each result.
    pub is_result: bool,
}

impl<'e> PathEntry<'e> {
    fn any(mode: MatchMode) -> Self {
        PathEntry {
            mode,
            matcher: Matcher::Any,
            is_result: false,
        }
    }

    /// Strips one layer of markers: `?` of `+` is `*`, then `?`, `+` and
    /// extract are recognized on their own.
    fn from_expr(expr: &'e Expr) -> Self {
        let (mode, is_result, inner) = if let Some(inner) = marker(expr, OpCode::Optional) {
            match marker(inner, OpCode::Repeat) {
                Some(repeated) => (MatchMode::Star, false, repeated),
                None => (MatchMode::Optional, false, inner),
            }
        } else if let Some(inner) = marker(expr, OpCode::Repeat) {
            (MatchMode::Plus, false, inner)
        } else if let Some(inner) = marker(expr, OpCode::Extract) {
            (MatchMode::One, true, inner)
        } else {
            (MatchMode::One, false, expr)
        };
        PathEntry {
            mode,
            matcher: Matcher::Expr(inner),
            is_result,
        }
    }
}

impl fmt::Display for PathEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mode)?;
        if self.is_result {
            write!(f, " [result-value]")?;
        }
        if let Matcher::Any = self.matcher {
            write!(f, " **")?;
        }
        Ok(())
    }
}

fn marker(expr: &Expr, op: OpCode) -> Option<&Expr> {
    match expr {
        Expr::Op {
            op: found,
            left,
            right: None,
            ..
        } if *found == op => Some(left),
        _ => None,
    }
}

fn is_join(expr: &Expr) -> bool {
    matches!(expr, Expr::Op { op, .. } if op.is_path())
}

/// Append the entries of a path expression, left to right.
pub(super) fn collect<'e>(expr: &'e Expr, entries: &mut Vec<PathEntry<'e>>) {
    let Expr::Op {
        op, left, right, ..
    } = expr
    else {
        entries.push(PathEntry::from_expr(expr));
        return;
    };

    collect_side(left, entries);
    match op {
        OpCode::LongPathZ => entries.push(PathEntry::any(MatchMode::Star)),
        OpCode::LongPathNZ => entries.push(PathEntry::any(MatchMode::Plus)),
        _ => {}
    }
    if let Some(right) = right {
        collect_side(right, entries);
    }
}

fn collect_side<'e>(expr: &'e Expr, entries: &mut Vec<PathEntry<'e>>) {
    if is_join(expr) {
        collect(expr, entries);
    } else {
        entries.push(PathEntry::from_expr(expr));
    }
}
