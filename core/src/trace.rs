//! Indentation-tracked text output for AST dumps and evaluation traces.

use core::fmt::{self, Write};

const INDENT: &str = "   ";

/// Accumulates lines, each prefixed by the current nesting depth.
#[derive(Debug, Default)]
pub struct IndentWriter {
    depth: usize,
    out: String,
}

impl IndentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Evaluation step trace. Disabled tracers record nothing.
#[derive(Debug, Default)]
pub struct Tracer {
    enabled: bool,
    writer: IndentWriter,
}

impl Tracer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            writer: IndentWriter::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records one step at the current depth.
    pub fn step(&mut self, args: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::trace!(depth = self.writer.depth(), "{}", args);
            self.writer.line(args);
        }
    }

    pub fn enter(&mut self) {
        if self.enabled {
            self.writer.indent();
        }
    }

    pub fn leave(&mut self) {
        if self.enabled {
            self.writer.unindent();
        }
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }
}
