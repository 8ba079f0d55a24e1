//! Core evaluation logic.

use core::fmt;

use crate::{
    api::{Diagnostic, ExecutionOptions},
    evaluator::{ExecutionError, ResourceExceededError::*, RuntimeError, operators},
    scope_stack::ScopeStack,
    store::ProvenanceStore,
    syntax::{Expr, OpCode, Span, Var},
    trace::Tracer,
    values::{Lambda, Value, ValueList},
};

/// Result of evaluating one expression. `Ok(None)` is nil.
pub type EvalResult = Result<Option<Value>, ExecutionError>;

/// Tree-walking evaluator over a read-only provenance store.
///
/// Variables are bound on an explicit scope stack rather than in the AST,
/// so re-entrant application of the same lambda is safe. A variable may be
/// bound to nil (a `let` over a nil value), which a `Ref` then yields.
pub struct Evaluator<'s> {
    pub(super) options: ExecutionOptions,
    pub(super) store: &'s dyn ProvenanceStore,
    pub(super) scope_stack: ScopeStack<Option<Value>>,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) tracer: Tracer,
    depth: usize,
    next_lambda_id: u64,
    pub(super) path_steps: usize,
}

impl<'s> Evaluator<'s> {
    pub fn new(options: ExecutionOptions, store: &'s dyn ProvenanceStore) -> Self {
        let tracer = Tracer::new(options.trace);
        Self {
            options,
            store,
            scope_stack: ScopeStack::new(),
            diagnostics: Vec::new(),
            tracer,
            depth: 0,
            next_lambda_id: 0,
            path_steps: 0,
        }
    }

    /// Evaluate a query.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        self.eval_expr(expr)
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the evaluator, returning its diagnostics and trace text.
    pub fn finish(self) -> (Vec<Diagnostic>, String) {
        (self.diagnostics, self.tracer.finish())
    }

    /// Record a query-level error. The failing subexpression yields nil.
    pub(super) fn report(&mut self, error: impl Into<RuntimeError>, span: Option<&Span>) -> Option<Value> {
        let error = error.into();
        tracing::debug!(%error, "runtime error");
        self.tracer.step(format_args!("error: {}", error));
        self.diagnostics.push(Diagnostic::error(error.to_string(), span.cloned()));
        None
    }

    /// Evaluate an expression node.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(StackOverflow {
                depth: self.depth,
                max_depth: self.options.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let result = self.eval_expr_inner(expr);
        self.depth -= 1;

        result
    }

    /// Inner evaluation logic (no depth tracking).
    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Val(value) => Ok(Some(value.clone())),

            Expr::Ref(var) => match self.scope_stack.lookup(*var) {
                Some(value) => Ok(value.clone()),
                None => Ok(self.report(RuntimeError::UnboundVariable { var: var.0 }, None)),
            },

            Expr::Lambda { var, body } => {
                let id = self.next_lambda_id;
                self.next_lambda_id += 1;
                Ok(Some(Value::Lambda(Lambda {
                    id,
                    var: var.clone(),
                    body: body.clone(),
                })))
            }

            Expr::For {
                var,
                source,
                guard,
                body,
            } => self.eval_for(var, source, guard, body),

            Expr::Let {
                var,
                bound,
                guard,
                body,
            } => {
                let bound = self.eval_expr(bound)?;
                self.tracer.step(format_args!("let {}", var));
                self.tracer.enter();
                let result = self.bind_and_test(var, bound, guard, body);
                self.tracer.leave();
                result
            }

            Expr::Cond { test, yes, no } => {
                let test = self.eval_expr(test)?;
                // A nil test takes the `yes` branch.
                let take_yes = test.as_ref().is_none_or(|v| v.is_true());
                self.tracer.step(format_args!(
                    "if {} -> {}",
                    Shown(&test),
                    if take_yes { "then" } else { "else" }
                ));
                let taken = if take_yes { yes } else { no };
                match taken {
                    Some(branch) => self.eval_expr(branch),
                    None => Ok(None),
                }
            }

            Expr::Tuple(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields.iter().flatten() {
                    if let Some(value) = self.eval_expr(field)? {
                        values.push(value);
                    }
                }
                // Nil fields are squeezed out, as the optimizer does.
                Ok(match values.len() {
                    0 => None,
                    1 => values.pop(),
                    _ => Some(Value::Tuple(values)),
                })
            }

            Expr::Op {
                op,
                left,
                right,
                span,
            } => {
                if op.is_path() {
                    return self.eval_path(expr);
                }
                let result = self.eval_op(*op, left, right.as_deref(), span.as_ref())?;
                self.tracer
                    .step(format_args!("op {} => {}", op.symbol(), Shown(&result)));
                Ok(result)
            }
        }
    }

    // ========================================================================
    // Binding forms
    // ========================================================================

    fn eval_for(&mut self, var: &Var, source: &Expr, guard: &Expr, body: &Expr) -> EvalResult {
        let Some(source) = self.eval_expr(source)? else {
            return Ok(None);
        };
        self.tracer.step(format_args!("for {} in {}", var, source));
        self.tracer.enter();
        let result = self.iterate(var, source, guard, body);
        self.tracer.leave();
        let result = result?;
        self.tracer.step(format_args!("for {} => {}", var, Shown(&result)));
        Ok(result)
    }

    /// Dispatch a `for` on the runtime tag of its source. Scalars bind once
    /// and yield the body's value directly; collections yield a list.
    fn iterate(&mut self, var: &Var, source: Value, guard: &Expr, body: &Expr) -> EvalResult {
        let mut results = ValueList::new();
        match source {
            Value::Tuple(fields) => {
                for field in fields {
                    let item = self.bind_and_test(var, Some(field), guard, body)?;
                    self.collect(&mut results, item);
                }
            }
            Value::List(list) => {
                for member in list {
                    let item = self.bind_and_test(var, Some(member), guard, body)?;
                    self.collect(&mut results, item);
                }
            }
            Value::Range(from, to) => {
                let step = if from <= to { 1 } else { -1 };
                let mut i = from;
                loop {
                    let item = self.bind_and_test(var, Some(Value::Int(i)), guard, body)?;
                    self.collect(&mut results, item);
                    if i == to {
                        break;
                    }
                    i += step;
                }
            }
            Value::All => {
                let store = self.store;
                store.evaluate_over_all(&mut |pnode| {
                    let item = self.bind_and_test(var, Some(Value::Pnode(pnode)), guard, body)?;
                    self.collect(&mut results, item);
                    Ok(())
                })?;
            }
            scalar => return self.bind_and_test(var, Some(scalar), guard, body),
        }
        Ok(Some(Value::List(results)))
    }

    /// Bind `var`, evaluate the guard, and evaluate the body if the guard
    /// holds. A nil or false guard yields nil.
    pub(super) fn bind_and_test(
        &mut self,
        var: &Var,
        value: Option<Value>,
        guard: &Expr,
        body: &Expr,
    ) -> EvalResult {
        self.tracer.step(format_args!("{} = {}", var, Shown(&value)));
        self.scope_stack.push(var.id, value);
        let result = self.test_and_eval(guard, body);
        let popped = self.scope_stack.pop();
        debug_assert!(popped.is_ok(), "unbalanced scope stack");
        result
    }

    fn test_and_eval(&mut self, guard: &Expr, body: &Expr) -> EvalResult {
        let passed = self.eval_expr(guard)?.is_some_and(|g| g.is_true());
        if !passed {
            return Ok(None);
        }
        self.eval_expr(body)
    }

    fn collect(&mut self, list: &mut ValueList, item: Option<Value>) {
        if let Some(value) = item {
            if let Err(mismatch) = list.push(value) {
                self.report(mismatch, None);
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn eval_op(
        &mut self,
        op: OpCode,
        left: &Expr,
        right: Option<&Expr>,
        span: Option<&Span>,
    ) -> EvalResult {
        match op {
            OpCode::LogAnd => {
                if !self.eval_truth(Some(left))? {
                    return Ok(Some(Value::Int(0)));
                }
                let r = self.eval_truth(right)?;
                return Ok(Some(Value::Int(r as i64)));
            }
            OpCode::LogOr => {
                if self.eval_truth(Some(left))? {
                    return Ok(Some(Value::Int(1)));
                }
                let r = self.eval_truth(right)?;
                return Ok(Some(Value::Int(r as i64)));
            }
            OpCode::Union => {
                let l = self.eval_expr(left)?;
                let r = match right {
                    Some(right) => self.eval_expr(right)?,
                    None => None,
                };
                return match (l, r) {
                    (None, r) => Ok(r),
                    (l, None) => Ok(l),
                    (Some(l), Some(r)) => Ok(self.binary(op, l, r, span)),
                };
            }
            _ => {}
        }

        let Some(l) = self.eval_expr(left)? else {
            return Ok(None);
        };

        let Some(right) = right else {
            return Ok(match op {
                // Markers only matter inside a path.
                OpCode::Optional | OpCode::Repeat | OpCode::Extract => Some(l),
                _ => match operators::eval_unary(op, l) {
                    Ok(v) => Some(v),
                    Err(e) => self.report(e, span),
                },
            });
        };

        let Some(r) = self.eval_expr(right)? else {
            return Ok(None);
        };

        match op {
            OpCode::Func => self.apply(l, r, span),
            OpCode::Lookup => Ok(self.lookup(l, r, span)),
            OpCode::Field => Ok(self.field(l, r, span)),
            _ => Ok(self.binary(op, l, r, span)),
        }
    }

    /// Truth of an optional operand; nil counts as false.
    fn eval_truth(&mut self, expr: Option<&Expr>) -> Result<bool, ExecutionError> {
        Ok(match expr {
            Some(expr) => self.eval_expr(expr)?.is_some_and(|v| v.is_true()),
            None => false,
        })
    }

    fn binary(&mut self, op: OpCode, l: Value, r: Value, span: Option<&Span>) -> Option<Value> {
        match operators::eval_binary(op, l, r) {
            Ok(v) => Some(v),
            Err(e) => self.report(e, span),
        }
    }

    fn lookup(&mut self, index: Value, key: Value, span: Option<&Span>) -> Option<Value> {
        let Value::Index(kind) = index else {
            return self.report(RuntimeError::NotAnIndex { found: index.tag() }, span);
        };
        match self.store.lookup(kind, &key) {
            Ok(v) => Some(v),
            Err(e) => self.report(e, span),
        }
    }

    fn field(&mut self, object: Value, name: Value, span: Option<&Span>) -> Option<Value> {
        let Value::Pnode(pnode) = object else {
            return self.report(RuntimeError::NotAnObject { found: object.tag() }, span);
        };
        let Value::Str(name) = name else {
            return self.report(RuntimeError::BadFieldName { found: name.tag() }, span);
        };
        self.store.attribute(pnode, &name)
    }

    /// Apply a function value to an argument.
    pub(super) fn apply(&mut self, func: Value, arg: Value, span: Option<&Span>) -> EvalResult {
        match func {
            Value::Lambda(lambda) => self.call_lambda(&lambda, arg),
            Value::Builtin(builtin) => self.call_builtin(builtin, arg, span),
            other => Ok(self.report(RuntimeError::NotCallable { found: other.tag() }, span)),
        }
    }

    pub(super) fn call_lambda(&mut self, lambda: &Lambda, arg: Value) -> EvalResult {
        self.tracer.step(format_args!("apply <lambda {}>", lambda.id));
        self.tracer.enter();
        self.scope_stack.push(lambda.var.id, Some(arg));
        let result = self.eval_expr(&lambda.body);
        let popped = self.scope_stack.pop();
        debug_assert!(popped.is_ok(), "unbalanced scope stack");
        self.tracer.leave();
        result
    }
}

/// Displays an optional value, with `nil` for none.
pub(super) struct Shown<'a>(pub &'a Option<Value>);

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "nil"),
        }
    }
}
