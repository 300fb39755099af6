//! The tree-walking evaluator.
//!
//! [`Interp`] executes a parsed program directly against the scope tree the
//! parser built.  Dispatch is a single `match` over [`NodeKind`]; every arm
//! returns a [`Value`], and non-local control flow travels in-band as
//! [`SignalKind`] values that each layer consumes or propagates:
//!
//! - blocks and the program body stop at the first non-normal signal;
//! - loops absorb `break`, restart on `continue`, and pass `return` up;
//! - `switch` runs a fall-through state machine over its branch list;
//! - function invocation unwraps `return` into the call's result;
//! - a non-normal signal that reaches the top level, or escapes into a
//!   comma group, is a fatal execution error.
//!
//! The evaluator traces variable stores to stdout (`var x = …`,
//! `assign x = …`), matching the shell's observable output; no stable
//! format is promised.

use smallvec::SmallVec;

use crate::error::{RotorError, RotorResult};
use crate::parser::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::parser::parse::parse;
use crate::parser::scope::{ScopeId, ScopeTree};
use crate::runtime::value::{SignalKind, Value};

/// Parses and executes `source`, returning the interpreter with its final
/// scope state for inspection.
pub fn run_source(source: &str) -> RotorResult<Interp> {
    let parsed = parse(source)?;
    let mut interp = Interp::new(parsed.scopes);
    interp.run(&parsed.root)?;
    Ok(interp)
}

/// The tree-walking interpreter.
///
/// Owns the scope tree for the lifetime of execution; the syntax tree is
/// borrowed per [`run`][Interp::run] call.
#[derive(Debug)]
pub struct Interp {
    scopes: ScopeTree,
    global: ScopeId,
}

impl Interp {
    /// Creates an interpreter over the scope tree of a parsed program.
    pub fn new(scopes: ScopeTree) -> Self {
        let global = scopes.root();
        Self { scopes, global }
    }

    /// The global (program) scope.
    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    /// The scope tree, for inspecting bindings after execution.
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Executes a program: installs the built-in environment, runs the
    /// top-level statements, and dumps the surviving global bindings.
    ///
    /// Any non-normal signal reaching the top level is fatal.
    pub fn run(&mut self, program: &Node) -> RotorResult<()> {
        let NodeKind::Program { body } = &program.kind else {
            return Err(RotorError::Exec(
                "run requires a program node".to_string(),
            ));
        };
        println!("Execute a program");
        self.global = program.scope;
        self.load_builtins();

        for stmt in body {
            let v = self.eval(stmt)?;
            if abrupt(&v) {
                return Err(unexpected_signal(&v));
            }
        }

        println!("Execution finished");
        let mut dump: Vec<(String, String)> = self
            .scopes
            .bindings(self.global)
            .iter()
            .map(|(name, v)| (name.clone(), v.to_text()))
            .collect();
        dump.sort();
        for (name, text) in dump {
            println!("var: {name} == {text}");
        }
        Ok(())
    }

    /// The entire built-in environment: the `undefined` binding.
    fn load_builtins(&mut self) {
        self.scopes
            .declare(self.global, "undefined", Value::undefined());
    }

    // ── Dispatch ────────────────────────────────────────────────────────────

    fn eval(&mut self, node: &Node) -> RotorResult<Value> {
        match &node.kind {
            NodeKind::Program { body } | NodeKind::Block { body } => {
                for stmt in body {
                    let v = self.eval(stmt)?;
                    if abrupt(&v) {
                        return Ok(v);
                    }
                }
                Ok(Value::normal())
            }

            // try / throw / regex literals parse but have no behavior yet;
            // they complete quietly, as do empty statements and stray case
            // markers.
            NodeKind::Empty
            | NodeKind::Case { .. }
            | NodeKind::Try { .. }
            | NodeKind::Throw { .. }
            | NodeKind::Regex { .. } => Ok(Value::normal()),

            NodeKind::Bool(b) => Ok(Value::boolean(*b)),
            NodeKind::Num { raw } => Ok(Value::number(parse_number_literal(raw))),
            NodeKind::Str { value } => Ok(Value::string(value.clone())),
            NodeKind::Null => Ok(Value::null()),

            NodeKind::Identifier { name } | NodeKind::Keyword { name } => Ok(self
                .scopes
                .lookup(node.scope, name)
                .unwrap_or_else(Value::undefined)),

            NodeKind::Function(decl) => {
                let fv = Value::function(decl.clone());
                // A named function also binds its name where it appears.
                if let Some(name) = &decl.name {
                    self.scopes.declare(node.scope, name, fv.clone());
                }
                Ok(fv)
            }

            NodeKind::Var { decls } => {
                let mut last = Value::undefined();
                for decl in decls {
                    last = match &decl.init {
                        Some(init) => self.eval(init)?,
                        None => Value::undefined(),
                    };
                    self.scopes.declare(decl.scope, &decl.name, last.clone());
                    println!("var {} = {}", decl.name, last);
                }
                Ok(last)
            }

            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                let cond = self.eval(test)?;
                let result = if cond.to_bool() {
                    self.eval(consequent)?
                } else if let Some(alt) = alternate {
                    self.eval(alt)?
                } else {
                    return Ok(Value::normal());
                };
                if abrupt(&result) {
                    Ok(result)
                } else {
                    Ok(Value::normal())
                }
            }

            NodeKind::Group { exprs } => {
                let mut last = Value::undefined();
                for expr in exprs {
                    last = self.eval(expr)?;
                    if abrupt(&last) {
                        return Err(unexpected_signal(&last));
                    }
                }
                Ok(last)
            }

            NodeKind::Break => Ok(Value::break_signal(node.range.begin)),
            NodeKind::Continue => Ok(Value::continue_signal(node.range.begin)),

            NodeKind::Return { value } => {
                let payload = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::null(),
                };
                Ok(Value::return_signal(payload, node.range.begin))
            }

            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test)?.to_bool() {
                    self.eval(consequent)
                } else {
                    self.eval(alternate)
                }
            }

            NodeKind::Binary { op, left, right } => self.eval_binary(node, *op, left, right),
            NodeKind::Unary {
                op,
                prefix,
                argument,
            } => self.eval_unary(node, *op, *prefix, argument),

            NodeKind::Index { base, index } => {
                let key = self.eval(index)?.to_text();
                let base_v = self.eval(base)?;
                if base_v.is_nullish() {
                    return Err(RotorError::Exec(format!(
                        "Can not get attr [{key}] for {base_v} at {}",
                        node.range
                    )));
                }
                Ok(base_v.get_prop(&key))
            }

            NodeKind::Member { base, property } => {
                let key = member_key(property)?;
                let base_v = self.eval(base)?;
                if base_v.is_nullish() {
                    return Err(RotorError::Exec(format!(
                        "Can not get attr [{key}] for {base_v} at {}",
                        node.range
                    )));
                }
                Ok(base_v.get_prop(key))
            }

            NodeKind::Call { callee, args } => self.invoke(node, callee, args, false),
            NodeKind::New { call } => {
                let NodeKind::Call { callee, args } = &call.kind else {
                    return Err(RotorError::Exec(format!(
                        "Initializer is not a call at {}",
                        node.range
                    )));
                };
                self.invoke(call, callee, args, true)
            }

            NodeKind::ArrayLit { elements } => {
                let array = Value::object();
                for (i, element) in elements.iter().enumerate() {
                    let v = self.eval(element)?;
                    array.set_prop(&i.to_string(), v);
                }
                Ok(array)
            }

            NodeKind::ObjectLit { entries } => {
                let object = Value::object();
                for (key_expr, value_expr) in entries {
                    let key = self.eval(key_expr)?.to_text();
                    let v = self.eval(value_expr)?;
                    object.set_prop(&key, v);
                }
                Ok(object)
            }

            NodeKind::Switch {
                discriminant,
                branches,
            } => self.eval_switch(discriminant, branches),

            NodeKind::While { test, body } => {
                while self.eval(test)?.to_bool() {
                    let r = self.eval(body)?;
                    match r.control() {
                        Some(SignalKind::Return) => return Ok(r),
                        Some(SignalKind::Break) => break,
                        _ => {}
                    }
                }
                Ok(Value::normal())
            }

            NodeKind::DoWhile { body, test } => {
                loop {
                    let r = self.eval(body)?;
                    match r.control() {
                        Some(SignalKind::Return) => return Ok(r),
                        Some(SignalKind::Break) => break,
                        _ => {}
                    }
                    if !self.eval(test)?.to_bool() {
                        break;
                    }
                }
                Ok(Value::normal())
            }

            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.eval(init)?;
                }
                loop {
                    // An absent condition is always truthy.
                    if let Some(test) = test {
                        if !self.eval(test)?.to_bool() {
                            break;
                        }
                    }
                    let r = self.eval(body)?;
                    match r.control() {
                        Some(SignalKind::Return) => return Ok(r),
                        Some(SignalKind::Break) => break,
                        _ => {}
                    }
                    if let Some(update) = update {
                        self.eval(update)?;
                    }
                }
                Ok(Value::normal())
            }

            NodeKind::ForIn { key, target, body } => self.eval_for_in(key, target, body),

            NodeKind::With { object, body } => {
                // The object is evaluated but never joins the lookup chain.
                self.eval(object)?;
                self.eval(body)
            }
        }
    }

    // ── Switch ──────────────────────────────────────────────────────────────

    /// Fall-through state machine over the flat branch list: a matching
    /// `case` (or `default`) switches execution on, a later non-matching
    /// `case` switches it back off, and `break` exits.
    fn eval_switch(&mut self, discriminant: &Node, branches: &[Node]) -> RotorResult<Value> {
        let head = self.eval(discriminant)?;
        let mut executing = false;
        for branch in branches {
            if let NodeKind::Case { test } = &branch.kind {
                executing = match test {
                    None => true,
                    Some(test) => {
                        let v = self.eval(test)?;
                        loose_eq(&v, &head)
                    }
                };
            } else if executing {
                let r = self.eval(branch)?;
                match r.control() {
                    Some(SignalKind::Break) => break,
                    Some(SignalKind::Normal) | None => {}
                    Some(_) => return Ok(r),
                }
            }
        }
        Ok(Value::normal())
    }

    // ── for-in ──────────────────────────────────────────────────────────────

    fn eval_for_in(&mut self, key: &Node, target: &Node, body: &Node) -> RotorResult<Value> {
        // Runs the key clause once (a `var` initializer may have effects).
        self.eval(key)?;
        let name = match &key.kind {
            NodeKind::Var { decls } if decls.len() == 1 => decls[0].name.clone(),
            NodeKind::Identifier { name } => name.clone(),
            _ => {
                return Err(RotorError::Exec(format!(
                    "Unexpected token in for-loop at {}",
                    key.range
                )));
            }
        };

        let target_v = self.eval(target)?;
        if target_v.is_signal() {
            return Err(RotorError::Exec(format!(
                "Illegal for-loop at {}",
                target.range
            )));
        }

        // Strings iterate their characters as one-character strings.
        if let Some(text) = target_v.as_string() {
            for ch in text.chars() {
                self.scopes
                    .assign(key.scope, &name, Value::string(ch.to_string()));
                let r = self.eval(body)?;
                match r.control() {
                    Some(SignalKind::Return) => return Ok(r),
                    Some(SignalKind::Break) => break,
                    _ => {}
                }
            }
            return Ok(Value::normal());
        }

        // Everything else iterates its property keys, ascending, binding
        // the loop variable to the value at each key.
        for prop_key in target_v.keys() {
            self.scopes
                .assign(key.scope, &name, target_v.get_prop(&prop_key));
            let r = self.eval(body)?;
            match r.control() {
                Some(SignalKind::Return) => return Ok(r),
                Some(SignalKind::Break) => break,
                _ => {}
            }
        }
        Ok(Value::normal())
    }

    // ── Binary operators ────────────────────────────────────────────────────

    fn eval_binary(
        &mut self,
        node: &Node,
        op: BinaryOp,
        left: &Node,
        right: &Node,
    ) -> RotorResult<Value> {
        // Short-circuit forms evaluate left first and coerce both sides to
        // booleans; the result kind is always boolean.
        if op == BinaryOp::And {
            if !self.eval(left)?.to_bool() {
                return Ok(Value::boolean(false));
            }
            return Ok(Value::boolean(self.eval(right)?.to_bool()));
        }
        if op == BinaryOp::Or {
            if self.eval(left)?.to_bool() {
                return Ok(Value::boolean(true));
            }
            return Ok(Value::boolean(self.eval(right)?.to_bool()));
        }

        // Everything else evaluates the right side before the left.
        let rval = self.eval(right)?;
        if op == BinaryOp::Assign {
            return self.assign_into(left, rval);
        }
        let lval = self.eval(left)?;

        match op {
            BinaryOp::AddAssign => {
                let v = add(&lval, &rval);
                self.assign_into(left, v)
            }
            BinaryOp::SubAssign => {
                let v = numeric_op(&lval, &rval, |a, b| a - b);
                self.assign_into(left, v)
            }
            BinaryOp::MulAssign => {
                let v = numeric_op(&lval, &rval, |a, b| a * b);
                self.assign_into(left, v)
            }
            BinaryOp::DivAssign => {
                let v = numeric_op(&lval, &rval, |a, b| a / b);
                self.assign_into(left, v)
            }
            BinaryOp::RemAssign => {
                let v = remainder(&lval, &rval);
                self.assign_into(left, v)
            }
            BinaryOp::BitAndAssign => {
                let v = int_op(&lval, &rval, |a, b| a & b);
                self.assign_into(left, v)
            }
            BinaryOp::BitOrAssign => {
                let v = int_op(&lval, &rval, |a, b| a | b);
                self.assign_into(left, v)
            }
            BinaryOp::BitXorAssign => {
                let v = int_op(&lval, &rval, |a, b| a ^ b);
                self.assign_into(left, v)
            }
            // `~=` assigns the complement of the right operand; the left
            // value plays no part.
            BinaryOp::BitNotAssign => {
                let v = complement(&rval);
                self.assign_into(left, v)
            }
            BinaryOp::ShlAssign => {
                let v = int_op(&lval, &rval, |a, b| a << (b & 63));
                self.assign_into(left, v)
            }
            BinaryOp::ShrAssign => {
                let v = int_op(&lval, &rval, |a, b| a >> (b & 63));
                self.assign_into(left, v)
            }

            BinaryOp::Add => Ok(add(&lval, &rval)),
            BinaryOp::Sub => Ok(numeric_op(&lval, &rval, |a, b| a - b)),
            BinaryOp::Mul => Ok(numeric_op(&lval, &rval, |a, b| a * b)),
            BinaryOp::Div => Ok(numeric_op(&lval, &rval, |a, b| a / b)),
            BinaryOp::Rem => Ok(remainder(&lval, &rval)),
            BinaryOp::BitAnd => Ok(int_op(&lval, &rval, |a, b| a & b)),
            BinaryOp::BitOr => Ok(int_op(&lval, &rval, |a, b| a | b)),
            BinaryOp::BitXor => Ok(int_op(&lval, &rval, |a, b| a ^ b)),
            BinaryOp::Shl => Ok(int_op(&lval, &rval, |a, b| a << (b & 63))),
            BinaryOp::Shr => Ok(int_op(&lval, &rval, |a, b| a >> (b & 63))),

            BinaryOp::Lt => Ok(Value::boolean(compare(&lval, &rval, |a, b| a < b, |a, b| {
                a < b
            }))),
            BinaryOp::LtEq => Ok(Value::boolean(compare(
                &lval,
                &rval,
                |a, b| a <= b,
                |a, b| a <= b,
            ))),
            BinaryOp::Gt => Ok(Value::boolean(compare(&lval, &rval, |a, b| a > b, |a, b| {
                a > b
            }))),
            BinaryOp::GtEq => Ok(Value::boolean(compare(
                &lval,
                &rval,
                |a, b| a >= b,
                |a, b| a >= b,
            ))),
            BinaryOp::Eq => Ok(Value::boolean(loose_eq(&lval, &rval))),
            BinaryOp::NotEq => Ok(Value::boolean(!loose_eq(&lval, &rval))),
            BinaryOp::StrictEq => Ok(Value::boolean(strict_eq(&lval, &rval))),
            BinaryOp::StrictNotEq => Ok(Value::boolean(!strict_eq(&lval, &rval))),

            // Parsed but unsupported at run time.
            _ => Err(RotorError::Exec(format!(
                "Can not execute binary-expression at {}",
                node.range
            ))),
        }
    }

    // ── Unary operators ─────────────────────────────────────────────────────

    fn eval_unary(
        &mut self,
        node: &Node,
        op: UnaryOp,
        prefix: bool,
        argument: &Node,
    ) -> RotorResult<Value> {
        if prefix && op == UnaryOp::Delete {
            return match &argument.kind {
                NodeKind::Identifier { name } => {
                    self.scopes.remove(argument.scope, name);
                    Ok(Value::boolean(true))
                }
                NodeKind::Index { base, index } => {
                    let key = self.eval(index)?.to_text();
                    let base_v = self.eval(base)?;
                    base_v.del_prop(&key);
                    Ok(Value::boolean(true))
                }
                NodeKind::Member { base, property } => {
                    let key = member_key(property)?;
                    let base_v = self.eval(base)?;
                    base_v.del_prop(key);
                    Ok(Value::boolean(true))
                }
                _ => Ok(Value::boolean(false)),
            };
        }

        let v = self.eval(argument)?;

        if prefix {
            match op {
                UnaryOp::Increment => Ok(if v.add_to_number(1.0) { v } else { Value::nan() }),
                UnaryOp::Decrement => Ok(if v.add_to_number(-1.0) { v } else { Value::nan() }),
                UnaryOp::Plus => Ok(v),
                UnaryOp::Minus => Ok(v
                    .as_number()
                    .map(|n| Value::number(-n))
                    .unwrap_or_else(Value::nan)),
                UnaryOp::BitNot => Ok(complement(&v)),
                UnaryOp::Not => Ok(Value::boolean(!v.to_bool())),
                UnaryOp::Void => Ok(v),
                UnaryOp::Typeof => Ok(Value::string(v.type_of())),
                UnaryOp::Delete => Err(RotorError::Exec(format!(
                    "Can not execute unary-expression at {}",
                    node.range
                ))),
            }
        } else {
            // Postfix `++` / `--`: the pre-mutation number is the result.
            match op {
                UnaryOp::Increment | UnaryOp::Decrement => match v.as_number() {
                    Some(n) => {
                        let delta = if op == UnaryOp::Increment { 1.0 } else { -1.0 };
                        v.add_to_number(delta);
                        Ok(Value::number(n))
                    }
                    None => Ok(Value::nan()),
                },
                _ => Err(RotorError::Exec(format!(
                    "Can not execute unary-expression at {}",
                    node.range
                ))),
            }
        }
    }

    // ── Assignment targets ──────────────────────────────────────────────────

    /// Writes `value` into the place named by `left`: a binding (nearest
    /// match up the chain, else a new global), a `base[key]` slot, or a
    /// `base.name` slot.  Anything else is not a left-value.
    fn assign_into(&mut self, left: &Node, value: Value) -> RotorResult<Value> {
        match &left.kind {
            NodeKind::Identifier { name } => {
                self.scopes.assign(left.scope, name, value.clone());
                println!("assign {} = {}", name, value);
                Ok(value)
            }
            NodeKind::Index { base, index } => {
                let key = self.eval(index)?.to_text();
                let base_v = self.eval(base)?;
                if base_v.is_nullish() {
                    return Err(RotorError::Exec(format!(
                        "Can not set attr [{key}] for {base_v} at {}",
                        left.range
                    )));
                }
                base_v.set_prop(&key, value.clone());
                Ok(value)
            }
            NodeKind::Member { base, property } => {
                let key = member_key(property)?;
                let base_v = self.eval(base)?;
                if base_v.is_nullish() {
                    return Err(RotorError::Exec(format!(
                        "Can not set attr [{key}] for {base_v} at {}",
                        left.range
                    )));
                }
                base_v.set_prop(key, value.clone());
                Ok(value)
            }
            _ => Err(RotorError::Exec(format!(
                "Invalid left value in assignment at {}",
                left.range
            ))),
        }
    }

    // ── Invocation ──────────────────────────────────────────────────────────

    /// Calls a function value.  Arguments evaluate left to right; formals
    /// bind by position into the function's own parse-time scope (shared by
    /// every invocation); `arguments` and a fresh `this` object are
    /// installed alongside them.
    ///
    /// An ordinary call yields the `return` payload, or `null` when the
    /// body falls off the end.  A `new` call yields the fresh `this`
    /// instead, and a `return` merely stops the body.
    fn invoke(
        &mut self,
        call_node: &Node,
        callee: &Node,
        args: &[Node],
        construct: bool,
    ) -> RotorResult<Value> {
        let callee_v = self.eval(callee)?;
        let Some(decl) = callee_v.function_decl() else {
            return Err(RotorError::Exec(format!(
                "Only function can be invoked at {}",
                call_node.range
            )));
        };

        let mut actuals: SmallVec<[Value; 8]> = SmallVec::new();
        for arg in args {
            actuals.push(self.eval(arg)?);
        }

        let arguments = Value::object();
        let this_obj = Value::object();
        for (i, (param, v)) in decl.params.iter().zip(actuals.iter()).enumerate() {
            self.scopes.declare(decl.scope, param, v.clone());
            arguments.set_prop(&i.to_string(), v.clone());
        }
        self.scopes.declare(decl.scope, "arguments", arguments);
        self.scopes.declare(decl.scope, "this", this_obj.clone());

        for stmt in &decl.body {
            let r = self.eval(stmt)?;
            match r.control() {
                Some(SignalKind::Return) => {
                    return Ok(if construct {
                        this_obj
                    } else {
                        r.return_value().unwrap_or_else(Value::null)
                    });
                }
                Some(SignalKind::Normal) | None => {}
                Some(_) => return Err(unexpected_signal(&r)),
            }
        }
        Ok(if construct { this_obj } else { Value::null() })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Coercion helpers
// ─────────────────────────────────────────────────────────────────────────────

/// `true` for any signal other than `Normal`.
fn abrupt(v: &Value) -> bool {
    matches!(v.control(), Some(kind) if kind != SignalKind::Normal)
}

fn unexpected_signal(v: &Value) -> RotorError {
    let pos = v.signal_pos().unwrap_or_default();
    RotorError::Exec(format!("Unexpected control signal at {pos}"))
}

/// The property name of a `base.name` access.
fn member_key(property: &Node) -> RotorResult<&str> {
    match &property.kind {
        NodeKind::Identifier { name } => Ok(name),
        _ => Err(RotorError::Exec(format!(
            "Invalid member name at {}",
            property.range
        ))),
    }
}

/// `+`: float addition when both operands are proper numbers, string
/// concatenation of the text projections otherwise.  NaN wins outright.
fn add(l: &Value, r: &Value) -> Value {
    if l.is_nan() || r.is_nan() {
        return Value::nan();
    }
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => Value::number(a + b),
        _ => Value::string(format!("{}{}", l.to_text(), r.to_text())),
    }
}

/// Float arithmetic on two proper numbers; anything else is NaN.
fn numeric_op(l: &Value, r: &Value, f: impl Fn(f64, f64) -> f64) -> Value {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => Value::number(f(a, b)),
        _ => Value::nan(),
    }
}

/// Integer arithmetic: both operands coerce to `i64`; anything non-numeric
/// is NaN.  Shift callers mask their counts to 0..=63.
fn int_op(l: &Value, r: &Value, f: impl Fn(i64, i64) -> i64) -> Value {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => Value::number(f(a as i64, b as i64) as f64),
        _ => Value::nan(),
    }
}

/// `%` integer-coerces both sides; a zero divisor yields NaN.
fn remainder(l: &Value, r: &Value) -> Value {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => {
            let divisor = b as i64;
            if divisor == 0 {
                Value::nan()
            } else {
                Value::number((a as i64 % divisor) as f64)
            }
        }
        _ => Value::nan(),
    }
}

/// `~`: complement of the integer coercion; non-numbers yield NaN.
fn complement(v: &Value) -> Value {
    match v.as_number() {
        Some(n) => Value::number(!(n as i64) as f64),
        None => Value::nan(),
    }
}

/// Ordering comparisons: numeric when both sides are proper numbers,
/// lexicographic on the text projections otherwise.
fn compare(
    l: &Value,
    r: &Value,
    num: impl Fn(f64, f64) -> bool,
    text: impl Fn(&str, &str) -> bool,
) -> bool {
    match (l.as_number(), r.as_number()) {
        (Some(a), Some(b)) => num(a, b),
        _ => text(&l.to_text(), &r.to_text()),
    }
}

/// `==`: numeric equality for proper numbers, text equality otherwise.
fn loose_eq(l: &Value, r: &Value) -> bool {
    compare(l, r, |a, b| a == b, |a, b| a == b)
}

/// `===`: the kind tags must match first, then `==` applies.
fn strict_eq(l: &Value, r: &Value) -> bool {
    l.kind_matches(r) && loose_eq(l, r)
}

/// Evaluates a numeric lexeme: `0x`/`0X` hex, `0o`/`0O` octal, `0b`/`0B`
/// binary, a leading zero with octal digits legacy octal, anything else a
/// decimal float (fraction and exponent included).  Malformed text yields
/// an IEEE NaN payload.
fn parse_number_literal(raw: &str) -> f64 {
    if let Some(digits) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(digits, 16).map(|n| n as f64).unwrap_or(f64::NAN)
    } else if let Some(digits) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        i64::from_str_radix(digits, 8).map(|n| n as f64).unwrap_or(f64::NAN)
    } else if let Some(digits) = raw.strip_prefix("0b").or_else(|| raw.strip_prefix("0B")) {
        i64::from_str_radix(digits, 2).map(|n| n as f64).unwrap_or(f64::NAN)
    } else if raw.len() > 1
        && raw.starts_with('0')
        && raw.bytes().skip(1).all(|b| (b'0'..=b'7').contains(&b))
    {
        i64::from_str_radix(&raw[1..], 8).map(|n| n as f64).unwrap_or(f64::NAN)
    } else {
        raw.parse::<f64>().unwrap_or(f64::NAN)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
