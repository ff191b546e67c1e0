/*!
The tree-walking statement/expression evaluator: binary/unary operator
dispatch routing into `crate::quantity::ops` and `crate::conversion`,
short-circuit logical `&`/`|`, `if`/`during`/`redo`/`work`/`give` statement
execution, and a single owned [`Interpreter`] value constructed at startup
rather than any process-wide singleton.
*/

pub mod builtins;
pub mod env;

use crate::ast::{AssignOp, BinOp, Block, ConversionTargetExpr, Expr, Stmt, StringPart, UnaryOp};
use crate::config;
use crate::conversion::{self, ConversionTarget};
use crate::decimal::Decimal;
use crate::error::{CLError, CLResult, ErrorKind, Span};
use crate::quantity::{ops, Quantity};
use crate::unit::registry;
use crate::value::{Function, Interval, Value};
use env::Env;
use std::io::Write;
use std::rc::Rc;

/// What a statement's execution produced, for propagating `give` out of
/// nested `if`/`during`/`redo` blocks up to the enclosing function call
/// (CL has no `break`/`continue`; `give` is the only non-local exit).
enum Flow {
    Normal,
    Give(Value),
}

/// No process-wide mutable state beyond the read-only unit registry and
/// element table; this struct only exists to own the global environment
/// and give evaluation a stable entry point.
pub struct Interpreter {
    pub globals: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter { globals: Env::root() }
    }

    /// Runs a program (one parsed `doc`/script/REPL chunk). Each top-level
    /// statement's error is independent: the REPL reports it and continues
    /// with the next one; a script runner (see `crate::main`) treats any
    /// `Err` as a nonzero exit.
    pub fn run(&self, program: &Block) -> CLResult<()> {
        for stmt in program {
            self.exec_stmt(&self.globals, stmt)?;
        }
        Ok(())
    }

    fn exec_block(&self, env: &Env, block: &Block) -> CLResult<Flow> {
        let scope = env.child();
        for stmt in block {
            match self.exec_stmt(&scope, stmt)? {
                Flow::Normal => {}
                give @ Flow::Give(_) => return Ok(give),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&self, env: &Env, stmt: &Stmt) -> CLResult<Flow> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(env, expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Assign { name, op, value, span } => {
                self.exec_assign(env, name, *op, value, *span)?;
                Ok(Flow::Normal)
            }
            Stmt::If { branches, else_branch } => {
                for (cond, body) in branches {
                    if self.eval(env, cond)?.is_truthy() {
                        return self.exec_block(env, body);
                    }
                }
                match else_branch {
                    Some(body) => self.exec_block(env, body),
                    None => Ok(Flow::Normal),
                }
            }
            Stmt::During { cond, body } => {
                while self.eval(env, cond)?.is_truthy() {
                    match self.exec_block(env, body)? {
                        Flow::Normal => {}
                        give @ Flow::Give(_) => return Ok(give),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Redo { var, interval, body } => {
                let bounds = match self.eval(env, interval)? {
                    Value::Interval(iv) => iv,
                    other => return Err(CLError::at(ErrorKind::TypeError(format!("`redo` requires an interval, found a {}", other.type_name())), interval.span())),
                };
                for i in bounds.iter() {
                    let scope = env.child();
                    scope.define(var, Value::Quantity(Quantity::scalar(Decimal::exact(i.into()))));
                    match self.exec_block(&scope, body)? {
                        Flow::Normal => {}
                        give @ Flow::Give(_) => return Ok(give),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Work { name, params, body, .. } => {
                let function = Function { name: name.clone(), params: params.clone(), body: body.clone(), closure: env.clone() };
                env.define(name, Value::Function(Rc::new(function)));
                Ok(Flow::Normal)
            }
            Stmt::Give(expr, _span) => {
                let value = match expr {
                    Some(e) => self.eval(env, e)?,
                    None => Value::Quantity(Quantity::pass()),
                };
                Ok(Flow::Give(value))
            }
        }
    }

    fn exec_assign(&self, env: &Env, name: &str, op: AssignOp, value_expr: &Expr, span: Span) -> CLResult<()> {
        let rhs = self.eval(env, value_expr)?;
        let new_value = match op {
            AssignOp::Set => rhs,
            _ => {
                let current = env.get(name).ok_or_else(|| CLError::at(ErrorKind::UnknownIdentifier(name.to_string()), span))?;
                let (lhs_q, rhs_q) = (as_quantity(&current, span)?, as_quantity(&rhs, span)?);
                let result = match op {
                    AssignOp::AddSet => ops::add(lhs_q, rhs_q),
                    AssignOp::SubSet => ops::sub(lhs_q, rhs_q),
                    AssignOp::MulSet => ops::mul(lhs_q, rhs_q),
                    AssignOp::DivSet => ops::div(lhs_q, rhs_q),
                    AssignOp::Set => unreachable!(),
                }
                .map_err(|e| e.with_span(span))?;
                Value::Quantity(result)
            }
        };
        if env.get(name).is_some() {
            env.assign(name, new_value)
        } else {
            env.define(name, new_value);
            Ok(())
        }
    }

    fn eval(&self, env: &Env, expr: &Expr) -> CLResult<Value> {
        match expr {
            Expr::QuantityLiteral(q) => Ok(Value::Quantity(q.clone())),
            Expr::StringLiteral(s) => Ok(Value::Str(s.clone())),
            Expr::InterpString(parts) => self.eval_interp_string(env, parts).map(Value::Str),
            Expr::Identifier(name, span) => {
                env.get(name).ok_or_else(|| CLError::at(ErrorKind::UnknownIdentifier(name.clone()), *span))
            }
            Expr::Unary(op, operand, span) => self.eval_unary(env, *op, operand, *span),
            Expr::Binary(op, lhs, rhs, span) => self.eval_binary(env, *op, lhs, rhs, *span),
            Expr::Interval(lo, hi, span) => {
                let lo_val = self.eval(env, lo)?;
                let hi_val = self.eval(env, hi)?;
                let (a, b) = ops::interval_bounds(as_quantity(&lo_val, *span)?, as_quantity(&hi_val, *span)?).map_err(|e| e.with_span(*span))?;
                Ok(Value::Interval(Interval { lo: a, hi: b }))
            }
            Expr::Call(callee, args, span) => self.eval_call(env, callee, args, *span),
            Expr::Conversion { source, reaction, target, span } => self.eval_conversion(env, source, reaction, target, *span),
        }
    }

    fn eval_interp_string(&self, env: &Env, parts: &[StringPart]) -> CLResult<String> {
        let mut out = String::new();
        for part in parts {
            match part {
                StringPart::Literal(text) => out.push_str(text),
                StringPart::Interp(expr) => out.push_str(&self.eval(env, expr)?.to_string()),
            }
        }
        Ok(out)
    }

    fn eval_unary(&self, env: &Env, op: UnaryOp, operand: &Expr, span: Span) -> CLResult<Value> {
        let value = self.eval(env, operand)?;
        let q = as_quantity(&value, span)?;
        let result = match op {
            UnaryOp::Neg => ops::neg(q),
            UnaryOp::Pos => ops::pos(q),
            UnaryOp::Not => ops::not(q),
            UnaryOp::BitNot => ops::bitnot(q).map_err(|e| e.with_span(span))?,
        };
        Ok(Value::Quantity(result))
    }

    fn eval_binary(&self, env: &Env, op: BinOp, lhs: &Expr, rhs: &Expr, span: Span) -> CLResult<Value> {
        // `&`/`|` short-circuit and operate on truthiness, not magnitude;
        // they must not evaluate both sides eagerly.
        if op == BinOp::And {
            let l = self.eval(env, lhs)?;
            if !l.is_truthy() {
                return Ok(Value::Quantity(Quantity::fail()));
            }
            let r = self.eval(env, rhs)?;
            return Ok(Value::Quantity(Quantity::from_bool(r.is_truthy())));
        }
        if op == BinOp::Or {
            let l = self.eval(env, lhs)?;
            if l.is_truthy() {
                return Ok(Value::Quantity(Quantity::pass()));
            }
            let r = self.eval(env, rhs)?;
            return Ok(Value::Quantity(Quantity::from_bool(r.is_truthy())));
        }

        let lv = self.eval(env, lhs)?;
        let rv = self.eval(env, rhs)?;
        let l = as_quantity(&lv, span)?;
        let r = as_quantity(&rv, span)?;
        let result = match op {
            BinOp::Add => ops::add(l, r),
            BinOp::Sub => ops::sub(l, r),
            BinOp::Mul => ops::mul(l, r),
            BinOp::Div => ops::div(l, r),
            BinOp::Rem => ops::rem(l, r),
            BinOp::Pow => ops::pow(l, r),
            BinOp::Eq => ops::eq(l, r),
            BinOp::NotEq => ops::ne(l, r),
            BinOp::Lt => ops::lt(l, r),
            BinOp::Le => ops::le(l, r),
            BinOp::Gt => ops::gt(l, r),
            BinOp::Ge => ops::ge(l, r),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
        .map_err(|e| e.with_span(span))?;
        Ok(Value::Quantity(result))
    }

    fn eval_call(&self, env: &Env, callee: &Expr, args: &[Expr], span: Span) -> CLResult<Value> {
        let arg_values = args.iter().map(|a| self.eval(env, a)).collect::<CLResult<Vec<_>>>()?;

        if let Expr::Identifier(name, _) = callee {
            if let Some(Value::Function(function)) = env.get(name) {
                return self.call_function(&function, arg_values, span);
            }
            if builtins::is_builtin(name) {
                return builtins::call(name, &arg_values, span);
            }
            return Err(CLError::at(ErrorKind::UnknownIdentifier(name.clone()), span));
        }

        match self.eval(env, callee)? {
            Value::Function(function) => self.call_function(&function, arg_values, span),
            other => Err(CLError::at(ErrorKind::TypeError(format!("{} is not callable", other.type_name())), span)),
        }
    }

    fn call_function(&self, function: &Rc<Function>, args: Vec<Value>, span: Span) -> CLResult<Value> {
        if args.len() != function.params.len() {
            return Err(CLError::at(ErrorKind::ArityError { expected: function.params.len(), found: args.len() }, span));
        }
        let call_env = function.closure.child();
        for (param, arg) in function.params.iter().zip(args) {
            call_env.define(param, arg);
        }
        match self.exec_block(&call_env, &function.body)? {
            Flow::Give(value) => Ok(value),
            Flow::Normal => Ok(Value::Quantity(Quantity::pass())),
        }
    }

    fn eval_conversion(
        &self,
        env: &Env,
        source: &Expr,
        reaction_lit: &Option<crate::ast::ReactionLiteral>,
        target: &ConversionTargetExpr,
        span: Span,
    ) -> CLResult<Value> {
        let source_value = self.eval(env, source)?;
        let source_q = as_quantity(&source_value, span)?;

        if let ConversionTargetExpr::PathSink(path_expr) = target {
            let path = self.eval(env, path_expr)?.to_string();
            write_to_path(&path, &source_q.to_string()).map_err(|e| CLError::at(ErrorKind::TypeError(e), span))?;
            return Ok(Value::Quantity(source_q.clone()));
        }

        let conversion_target = match target {
            ConversionTargetExpr::Unit(name, unit_span) => {
                let unit = registry::resolve(name).ok_or_else(|| CLError::at(ErrorKind::UnknownUnit(name.clone()), *unit_span))?;
                ConversionTarget::Unit(unit)
            }
            ConversionTargetExpr::Formula(text, f_span) => {
                let formula = crate::formula::parse(text).map_err(|e| e.with_span(*f_span))?;
                ConversionTarget::Formula(formula)
            }
            ConversionTargetExpr::UnitOfFormula(unit_name, formula_text, u_span) => {
                let unit = registry::resolve(unit_name).ok_or_else(|| CLError::at(ErrorKind::UnknownUnit(unit_name.clone()), *u_span))?;
                let formula = crate::formula::parse(formula_text).map_err(|e| e.with_span(*u_span))?;
                ConversionTarget::UnitOfFormula(unit, formula)
            }
            ConversionTargetExpr::PathSink(_) => unreachable!("handled above"),
        };

        match reaction_lit {
            Some(lit) => {
                let mut reaction = crate::ast::build_reaction(lit)?;
                reaction.balance().map_err(|e| e.with_span(span))?;
                if config::show_balanced_equation() {
                    println!("{reaction}");
                }
                let result = conversion::convert(source_q, Some(&mut reaction), &conversion_target).map_err(|e| e.with_span(span))?;
                Ok(Value::Quantity(result))
            }
            None => {
                let result = conversion::convert(source_q, None, &conversion_target).map_err(|e| e.with_span(span))?;
                Ok(Value::Quantity(result))
            }
        }
    }
}

fn as_quantity(value: &Value, span: Span) -> CLResult<&Quantity> {
    match value {
        Value::Quantity(q) => Ok(q),
        other => Err(CLError::at(ErrorKind::TypeError(format!("expected a quantity, found a {}", other.type_name())), span)),
    }
}

fn write_to_path(path: &str, line: &str) -> Result<(), String> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| format!("could not open `{path}` for writing: {e}"))?;
    writeln!(file, "{line}").map_err(|e| format!("could not write to `{path}`: {e}"))
}
