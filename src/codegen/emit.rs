use crate::language::ast::*;
use crate::language::errors::{SemanticError, SemanticResult};
use crate::language::span::Span;

use super::frames::{ExprTy, Invocation};
use super::{indent, Generator, Snippet, Strategy};

impl Generator {
    pub(super) fn emit_program(&mut self, program: &Program) -> SemanticResult<()> {
        let mut body = String::new();
        for stmt in &program.statements {
            body.push_str(&self.emit_stmt(stmt, false)?);
        }
        if let Some(ret) = &program.ret {
            let snippet = self.emit_expr(ret)?;
            let ty = self.return_ty(snippet.ty, ret.span())?;
            self.arena.frame_mut(self.current).returns = Some(ty);
            body.push_str(&format!("return {};\n", snippet.text));
        }
        self.arena.frame_mut(self.current).body.push_str(&body);
        Ok(())
    }

    /// One rule per statement kind. `bare` suppresses the trailing
    /// terminator so for-loop init/step clauses can be embedded by the loop
    /// emitter; only assignments honor it.
    fn emit_stmt(&mut self, stmt: &Stmt, bare: bool) -> SemanticResult<String> {
        match stmt {
            Stmt::Write { expr, .. } => {
                let snippet = self.emit_expr(expr)?;
                Ok(self.strategy.write_stmt(snippet.ty, &snippet.text))
            }
            Stmt::Assign(assign) => self.emit_assign(assign, bare),
            Stmt::If {
                cond,
                then_block,
                else_block,
                ..
            } => self.emit_if(cond, then_block, else_block.as_ref()),
            Stmt::For {
                init,
                cond,
                step,
                body,
                ..
            } => self.emit_for(init, cond, step, body),
            Stmt::Block(block) => self.emit_block(block),
            Stmt::FnDef(def) => {
                self.emit_fn_def(def)?;
                Ok(String::new())
            }
            Stmt::Call { name, args, span } => {
                let invocation = self.resolve_invocation(name, args, *span)?;
                Ok(format!("{};\n", invocation.text))
            }
        }
    }

    /// Blocks are transparent: statements emit inline into the enclosing
    /// frame, with no scope of their own.
    fn emit_block(&mut self, block: &Block) -> SemanticResult<String> {
        let mut out = String::new();
        for stmt in &block.statements {
            out.push_str(&self.emit_stmt(stmt, false)?);
        }
        Ok(out)
    }

    fn emit_if(
        &mut self,
        cond: &Expr,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> SemanticResult<String> {
        let cond_snippet = self.emit_expr(cond)?;
        self.check_condition(&cond_snippet, cond.span())?;
        let cond_text = self.strategy.condition(&cond_snippet.text);
        let then_text = self.emit_block(then_block)?;
        let mut out = format!("if ({}) {{\n{}}}", cond_text, indent(&then_text));
        if let Some(else_block) = else_block {
            let else_text = self.emit_block(else_block)?;
            out.push_str(&format!(" else {{\n{}}}", indent(&else_text)));
        }
        out.push('\n');
        Ok(out)
    }

    /// The host language has no three-clause loop header; the clauses wrap
    /// a `while` inside one braced statement. Init and step are emitted
    /// bare and the template places their terminators.
    fn emit_for(
        &mut self,
        init: &Assign,
        cond: &Expr,
        step: &Assign,
        body: &Block,
    ) -> SemanticResult<String> {
        let init_text = self.emit_assign(init, true)?;
        let cond_snippet = self.emit_expr(cond)?;
        self.check_condition(&cond_snippet, cond.span())?;
        let cond_text = self.strategy.condition(&cond_snippet.text);
        let step_text = self.emit_assign(step, true)?;
        let body_text = self.emit_block(body)?;
        let loop_text = format!(
            "{};\nwhile ({}) {{\n{}}}\n",
            init_text,
            cond_text,
            indent(&format!("{}{};\n", body_text, step_text))
        );
        Ok(format!("{{\n{}}}\n", indent(&loop_text)))
    }

    /// Evaluate the source, then resolve the target; a missing target
    /// creates a Variable slot in the current frame, typed by this first
    /// assignment.
    fn emit_assign(&mut self, assign: &Assign, bare: bool) -> SemanticResult<String> {
        let source = self.emit_expr(&assign.value)?;
        let target_text = match self.arena.find_reference(self.current, &assign.target) {
            Some(target) => {
                if self.strategy == Strategy::Static
                    && target.ty.is_known()
                    && source.ty.is_known()
                    && target.ty != source.ty
                {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "cannot assign {} to `{}` of type {}",
                            source.ty.display_name(),
                            assign.target,
                            target.ty.display_name()
                        ),
                        span: assign.span,
                    });
                }
                target.text
            }
            None => {
                let ty = match self.strategy {
                    Strategy::Static => {
                        if !source.ty.is_known() {
                            return Err(SemanticError::TypeMismatch {
                                message: format!(
                                    "cannot infer the type of new variable `{}`",
                                    assign.target
                                ),
                                span: assign.span,
                            });
                        }
                        source.ty
                    }
                    Strategy::Dynamic => ExprTy::Dynamic,
                };
                self.arena
                    .define_variable(self.current, &assign.target, ty, assign.span)?;
                assign.target.clone()
            }
        };
        let terminator = if bare { "" } else { ";\n" };
        Ok(format!("{} = {}{}", target_text, source.text, terminator))
    }

    /// Open a frame, register parameters, emit body and tail return, close
    /// the frame. The rendered text is spliced into the parent at render
    /// time, nested definitions first.
    fn emit_fn_def(&mut self, def: &FnDef) -> SemanticResult<()> {
        let parent = self.current;
        let id = self.arena.push_frame(&def.name, Some(parent), def.span)?;
        self.current = id;
        for param in &def.params {
            self.arena
                .define_parameter(id, &param.name, self.strategy.param_ty(param.ty), param.span)?;
        }
        let mut body = String::new();
        for stmt in &def.body.statements {
            body.push_str(&self.emit_stmt(stmt, false)?);
        }
        if let Some(ret) = &def.ret {
            let snippet = self.emit_expr(ret)?;
            let ty = self.return_ty(snippet.ty, ret.span())?;
            self.arena.frame_mut(id).returns = Some(ty);
            body.push_str(&format!("return {};\n", snippet.text));
        }
        self.arena.frame_mut(id).body.push_str(&body);
        self.current = parent;
        Ok(())
    }

    pub(super) fn emit_expr(&mut self, expr: &Expr) -> SemanticResult<Snippet> {
        match expr {
            Expr::Integer { value, .. } => Ok(self.literal(self.strategy.integer_literal(*value))),
            Expr::Rational { value, .. } => {
                Ok(self.literal(self.strategy.rational_literal(*value)))
            }
            Expr::True { .. } => Ok(self.literal(self.strategy.boolean_literal(true))),
            Expr::False { .. } => Ok(self.literal(self.strategy.boolean_literal(false))),
            Expr::Deref { name, span } => {
                let resolved = self.arena.find_reference(self.current, name).ok_or_else(|| {
                    SemanticError::UnresolvedReference {
                        name: name.clone(),
                        span: *span,
                    }
                })?;
                Ok(Snippet {
                    ty: resolved.ty,
                    text: resolved.text,
                })
            }
            Expr::Invoke { name, args, span } => {
                let invocation = self.resolve_invocation(name, args, *span)?;
                let ty = match self.strategy {
                    Strategy::Static => invocation.returns.unwrap_or(ExprTy::Unknown),
                    Strategy::Dynamic => ExprTy::Dynamic,
                };
                Ok(Snippet {
                    ty,
                    text: invocation.text,
                })
            }
            Expr::Binary { op, lhs, rhs, span } => {
                let lhs = self.emit_expr(lhs)?;
                let rhs = self.emit_expr(rhs)?;
                let ty = self.binary_ty(*op, &lhs, &rhs, *span)?;
                Ok(Snippet {
                    ty,
                    text: self.strategy.binary(*op, &lhs.text, &rhs.text),
                })
            }
            Expr::Unary { op, operand, span } => {
                let operand = self.emit_expr(operand)?;
                let ty = self.unary_ty(*op, &operand, *span)?;
                Ok(Snippet {
                    ty,
                    text: self.strategy.unary(*op, &operand.text),
                })
            }
        }
    }

    fn literal(&self, (ty, text): (ExprTy, String)) -> Snippet {
        Snippet { ty, text }
    }

    fn resolve_invocation(
        &mut self,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> SemanticResult<Invocation> {
        let mut arg_texts = Vec::with_capacity(args.len());
        for arg in args {
            arg_texts.push(self.emit_expr(arg)?.text);
        }
        self.arena
            .find_invocation(self.current, name, &arg_texts)
            .ok_or_else(|| SemanticError::UnresolvedCall {
                name: name.to_string(),
                span,
            })
    }

    /// Operator typing under the static strategy: the result takes the left
    /// operand's type; mismatched known operand types are rejected here
    /// rather than inherited silently. The dynamic strategy defers all
    /// typing to run time.
    fn binary_ty(&self, op: BinOp, lhs: &Snippet, rhs: &Snippet, span: Span) -> SemanticResult<ExprTy> {
        if self.strategy == Strategy::Dynamic {
            return Ok(ExprTy::Dynamic);
        }
        let both_known = lhs.ty.is_known() && rhs.ty.is_known();
        match op {
            BinOp::Add | BinOp::Subtract | BinOp::Times | BinOp::Divide => {
                if both_known {
                    if lhs.ty != rhs.ty {
                        return Err(self.operand_mismatch(op, lhs, rhs, span));
                    }
                    if !lhs.ty.is_numeric() {
                        return Err(SemanticError::TypeMismatch {
                            message: format!(
                                "arithmetic requires numeric operands, got {}",
                                lhs.ty.display_name()
                            ),
                            span,
                        });
                    }
                }
                Ok(lhs.ty)
            }
            BinOp::Eq | BinOp::Neq | BinOp::Gt | BinOp::Gte | BinOp::Lt | BinOp::Lte => {
                if both_known && lhs.ty != rhs.ty {
                    return Err(self.operand_mismatch(op, lhs, rhs, span));
                }
                Ok(ExprTy::Boolean)
            }
            BinOp::And | BinOp::Or => {
                for side in [lhs, rhs] {
                    if side.ty.is_known() && side.ty != ExprTy::Boolean {
                        return Err(SemanticError::TypeMismatch {
                            message: format!(
                                "logical operator requires boolean operands, got {}",
                                side.ty.display_name()
                            ),
                            span,
                        });
                    }
                }
                Ok(ExprTy::Boolean)
            }
        }
    }

    fn unary_ty(&self, op: UnOp, operand: &Snippet, span: Span) -> SemanticResult<ExprTy> {
        if self.strategy == Strategy::Dynamic {
            return Ok(ExprTy::Dynamic);
        }
        match op {
            UnOp::Not => {
                if operand.ty.is_known() && operand.ty != ExprTy::Boolean {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "logical not requires a boolean operand, got {}",
                            operand.ty.display_name()
                        ),
                        span,
                    });
                }
                Ok(ExprTy::Boolean)
            }
            UnOp::Plus | UnOp::Minus => {
                if operand.ty.is_known() && !operand.ty.is_numeric() {
                    return Err(SemanticError::TypeMismatch {
                        message: format!(
                            "unary sign requires a numeric operand, got {}",
                            operand.ty.display_name()
                        ),
                        span,
                    });
                }
                Ok(operand.ty)
            }
        }
    }

    fn operand_mismatch(&self, op: BinOp, lhs: &Snippet, rhs: &Snippet, span: Span) -> SemanticError {
        SemanticError::TypeMismatch {
            message: format!(
                "operator {:?} on mismatched types {} and {}",
                op,
                lhs.ty.display_name(),
                rhs.ty.display_name()
            ),
            span,
        }
    }

    fn check_condition(&self, cond: &Snippet, span: Span) -> SemanticResult<()> {
        if self.strategy == Strategy::Static
            && cond.ty.is_known()
            && cond.ty != ExprTy::Boolean
        {
            return Err(SemanticError::TypeMismatch {
                message: format!(
                    "condition must be boolean, got {}",
                    cond.ty.display_name()
                ),
                span,
            });
        }
        Ok(())
    }

    fn return_ty(&self, ty: ExprTy, span: Span) -> SemanticResult<ExprTy> {
        match self.strategy {
            Strategy::Static => {
                if !ty.is_known() {
                    return Err(SemanticError::TypeMismatch {
                        message: "cannot infer the return type".to_string(),
                        span,
                    });
                }
                Ok(ty)
            }
            Strategy::Dynamic => Ok(ExprTy::Dynamic),
        }
    }
}
