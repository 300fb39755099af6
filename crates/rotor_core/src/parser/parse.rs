//! Recursive-descent parser.
//!
//! The parser consumes a [`TokenCursor`] and produces a [`ParsedProgram`]:
//! the root [`Node`] plus the [`ScopeTree`] it allocated while parsing.
//! Statements dispatch on their first token; expressions climb the fixed
//! priority table (see [`BinaryOp::priority`]).
//!
//! Two ambiguities need care:
//!
//! - **`for` headers** — after `for (` the parser may be looking at a
//!   three-clause loop or a `for … in` loop.  The init expression is parsed
//!   with `in` suppressed as an operator; the token that follows (`;` or
//!   `in`) decides the shape.
//! - **Braces** — `{` opens a block in statement position and an object
//!   literal in expression position; statement dispatch resolves this.
//!
//! Errors are never recovered: the first unexpected token aborts the parse
//! with a [`RotorError::Syntax`] naming the token and its position.

use std::rc::Rc;

use crate::error::{RotorError, RotorResult};
use crate::parser::ast::{
    BinaryOp, CatchClause, Declaration, FunctionDecl, Node, NodeKind, UnaryOp,
};
use crate::parser::scanner::{Position, Range, Scanner, TokenCursor, TokenKind};
use crate::parser::scope::{ScopeId, ScopeTree};

/// The priority just above the binary table; [`Parser::expression_at`]
/// hands off to unary/postfix parsing beyond this level.
const MAX_BINARY_PRIORITY: u8 = 11;

/// The result of a successful parse: the program root and the scope tree
/// the evaluator will execute against.
#[derive(Debug)]
pub struct ParsedProgram {
    /// The root node ([`NodeKind::Program`]).
    pub root: Node,
    /// All scopes allocated during the parse; index 0 is the global scope.
    pub scopes: ScopeTree,
}

/// Tokenizes and parses `source` into a [`ParsedProgram`].
pub fn parse(source: &str) -> RotorResult<ParsedProgram> {
    let tokens = Scanner::tokenize_all(source)?;
    let mut parser = Parser {
        cursor: TokenCursor::new(tokens),
        scopes: ScopeTree::new(),
    };
    let root = parser.program()?;
    Ok(ParsedProgram {
        root,
        scopes: parser.scopes,
    })
}

struct Parser {
    cursor: TokenCursor,
    scopes: ScopeTree,
}

impl Parser {
    // ── Token helpers ───────────────────────────────────────────────────────

    fn at(&self, lexeme: &str) -> bool {
        self.cursor.peek().lexeme == lexeme
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.cursor.peek().kind == kind
    }

    fn begin(&self) -> Position {
        self.cursor.peek().range.begin
    }

    fn bump(&mut self) -> crate::parser::scanner::Token {
        self.cursor.advance()
    }

    /// Consumes the current token, requiring its lexeme to be `s`.
    fn expect_lexeme(&mut self, s: &str) -> RotorResult<crate::parser::scanner::Token> {
        let tok = self.cursor.advance();
        if tok.lexeme != s {
            return Err(RotorError::Syntax(format!("Expect [{s}], but got {tok}")));
        }
        Ok(tok)
    }

    /// Consumes the current token, requiring its kind to be `kind`.
    fn expect_kind(&mut self, kind: TokenKind) -> RotorResult<crate::parser::scanner::Token> {
        let tok = self.cursor.advance();
        if tok.kind != kind {
            return Err(RotorError::Syntax(format!("Unexpected {tok}")));
        }
        Ok(tok)
    }

    /// Swallows an optional `;`.
    fn opt_semi(&mut self) {
        if self.at(";") {
            self.bump();
        }
    }

    /// Builds a node spanning from `begin` to the start of the next token.
    fn node_from(&self, begin: Position, scope: ScopeId, kind: NodeKind) -> Node {
        Node {
            range: Range {
                begin,
                end: self.cursor.peek().range.begin,
            },
            scope,
            kind,
        }
    }

    /// The [`BinaryOp`] of the current token if it sits at priority `pri`.
    /// With `no_in` set, `in` is not an operator (the `for`-header rule).
    fn operator_at(&self, pri: u8, no_in: bool) -> Option<BinaryOp> {
        let lexeme = &self.cursor.peek().lexeme;
        if no_in && lexeme == "in" {
            return None;
        }
        BinaryOp::from_lexeme(lexeme).filter(|op| op.priority() == pri)
    }

    // ── Program and statements ──────────────────────────────────────────────

    fn program(&mut self) -> RotorResult<Node> {
        let root_scope = self.scopes.alloc(None);
        let begin = self.begin();
        let body = self.top_statements(root_scope)?;
        let node = self.node_from(begin, root_scope, NodeKind::Program { body });
        self.expect_kind(TokenKind::Eof)?;
        Ok(node)
    }

    /// Statements until `}` or end of input; used for the program body and
    /// for function bodies, which both admit `function` declarations.
    fn top_statements(&mut self, scope: ScopeId) -> RotorResult<Vec<Node>> {
        let mut out = Vec::new();
        while !self.at_kind(TokenKind::Eof) && !self.at("}") {
            out.push(self.top_statement(scope)?);
        }
        Ok(out)
    }

    fn top_statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        if self.at("function") {
            self.function_decl(scope, true)
        } else {
            self.statement(scope)
        }
    }

    fn statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        if self.at(";") {
            return self.empty_statement(scope);
        }
        if self.at("var") {
            let node = self.var_statement(scope)?;
            self.opt_semi();
            return Ok(node);
        }
        if self.at("{") {
            let node = self.block(scope)?;
            self.opt_semi();
            return Ok(node);
        }
        if self.at("if") {
            return self.if_statement(scope);
        }
        if self.at("switch") {
            return self.switch_statement(scope);
        }
        if self.at("do") {
            let node = self.do_statement(scope)?;
            self.opt_semi();
            return Ok(node);
        }
        if self.at("while") {
            return self.while_statement(scope);
        }
        if self.at("for") {
            return self.for_statement(scope);
        }
        if self.at("with") {
            return self.with_statement(scope);
        }
        if self.at("continue") {
            let begin = self.begin();
            self.expect_lexeme("continue")?;
            let node = self.node_from(begin, scope, NodeKind::Continue);
            self.opt_semi();
            return Ok(node);
        }
        if self.at("break") {
            let begin = self.begin();
            self.expect_lexeme("break")?;
            let node = self.node_from(begin, scope, NodeKind::Break);
            self.opt_semi();
            return Ok(node);
        }
        if self.at("return") {
            let node = self.return_statement(scope)?;
            self.opt_semi();
            return Ok(node);
        }
        if self.at("try") {
            return self.try_statement(scope);
        }
        if self.at("throw") {
            let node = self.throw_statement(scope)?;
            self.opt_semi();
            return Ok(node);
        }
        let node = self.expression_at(0, false, scope)?;
        self.opt_semi();
        Ok(node)
    }

    fn empty_statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme(";")?;
        Ok(self.node_from(begin, scope, NodeKind::Empty))
    }

    fn var_statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("var")?;
        let mut decls = vec![self.declare(scope)?];
        while self.at(",") {
            self.bump();
            decls.push(self.declare(scope)?);
        }
        Ok(self.node_from(begin, scope, NodeKind::Var { decls }))
    }

    fn declare(&mut self, scope: ScopeId) -> RotorResult<Declaration> {
        let begin = self.begin();
        let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
        let init = if self.at("=") {
            self.bump();
            Some(self.expression_at(0, false, scope)?)
        } else {
            None
        };
        Ok(Declaration {
            range: Range {
                begin,
                end: self.cursor.peek().range.begin,
            },
            scope,
            name,
            init,
        })
    }

    fn block(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("{")?;
        let mut body = Vec::new();
        while !self.at("}") {
            body.push(self.statement(scope)?);
        }
        self.expect_lexeme("}")?;
        Ok(self.node_from(begin, parent, NodeKind::Block { body }))
    }

    fn if_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("if")?;
        self.expect_lexeme("(")?;
        let test = self.group_expression(scope)?;
        self.expect_lexeme(")")?;
        let consequent = self.statement(scope)?;
        let alternate = if self.at("else") {
            self.bump();
            Some(Box::new(self.statement(scope)?))
        } else {
            None
        };
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
        ))
    }

    fn switch_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("switch")?;
        self.expect_lexeme("(")?;
        let discriminant = self.group_expression(scope)?;
        self.expect_lexeme(")")?;
        self.expect_lexeme("{")?;
        let mut branches = Vec::new();
        while !self.at("}") {
            if self.at("case") {
                let case_begin = self.begin();
                self.bump();
                let test = self.group_expression(scope)?;
                self.expect_lexeme(":")?;
                branches.push(self.node_from(
                    case_begin,
                    scope,
                    NodeKind::Case {
                        test: Some(Box::new(test)),
                    },
                ));
            } else if self.at("default") {
                let case_begin = self.begin();
                self.bump();
                self.expect_lexeme(":")?;
                branches.push(self.node_from(case_begin, scope, NodeKind::Case { test: None }));
            } else {
                branches.push(self.statement(scope)?);
            }
        }
        self.expect_lexeme("}")?;
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::Switch {
                discriminant: Box::new(discriminant),
                branches,
            },
        ))
    }

    fn do_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("do")?;
        let body = self.block(parent)?;
        self.expect_lexeme("while")?;
        self.expect_lexeme("(")?;
        // The condition slot parses as a full statement, as the grammar
        // always did.
        let test = self.statement(parent)?;
        self.expect_lexeme(")")?;
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::DoWhile {
                body: Box::new(body),
                test: Box::new(test),
            },
        ))
    }

    fn while_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("while")?;
        self.expect_lexeme("(")?;
        let test = self.group_expression(scope)?;
        self.expect_lexeme(")")?;
        let body = self.statement(scope)?;
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::While {
                test: Box::new(test),
                body: Box::new(body),
            },
        ))
    }

    /// Parses a `for` header, committing to a three-clause loop or a
    /// `for … in` loop depending on what follows the init clause.
    fn for_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("for")?;
        self.expect_lexeme("(")?;

        // `None` init means a bare `;` opened the header.
        let mut init: Option<Node> = None;
        let mut for_in_key: Option<Node> = None;

        if self.at("var") {
            let decl = self.var_statement(scope)?;
            if self.at(";") {
                self.bump();
                init = Some(decl);
            } else {
                let in_tok = self.expect_lexeme("in")?;
                let single = matches!(&decl.kind, NodeKind::Var { decls } if decls.len() == 1);
                if !single {
                    return Err(RotorError::Syntax(format!(
                        "Unexpected token before {in_tok}"
                    )));
                }
                for_in_key = Some(decl);
            }
        } else if self.at(";") {
            self.bump();
        } else {
            let expr = self.for_init_group(scope)?;
            if self.at(";") {
                self.bump();
                init = Some(expr);
            } else {
                let in_tok = self.expect_lexeme("in")?;
                let NodeKind::Group { mut exprs } = expr.kind else {
                    return Err(RotorError::Syntax(format!(
                        "Unexpected token before {in_tok}"
                    )));
                };
                let only_identifier = exprs.len() == 1
                    && matches!(exprs[0].kind, NodeKind::Identifier { .. });
                if !only_identifier {
                    return Err(RotorError::Syntax(format!(
                        "Unexpected token before {in_tok}"
                    )));
                }
                for_in_key = Some(exprs.pop().expect("length checked above"));
            }
        }

        if let Some(key) = for_in_key {
            let target = self.group_expression(scope)?;
            self.expect_lexeme(")")?;
            let body = self.statement(scope)?;
            return Ok(self.node_from(
                begin,
                parent,
                NodeKind::ForIn {
                    key: Box::new(key),
                    target: Box::new(target),
                    body: Box::new(body),
                },
            ));
        }

        let test = if self.at(";") {
            None
        } else {
            Some(Box::new(self.group_expression(scope)?))
        };
        self.expect_lexeme(";")?;
        let update = if self.at(")") {
            None
        } else {
            Some(Box::new(self.group_expression(scope)?))
        };
        self.expect_lexeme(")")?;
        let body = self.statement(scope)?;
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::For {
                init: init.map(Box::new),
                test,
                update,
                body: Box::new(body),
            },
        ))
    }

    fn return_statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("return")?;
        // The expression is omitted when the statement visibly ends — or
        // when the next token starts on a later line (semicolon-free style).
        let omitted =
            self.at(";") || self.at("}") || self.cursor.peek().range.begin.line > begin.line;
        let value = if omitted {
            None
        } else {
            Some(Box::new(self.group_expression(scope)?))
        };
        Ok(self.node_from(begin, scope, NodeKind::Return { value }))
    }

    fn with_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let scope = self.scopes.alloc(Some(parent));
        self.expect_lexeme("with")?;
        self.expect_lexeme("(")?;
        let object = self.group_expression(scope)?;
        self.expect_lexeme(")")?;
        let body = self.statement(scope)?;
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::With {
                object: Box::new(object),
                body: Box::new(body),
            },
        ))
    }

    fn throw_statement(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("throw")?;
        let value = self.group_expression(scope)?;
        Ok(self.node_from(
            begin,
            scope,
            NodeKind::Throw {
                value: Box::new(value),
            },
        ))
    }

    fn try_statement(&mut self, parent: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("try")?;
        let block = self.block(parent)?;
        let mut catches = Vec::new();
        while self.at("catch") {
            self.bump();
            self.expect_lexeme("(")?;
            let scope = self.scopes.alloc(Some(parent));
            let param = self.group_expression(scope)?;
            self.expect_lexeme(")")?;
            let body = self.block(scope)?;
            catches.push(CatchClause { param, body });
        }
        let finally = if self.at("finally") {
            self.bump();
            Some(Box::new(self.block(parent)?))
        } else {
            None
        };
        Ok(self.node_from(
            begin,
            parent,
            NodeKind::Try {
                block: Box::new(block),
                catches,
                finally,
            },
        ))
    }

    fn function_decl(&mut self, parent: ScopeId, require_name: bool) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("function")?;
        let scope = self.scopes.alloc(Some(parent));
        let name = if require_name {
            Some(self.expect_kind(TokenKind::Identifier)?.lexeme)
        } else if self.at_kind(TokenKind::Identifier) {
            Some(self.bump().lexeme)
        } else {
            None
        };
        self.expect_lexeme("(")?;
        let params = self.parameter_list()?;
        self.expect_lexeme(")")?;
        self.expect_lexeme("{")?;
        let body = self.top_statements(scope)?;
        self.expect_lexeme("}")?;
        let range = Range {
            begin,
            end: self.cursor.peek().range.begin,
        };
        let decl = Rc::new(FunctionDecl {
            range,
            scope,
            name,
            params,
            body,
        });
        Ok(Node {
            range,
            scope: parent,
            kind: NodeKind::Function(decl),
        })
    }

    fn parameter_list(&mut self) -> RotorResult<Vec<String>> {
        let mut params = Vec::new();
        if self.at_kind(TokenKind::Identifier) {
            params.push(self.bump().lexeme);
            while self.at(",") {
                self.bump();
                params.push(self.expect_kind(TokenKind::Identifier)?.lexeme);
            }
        }
        Ok(params)
    }

    // ── Expressions ─────────────────────────────────────────────────────────

    /// A comma-separated expression list (condition slots, `return` values,
    /// `switch` heads, `for-in` targets).  Yields its last element when
    /// evaluated.
    fn group_expression(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let mut exprs = vec![self.expression_at(0, false, scope)?];
        while self.at(",") {
            self.bump();
            exprs.push(self.expression_at(0, false, scope)?);
        }
        Ok(self.node_from(begin, scope, NodeKind::Group { exprs }))
    }

    /// The `for`-header variant of [`group_expression`]: `in` is suppressed
    /// as an operator so the header shape can be decided afterwards.
    fn for_init_group(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let mut exprs = vec![self.expression_at(0, true, scope)?];
        while self.at(",") {
            self.bump();
            exprs.push(self.expression_at(0, true, scope)?);
        }
        Ok(self.node_from(begin, scope, NodeKind::Group { exprs }))
    }

    /// Precedence climbing.  Assignments (priority 0) associate
    /// right-to-left; the ternary nests at its own priority; every other
    /// binary level chains left-to-right with right operands taken one
    /// level tighter.
    fn expression_at(&mut self, pri: u8, no_in: bool, scope: ScopeId) -> RotorResult<Node> {
        if pri > MAX_BINARY_PRIORITY {
            return self.unary_expression(no_in, scope);
        }
        let begin = self.begin();
        let mut left = self.expression_at(pri + 1, no_in, scope)?;
        match pri {
            0 => {
                if let Some(op) = self.operator_at(0, no_in) {
                    self.bump();
                    let right = self.expression_at(0, no_in, scope)?;
                    left = self.node_from(
                        begin,
                        scope,
                        NodeKind::Binary {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                    );
                }
            }
            1 => {
                if self.at("?") {
                    self.bump();
                    let consequent = self.expression_at(1, no_in, scope)?;
                    self.expect_lexeme(":")?;
                    let alternate = self.expression_at(1, no_in, scope)?;
                    left = self.node_from(
                        begin,
                        scope,
                        NodeKind::Conditional {
                            test: Box::new(left),
                            consequent: Box::new(consequent),
                            alternate: Box::new(alternate),
                        },
                    );
                }
            }
            _ => {
                while let Some(op) = self.operator_at(pri, no_in) {
                    self.bump();
                    let right = self.expression_at(pri + 1, no_in, scope)?;
                    left = self.node_from(
                        begin,
                        scope,
                        NodeKind::Binary {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                    );
                }
            }
        }
        Ok(left)
    }

    /// Level 12+: prefix and postfix operators around a left-expression.
    fn unary_expression(&mut self, no_in: bool, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();

        if self.at("delete") || self.at("++") || self.at("--") {
            let op = self.unary_op()?;
            let argument = self.left_expression(scope)?;
            return Ok(self.node_from(
                begin,
                scope,
                NodeKind::Unary {
                    op,
                    prefix: true,
                    argument: Box::new(argument),
                },
            ));
        }

        if self.at("void")
            || self.at("typeof")
            || self.at("+")
            || self.at("-")
            || self.at("~")
            || self.at("!")
        {
            let op = self.unary_op()?;
            let argument = self.expression_at(MAX_BINARY_PRIORITY + 1, no_in, scope)?;
            return Ok(self.node_from(
                begin,
                scope,
                NodeKind::Unary {
                    op,
                    prefix: true,
                    argument: Box::new(argument),
                },
            ));
        }

        let mut expr = self.left_expression(scope)?;
        if self.at("++") || self.at("--") {
            let op = self.unary_op()?;
            expr = self.node_from(
                begin,
                scope,
                NodeKind::Unary {
                    op,
                    prefix: false,
                    argument: Box::new(expr),
                },
            );
        }
        Ok(expr)
    }

    /// Consumes the current token as a unary operator.
    fn unary_op(&mut self) -> RotorResult<UnaryOp> {
        let tok = self.bump();
        UnaryOp::from_lexeme(&tok.lexeme)
            .ok_or_else(|| RotorError::Syntax(format!("Unexpected {tok}")))
    }

    /// A `new` expression or a primary with member/index/call suffixes —
    /// the syntactic class allowed on the left of an assignment.
    fn left_expression(&mut self, scope: ScopeId) -> RotorResult<Node> {
        if self.at("new") {
            self.constructor(scope)
        } else {
            self.call_expression(scope)
        }
    }

    fn constructor(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("new")?;
        let call = self.call_expression(scope)?;
        if !matches!(call.kind, NodeKind::Call { .. }) {
            return Err(RotorError::Syntax(format!(
                "Initializer is not a function before {}",
                self.cursor.peek()
            )));
        }
        Ok(self.node_from(
            begin,
            scope,
            NodeKind::New {
                call: Box::new(call),
            },
        ))
    }

    fn call_expression(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        let mut expr = self.primary(scope)?;
        loop {
            if self.at(".") {
                self.bump();
                let property = self.identifier(scope)?;
                expr = self.node_from(
                    begin,
                    scope,
                    NodeKind::Member {
                        base: Box::new(expr),
                        property: Box::new(property),
                    },
                );
            } else if self.at("(") {
                let args = self.arg_list(scope)?;
                expr = self.node_from(
                    begin,
                    scope,
                    NodeKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                );
            } else if self.at("[") {
                self.bump();
                let index = self.expression_at(0, false, scope)?;
                self.expect_lexeme("]")?;
                expr = self.node_from(
                    begin,
                    scope,
                    NodeKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn arg_list(&mut self, scope: ScopeId) -> RotorResult<Vec<Node>> {
        self.expect_lexeme("(")?;
        let mut args = Vec::new();
        if self.at(")") {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.expression_at(0, false, scope)?);
            if self.at(",") {
                self.bump();
            }
            if self.at(")") {
                self.bump();
                return Ok(args);
            }
        }
    }

    fn identifier(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let tok = self.expect_kind(TokenKind::Identifier)?;
        Ok(Node {
            range: tok.range,
            scope,
            kind: NodeKind::Identifier { name: tok.lexeme },
        })
    }

    fn primary(&mut self, scope: ScopeId) -> RotorResult<Node> {
        if self.at("(") {
            self.bump();
            let expr = self.expression_at(0, false, scope)?;
            self.expect_lexeme(")")?;
            return Ok(expr);
        }
        if self.at_kind(TokenKind::Identifier) {
            return self.identifier(scope);
        }
        if self.at("true") || self.at("false") {
            let tok = self.bump();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Bool(tok.lexeme == "true"),
            });
        }
        if self.at("null") {
            let tok = self.bump();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Null,
            });
        }
        if self.at_kind(TokenKind::String) {
            let tok = self.bump();
            // The lexeme keeps its quotes; strip them here.
            let value = tok.lexeme[1..tok.lexeme.len() - 1].to_string();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Str { value },
            });
        }
        if self.at_kind(TokenKind::Number) {
            let tok = self.bump();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Num { raw: tok.lexeme },
            });
        }
        if self.at("this") || self.at("arguments") {
            let tok = self.bump();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Keyword { name: tok.lexeme },
            });
        }
        if self.at("[") {
            return self.array_literal(scope);
        }
        if self.at("{") {
            return self.object_literal(scope);
        }
        if self.at("function") {
            return self.function_decl(scope, false);
        }
        if self.at_kind(TokenKind::Regular) {
            let tok = self.bump();
            return Ok(Node {
                range: tok.range,
                scope,
                kind: NodeKind::Regex { raw: tok.lexeme },
            });
        }
        Err(RotorError::Syntax(format!(
            "Can not parse primary-expression, {}",
            self.cursor.peek()
        )))
    }

    fn array_literal(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("[")?;
        let mut elements = Vec::new();
        if self.at("]") {
            self.bump();
        } else {
            loop {
                elements.push(self.expression_at(0, false, scope)?);
                if self.at(",") {
                    self.bump();
                    if self.at("]") {
                        self.bump();
                        break;
                    }
                } else {
                    self.expect_lexeme("]")?;
                    break;
                }
            }
        }
        Ok(self.node_from(begin, scope, NodeKind::ArrayLit { elements }))
    }

    fn object_literal(&mut self, scope: ScopeId) -> RotorResult<Node> {
        let begin = self.begin();
        self.expect_lexeme("{")?;
        let mut entries = Vec::new();
        if self.at("}") {
            self.bump();
        } else {
            loop {
                let key = self.primary(scope)?;
                self.expect_lexeme(":")?;
                let value = self.expression_at(0, false, scope)?;
                entries.push((key, value));
                if self.at("}") {
                    self.bump();
                    break;
                }
                self.expect_lexeme(",")?;
                if self.at("}") {
                    self.bump();
                    break;
                }
            }
        }
        Ok(self.node_from(begin, scope, NodeKind::ObjectLit { entries }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> ParsedProgram {
        parse(src).unwrap_or_else(|e| panic!("parse of {src:?} failed: {e}"))
    }

    fn body(prog: &ParsedProgram) -> &Vec<Node> {
        match &prog.root.kind {
            NodeKind::Program { body } => body,
            other => panic!("root is {other:?}"),
        }
    }

    /// Collects every node reachable from `node`, function bodies included.
    fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
        out.push(node);
        for child in node.children() {
            collect(child, out);
        }
    }

    // ── Statements ─────────────────────────────────────────────────────────

    #[test]
    fn test_statement_dispatch() {
        let prog = parse_ok(
            "; var a = 1; { a; } if (a) a; else a; switch (a) { case 1: break; default: a; } \
             do { a; } while (a); while (a) a; with (a) a; try { a; } catch (e) { a; } \
             finally { a; } throw a; a + 1;",
        );
        let kinds: Vec<&NodeKind> = body(&prog).iter().map(|n| &n.kind).collect();
        assert!(matches!(kinds[0], NodeKind::Empty));
        assert!(matches!(kinds[1], NodeKind::Var { .. }));
        assert!(matches!(kinds[2], NodeKind::Block { .. }));
        assert!(matches!(kinds[3], NodeKind::If { .. }));
        assert!(matches!(kinds[4], NodeKind::Switch { .. }));
        assert!(matches!(kinds[5], NodeKind::DoWhile { .. }));
        assert!(matches!(kinds[6], NodeKind::While { .. }));
        assert!(matches!(kinds[7], NodeKind::With { .. }));
        assert!(matches!(kinds[8], NodeKind::Try { .. }));
        assert!(matches!(kinds[9], NodeKind::Throw { .. }));
        assert!(matches!(kinds[10], NodeKind::Binary { .. }));
    }

    #[test]
    fn test_var_declarations() {
        let prog = parse_ok("var a, b = 2, c;");
        let NodeKind::Var { decls } = &body(&prog)[0].kind else {
            panic!()
        };
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].name, "a");
        assert!(decls[0].init.is_none());
        assert!(decls[1].init.is_some());
    }

    #[test]
    fn test_switch_branch_list_is_flat() {
        let prog = parse_ok("switch (x) { case 1: a; b; case 2: default: c; }");
        let NodeKind::Switch { branches, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        // case 1, a, b, case 2, default, c
        assert_eq!(branches.len(), 6);
        assert!(matches!(&branches[0].kind, NodeKind::Case { test: Some(_) }));
        assert!(matches!(&branches[4].kind, NodeKind::Case { test: None }));
    }

    #[test]
    fn test_try_catch_finally() {
        let prog = parse_ok("try { a; } catch (e) { b; } catch (f) { c; } finally { d; }");
        let NodeKind::Try {
            catches, finally, ..
        } = &body(&prog)[0].kind
        else {
            panic!()
        };
        assert_eq!(catches.len(), 2);
        assert!(finally.is_some());
    }

    // ── Expressions ────────────────────────────────────────────────────────

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let prog = parse_ok("1 + 2 * 3;");
        let NodeKind::Binary { op, right, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            &right.kind,
            NodeKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_same_priority_chains_left() {
        let prog = parse_ok("7 - 2 - 1;");
        let NodeKind::Binary { op, left, right } = &body(&prog)[0].kind else {
            panic!()
        };
        assert_eq!(*op, BinaryOp::Sub);
        assert!(matches!(
            &left.kind,
            NodeKind::Binary {
                op: BinaryOp::Sub,
                ..
            }
        ));
        assert!(matches!(&right.kind, NodeKind::Num { .. }));
    }

    #[test]
    fn test_assignment_chains_right() {
        let prog = parse_ok("a = b = 7;");
        let NodeKind::Binary { op, left, right } = &body(&prog)[0].kind else {
            panic!()
        };
        assert_eq!(*op, BinaryOp::Assign);
        assert!(matches!(&left.kind, NodeKind::Identifier { .. }));
        assert!(matches!(
            &right.kind,
            NodeKind::Binary {
                op: BinaryOp::Assign,
                ..
            }
        ));
    }

    #[test]
    fn test_ternary_nests_right() {
        let prog = parse_ok("a ? 1 : b ? 2 : 3;");
        let NodeKind::Conditional { alternate, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(&alternate.kind, NodeKind::Conditional { .. }));
    }

    #[test]
    fn test_prefix_and_postfix_unary() {
        let prog = parse_ok("++i; i--; typeof -x; delete o.k; !a;");
        let stmts = body(&prog);
        assert!(matches!(
            &stmts[0].kind,
            NodeKind::Unary {
                op: UnaryOp::Increment,
                prefix: true,
                ..
            }
        ));
        assert!(matches!(
            &stmts[1].kind,
            NodeKind::Unary {
                op: UnaryOp::Decrement,
                prefix: false,
                ..
            }
        ));
        let NodeKind::Unary {
            op: UnaryOp::Typeof,
            argument,
            ..
        } = &stmts[2].kind
        else {
            panic!()
        };
        assert!(matches!(
            &argument.kind,
            NodeKind::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));
        assert!(matches!(
            &stmts[3].kind,
            NodeKind::Unary {
                op: UnaryOp::Delete,
                ..
            }
        ));
    }

    #[test]
    fn test_member_index_call_suffixes() {
        let prog = parse_ok("a.b[0](1).c;");
        let NodeKind::Member { base, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        let NodeKind::Call { callee, args } = &base.kind else {
            panic!()
        };
        assert_eq!(args.len(), 1);
        assert!(matches!(&callee.kind, NodeKind::Index { .. }));
    }

    #[test]
    fn test_array_and_object_literals() {
        let prog = parse_ok("var a = [1, 2,]; var o = {\"x\": 1, 2: [3]};");
        let NodeKind::Var { decls } = &body(&prog)[0].kind else {
            panic!()
        };
        let NodeKind::ArrayLit { elements } = &decls[0].init.as_ref().unwrap().kind else {
            panic!()
        };
        assert_eq!(elements.len(), 2);
        let NodeKind::Var { decls } = &body(&prog)[1].kind else {
            panic!()
        };
        let NodeKind::ObjectLit { entries } = &decls[0].init.as_ref().unwrap().kind else {
            panic!()
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_function_expression_and_declaration() {
        let prog = parse_ok("function add(a, b) { return a + b; } var f = function () {};");
        let NodeKind::Function(decl) = &body(&prog)[0].kind else {
            panic!()
        };
        assert_eq!(decl.name.as_deref(), Some("add"));
        assert_eq!(decl.params, vec!["a", "b"]);
        assert_eq!(decl.body.len(), 1);
    }

    #[test]
    fn test_new_wraps_a_call() {
        let prog = parse_ok("new C(1);");
        let NodeKind::New { call } = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(&call.kind, NodeKind::Call { .. }));
        assert!(parse("new C;").is_err());
        assert!(parse("new 5;").is_err());
    }

    #[test]
    fn test_regex_primary() {
        let prog = parse_ok("var re = /ab+c/gi;");
        let NodeKind::Var { decls } = &body(&prog)[0].kind else {
            panic!()
        };
        let NodeKind::Regex { raw } = &decls[0].init.as_ref().unwrap().kind else {
            panic!()
        };
        assert_eq!(raw, "/ab+c/gi");
    }

    // ── For headers ────────────────────────────────────────────────────────

    #[test]
    fn test_for_three_clause_variants() {
        for src in [
            "for (var i = 0; i < 3; i++) ;",
            "for (i = 0; i < 3; i++) ;",
            "for (;;) ;",
            "for (var i = 0;;) ;",
        ] {
            let prog = parse_ok(src);
            assert!(
                matches!(&body(&prog)[0].kind, NodeKind::For { .. }),
                "{src}"
            );
        }
        let prog = parse_ok("for (;;) ;");
        let NodeKind::For {
            init, test, update, ..
        } = &body(&prog)[0].kind
        else {
            panic!()
        };
        assert!(init.is_none() && test.is_none() && update.is_none());
    }

    #[test]
    fn test_for_in_variants() {
        let prog = parse_ok("for (var k in o) ;");
        let NodeKind::ForIn { key, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(&key.kind, NodeKind::Var { .. }));

        let prog = parse_ok("for (k in o) ;");
        let NodeKind::ForIn { key, .. } = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(&key.kind, NodeKind::Identifier { .. }));
    }

    #[test]
    fn test_for_header_errors() {
        assert!(parse("for (var a, b in o) ;").is_err());
        assert!(parse("for (1 + 2 in o) ;").is_err());
    }

    #[test]
    fn test_in_is_an_operator_outside_for_headers() {
        let prog = parse_ok("a in b;");
        assert!(matches!(
            &body(&prog)[0].kind,
            NodeKind::Binary {
                op: BinaryOp::In,
                ..
            }
        ));
    }

    // ── Return line rule ───────────────────────────────────────────────────

    #[test]
    fn test_return_value_omitted_on_next_line() {
        let prog = parse_ok("function f() { return\n1; }");
        let NodeKind::Function(decl) = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(&decl.body[0].kind, NodeKind::Return { value: None }));

        let prog = parse_ok("function f() { return 1; }");
        let NodeKind::Function(decl) = &body(&prog)[0].kind else {
            panic!()
        };
        assert!(matches!(
            &decl.body[0].kind,
            NodeKind::Return { value: Some(_) }
        ));
    }

    // ── Invariants ─────────────────────────────────────────────────────────

    #[test]
    fn test_every_node_has_ordered_range_and_rooted_scope() {
        let prog = parse_ok(
            "var a = 1; function f(x) { if (x) { return [x, {\"k\": x ? 1 : 2}]; } \
             for (var i = 0; i < x; i++) { a += i; } return null; } f(2);",
        );
        let mut nodes = Vec::new();
        collect(&prog.root, &mut nodes);
        assert!(nodes.len() > 20);
        for node in nodes {
            assert!(
                node.range.begin <= node.range.end,
                "range out of order: {:?}",
                node.range
            );
            let mut cur = node.scope;
            while let Some(parent) = prog.scopes.parent(cur) {
                cur = parent;
            }
            assert_eq!(cur, prog.scopes.root());
        }
    }

    #[test]
    fn test_scope_creation_sites() {
        // program + function + if + while + for + with + block + catch + switch
        let prog = parse_ok(
            "function f() {} if (1) ; while (0) ; for (;;) ; with (1) ; { } \
             try { } catch (e) { } switch (1) { }",
        );
        // Each `{ }` block also allocates its own scope under the statement
        // scope; the exact count pins the allocation sites.
        // program, f, if, while, for, with, bare block, try block, catch,
        // catch block, switch = 11
        assert_eq!(prog.scopes.len(), 11);
    }

    #[test]
    fn test_parse_errors_name_the_offending_token() {
        let err = parse("var 1;").unwrap_err();
        assert!(err.to_string().contains("Unexpected"), "{err}");
        let err = parse("if (a ;").unwrap_err();
        assert!(err.to_string().contains("Expect"), "{err}");
        let err = parse("+;").unwrap_err();
        assert!(err.to_string().contains("primary-expression"), "{err}");
    }
}
