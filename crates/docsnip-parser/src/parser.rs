// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent for statements, Pratt
//! parsing for expressions.

use std::rc::Rc;

use docsnip_ast::decl::{FnDecl, Param};
use docsnip_ast::expr::{Arg, BinOp, Expr, ExprKind, UnaryOp};
use docsnip_ast::stmt::{ExceptHandler, Stmt, StmtKind};
use docsnip_ast::token::{Token, TokenKind};
use docsnip_ast::Span;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Binding power of prefix `-` / `+`.
const UNARY_BP: u8 = 15;
/// Binding power of prefix `not`.
const NOT_BP: u8 = 5;
/// Minimum binding power for `for` targets, so `in` is not swallowed.
const TARGET_BP: u8 = 9;

/// The parser for docsnip source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    /// Parse a whole program, collecting multiple errors.
    pub fn parse(&mut self) -> ParseResult {
        let mut stmts = Vec::new();
        self.skip_newlines();

        while !self.at_end() {
            // Leftover block ends after an error was recovered from.
            if self.check(&TokenKind::Dedent) {
                self.advance();
                continue;
            }
            match self.parse_stmt() {
                Ok(mut parsed) => stmts.append(&mut parsed),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                }
            }
            self.skip_newlines();
        }

        ParseResult {
            stmts,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip past the end of the current logical line.
    fn synchronize(&mut self) {
        while !self.at_end() {
            if self.match_token(&TokenKind::Newline) {
                return;
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    fn start(&self) -> usize {
        self.current().span.start
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Semi | TokenKind::Eof
        )
    }

    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        if self.match_token(&TokenKind::Newline) || self.at_end() {
            Ok(())
        } else {
            Err(ParseError::expected(
                "end of line",
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(
                "a name",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    /// Dotted module path: `a` or `a.b.c`.
    fn expect_dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident()?;
        while self.match_token(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn is_expr_start(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Bool(_)
                | TokenKind::None
                | TokenKind::Ident(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Not
        )
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse one statement. Simple statements joined by `;` come back together.
    fn parse_stmt(&mut self) -> Result<Vec<Stmt>, ParseError> {
        match self.current_kind() {
            TokenKind::If => Ok(vec![self.parse_if()?]),
            TokenKind::While => Ok(vec![self.parse_while()?]),
            TokenKind::For => Ok(vec![self.parse_for()?]),
            TokenKind::Def => Ok(vec![self.parse_def()?]),
            TokenKind::Try => Ok(vec![self.parse_try()?]),
            TokenKind::Indent => Err(ParseError::custom(
                "Unexpected indent",
                self.current().span,
            )
            .with_hint("only lines inside a block (after ':') are indented")),
            _ => self.parse_simple_line(),
        }
    }

    /// One line of `;`-separated simple statements.
    fn parse_simple_line(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        loop {
            stmts.push(self.parse_simple_stmt()?);
            if !self.match_token(&TokenKind::Semi) || self.at_line_end() {
                break;
            }
        }
        self.expect_line_end()?;
        Ok(stmts)
    }

    /// Statement body after ':' - an indented block or an inline line.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::Colon)?;
        if !self.match_token(&TokenKind::Newline) {
            return self.parse_simple_line();
        }

        self.expect(&TokenKind::Indent)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.at_end() {
            body.append(&mut self.parse_stmt()?);
            self.skip_newlines();
        }
        self.match_token(&TokenKind::Dedent);
        Ok(body)
    }

    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();

        let kind = match self.current_kind() {
            TokenKind::Pass => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Return => {
                self.advance();
                if self.at_line_end() {
                    StmtKind::Return(None)
                } else {
                    StmtKind::Return(Some(self.parse_expr_list()?))
                }
            }
            TokenKind::Raise => {
                self.advance();
                if self.at_line_end() {
                    StmtKind::Raise(None)
                } else {
                    StmtKind::Raise(Some(self.parse_expr()?))
                }
            }
            TokenKind::Assert => {
                self.advance();
                let cond = self.parse_expr()?;
                let msg = if self.match_token(&TokenKind::Comma) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                StmtKind::Assert { cond, msg }
            }
            TokenKind::Del => {
                self.advance();
                let mut targets = vec![self.parse_expr()?];
                while self.match_token(&TokenKind::Comma) {
                    targets.push(self.parse_expr()?);
                }
                for target in &targets {
                    validate_target(target)?;
                }
                StmtKind::Del(targets)
            }
            TokenKind::Import => {
                self.advance();
                let module = self.expect_dotted_name()?;
                let alias = if self.match_token(&TokenKind::As) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                StmtKind::Import { module, alias }
            }
            TokenKind::From => {
                self.advance();
                let module = self.expect_dotted_name()?;
                self.expect(&TokenKind::Import)?;
                let parenthesized = self.match_token(&TokenKind::LParen);
                let mut names = Vec::new();
                loop {
                    let name = self.expect_ident()?;
                    let alias = if self.match_token(&TokenKind::As) {
                        Some(self.expect_ident()?)
                    } else {
                        None
                    };
                    names.push((name, alias));
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                    if parenthesized && self.check(&TokenKind::RParen) {
                        break;
                    }
                }
                if parenthesized {
                    self.expect(&TokenKind::RParen)?;
                }
                StmtKind::FromImport { module, names }
            }
            _ => return self.parse_expr_or_assign(),
        };

        Ok(Stmt { kind, span: Span::new(start, self.prev_end()) })
    }

    fn parse_expr_or_assign(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        let first = self.parse_expr_list()?;

        if self.check(&TokenKind::Eq) {
            let mut targets = Vec::new();
            let mut value = first;
            while self.match_token(&TokenKind::Eq) {
                validate_target(&value)?;
                targets.push(value);
                value = self.parse_expr_list()?;
            }
            return Ok(Stmt {
                kind: StmtKind::Assign { targets, value },
                span: Span::new(start, self.prev_end()),
            });
        }

        if let Some(op) = self.aug_assign_op() {
            if matches!(first.kind, ExprKind::Tuple(_) | ExprKind::List(_)) {
                return Err(ParseError::custom(
                    "Illegal target for augmented assignment",
                    first.span,
                ));
            }
            validate_target(&first)?;
            self.advance();
            let value = self.parse_expr_list()?;
            return Ok(Stmt {
                kind: StmtKind::AugAssign { target: first, op, value },
                span: Span::new(start, self.prev_end()),
            });
        }

        Ok(Stmt { kind: StmtKind::Expr(first), span: Span::new(start, self.prev_end()) })
    }

    fn aug_assign_op(&self) -> Option<BinOp> {
        match self.current_kind() {
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::SlashSlashEq => Some(BinOp::FloorDiv),
            TokenKind::PercentEq => Some(BinOp::Mod),
            _ => None,
        }
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let mut branches = vec![(cond, body)];
        let mut else_body = None;

        loop {
            if self.match_token(&TokenKind::Elif) {
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                branches.push((cond, body));
            } else if self.match_token(&TokenKind::Else) {
                else_body = Some(self.parse_block()?);
                break;
            } else {
                break;
            }
        }

        Ok(Stmt {
            kind: StmtKind::If { branches, else_body },
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::While)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt { kind: StmtKind::While { cond, body }, span: Span::new(start, self.prev_end()) })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::For)?;

        let target_start = self.start();
        let mut targets = vec![self.parse_expr_bp(TARGET_BP)?];
        while self.match_token(&TokenKind::Comma) {
            if self.check(&TokenKind::In) {
                break;
            }
            targets.push(self.parse_expr_bp(TARGET_BP)?);
        }
        let target = if targets.len() == 1 {
            targets.remove(0)
        } else {
            Expr::new(ExprKind::Tuple(targets), Span::new(target_start, self.prev_end()))
        };
        validate_target(&target)?;

        self.expect(&TokenKind::In)?;
        let iter = self.parse_expr_list()?;
        let body = self.parse_block()?;
        Ok(Stmt { kind: StmtKind::For { target, iter, body }, span: Span::new(start, self.prev_end()) })
    }

    fn parse_def(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Def)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut params: Vec<Param> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let param_span = self.current().span;
            let param = self.expect_ident()?;
            if params.iter().any(|p| p.name == param) {
                return Err(ParseError::custom(
                    format!("Duplicate argument '{}' in function definition", param),
                    param_span,
                ));
            }
            let default = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                if params.iter().any(|p| p.default.is_some()) {
                    return Err(ParseError::custom(
                        "Non-default argument follows default argument",
                        param_span,
                    ));
                }
                None
            };
            params.push(Param { name: param, default });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = Span::new(start, self.prev_end());

        Ok(Stmt {
            kind: StmtKind::Def(Rc::new(FnDecl { name, params, body, span })),
            span,
        })
    }

    fn parse_try(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Try)?;
        let body = self.parse_block()?;

        let mut handlers = Vec::new();
        while self.check(&TokenKind::Except) {
            let handler_start = self.start();
            self.advance();
            let (kind, name) = if self.check(&TokenKind::Colon) {
                (None, None)
            } else {
                let kind = self.parse_expr()?;
                let name = if self.match_token(&TokenKind::As) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                (Some(kind), name)
            };
            let body = self.parse_block()?;
            handlers.push(ExceptHandler {
                kind,
                name,
                body,
                span: Span::new(handler_start, self.prev_end()),
            });
        }

        let finally = if self.match_token(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handlers.is_empty() && finally.is_none() {
            return Err(ParseError::expected(
                "'except' or 'finally'",
                self.current_kind(),
                self.current().span,
            ));
        }

        Ok(Stmt {
            kind: StmtKind::Try { body, handlers, finally },
            span: Span::new(start, self.prev_end()),
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Expression, or a bare tuple `a, b` when commas follow.
    pub fn parse_expr_list(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        let first = self.parse_expr()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_token(&TokenKind::Comma) {
            if !self.is_expr_start() {
                break;
            }
            items.push(self.parse_expr()?);
        }
        Ok(Expr::new(ExprKind::Tuple(items), Span::new(start, self.prev_end())))
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.start();
        let mut lhs = self.parse_prefix()?;

        loop {
            if matches!(
                self.current_kind(),
                TokenKind::LParen | TokenKind::Dot | TokenKind::LBracket
            ) {
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            let Some((l_bp, r_bp)) = self.infix_bp() else { break };
            if l_bp < min_bp {
                break;
            }

            let op = self.parse_binop()?;
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::new(
                ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                Span::new(start, self.prev_end()),
            );
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();

        let kind = match self.current_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::Int(n)
            }
            TokenKind::Float(n) => {
                self.advance();
                ExprKind::Float(n)
            }
            TokenKind::String(s) => {
                self.advance();
                // Adjacent literals concatenate: "a" "b"
                let mut s = s;
                while let TokenKind::String(next) = self.current_kind().clone() {
                    self.advance();
                    s.push_str(&next);
                }
                ExprKind::String(s)
            }
            TokenKind::Bool(b) => {
                self.advance();
                ExprKind::Bool(b)
            }
            TokenKind::None => {
                self.advance();
                ExprKind::None
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::Minus | TokenKind::Plus => {
                let op = if self.check(&TokenKind::Minus) { UnaryOp::Neg } else { UnaryOp::Pos };
                self.advance();
                let operand = self.parse_expr_bp(UNARY_BP)?;
                ExprKind::Unary { op, operand: Box::new(operand) }
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_expr_bp(NOT_BP)?;
                ExprKind::Unary { op: UnaryOp::Not, operand: Box::new(operand) }
            }
            TokenKind::LParen => {
                self.advance();
                if self.match_token(&TokenKind::RParen) {
                    ExprKind::Tuple(Vec::new())
                } else {
                    let first = self.parse_expr()?;
                    if self.check(&TokenKind::Comma) {
                        let mut items = vec![first];
                        while self.match_token(&TokenKind::Comma) {
                            if self.check(&TokenKind::RParen) {
                                break;
                            }
                            items.push(self.parse_expr()?);
                        }
                        self.expect(&TokenKind::RParen)?;
                        ExprKind::Tuple(items)
                    } else {
                        self.expect(&TokenKind::RParen)?;
                        first.kind
                    }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    items.push(self.parse_expr()?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                ExprKind::List(items)
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    let key = self.parse_expr()?;
                    self.expect(&TokenKind::Colon)?;
                    let value = self.parse_expr()?;
                    entries.push((key, value));
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBrace)?;
                ExprKind::Dict(entries)
            }
            _ => {
                return Err(ParseError::expected(
                    "expression",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };

        Ok(Expr::new(kind, Span::new(start, self.prev_end())))
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;

        let kind = match self.current_kind() {
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_args()?;
                self.expect(&TokenKind::RParen)?;
                ExprKind::Call { func: Box::new(lhs), args }
            }
            TokenKind::Dot => {
                self.advance();
                let name = self.expect_ident()?;
                if self.match_token(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    self.expect(&TokenKind::RParen)?;
                    ExprKind::MethodCall { object: Box::new(lhs), method: name, args }
                } else {
                    ExprKind::Attribute { object: Box::new(lhs), attr: name }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr_list()?;
                self.expect(&TokenKind::RBracket)?;
                ExprKind::Index { object: Box::new(lhs), index: Box::new(index) }
            }
            _ => return Ok(lhs),
        };

        Ok(Expr::new(kind, Span::new(start, self.prev_end())))
    }

    /// Call arguments up to (not including) the closing ')'.
    fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        let mut args: Vec<Arg> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let keyword = match (self.current_kind(), self.peek(1)) {
                (TokenKind::Ident(name), TokenKind::Eq) => Some(name.clone()),
                _ => None,
            };

            if let Some(name) = keyword {
                let span = self.current().span;
                if args.iter().any(|a| a.name.as_deref() == Some(name.as_str())) {
                    return Err(ParseError::custom(
                        format!("Keyword argument repeated: {}", name),
                        span,
                    ));
                }
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                args.push(Arg { name: Some(name), value });
            } else {
                let value = self.parse_expr()?;
                if args.iter().any(|a| a.name.is_some()) {
                    return Err(ParseError::custom(
                        "Positional argument follows keyword argument",
                        value.span,
                    ));
                }
                args.push(Arg { name: None, value });
            }

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::Or => Some((1, 2)),
            TokenKind::And => Some((3, 4)),
            TokenKind::Not if matches!(self.peek(1), TokenKind::In) => Some((7, 8)),
            TokenKind::EqEq | TokenKind::BangEq
            | TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq
            | TokenKind::In | TokenKind::Is => Some((7, 8)),
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            TokenKind::Star | TokenKind::Slash | TokenKind::SlashSlash | TokenKind::Percent => Some((13, 14)),
            TokenKind::StarStar => Some((18, 17)), // right associative, tighter than unary minus
            _ => None,
        }
    }

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Or => BinOp::Or,
            TokenKind::And => BinOp::And,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::GtEq => BinOp::Ge,
            TokenKind::In => BinOp::In,
            TokenKind::Not => {
                self.advance();
                BinOp::NotIn
            }
            TokenKind::Is => {
                if matches!(self.peek(1), TokenKind::Not) {
                    self.advance();
                    BinOp::IsNot
                } else {
                    BinOp::Is
                }
            }
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::SlashSlash => BinOp::FloorDiv,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::StarStar => BinOp::Pow,
            _ => {
                return Err(ParseError::expected(
                    "operator like '+' or '-'",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.advance();
        Ok(op)
    }
}

/// Check that an expression can appear on the left of `=`.
fn validate_target(expr: &Expr) -> Result<(), ParseError> {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Index { .. } | ExprKind::Attribute { .. } => Ok(()),
        ExprKind::Tuple(items) | ExprKind::List(items) => items.iter().try_for_each(validate_target),
        _ => Err(ParseError::custom("Cannot assign to expression", expr.span)
            .with_hint("assign to a name, an index like a[0], or a tuple of those")),
    }
}

/// Result of parsing: statements plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub stmts: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn custom(message: impl Into<String>, span: Span) -> Self {
        Self { span, message: message.into(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "']'" if matches!(found, TokenKind::Eof) => "Unclosed '[' - missing ']'".to_string(),
        "'}'" if matches!(found, TokenKind::Eof) => "Unclosed '{' - missing '}'".to_string(),
        "a name" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
