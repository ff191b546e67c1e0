/*!
A recursive-descent parser building the `crate::ast` tree from the token
stream `crate::scanner` produces. Follows the usual precedence-climbing
shape for expressions (see [`Parser::parse_expr`]); statement parsing
additionally distinguishes block bodies (`Newline` then `Indent ... Dedent`)
from one-line bodies that sit directly on the header's own line, per
[`Parser::parse_block`].
*/

use crate::ast::*;
use crate::decimal::Decimal;
use crate::error::{CLError, CLResult, ErrorKind, Span};
use crate::quantity::Quantity;
use crate::token::{SpannedToken, Token};
use crate::unit::registry;

pub fn parse(tokens: Vec<SpannedToken>) -> CLResult<Block> {
    let mut parser = Parser { tokens, pos: 0 };
    parser.skip_newlines();
    let mut stmts = Vec::new();
    while !parser.check(&Token::Eof) {
        stmts.push(parser.parse_statement()?);
        parser.skip_newlines();
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> &SpannedToken {
        &self.tokens[self.pos]
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn check(&self, token: &Token) -> bool {
        &self.current().token == token
    }

    fn at_end(&self) -> bool {
        self.check(&Token::Eof)
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, token: &Token) -> CLResult<SpannedToken> {
        if self.check(token) {
            Ok(self.advance())
        } else {
            Err(CLError::at(
                ErrorKind::ParseError(format!("expected {token}, found {}", self.current().token)),
                self.span(),
            ))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    fn expect_statement_end(&mut self) -> CLResult<()> {
        if self.check(&Token::Newline) || self.at_end() || self.check(&Token::Dedent) {
            self.skip_newlines();
            Ok(())
        } else {
            Err(CLError::at(ErrorKind::ParseError(format!("expected end of statement, found {}", self.current().token)), self.span()))
        }
    }

    fn word(&mut self) -> CLResult<(String, Span)> {
        let span = self.span();
        match self.advance().token {
            Token::Word(w) | Token::EscapedWord(w) => Ok((w, span)),
            other => Err(CLError::at(ErrorKind::ParseError(format!("expected identifier, found {other}")), span)),
        }
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> CLResult<Stmt> {
        match &self.current().token {
            Token::If => self.parse_if(),
            Token::During => self.parse_during(),
            Token::Redo => self.parse_redo(),
            Token::Work => self.parse_work(),
            Token::Give => self.parse_give(),
            Token::Word(_) if self.is_assignment_ahead() => self.parse_assignment(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect_statement_end()?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn is_assignment_ahead(&self) -> bool {
        matches!(
            self.tokens.get(self.pos + 1).map(|t| &t.token),
            Some(Token::Assign) | Some(Token::PlusEq) | Some(Token::MinusEq) | Some(Token::StarEq) | Some(Token::SlashEq)
        )
    }

    fn parse_assignment(&mut self) -> CLResult<Stmt> {
        let (name, span) = self.word()?;
        let op = match self.advance().token {
            Token::Assign => AssignOp::Set,
            Token::PlusEq => AssignOp::AddSet,
            Token::MinusEq => AssignOp::SubSet,
            Token::StarEq => AssignOp::MulSet,
            Token::SlashEq => AssignOp::DivSet,
            other => return Err(CLError::at(ErrorKind::ParseError(format!("expected assignment operator, found {other}")), span)),
        };
        let value = self.parse_expr()?;
        self.expect_statement_end()?;
        Ok(Stmt::Assign { name, op, value, span })
    }

    fn parse_if(&mut self) -> CLResult<Stmt> {
        self.advance();
        let mut branches = Vec::new();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        branches.push((cond, body));
        loop {
            self.skip_newlines_if_block_boundary();
            if self.check(&Token::Elif) {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                branches.push((cond, body));
            } else {
                break;
            }
        }
        let else_branch = if self.check(&Token::Else) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If { branches, else_branch })
    }

    /// `elif`/`else` may appear on the line right after a block's `Dedent`;
    /// swallow a lone Dedent-adjacent lookahead isn't needed here since the
    /// scanner already closes the block before the next header token.
    fn skip_newlines_if_block_boundary(&mut self) {}

    fn parse_during(&mut self) -> CLResult<Stmt> {
        self.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::During { cond, body })
    }

    fn parse_redo(&mut self) -> CLResult<Stmt> {
        self.advance();
        let (var, _) = self.word()?;
        let interval = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::Redo { var, interval, body })
    }

    fn parse_work(&mut self) -> CLResult<Stmt> {
        let span = self.span();
        self.advance();
        let (name, _) = self.word()?;
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let (p, _) = self.word()?;
                params.push(p);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::Work { name, params, body, span })
    }

    fn parse_give(&mut self) -> CLResult<Stmt> {
        let span = self.span();
        self.advance();
        let value = if self.check(&Token::Newline) || self.at_end() || self.check(&Token::Dedent) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_statement_end()?;
        Ok(Stmt::Give(value, span))
    }

    /// A block body: either `Newline Indent stmt* Dedent`, or a single
    /// statement directly on the header's own line.
    fn parse_block(&mut self) -> CLResult<Block> {
        if self.check(&Token::Newline) {
            self.skip_newlines();
            self.expect(&Token::Indent)?;
            let mut stmts = Vec::new();
            self.skip_newlines();
            while !self.check(&Token::Dedent) && !self.at_end() {
                stmts.push(self.parse_statement()?);
                self.skip_newlines();
            }
            self.expect(&Token::Dedent)?;
            Ok(stmts)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> CLResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.check(&Token::Pipe) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_comparison()?;
        while self.check(&Token::Amp) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_interval()?;
        loop {
            let op = match &self.current().token {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::NotEq,
                Token::Lt => BinOp::Lt,
                Token::Le => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::Ge => BinOp::Ge,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_interval()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_interval(&mut self) -> CLResult<Expr> {
        let lhs = self.parse_conversion()?;
        if self.check(&Token::Ellipsis) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_conversion()?;
            return Ok(Expr::Interval(Box::new(lhs), Box::new(rhs), span));
        }
        Ok(lhs)
    }

    fn parse_conversion(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            if self.check(&Token::Colon) {
                let reaction = self.parse_reaction_literal()?;
                self.expect(&Token::Arrow)?;
                let span = self.span();
                let target = self.parse_conversion_target()?;
                lhs = Expr::Conversion { source: Box::new(lhs), reaction: Some(reaction), target, span };
            } else if self.check(&Token::Arrow) {
                let span = self.span();
                self.advance();
                let target = self.parse_conversion_target()?;
                lhs = Expr::Conversion { source: Box::new(lhs), reaction: None, target, span };
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    /// A reaction skeleton `:A + B -> C + D:`: a dedicated sub-grammar so
    /// its inner `->` never chains a conversion.
    fn parse_reaction_literal(&mut self) -> CLResult<ReactionLiteral> {
        self.expect(&Token::Colon)?;
        let reactants = self.parse_species_list()?;
        self.expect(&Token::Arrow)?;
        let products = self.parse_species_list()?;
        self.expect(&Token::Colon)?;
        Ok(ReactionLiteral { reactants, products })
    }

    fn parse_species_list(&mut self) -> CLResult<Vec<(String, Span)>> {
        let mut species = vec![self.word()?];
        while self.check(&Token::Plus) {
            self.advance();
            species.push(self.word()?);
        }
        Ok(species)
    }

    fn parse_conversion_target(&mut self) -> CLResult<ConversionTargetExpr> {
        if self.check(&Token::Pipe) {
            self.advance();
            let path = self.parse_path_literal()?;
            self.expect(&Token::Pipe)?;
            return Ok(ConversionTargetExpr::PathSink(Box::new(Expr::StringLiteral(path))));
        }
        let span = self.span();
        let (first, _) = self.word()?;
        if matches!(&self.current().token, Token::Word(_)) {
            let (second, _) = self.word()?;
            Ok(ConversionTargetExpr::UnitOfFormula(first, second, span))
        } else if registry::resolve(&first).is_some() {
            Ok(ConversionTargetExpr::Unit(first, span))
        } else {
            Ok(ConversionTargetExpr::Formula(first, span))
        }
    }

    /// Path text between `|...|` for the `-> |path|` file sink:
    /// concatenates the literal text of adjacent path-shaped tokens, since
    /// a bare path like `out/results.txt` would otherwise parse as
    /// division and field access.
    fn parse_path_literal(&mut self) -> CLResult<String> {
        let span = self.span();
        let mut text = String::new();
        loop {
            match &self.current().token {
                Token::Word(w) | Token::EscapedWord(w) => text.push_str(w),
                Token::Dot => text.push('.'),
                Token::Slash => text.push('/'),
                Token::Minus => text.push('-'),
                Token::Number(n) => text.push_str(n),
                Token::Underscore => text.push('_'),
                Token::Pipe => break,
                other => return Err(CLError::at(ErrorKind::ParseError(format!("unexpected token {other} in path")), self.span())),
            }
            self.advance();
        }
        if text.is_empty() {
            return Err(CLError::at(ErrorKind::ParseError("expected a path between `|...|`".into()), span));
        }
        Ok(text)
    }

    fn parse_additive(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match &self.current().token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> CLResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match &self.current().token {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Rem,
                _ => break,
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> CLResult<Expr> {
        let span = self.span();
        let op = match &self.current().token {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Plus => Some(UnaryOp::Pos),
            Token::Bang => Some(UnaryOp::Not),
            Token::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(op, Box::new(operand), span));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> CLResult<Expr> {
        let base = self.parse_call()?;
        if self.check(&Token::Caret) || self.check(&Token::StarStar) {
            let span = self.span();
            self.advance();
            let exponent = self.parse_unary()?; // right-associative
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent), span));
        }
        Ok(base)
    }

    fn parse_call(&mut self) -> CLResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.check(&Token::LParen) {
            let span = self.span();
            self.advance();
            let mut args = Vec::new();
            if !self.check(&Token::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if self.check(&Token::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect(&Token::RParen)?;
            expr = Expr::Call(Box::new(expr), args, span);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> CLResult<Expr> {
        let span = self.span();
        match self.current().token.clone() {
            Token::Number(n) => {
                self.advance();
                self.parse_quantity_literal(n, span)
            }
            Token::PlainString(s) => {
                self.advance();
                Ok(Expr::StringLiteral(s))
            }
            Token::InterpString(s) => {
                self.advance();
                Ok(Expr::InterpString(split_interpolation(&s)?))
            }
            Token::DocString(s) => {
                self.advance();
                Ok(Expr::InterpString(split_interpolation(&s)?))
            }
            Token::Pass => {
                self.advance();
                Ok(Expr::QuantityLiteral(Quantity::pass()))
            }
            Token::Fail => {
                self.advance();
                Ok(Expr::QuantityLiteral(Quantity::fail()))
            }
            Token::Word(w) | Token::EscapedWord(w) => {
                self.advance();
                Ok(Expr::Identifier(w, span))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(CLError::at(ErrorKind::ParseError(format!("unexpected token {other}")), span)),
        }
    }

    /// A number may be followed by a unit word and/or a formula word with no
    /// separator, e.g. `50.00 g NaOH`. Lexical priority tries a unit before
    /// a formula for the immediate suffix word, so common temperature
    /// literals like `300 K`
    /// resolve to Kelvin rather than the element potassium (see DESIGN.md).
    fn parse_quantity_literal(&mut self, number: String, span: Span) -> CLResult<Expr> {
        let magnitude = Decimal::from_literal(&number).map_err(|e| e.with_span(span))?;
        let mut quantity = Quantity::scalar(magnitude);

        if let Token::Word(w) = &self.current().token {
            let w = w.clone();
            if let Some(unit) = registry::resolve(&w) {
                self.advance();
                quantity.unit = unit;
                if let Token::Word(w2) = &self.current().token {
                    let w2 = w2.clone();
                    if let Ok(formula) = crate::formula::parse(&w2) {
                        self.advance();
                        quantity.formula = Some(formula);
                    }
                }
            } else if let Ok(formula) = crate::formula::parse(&w) {
                self.advance();
                quantity.formula = Some(formula);
            }
        }
        Ok(Expr::QuantityLiteral(quantity))
    }
}

/// Splits an interpolating string's raw text on `{expr}` runs. `\{`/`\}`
/// escape a literal brace.
fn split_interpolation(text: &str) -> CLResult<Vec<StringPart>> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '\\' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                if !literal.is_empty() {
                    parts.push(StringPart::Literal(std::mem::take(&mut literal)));
                }
                let mut expr_src = String::new();
                let mut depth = 1;
                for c2 in chars.by_ref() {
                    if c2 == '{' {
                        depth += 1;
                    } else if c2 == '}' {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    expr_src.push(c2);
                }
                if depth != 0 {
                    return Err(CLError::new(ErrorKind::ParseError("unterminated `{` interpolation".into())));
                }
                let tokens = crate::scanner::scan(&format!("{expr_src}\n"))?;
                let mut sub_parser = Parser { tokens, pos: 0 };
                let expr = sub_parser.parse_expr()?;
                parts.push(StringPart::Interp(Box::new(expr)));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        parts.push(StringPart::Literal(literal));
    }
    Ok(parts)
}
