/*!
Layers indentation (`INDENT`/`DEDENT`), `doc...done` block-string capture,
and string interpolation splitting on top of `chemlang_lexer`'s flat token
stream. `chemlang_lexer` skips leading whitespace as insignificant, so this
module recovers indentation width by re-reading the raw source slice
between a `Newline` token and the next token on its line - the same
"reconstruct from spans" trick `crate::formula` uses for formula literals.
An indent-stack tracks the nesting depth the way any layout-sensitive
language's tokenizer does: push on growth, pop (possibly several times) on
shrink, error on a width that matches no enclosing level.
*/

use crate::error::{CLError, CLResult, ErrorKind, Span};
use crate::token::{SpannedToken, Token};
use chemlang_lexer::{lex, RawToken, Spanned};

pub fn scan(source: &str) -> CLResult<Vec<SpannedToken>> {
    let raw = lex(source).map_err(|(e, span)| {
        CLError::new(ErrorKind::ScanError(format!("{e} at byte offset {}", span.start)))
    })?;

    let mut out = Vec::new();
    let mut indent_stack: Vec<usize> = vec![0];
    let mut at_line_start = true;
    let mut last_newline_end = 0usize;
    let mut tracker = LineTracker::new();
    let mut i = 0;

    while i < raw.len() {
        let Spanned { value, span } = &raw[i];

        if matches!(value, RawToken::Newline) {
            if !at_line_start {
                let newline_span = tracker.locate(source, span.start);
                out.push(SpannedToken { token: Token::Newline, span: newline_span });
            }
            last_newline_end = span.end;
            at_line_start = true;
            i += 1;
            continue;
        }

        if at_line_start {
            let indent_width = leading_width(source, last_newline_end, span.start);
            let indent_span = tracker.locate(source, span.start);
            adjust_indentation(&mut indent_stack, indent_width, &mut out, indent_span)?;
            at_line_start = false;
        }

        if matches!(value, RawToken::Doc) {
            let doc_end = span.end;
            let mut j = i + 1;
            while j < raw.len() && !matches!(raw[j].value, RawToken::Done) {
                j += 1;
            }
            if j == raw.len() {
                return Err(CLError::new(ErrorKind::ScanError("unterminated `doc` block, expected `done`".into())));
            }
            let done_start = raw[j].span.start;
            let text = source[doc_end..done_start].to_string();
            let doc_span = tracker.locate(source, span.start);
            out.push(SpannedToken { token: Token::DocString(text), span: doc_span });
            let _ = tracker.locate(source, raw[j].span.end);
            last_newline_end = raw[j].span.end;
            i = j + 1;
            continue;
        }

        let token_span = tracker.locate(source, span.start);
        let token = convert(value.clone())?;
        tracing::trace!(?token, line = token_span.line, col = token_span.col, "scanned token");
        out.push(SpannedToken { token, span: token_span });
        i += 1;
    }

    let eof_span = tracker.locate(source, source.len());
    while indent_stack.len() > 1 {
        indent_stack.pop();
        out.push(SpannedToken { token: Token::Dedent, span: eof_span });
    }
    out.push(SpannedToken { token: Token::Eof, span: eof_span });
    Ok(out)
}

fn leading_width(source: &str, line_start: usize, token_start: usize) -> usize {
    source[line_start..token_start].chars().filter(|c| *c == ' ' || *c == '\t').count()
}

fn adjust_indentation(
    stack: &mut Vec<usize>,
    width: usize,
    out: &mut Vec<SpannedToken>,
    span: Span,
) -> CLResult<()> {
    let current = *stack.last().expect("indent stack is never empty");
    if width > current {
        stack.push(width);
        out.push(SpannedToken { token: Token::Indent, span });
    } else {
        while width < *stack.last().expect("indent stack is never empty") {
            stack.pop();
            out.push(SpannedToken { token: Token::Dedent, span });
        }
        if *stack.last().expect("indent stack is never empty") != width {
            return Err(CLError::at(ErrorKind::ScanError("inconsistent indentation".into()), span));
        }
    }
    Ok(())
}

fn convert(raw: RawToken) -> CLResult<Token> {
    Ok(match raw {
        RawToken::Number(n) => Token::Number(n),
        RawToken::PlainString(s) => Token::PlainString(s),
        RawToken::InterpString(s) => Token::InterpString(s),
        RawToken::Word(w) => Token::Word(w),
        RawToken::EscapedWord(w) => Token::EscapedWord(w),
        RawToken::If => Token::If,
        RawToken::Elif => Token::Elif,
        RawToken::Else => Token::Else,
        RawToken::During => Token::During,
        RawToken::Redo => Token::Redo,
        RawToken::Work => Token::Work,
        RawToken::Give => Token::Give,
        RawToken::Pass => Token::Pass,
        RawToken::Fail => Token::Fail,
        RawToken::Arrow => Token::Arrow,
        RawToken::Ellipsis => Token::Ellipsis,
        RawToken::StarStar => Token::StarStar,
        RawToken::EqEq => Token::EqEq,
        RawToken::NotEq => Token::NotEq,
        RawToken::Le => Token::Le,
        RawToken::Ge => Token::Ge,
        RawToken::PlusEq => Token::PlusEq,
        RawToken::MinusEq => Token::MinusEq,
        RawToken::StarEq => Token::StarEq,
        RawToken::SlashEq => Token::SlashEq,
        RawToken::Plus => Token::Plus,
        RawToken::Minus => Token::Minus,
        RawToken::Star => Token::Star,
        RawToken::Slash => Token::Slash,
        RawToken::Percent => Token::Percent,
        RawToken::Caret => Token::Caret,
        RawToken::Lt => Token::Lt,
        RawToken::Gt => Token::Gt,
        RawToken::Amp => Token::Amp,
        RawToken::Pipe => Token::Pipe,
        RawToken::Bang => Token::Bang,
        RawToken::Tilde => Token::Tilde,
        RawToken::Assign => Token::Assign,
        RawToken::LParen => Token::LParen,
        RawToken::RParen => Token::RParen,
        RawToken::LBrace => Token::LBrace,
        RawToken::RBrace => Token::RBrace,
        RawToken::LBracket => Token::LBracket,
        RawToken::RBracket => Token::RBracket,
        RawToken::Comma => Token::Comma,
        RawToken::Colon => Token::Colon,
        RawToken::Dot => Token::Dot,
        RawToken::Underscore => Token::Underscore,
        RawToken::Doc | RawToken::Done | RawToken::Newline | RawToken::CommentSkipped => {
            return Err(CLError::new(ErrorKind::ScanError("internal scanner error: layout token reached convert()".into())));
        }
    })
}

/// Tracks a monotonically increasing byte offset -> (line, col) mapping so
/// repeated lookups over an ascending token stream stay linear in the
/// source length rather than quadratic.
struct LineTracker {
    byte: usize,
    line: u32,
    col: u32,
}

impl LineTracker {
    fn new() -> LineTracker {
        LineTracker { byte: 0, line: 1, col: 1 }
    }

    fn locate(&mut self, source: &str, target: usize) -> Span {
        for c in source[self.byte..target.min(source.len())].chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.byte = target.min(source.len());
        Span { line: self.line, col: self.col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        scan(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn scans_flat_arithmetic() {
        assert_eq!(
            tokens("1 + 2\n"),
            vec![Token::Number("1".into()), Token::Plus, Token::Number("2".into()), Token::Newline, Token::Eof]
        );
    }

    #[test]
    fn indents_and_dedents_a_block() {
        let toks = tokens("if pass\n    1\nelse\n    2\n");
        assert!(toks.contains(&Token::Indent));
        assert!(toks.contains(&Token::Dedent));
    }

    #[test]
    fn blank_lines_do_not_affect_indentation() {
        let toks = tokens("if pass\n    1\n\n    2\n");
        assert_eq!(toks.iter().filter(|t| **t == Token::Indent).count(), 1);
    }

    #[test]
    fn captures_doc_block_as_raw_text() {
        let toks = tokens("doc\nhello {x}\ndone\n");
        assert!(toks.iter().any(|t| matches!(t, Token::DocString(s) if s.contains("hello {x}"))));
    }
}
