/*!
The token type the parser consumes: [`chemlang_lexer::RawToken`] plus the
layout tokens (`Indent`/`Dedent`/`Newline`) and the `doc...done` block-string
token that only `crate::scanner` can produce, since they require raw source
text rather than anything logos tokenizes on its own.
*/

use crate::error::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    PlainString(String),
    InterpString(String),
    DocString(String),
    Word(String),
    EscapedWord(String),

    If,
    Elif,
    Else,
    During,
    Redo,
    Work,
    Give,
    Pass,
    Fail,

    Arrow,
    Ellipsis,
    StarStar,
    EqEq,
    NotEq,
    Le,
    Ge,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Lt,
    Gt,
    Amp,
    Pipe,
    Bang,
    Tilde,
    Assign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Underscore,

    Newline,
    Indent,
    Dedent,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Word(w) | Token::EscapedWord(w) => write!(f, "{w}"),
            Token::Newline => write!(f, "newline"),
            Token::Indent => write!(f, "indent"),
            Token::Dedent => write!(f, "dedent"),
            Token::Eof => write!(f, "end of input"),
            other => write!(f, "{other:?}"),
        }
    }
}
