/*!
This crate contains the raw token definitions for the chemlang scanner. It is
separated from the `chemlang` crate because the token enum is built with
[logos](https://docs.rs/logos/latest/logos/) macros, which expand into a lot
of generated code and slow down language-server analysis of the main crate.
See `chemlang::scanner` for the layer built on top of this crate that adds
indentation (`INDENT`/`DEDENT`), block-string capture, and string
interpolation splitting.
*/

use logos::Logos;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unexpected character")
    }
}

/// A single raw token together with the byte span it was lexed from.
///
/// The span lets `chemlang::parser` tell whether two adjacent tokens were
/// written with no whitespace between them (needed to decide whether a run
/// of `Word`/`Number`/bracket tokens forms a single chemical formula
/// literal).
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: logos::Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r]+")]
pub enum RawToken {
    // Comments: `ps` to end of line. Require a following space/tab so that
    // identifiers such as `psi` are not swallowed.
    #[regex(r"ps[ \t][^\n]*", logos::skip)]
    #[token("ps", logos::skip)]
    CommentSkipped,

    #[token("\n")]
    Newline,

    #[regex(r"\d+(\.\d+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| strip_quotes(lex.slice()))]
    PlainString(String),

    #[regex(r#"s"([^"\\\n]|\\.)*""#, |lex| strip_quotes(&lex.slice()[1..]))]
    InterpString(String),

    #[token("doc", priority = 10)]
    Doc,
    #[token("done", priority = 10)]
    Done,

    #[token("if", priority = 10)]
    If,
    #[token("elif", priority = 10)]
    Elif,
    #[token("else", priority = 10)]
    Else,
    #[token("during", priority = 10)]
    During,
    #[token("redo", priority = 10)]
    Redo,
    #[token("work", priority = 10)]
    Work,
    #[token("give", priority = 10)]
    Give,
    #[token("pass", priority = 10)]
    Pass,
    #[token("fail", priority = 10)]
    Fail,

    #[regex(r"`[A-Za-z_][A-Za-z0-9_]*`", |lex| lex.slice()[1..lex.slice().len() - 1].to_string())]
    EscapedWord(String),

    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),

    #[token("->")]
    Arrow,
    #[token("...")]
    Ellipsis,
    #[token("**")]
    StarStar,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("_")]
    Underscore,
}

fn strip_quotes(slice: &str) -> String {
    slice[1..slice.len() - 1].to_string()
}

/// Runs the lexer over `source`, returning every token with its byte span.
/// Does not skip `Newline`; indentation/layout handling lives above this
/// crate in `chemlang::scanner`.
pub fn lex(source: &str) -> Result<Vec<Spanned<RawToken>>, (LexError, logos::Span)> {
    let mut out = Vec::new();
    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(tok) => out.push(Spanned {
                value: tok,
                span: lexer.span(),
            }),
            Err(e) => return Err((e, lexer.span())),
        }
    }
    Ok(out)
}
