/*!
The abstract syntax tree `crate::parser` builds and `crate::interpreter`
walks. Leaves are Quantity/string/path/identifier literals; interior nodes
are the grammar's operator and statement productions.
*/

use crate::error::Span;
use crate::quantity::Quantity;
use crate::reaction::Reaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    AddSet,
    SubSet,
    MulSet,
    DivSet,
}

/// A piece of an interpolating string (`s"..."` or a `doc...done` block):
/// either literal text, or an embedded `{expr}` to evaluate and substitute.
#[derive(Debug, Clone)]
pub enum StringPart {
    Literal(String),
    Interp(Box<Expr>),
}

/// The right-hand side of a `->` expression.
#[derive(Debug, Clone)]
pub enum ConversionTargetExpr {
    /// A bare unit name, e.g. `mm`.
    Unit(String, Span),
    /// A bare formula literal, e.g. `CuSO4`.
    Formula(String, Span),
    /// A unit applied to a formula, e.g. `g CuSO4`.
    UnitOfFormula(String, String, Span),
    /// `|path|`: append the converted value's printed form to a file.
    PathSink(Box<Expr>),
}

/// A reaction skeleton written between `:...:` — the outer lexical `:`
/// delimiters disambiguate the reaction sub-grammar's own `->` from the
/// conversion operator.
#[derive(Debug, Clone)]
pub struct ReactionLiteral {
    pub reactants: Vec<(String, Span)>,
    pub products: Vec<(String, Span)>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    QuantityLiteral(Quantity),
    StringLiteral(String),
    InterpString(Vec<StringPart>),
    Identifier(String, Span),
    Unary(UnaryOp, Box<Expr>, Span),
    Binary(BinOp, Box<Expr>, Box<Expr>, Span),
    Interval(Box<Expr>, Box<Expr>, Span),
    Call(Box<Expr>, Vec<Expr>, Span),
    Conversion {
        source: Box<Expr>,
        reaction: Option<ReactionLiteral>,
        target: ConversionTargetExpr,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::QuantityLiteral(_) | Expr::StringLiteral(_) | Expr::InterpString(_) => Span::default(),
            Expr::Identifier(_, s) => *s,
            Expr::Unary(_, _, s) => *s,
            Expr::Binary(_, _, _, s) => *s,
            Expr::Interval(_, _, s) => *s,
            Expr::Call(_, _, s) => *s,
            Expr::Conversion { span, .. } => *span,
        }
    }
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Assign { name: String, op: AssignOp, value: Expr, span: Span },
    If { branches: Vec<(Expr, Block)>, else_branch: Option<Block> },
    During { cond: Expr, body: Block },
    Redo { var: String, interval: Expr, body: Block },
    Work { name: String, params: Vec<String>, body: Block, span: Span },
    Give(Option<Expr>, Span),
}

/// Reassembled at interpretation time from a parsed [`ReactionLiteral`]:
/// species strings are parsed into formulas once, eagerly, since the
/// reaction literal's contents never depend on runtime state.
pub fn build_reaction(lit: &ReactionLiteral) -> crate::error::CLResult<Reaction> {
    let reactants = lit.reactants.iter().map(|(text, span)| crate::formula::parse(text).map_err(|e| e.with_span(*span))).collect::<crate::error::CLResult<Vec<_>>>()?;
    let products = lit.products.iter().map(|(text, span)| crate::formula::parse(text).map_err(|e| e.with_span(*span))).collect::<crate::error::CLResult<Vec<_>>>()?;
    Ok(Reaction::new(reactants, products))
}
