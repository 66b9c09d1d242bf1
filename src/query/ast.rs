//! Syntax tree for query expressions.

use crate::dataset::Value;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal constant (`12`, `'24K'`, `True`, `None`).
    Literal(Value),
    /// Bare name; only `df` and `pd` resolve.
    Name(String),
    /// List literal, `[a, b]`.
    List(Vec<Expr>),
    /// Comma-separated subscript, `loc[mask, 'col']`.
    Tuple(Vec<Expr>),
    /// Slice inside a subscript, `[start:stop]`.
    Slice {
        start: Option<Box<Expr>>,
        stop: Option<Box<Expr>>,
    },
    /// `value.attr`
    Attribute { value: Box<Expr>, attr: String },
    /// `value[index]`
    Subscript { value: Box<Expr>, index: Box<Expr> },
    /// `func(args, key=value)`
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        kwargs: Vec<(String, Expr)>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Height of the tree, counting this node. Walks with an explicit stack.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, level)) = stack.pop() {
            max = max.max(level);
            let next = level + 1;
            match expr {
                Expr::Literal(_) | Expr::Name(_) => {}
                Expr::List(items) | Expr::Tuple(items) => {
                    stack.extend(items.iter().map(|item| (item, next)));
                }
                Expr::Slice { start, stop } => {
                    stack.extend(start.iter().chain(stop.iter()).map(|e| (&**e, next)));
                }
                Expr::Attribute { value, .. } => stack.push((&**value, next)),
                Expr::Subscript { value, index } => {
                    stack.push((&**value, next));
                    stack.push((&**index, next));
                }
                Expr::Call { func, args, kwargs } => {
                    stack.push((&**func, next));
                    stack.extend(args.iter().map(|arg| (arg, next)));
                    stack.extend(kwargs.iter().map(|(_, value)| (value, next)));
                }
                Expr::Unary { operand, .. } => stack.push((&**operand, next)),
                Expr::Binary { left, right, .. } => {
                    stack.push((&**left, next));
                    stack.push((&**right, next));
                }
            }
        }
        max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Element-wise boolean
    And,
    Or,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq
        )
    }
}
