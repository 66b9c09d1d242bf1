//! Recursive-descent parser for query expressions.
//!
//! Precedence follows Python, lowest first: comparison, `|`, `&`, `+ -`,
//! `* /`, unary `- + ~`, then postfix attribute/subscript/call. Comparisons
//! bind looser than `&` and `|`, so masks need parentheses as in pandas.

use super::ast::{BinOp, Expr, UnaryOp};
use super::lexer::{tokenize, Token};
use crate::dataset::Value;

/// Deepest nesting accepted, counting brackets, unary operators and the
/// operator chains of the finished tree.
pub const MAX_DEPTH: usize = 64;

/// Longest expression accepted, in characters.
pub const MAX_EXPRESSION_LEN: usize = 2000;

const TOO_DEEP: &str = "expression is nested too deeply";

/// Parses a single expression.
pub fn parse(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }
    let length = input.chars().count();
    if length > MAX_EXPRESSION_LEN {
        return Err(format!(
            "expression is too long ({length} characters, limit {MAX_EXPRESSION_LEN})"
        ));
    }
    let tokens = tokenize(input)?;
    let (expr, pos) = parse_comparison(&tokens, 0, 0)?;
    if let Some(token) = tokens.get(pos) {
        return Err(match token {
            Token::Assign => "assignment is not allowed".to_string(),
            other => format!("unexpected '{}' after expression", other.describe()),
        });
    }
    // Operator and method chains deepen the tree without recursing here.
    if expr.depth() > MAX_DEPTH {
        return Err(TOO_DEEP.to_string());
    }
    Ok(expr)
}

fn descend(depth: usize) -> Result<usize, String> {
    if depth >= MAX_DEPTH {
        return Err(TOO_DEEP.to_string());
    }
    Ok(depth + 1)
}

fn parse_comparison(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let depth = descend(depth)?;
    let (left, pos) = parse_or(tokens, pos, depth)?;

    let op = match tokens.get(pos) {
        Some(Token::EqEq) => BinOp::Eq,
        Some(Token::NotEq) => BinOp::NotEq,
        Some(Token::Lt) => BinOp::Lt,
        Some(Token::LtEq) => BinOp::LtEq,
        Some(Token::Gt) => BinOp::Gt,
        Some(Token::GtEq) => BinOp::GtEq,
        _ => return Ok((left, pos)),
    };
    let (right, pos) = parse_or(tokens, pos + 1, depth)?;

    if matches!(
        tokens.get(pos),
        Some(Token::EqEq | Token::NotEq | Token::Lt | Token::LtEq | Token::Gt | Token::GtEq)
    ) {
        return Err("chained comparisons are not supported; combine them with & and parentheses".to_string());
    }

    Ok((binary(op, left, right), pos))
}

fn parse_or(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_and(tokens, pos, depth)?;
    while let Some(Token::Pipe) = tokens.get(pos) {
        let (right, new_pos) = parse_and(tokens, pos + 1, depth)?;
        left = binary(BinOp::Or, left, right);
        pos = new_pos;
    }
    Ok((left, pos))
}

fn parse_and(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_add_sub(tokens, pos, depth)?;
    while let Some(Token::Amp) = tokens.get(pos) {
        let (right, new_pos) = parse_add_sub(tokens, pos + 1, depth)?;
        left = binary(BinOp::And, left, right);
        pos = new_pos;
    }
    Ok((left, pos))
}

fn parse_add_sub(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos, depth)?;
    loop {
        let op = match tokens.get(pos) {
            Some(Token::Plus) => BinOp::Add,
            Some(Token::Minus) => BinOp::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
        left = binary(op, left, right);
        pos = new_pos;
    }
    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut left, mut pos) = parse_unary(tokens, pos, depth)?;
    loop {
        let op = match tokens.get(pos) {
            Some(Token::Star) => BinOp::Mul,
            Some(Token::Slash) => BinOp::Div,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
        left = binary(op, left, right);
        pos = new_pos;
    }
    Ok((left, pos))
}

fn parse_unary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let op = match tokens.get(pos) {
        Some(Token::Minus) => UnaryOp::Neg,
        Some(Token::Plus) => UnaryOp::Pos,
        Some(Token::Tilde) => UnaryOp::Invert,
        _ => return parse_postfix(tokens, pos, depth),
    };
    let (operand, pos) = parse_unary(tokens, pos + 1, descend(depth)?)?;
    Ok((
        Expr::Unary {
            op,
            operand: Box::new(operand),
        },
        pos,
    ))
}

fn parse_postfix(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (mut expr, mut pos) = parse_primary(tokens, pos, depth)?;
    loop {
        match tokens.get(pos) {
            Some(Token::Dot) => match tokens.get(pos + 1) {
                Some(Token::Ident(attr)) => {
                    expr = Expr::Attribute {
                        value: Box::new(expr),
                        attr: attr.clone(),
                    };
                    pos += 2;
                }
                _ => return Err("expected attribute name after '.'".to_string()),
            },
            Some(Token::LBracket) => {
                let (index, new_pos) = parse_subscript(tokens, pos + 1, depth)?;
                expr = Expr::Subscript {
                    value: Box::new(expr),
                    index: Box::new(index),
                };
                pos = new_pos;
            }
            Some(Token::LParen) => {
                let (args, kwargs, new_pos) = parse_call_args(tokens, pos + 1, depth)?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    kwargs,
                };
                pos = new_pos;
            }
            _ => break,
        }
    }
    Ok((expr, pos))
}

fn parse_primary(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let Some(token) = tokens.get(pos) else {
        return Err("unexpected end of expression".to_string());
    };

    match token {
        Token::Int(i) => Ok((Expr::Literal(Value::Int(*i)), pos + 1)),
        Token::Float(f) => Ok((Expr::Literal(Value::Float(*f)), pos + 1)),
        Token::Str(s) => {
            // Adjacent string literals concatenate.
            let mut text = s.clone();
            let mut pos = pos + 1;
            while let Some(Token::Str(next)) = tokens.get(pos) {
                text.push_str(next);
                pos += 1;
            }
            Ok((Expr::Literal(Value::Text(text)), pos))
        }
        Token::Ident(name) => {
            let expr = match name.as_str() {
                "True" => Expr::Literal(Value::Bool(true)),
                "False" => Expr::Literal(Value::Bool(false)),
                "None" => Expr::Literal(Value::Null),
                "lambda" => return Err("lambda expressions are not allowed".to_string()),
                "import" | "from" => return Err("imports are not allowed".to_string()),
                "for" | "while" | "if" | "def" | "class" | "with" => {
                    return Err(format!("'{name}' is not allowed in a query expression"))
                }
                _ => Expr::Name(name.clone()),
            };
            Ok((expr, pos + 1))
        }
        Token::LParen => {
            let (expr, pos) = parse_comparison(tokens, pos + 1, depth)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((expr, pos + 1)),
                Some(Token::Comma) => Err("tuples are not supported".to_string()),
                _ => Err("missing closing parenthesis".to_string()),
            }
        }
        Token::LBracket => {
            let (items, pos) = parse_sequence(tokens, pos + 1, &Token::RBracket, depth)?;
            Ok((Expr::List(items), pos))
        }
        other => Err(format!("unexpected '{}'", other.describe())),
    }
}

/// Parses comma-separated expressions up to `close`, allowing a trailing comma.
fn parse_sequence(
    tokens: &[Token],
    pos: usize,
    close: &Token,
    depth: usize,
) -> Result<(Vec<Expr>, usize), String> {
    let mut items = Vec::new();
    let mut pos = pos;
    loop {
        if tokens.get(pos) == Some(close) {
            return Ok((items, pos + 1));
        }
        let (item, new_pos) = parse_comparison(tokens, pos, depth)?;
        items.push(item);
        pos = new_pos;
        match tokens.get(pos) {
            Some(Token::Comma) => pos += 1,
            Some(t) if t == close => return Ok((items, pos + 1)),
            _ => return Err(format!("expected ',' or '{}'", close.describe())),
        }
    }
}

/// Parses the inside of `[...]`: an expression, a slice, or a comma tuple.
fn parse_subscript(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let mut parts = Vec::new();
    let mut pos = pos;
    loop {
        let (part, new_pos) = parse_slice_or_expr(tokens, pos, depth)?;
        parts.push(part);
        pos = new_pos;
        match tokens.get(pos) {
            Some(Token::Comma) => pos += 1,
            Some(Token::RBracket) => break,
            _ => return Err("expected ',' or ']' in subscript".to_string()),
        }
    }
    let index = if parts.len() == 1 {
        parts.remove(0)
    } else {
        Expr::Tuple(parts)
    };
    Ok((index, pos + 1))
}

fn parse_slice_or_expr(tokens: &[Token], pos: usize, depth: usize) -> Result<(Expr, usize), String> {
    let (start, pos) = if tokens.get(pos) == Some(&Token::Colon) {
        (None, pos)
    } else {
        let (expr, pos) = parse_comparison(tokens, pos, depth)?;
        if tokens.get(pos) != Some(&Token::Colon) {
            return Ok((expr, pos));
        }
        (Some(Box::new(expr)), pos)
    };

    // At the colon.
    let pos = pos + 1;
    let (stop, pos) = match tokens.get(pos) {
        Some(Token::RBracket) | Some(Token::Comma) => (None, pos),
        _ => {
            let (expr, pos) = parse_comparison(tokens, pos, depth)?;
            (Some(Box::new(expr)), pos)
        }
    };
    if tokens.get(pos) == Some(&Token::Colon) {
        return Err("slice steps are not supported".to_string());
    }
    Ok((Expr::Slice { start, stop }, pos))
}

type CallArgs = (Vec<Expr>, Vec<(String, Expr)>, usize);

fn parse_call_args(tokens: &[Token], pos: usize, depth: usize) -> Result<CallArgs, String> {
    let mut args = Vec::new();
    let mut kwargs: Vec<(String, Expr)> = Vec::new();
    let mut pos = pos;

    loop {
        if tokens.get(pos) == Some(&Token::RParen) {
            return Ok((args, kwargs, pos + 1));
        }

        if let (Some(Token::Ident(key)), Some(Token::Assign)) = (tokens.get(pos), tokens.get(pos + 1)) {
            if kwargs.iter().any(|(k, _)| k == key) {
                return Err(format!("keyword argument '{key}' repeated"));
            }
            let (value, new_pos) = parse_comparison(tokens, pos + 2, depth)?;
            kwargs.push((key.clone(), value));
            pos = new_pos;
        } else {
            if !kwargs.is_empty() {
                return Err("positional argument follows keyword argument".to_string());
            }
            let (value, new_pos) = parse_comparison(tokens, pos, depth)?;
            args.push(value);
            pos = new_pos;
        }

        match tokens.get(pos) {
            Some(Token::Comma) => pos += 1,
            Some(Token::RParen) => return Ok((args, kwargs, pos + 1)),
            _ => return Err("expected ',' or ')' in call".to_string()),
        }
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
