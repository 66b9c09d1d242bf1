//! Tokenizer for query expressions.

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Pipe,
    Tilde,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    /// Single `=`, only valid for keyword arguments.
    Assign,
}

impl Token {
    /// Short human-readable form, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Int(i) => i.to_string(),
            Token::Float(f) => f.to_string(),
            Token::Str(s) => format!("'{s}'"),
            Token::Ident(name) => name.clone(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBracket => "[".into(),
            Token::RBracket => "]".into(),
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Colon => ":".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Amp => "&".into(),
            Token::Pipe => "|".into(),
            Token::Tilde => "~".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::LtEq => "<=".into(),
            Token::GtEq => ">=".into(),
            Token::EqEq => "==".into(),
            Token::NotEq => "!=".into(),
            Token::Assign => "=".into(),
        }
    }
}

/// Tokens that are always exactly one character.
fn single_char_token(c: char) -> Option<Token> {
    let token = match c {
        '(' => Token::LParen,
        ')' => Token::RParen,
        '[' => Token::LBracket,
        ']' => Token::RBracket,
        ',' => Token::Comma,
        ':' => Token::Colon,
        '+' => Token::Plus,
        '-' => Token::Minus,
        '&' => Token::Amp,
        '|' => Token::Pipe,
        '~' => Token::Tilde,
        _ => return None,
    };
    Some(token)
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if let Some(token) = single_char_token(c) {
            tokens.push(token);
            chars.next();
            continue;
        }
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    return Err("operator '**' is not supported".to_string());
                }
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    return Err("operator '//' is not supported".to_string());
                }
                tokens.push(Token::Slash);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::LtEq);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::GtEq);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqEq);
                } else {
                    tokens.push(Token::Assign);
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::NotEq);
                } else {
                    return Err("unexpected character '!'".to_string());
                }
            }
            '.' => {
                chars.next();
                if chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                    let mut literal = String::from("0.");
                    take_digits(&mut chars, &mut literal);
                    tokens.push(number_token(&literal)?);
                } else {
                    tokens.push(Token::Dot);
                }
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, c)?));
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                take_digits(&mut chars, &mut literal);
                if chars.peek() == Some(&'.') {
                    literal.push('.');
                    chars.next();
                    take_digits(&mut chars, &mut literal);
                }
                if matches!(chars.peek(), Some('e') | Some('E')) {
                    literal.push('e');
                    chars.next();
                    if let Some(&sign @ ('+' | '-')) = chars.peek() {
                        literal.push(sign);
                        chars.next();
                    }
                    take_digits(&mut chars, &mut literal);
                }
                tokens.push(number_token(&literal)?);
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            ';' => return Err("statements are not allowed; write a single expression".to_string()),
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}

/// Consumes ASCII digits and `_` separators.
fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            out.push(ch);
            chars.next();
        } else if ch == '_' {
            chars.next();
        } else {
            break;
        }
    }
}

fn number_token(literal: &str) -> Result<Token, String> {
    if !literal.contains(['.', 'e']) {
        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Token::Int(i));
        }
    }
    literal
        .parse::<f64>()
        .map(Token::Float)
        .map_err(|_| format!("invalid number literal '{literal}'"))
}

fn read_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    quote: char,
) -> Result<String, String> {
    let mut s = String::new();
    loop {
        match chars.next() {
            Some(ch) if ch == quote => return Ok(s),
            Some('\\') => match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some(ch) if ch == '\\' || ch == '\'' || ch == '"' => s.push(ch),
                // Unknown escapes are kept verbatim (regex patterns rely on this).
                Some(ch) => {
                    s.push('\\');
                    s.push(ch);
                }
                None => break,
            },
            Some(ch) => s.push(ch),
            None => break,
        }
    }
    Err("unterminated string literal".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_column_filter() {
        let tokens = tokenize("df[df['Loan Amount (INR)'] >= 1_000.5]").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("df".into()),
                Token::LBracket,
                Token::Ident("df".into()),
                Token::LBracket,
                Token::Str("Loan Amount (INR)".into()),
                Token::RBracket,
                Token::GtEq,
                Token::Float(1000.5),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_tokenize_keyword_argument() {
        let tokens = tokenize("x.str.contains(\"a\", case=False)").unwrap();
        assert!(tokens.contains(&Token::Assign));
        assert!(tokens.contains(&Token::Str("a".into())));
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(tokenize("12").unwrap(), vec![Token::Int(12)]);
        assert_eq!(tokenize("1e3").unwrap(), vec![Token::Float(1000.0)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Float(0.5)]);
    }

    #[test]
    fn test_tokenize_string_escapes() {
        assert_eq!(
            tokenize(r"'O\'Brien'").unwrap(),
            vec![Token::Str("O'Brien".into())]
        );
        assert_eq!(tokenize(r"'\d+'").unwrap(), vec![Token::Str(r"\d+".into())]);
    }

    #[test]
    fn test_tokenize_rejects_statements_and_unknown_operators() {
        assert!(tokenize("a = 1; b").is_err());
        assert!(tokenize("2 ** 3").is_err());
        assert!(tokenize("x @ y").is_err());
        assert!(tokenize("'open").is_err());
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(
            tokenize("~(a|b)&[c,d:-e+f]").unwrap(),
            vec![
                Token::Tilde,
                Token::LParen,
                Token::Ident("a".into()),
                Token::Pipe,
                Token::Ident("b".into()),
                Token::RParen,
                Token::Amp,
                Token::LBracket,
                Token::Ident("c".into()),
                Token::Comma,
                Token::Ident("d".into()),
                Token::Colon,
                Token::Minus,
                Token::Ident("e".into()),
                Token::Plus,
                Token::Ident("f".into()),
                Token::RBracket,
            ]
        );
    }
}
