//! Codec for the list literals stored in the recipe dataset's text columns.
//!
//! Ingredient columns look like `['2 cups flour', "baker's chocolate"]` and
//! nutrition columns like `[138.4, 10.0, 0.0]`. Decoding accepts single or
//! double quoted strings with backslash escapes, signed decimal numbers and a
//! trailing comma. Encoding produces the same notation so the output table can
//! be read back by the same tools that produced the input.

use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LiteralError(String);

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Number(f64),
}

/// Decode a list literal into its items.
pub fn parse_list(input: &str) -> Result<Vec<LiteralValue>, LiteralError> {
    ListParser::new(input).parse()
}

/// Decode a list literal whose items must all be strings.
pub fn parse_string_list(input: &str) -> Result<Vec<String>, LiteralError> {
    parse_list(input)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            LiteralValue::Str(s) => Ok(s),
            LiteralValue::Number(n) => Err(LiteralError(format!(
                "expected string at item {i}, found number {n}"
            ))),
        })
        .collect()
}

/// Decode a list literal whose items must all be numbers.
pub fn parse_number_list(input: &str) -> Result<Vec<f64>, LiteralError> {
    parse_list(input)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            LiteralValue::Number(n) => Ok(n),
            LiteralValue::Str(s) => Err(LiteralError(format!(
                "expected number at item {i}, found string '{s}'"
            ))),
        })
        .collect()
}

pub fn encode_string_list<S: AsRef<str>>(items: &[S]) -> String {
    let encoded: Vec<String> = items.iter().map(|s| quote_string(s.as_ref())).collect();
    format!("[{}]", encoded.join(", "))
}

pub fn encode_number_list(items: &[f64]) -> String {
    let encoded: Vec<String> = items.iter().map(|n| format_number(*n)).collect();
    format!("[{}]", encoded.join(", "))
}

/// Format a float the way the dataset writes them: integral values keep a `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

// `1e20` -> `1e+20`, `1.5e-7` -> `1.5e-07`
fn format_exponent(value: f64) -> String {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

fn quote_string(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

struct ListParser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> ListParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn parse(mut self) -> Result<Vec<LiteralValue>, LiteralError> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, '[')) => {}
            Some((pos, c)) => return Err(self.error(pos, &format!("expected '[', found '{c}'"))),
            None => return Err(LiteralError("empty list literal".to_string())),
        }

        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.chars.next();
        } else {
            loop {
                items.push(self.parse_value()?);
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => {
                        self.skip_whitespace();
                        if self.peek_char() == Some(']') {
                            self.chars.next();
                            break;
                        }
                    }
                    Some((_, ']')) => break,
                    Some((pos, c)) => {
                        return Err(self.error(pos, &format!("expected ',' or ']', found '{c}'")))
                    }
                    None => return Err(self.error(self.input.len(), "unterminated list")),
                }
            }
        }

        self.skip_whitespace();
        if let Some((pos, _)) = self.chars.peek().copied() {
            return Err(self.error(pos, "unexpected characters after list"));
        }

        Ok(items)
    }

    fn parse_value(&mut self) -> Result<LiteralValue, LiteralError> {
        match self.chars.peek().copied() {
            Some((_, quote @ ('\'' | '"'))) => {
                self.chars.next();
                self.parse_string(quote).map(LiteralValue::Str)
            }
            Some((_, c)) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                self.parse_number().map(LiteralValue::Number)
            }
            Some((pos, c)) => Err(self.error(pos, &format!("unexpected character '{c}'"))),
            None => Err(self.error(self.input.len(), "unexpected end of input")),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(value),
                Some((pos, '\\')) => match self.chars.next() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '\'')) => value.push('\''),
                    Some((_, '"')) => value.push('"'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '\n')) => {}
                    Some((_, 'x')) => value.push(self.parse_hex_escape(pos, 2)?),
                    Some((_, 'u')) => value.push(self.parse_hex_escape(pos, 4)?),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(self.error(pos, "unterminated string")),
                },
                Some((_, c)) => value.push(c),
                None => return Err(self.error(self.input.len(), "unterminated string")),
            }
        }
    }

    fn parse_hex_escape(&mut self, pos: usize, digits: usize) -> Result<char, LiteralError> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.chars.next() {
                Some((_, c)) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(self.error(pos, "truncated escape sequence")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(pos, "invalid escape sequence"))
    }

    fn parse_number(&mut self) -> Result<f64, LiteralError> {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }

        let text = &self.input[start..end];
        text.parse::<f64>()
            .map_err(|_| self.error(start, &format!("invalid number '{text}'")))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn error(&self, pos: usize, message: &str) -> LiteralError {
        LiteralError(format!("{message} at offset {pos}"))
    }
}
