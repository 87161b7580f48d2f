//! Tool preset `.gtp` (spec §6): Lisp-like parenthesized records
//! `(key value …)` where `value ∈ {yes|no, decimal number, "string",
//! nested list}`. Round-trip preserves key order.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum GtpValue {
    Bool(bool),
    Number(f64),
    Str(String),
    /// A nested `(key value …)` record.
    Record(GtpRecord),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GtpRecord {
    pub key: String,
    pub values: Vec<GtpValue>,
}

impl GtpRecord {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).map_err(|_| Error::InvalidString { offset: 0 })?;
        let chars: Vec<char> = text.chars().collect();
        let mut pos = skip_ws(&chars, 0);
        if chars.get(pos) != Some(&'(') {
            return Err(Error::BadMagic { offset: pos });
        }
        let (record, _) = parse_record(&chars, pos + 1)?;
        Ok(record)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        write_record(self, &mut out);
        out.push('\n');
        out.into_bytes()
    }
}

fn skip_ws(chars: &[char], mut pos: usize) -> usize {
    while matches!(chars.get(pos), Some(c) if c.is_whitespace()) {
        pos += 1;
    }
    pos
}

/// Parses the content of a record whose opening `(` has already been
/// consumed: `key value* )`. Returns the record and the position just past
/// the closing `)`.
fn parse_record(chars: &[char], start: usize) -> Result<(GtpRecord, usize)> {
    let mut pos = skip_ws(chars, start);
    let key_start = pos;
    while matches!(chars.get(pos), Some(c) if !c.is_whitespace() && *c != ')' && *c != '(') {
        pos += 1;
    }
    let key: String = chars[key_start..pos].iter().collect();
    if key.is_empty() {
        return Err(Error::InvalidString { offset: key_start });
    }

    let mut values = Vec::new();
    loop {
        pos = skip_ws(chars, pos);
        match chars.get(pos) {
            Some(')') => return Ok((GtpRecord { key, values }, pos + 1)),
            Some('(') => {
                let (child, next) = parse_record(chars, pos + 1)?;
                values.push(GtpValue::Record(child));
                pos = next;
            }
            Some('"') => {
                let (string, next) = parse_string(chars, pos + 1)?;
                values.push(GtpValue::Str(string));
                pos = next;
            }
            Some(_) => {
                let token_start = pos;
                while matches!(chars.get(pos), Some(c) if !c.is_whitespace() && *c != ')') {
                    pos += 1;
                }
                let token: String = chars[token_start..pos].iter().collect();
                values.push(parse_atom(&token, token_start)?);
            }
            None => return Err(Error::Truncated { offset: pos, needed: 1, available: 0 }),
        }
    }
}

fn parse_string(chars: &[char], start: usize) -> Result<(String, usize)> {
    let mut pos = start;
    let mut out = String::new();
    loop {
        match chars.get(pos) {
            Some('"') => return Ok((out, pos + 1)),
            Some(c) => {
                out.push(*c);
                pos += 1;
            }
            None => return Err(Error::Truncated { offset: pos, needed: 1, available: 0 }),
        }
    }
}

fn parse_atom(token: &str, offset: usize) -> Result<GtpValue> {
    match token {
        "yes" => Ok(GtpValue::Bool(true)),
        "no" => Ok(GtpValue::Bool(false)),
        _ => token.parse::<f64>().map(GtpValue::Number).map_err(|_| Error::InvalidString { offset }),
    }
}

fn write_record(record: &GtpRecord, out: &mut String) {
    out.push('(');
    out.push_str(&record.key);
    for value in &record.values {
        out.push(' ');
        write_value(value, out);
    }
    out.push(')');
}

fn write_value(value: &GtpValue, out: &mut String) {
    match value {
        GtpValue::Bool(true) => out.push_str("yes"),
        GtpValue::Bool(false) => out.push_str("no"),
        GtpValue::Number(n) => out.push_str(&format_number(*n)),
        GtpValue::Str(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        GtpValue::Record(record) => write_record(record, out),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_record_preserving_key_order() {
        let record = GtpRecord {
            key: "tool-preset".to_string(),
            values: vec![
                GtpValue::Record(GtpRecord { key: "name".to_string(), values: vec![GtpValue::Str("Basic".to_string())] }),
                GtpValue::Record(GtpRecord { key: "opacity".to_string(), values: vec![GtpValue::Number(1.0)] }),
                GtpValue::Record(GtpRecord { key: "use-brush".to_string(), values: vec![GtpValue::Bool(true)] }),
            ],
        };

        let encoded = record.to_bytes();
        let decoded = GtpRecord::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, record);
    }
}
