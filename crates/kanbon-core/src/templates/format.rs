//! Positional `{}` interpolation
//!
//! `{}` is a placeholder, `{{` and `}}` are literal braces. Any other use of a
//! brace is rejected so that malformed custom messages fail at write time.

use crate::error::DomainError;

enum Piece<'a> {
    Text(&'a str),
    Brace(char),
    Slot,
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>, DomainError> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'{' && b != b'}' {
            i += 1;
            continue;
        }

        if start < i {
            pieces.push(Piece::Text(&template[start..i]));
        }

        match (b, bytes.get(i + 1)) {
            (b'{', Some(b'{')) => pieces.push(Piece::Brace('{')),
            (b'}', Some(b'}')) => pieces.push(Piece::Brace('}')),
            (b'{', Some(b'}')) => pieces.push(Piece::Slot),
            _ => {
                return Err(DomainError::ValidationError(format!(
                    "unmatched '{}' at byte {i} in message template",
                    b as char
                )))
            }
        }
        i += 2;
        start = i;
    }

    if start < bytes.len() {
        pieces.push(Piece::Text(&template[start..]));
    }
    Ok(pieces)
}

/// Number of `{}` placeholders in a template
pub fn placeholder_count(template: &str) -> Result<usize, DomainError> {
    Ok(parse(template)?
        .iter()
        .filter(|p| matches!(p, Piece::Slot))
        .count())
}

/// Substitute `args` into the placeholders of `template`, in order.
///
/// The number of arguments must equal the number of placeholders.
pub fn format_positional(
    template: &str,
    locale: &str,
    args: &[String],
) -> Result<String, DomainError> {
    let pieces = parse(template)?;
    let expected = pieces.iter().filter(|p| matches!(p, Piece::Slot)).count();
    if expected != args.len() {
        return Err(DomainError::TemplateArgumentMismatch {
            locale: locale.to_string(),
            expected,
            given: args.len(),
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    for piece in pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Brace(c) => out.push(c),
            Piece::Slot => {
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                }
            }
        }
    }
    Ok(out)
}
