use core::fmt;
use core::mem::take;

use crate::error::{PropertyError, Result};

// -----------------------------------------------------------------------------
// Atom

/// One segment of a property expression.
///
/// `user.addresses['home'].zip` has four atoms: `user`, `addresses`,
/// `home` (bracketed and quoted) and `zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    text: String,
    bracketed: bool,
    quoted: bool,
    offset: usize,
}

impl Atom {
    /// The segment text, with quotes and escapes removed.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` if the segment was written inside `[...]`.
    #[inline]
    pub fn is_bracketed(&self) -> bool {
        self.bracketed
    }

    /// `true` if the segment was written as a quoted literal.
    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Byte offset of the segment in the expression.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The segment as a sequence index.
    pub fn as_index(&self) -> Option<usize> {
        self.text.parse().ok()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.bracketed, self.quoted) {
            (true, true) => write!(f, "['{}']", self.text.replace('\\', "\\\\").replace('\'', "\\'")),
            (true, false) => write!(f, "[{}]", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

// -----------------------------------------------------------------------------
// Tokenizer

/// Splits an expression into atoms in a single pass.
///
/// - `.` ends a segment.
/// - `[` starts a bracketed segment, `]` ends it and may be followed by
///   one `.`.
/// - Inside brackets, `'` or `"` start a quoted literal in which `.`,
///   `[` and `]` are plain text and `\` escapes the next character.
pub(crate) fn tokenize(expression: &str) -> Result<Vec<Atom>> {
    let error = |offset: usize, message: &'static str| PropertyError::Syntax {
        expression: expression.into(),
        offset,
        message,
    };

    if expression.is_empty() {
        return Err(error(0, "empty expression"));
    }

    let mut atoms = Vec::new();
    let mut buffer = String::new();
    let mut start = 0;
    // Offset of the open `[`.
    let mut bracket: Option<usize> = None;
    // Open quote character and its offset.
    let mut quote: Option<(char, usize)> = None;
    let mut quoted = false;
    let mut after_bracket = false;

    let mut chars = expression.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if let Some((open, _)) = quote {
            match ch {
                '\\' => match chars.next() {
                    Some((_, escaped)) => buffer.push(escaped),
                    None => return Err(error(offset, "dangling escape")),
                },
                c if c == open => quote = None,
                c => buffer.push(c),
            }
            continue;
        }

        let closed = take(&mut after_bracket);
        match ch {
            '.' if bracket.is_some() => return Err(error(offset, "unquoted `.` inside brackets")),
            '.' => {
                if !closed {
                    if buffer.is_empty() {
                        return Err(error(offset, "empty segment"));
                    }
                    atoms.push(Atom {
                        text: take(&mut buffer),
                        bracketed: false,
                        quoted: false,
                        offset: start,
                    });
                }
                start = offset + 1;
            }
            '[' if bracket.is_some() => return Err(error(offset, "nested `[`")),
            '[' => {
                if !buffer.is_empty() {
                    atoms.push(Atom {
                        text: take(&mut buffer),
                        bracketed: false,
                        quoted: false,
                        offset: start,
                    });
                } else if offset != 0 && !closed {
                    return Err(error(offset, "empty segment"));
                }
                bracket = Some(offset);
                quoted = false;
                start = offset + 1;
            }
            ']' => {
                let Some(open) = bracket.take() else {
                    return Err(error(offset, "unbalanced `]`"));
                };
                if buffer.is_empty() && !quoted {
                    return Err(error(open, "empty brackets"));
                }
                atoms.push(Atom {
                    text: take(&mut buffer),
                    bracketed: true,
                    quoted,
                    offset: open + 1,
                });
                quoted = false;
                after_bracket = true;
                if let Some(&(next, c)) = chars.peek()
                    && c != '.'
                    && c != '['
                {
                    return Err(error(next, "expected `.` or `[` after `]`"));
                }
            }
            '\'' | '"' if bracket.is_none() => {
                return Err(error(offset, "quotes are only allowed inside brackets"));
            }
            '\'' | '"' => {
                if quoted || !buffer.is_empty() {
                    return Err(error(offset, "a quoted literal must fill the brackets"));
                }
                quote = Some((ch, offset));
                quoted = true;
            }
            c => {
                if quoted {
                    return Err(error(offset, "unexpected character after closing quote"));
                }
                buffer.push(c);
            }
        }
    }

    if let Some((_, open)) = quote {
        return Err(error(open, "unterminated quote"));
    }
    if let Some(open) = bracket {
        return Err(error(open, "unclosed `[`"));
    }
    if !buffer.is_empty() {
        atoms.push(Atom {
            text: buffer,
            bracketed: false,
            quoted: false,
            offset: start,
        });
    } else if !after_bracket {
        return Err(error(expression.len(), "expression ends with `.`"));
    }

    Ok(atoms)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::PropertyError;

    fn texts(expression: &str) -> Vec<String> {
        tokenize(expression)
            .unwrap()
            .iter()
            .map(|atom| atom.text().to_owned())
            .collect()
    }

    fn syntax_offset(expression: &str) -> usize {
        match tokenize(expression) {
            Err(PropertyError::Syntax { offset, .. }) => offset,
            other => panic!("expected a syntax error for `{expression}`, got {other:?}"),
        }
    }

    #[test]
    fn dotted_and_bracketed_segments() {
        assert_eq!(texts("user.name"), ["user", "name"]);
        assert_eq!(texts("items[5]"), ["items", "5"]);
        assert_eq!(texts("grid[1][2].x"), ["grid", "1", "2", "x"]);
        assert_eq!(texts("[0].name"), ["0", "name"]);
        assert_eq!(texts("a[0]"), ["a", "0"]);
    }

    #[test]
    fn quoted_literals_keep_special_characters() {
        let atoms = tokenize(r#"map['a.b[c]'].x"#).unwrap();
        assert_eq!(atoms[1].text(), "a.b[c]");
        assert!(atoms[1].is_bracketed());
        assert!(atoms[1].is_quoted());
        assert!(!atoms[2].is_quoted());

        assert_eq!(texts(r#"map["it's"]"#), ["map", "it's"]);
        assert_eq!(texts(r"map['it\'s']"), ["map", "it's"]);
        assert_eq!(texts("map['']"), ["map", ""]);
    }

    #[test]
    fn numeric_atoms_parse_as_indices() {
        let atoms = tokenize("items[12].x").unwrap();
        assert_eq!(atoms[1].as_index(), Some(12));
        assert_eq!(atoms[2].as_index(), None);
        assert_eq!(atoms[1].offset(), 6);
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        assert_eq!(syntax_offset("..a"), 0);
        assert_eq!(syntax_offset("a["), 1);
        assert_eq!(syntax_offset("a[']"), 2);
        assert_eq!(syntax_offset("a]"), 1);
        assert_eq!(syntax_offset(""), 0);
        assert_eq!(syntax_offset("a."), 2);
        assert_eq!(syntax_offset("a[]"), 1);
        assert_eq!(syntax_offset("a[0]b"), 4);
        assert_eq!(syntax_offset("a.[0]"), 2);
        assert_eq!(syntax_offset("a'b'"), 1);
        assert_eq!(syntax_offset("a[1.2]"), 3);
    }
}
