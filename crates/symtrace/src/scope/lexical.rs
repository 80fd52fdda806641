//! Lexical approximation used when a fragment does not parse.
//!
//! Literals and comments are blanked, object-key occurrences are ignored and
//! the remaining text is searched for `name` on identifier boundaries. Shadowing
//! is not detected in this mode.

use memchr::memmem;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Characters after which a `/` starts a regular expression literal.
fn regex_may_follow(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => "(,=:[!&|?{};+-*%<>~^".contains(c),
    }
}

/// Replace string, template and regex literals and comments with spaces.
///
/// Every removed character becomes one ASCII space, so the output has the
/// same number of characters as the input.
pub(crate) fn strip_non_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut prev_significant: Option<char> = None;

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                out.push(' ');
                skip_quoted(&mut chars, &mut out, c);
                prev_significant = Some(c);
            }
            '`' => {
                // Template literals are blanked whole, interpolations included.
                out.push(' ');
                skip_template(&mut chars, &mut out);
                prev_significant = Some(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                out.push(' ');
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                    out.push(' ');
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(' ');
                let mut last = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if last == '*' && next == '/' {
                        break;
                    }
                    last = next;
                }
            }
            '/' if regex_may_follow(prev_significant) => {
                out.push(' ');
                skip_regex(&mut chars, &mut out);
                prev_significant = Some('/');
            }
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    prev_significant = Some(c);
                }
            }
        }
    }
    out
}

fn skip_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String, quote: char) {
    while let Some(c) = chars.next() {
        out.push(' ');
        match c {
            '\\' => {
                if chars.next().is_some() {
                    out.push(' ');
                }
            }
            '\n' => {
                // Unterminated string; keep the line break.
                out.pop();
                out.push('\n');
                return;
            }
            _ if c == quote => return,
            _ => {}
        }
    }
}

fn skip_template(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(if c == '\n' { '\n' } else { ' ' });
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(if escaped == '\n' { '\n' } else { ' ' });
                }
            }
            '`' => return,
            _ => {}
        }
    }
}

fn skip_regex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let mut in_class = false;
    while let Some(c) = chars.next() {
        if c == '\n' {
            out.push('\n');
            return;
        }
        out.push(' ');
        match c {
            '\\' => {
                if chars.next().is_some() {
                    out.push(' ');
                }
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                while chars.peek().is_some_and(|f| f.is_ascii_alphabetic()) {
                    chars.next();
                    out.push(' ');
                }
                return;
            }
            _ => {}
        }
    }
}

/// `name` occupies `start..end` as a non-shorthand object key: `{name:` or
/// `,name:`.
fn is_object_key(code: &str, start: usize, end: usize) -> bool {
    let before = code[..start].trim_end().chars().next_back();
    let after = code[end..].trim_start().chars().next();
    matches!(before, Some('{' | ',')) && after == Some(':')
}

/// Whether `name` appears as an identifier in `text`, ignoring literals,
/// comments and object keys.
pub(crate) fn mentions(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let code = strip_non_code(text);
    memmem::find_iter(code.as_bytes(), name.as_bytes()).any(|start| {
        let end = start + name.len();
        let before_ok = code[..start].chars().next_back().is_none_or(|c| !is_ident_char(c));
        let after_ok = code[end..].chars().next().is_none_or(|c| !is_ident_char(c));
        before_ok && after_ok && !is_object_key(&code, start, end)
    })
}
