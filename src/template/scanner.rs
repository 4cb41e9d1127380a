use super::Token;

/// Leading marker of a named placeholder.
pub(super) const MARKER: char = ':';

/// Reserved for positional markers in parameterized output.
pub(super) const POSITIONAL_MARKER: char = '?';

#[derive(Clone, Copy)]
enum State {
    Text,
    Placeholder { offset: usize },
}

pub(super) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a template into literal text and placeholders in a single left-to-right pass.
///
/// Offsets count characters, not bytes. A marker that is not followed by a name character
/// stays in the surrounding literal.
pub(super) fn scan(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut state = State::Text;
    let mut buf = String::new();
    let mut chars = template.chars().enumerate().peekable();

    while let Some((idx, c)) = chars.next() {
        let next_is_name = chars.peek().is_some_and(|&(_, next)| is_name_char(next));
        match state {
            State::Text => {
                if c == MARKER && next_is_name {
                    if !buf.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut buf)));
                    }
                    state = State::Placeholder { offset: idx };
                } else {
                    buf.push(c);
                }
            }
            State::Placeholder { offset } => {
                buf.push(c);
                if !next_is_name {
                    tokens.push(Token::Placeholder {
                        name: std::mem::take(&mut buf),
                        offset,
                    });
                    state = State::Text;
                }
            }
        }
    }

    if !buf.is_empty() {
        tokens.push(Token::Literal(buf));
    }

    tokens
}

/// Character offset of the first reserved positional marker, if any.
pub(super) fn find_positional_marker(template: &str) -> Option<usize> {
    template.chars().position(|c| c == POSITIONAL_MARKER)
}
