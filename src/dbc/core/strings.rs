// Utilities for splitting DBC statements into tokens.
//
// These helpers support escaped quotes (\") and multi-line quoted strings,
// which are common in CM_ comments or attribute values.

/// One lexical token of a DBC statement.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token<'a> {
    /// Bare word or number.
    Word(&'a str),
    /// Content of a `"..."` string, escapes removed.
    Quoted(String),
}

impl Token<'_> {
    pub(crate) fn word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::Quoted(_) => None,
        }
    }
}

// Count unescaped double quotes in a string.
// A quote is considered escaped if immediately preceded by an odd number of backslashes.
pub(crate) fn count_unescaped_quotes(s: &str) -> usize {
    let mut count = 0usize;
    let mut backslashes = 0usize;
    for ch in s.chars() {
        if ch == '\\' {
            backslashes += 1;
            continue;
        }
        if ch == '"' && backslashes % 2 == 0 {
            count += 1;
        }
        backslashes = 0;
    }
    count
}

// True while a quoted segment is still open (odd number of unescaped quotes).
pub(crate) fn has_open_quote(s: &str) -> bool {
    count_unescaped_quotes(s) % 2 == 1
}

/// Splits a statement on whitespace and the `, ; :` separators; quoted strings stay whole.
pub(crate) fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut out: Vec<Token<'_>> = Vec::new();
    let mut chars = s.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() || matches!(ch, ',' | ';' | ':') {
            chars.next();
            continue;
        }

        if ch == '"' {
            chars.next(); // skip opening quote
            let mut text = String::new();
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            text.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => text.push(c),
                }
            }
            out.push(Token::Quoted(text));
            continue;
        }

        let mut end = s.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() || matches!(c, ',' | ';' | ':' | '"') {
                end = idx;
                break;
            }
            chars.next();
        }
        out.push(Token::Word(&s[start..end]));
    }

    out
}
