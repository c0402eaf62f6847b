//! Include/exclude filtering of table names.
//!
//! Patterns use `filepath.Match` syntax: `*`, `?`, `[a-z]`, negated
//! `[^a-z]` and `\` escapes. They are matched case-sensitively against the
//! whole table name. Each pattern is rewritten into `glob::Pattern` syntax
//! once, at compile time.

use std::iter::Peekable;
use std::str::Chars;

use glob::{MatchOptions, Pattern};
use sift_core::{PatternError, SearchOptions};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Characters `glob::Pattern` treats specially inside `[...]`, in code point order.
const CLASS_SPECIAL: [char; 3] = ['!', '-', ']'];

/// Compiled include and exclude pattern sets.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl TableFilter {
    /// Compile both pattern lists. The first malformed pattern is reported.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, PatternError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn from_options(options: &SearchOptions) -> Result<Self, PatternError> {
        Self::new(options.include.as_slice(), options.exclude.as_slice())
    }

    /// Whether the name matches at least one include pattern.
    pub fn is_included(&self, name: &str) -> bool {
        matches_any(&self.include, name)
    }

    /// Whether the name matches any exclude pattern.
    pub fn is_excluded(&self, name: &str) -> bool {
        matches_any(&self.exclude, name)
    }

    /// Final decision for a table. An empty include set admits every table;
    /// an exclude match always rejects.
    pub fn allows(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.is_included(name) {
            return false;
        }
        !self.is_excluded(name)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>, PatternError> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            let malformed = |reason: &str| PatternError {
                pattern: p.to_string(),
                reason: reason.to_string(),
            };
            let translated = translate(p).map_err(malformed)?;
            Pattern::new(&translated).map_err(|e| malformed(e.msg))
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], name: &str) -> bool {
    patterns.iter().any(|p| p.matches_with(name, MATCH_OPTIONS))
}

/// Rewrite a `filepath.Match` pattern into `glob::Pattern` syntax.
fn translate(pattern: &str) -> Result<String, &'static str> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut after_star = false;

    while let Some(c) = chars.next() {
        match c {
            // `**` is not recursive here; a run of stars is one star.
            '*' if after_star => {}
            '*' | '?' => out.push(c),
            '\\' => push_literal(&mut out, chars.next().ok_or("trailing backslash")?),
            '[' => push_class(&mut out, &mut chars)?,
            _ => push_literal(&mut out, c),
        }
        after_star = c == '*';
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if matches!(c, '*' | '?' | '[' | ']') {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

/// Parse a class body (the opening `[` is already consumed) and emit an
/// equivalent `glob` class.
fn push_class(out: &mut String, chars: &mut Peekable<Chars<'_>>) -> Result<(), &'static str> {
    let negated = chars.next_if_eq(&'^').is_some();
    let mut ranges = Vec::new();
    loop {
        if !ranges.is_empty() && chars.next_if_eq(&']').is_some() {
            break;
        }
        let lo = class_char(chars)?;
        let hi = if chars.next_if_eq(&'-').is_some() {
            class_char(chars)?
        } else {
            lo
        };
        ranges.push((lo, hi));
    }

    // `glob` has no escapes inside classes, so `!`, `-` and `]` are pulled
    // out of the ranges and placed where it reads them literally.
    let mut plain = Vec::new();
    let mut special = Vec::new();
    for (lo, hi) in ranges {
        let mut start = lo;
        for s in CLASS_SPECIAL {
            if start <= s && s <= hi {
                if start < s {
                    plain.push((start, ascii_step(s, -1)));
                }
                if !special.contains(&s) {
                    special.push(s);
                }
                start = ascii_step(s, 1);
            }
        }
        if start <= hi {
            plain.push((start, hi));
        }
    }

    let mut body = String::new();
    if special.contains(&']') {
        body.push(']');
    }
    for (lo, hi) in plain {
        body.push(lo);
        if lo != hi {
            body.push('-');
            body.push(hi);
        }
    }
    let bang = special.contains(&'!');
    let dash = special.contains(&'-');
    if body.is_empty() && !negated {
        // A leading `!` would negate the class.
        if dash {
            body.push('-');
        }
        if bang {
            body.push('!');
        }
    } else {
        if bang {
            body.push('!');
        }
        if dash {
            body.push('-');
        }
    }

    match (negated, body.as_str()) {
        // Only reversed ranges: nothing can match.
        (false, "") => out.push_str("[!\u{0}-\u{10FFFF}]"),
        (true, "") => out.push('?'),
        (false, "!") => out.push('!'),
        _ => {
            out.push('[');
            if negated {
                out.push('!');
            }
            out.push_str(&body);
            out.push(']');
        }
    }

    Ok(())
}

fn class_char(chars: &mut Peekable<Chars<'_>>) -> Result<char, &'static str> {
    match chars.next() {
        None => Err("unterminated character class"),
        Some('-' | ']') => Err("unescaped '-' or ']' in character class"),
        Some('\\') => chars.next().ok_or("unterminated character class"),
        Some(c) => Ok(c),
    }
}

fn ascii_step(c: char, delta: i8) -> char {
    char::from((c as u8).wrapping_add_signed(delta))
}
