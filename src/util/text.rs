use std::borrow::Cow;

use logos::Logos;

/// Characters with a meaning of their own inside a usage string.
pub const USAGE_SPECIAL: &str = "()[]|=<>";

/// Half-open `[start, end)` byte range into a usage or input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

impl Span {
	pub fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	pub fn text<'a>(&self, source: &'a str) -> &'a str {
		&source[self.start..self.end]
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
	#[regex(r"\\(.|\n)", |lex| control(lex.slice()))]
	Escaped(char),

	#[regex(r"[^\\]+")]
	Plain,

	#[token("\\")]
	Trailing,
}

fn control(escape: &str) -> Option<char> {
	escape.chars().nth(1).map(|c| match c {
		'n' => '\n',
		'r' => '\r',
		't' => '\t',
		'b' => '\u{8}',
		other => other,
	})
}

/// Resolves backslash escapes.
///
/// `\n`, `\r`, `\t` and `\b` become their control characters, any other escaped
/// character is copied as is and a trailing lone backslash is kept. Text without
/// a backslash is returned borrowed.
pub fn unescape(raw: &str) -> Cow<'_, str> {
	if !raw.contains('\\') {
		return Cow::Borrowed(raw);
	}

	let mut out = String::with_capacity(raw.len());
	let mut lexer = Escape::lexer(raw);

	while let Some(piece) = lexer.next() {
		match piece {
			Ok(Escape::Escaped(c)) => out.push(c),
			Ok(Escape::Plain | Escape::Trailing) | Err(()) => out.push_str(lexer.slice()),
		}
	}

	Cow::Owned(out)
}

/// Escapes literal text so the usage lexer reads it back as one plain token.
pub fn escape_literal(text: &str) -> Cow<'_, str> {
	let needs_escape = |i: usize, c: char| {
		c == '\\'
			|| c.is_whitespace()
			|| USAGE_SPECIAL.contains(c)
			|| (c == '.' && text[i..].starts_with("..."))
	};

	if !text.char_indices().any(|(i, c)| needs_escape(i, c)) && !text.starts_with("--") {
		return Cow::Borrowed(text);
	}

	let mut out = String::with_capacity(text.len() + 4);
	for (i, c) in text.char_indices() {
		if needs_escape(i, c) || (i == 0 && text.starts_with("--")) {
			out.push('\\');
		}
		out.push(c);
	}

	Cow::Owned(out)
}

/// Quotes one command line argument so the input lexer reproduces it exactly.
///
/// For `--key=value` only the value is quoted, keeping the flag recognizable.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
	let plain = |s: &str| {
		!s.is_empty() && !s.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'))
	};

	if let Some((key, value)) = arg.strip_prefix("--").and_then(|rest| rest.split_once('=')) {
		if plain(key) {
			if plain(value) || value.is_empty() {
				return Cow::Borrowed(arg);
			}
			return Cow::Owned(format!("--{key}={}", quoted(value)));
		}
	}

	// a lone argument starting with -- is a flag and can't be quoted without changing meaning
	if plain(arg) || arg.starts_with("--") {
		Cow::Borrowed(arg)
	} else {
		Cow::Owned(quoted(arg))
	}
}

/// Joins an argv slice into a single input string for the matcher.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
	args.iter()
		.map(|arg| quote_arg(arg.as_ref()))
		.collect::<Vec<_>>()
		.join(" ")
}

fn quoted(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);
	out.push('"');
	for c in value.chars() {
		if matches!(c, '"' | '\\') {
			out.push('\\');
		}
		out.push(c);
	}
	out.push('"');
	out
}
