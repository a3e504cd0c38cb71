use logos::Logos;

use crate::util::error::Error;
use crate::util::text::Span;

/// `--key` and `--key=value` arguments of one input, by key.
///
/// Values stay raw spans into the input until they get bound. A key supplied twice
/// keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatingArgs {
	entries: Vec<(String, Option<Span>)>,
}

impl FloatingArgs {
	pub fn insert(&mut self, key: String, value: Option<Span>) {
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((key, value)),
		}
	}

	/// `None` if the key wasn't supplied, `Some(None)` for a bare `--key`.
	pub fn get(&self, key: &str) -> Option<Option<Span>> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Input split into positional tokens and floating arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
	pub tokens: Vec<Span>,
	pub floating: FloatingArgs,
}

/// Raw pieces of a command input.
///
/// A quote only opens a quoted span at the start of a token, and a plain run never
/// starts with `--`, so every input splits one way.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum Piece {
	#[regex(r#""([^"\\]|\\(.|\n))*""#)]
	#[regex(r#"'([^'\\]|\\(.|\n))*'"#)]
	Quoted,

	#[regex(r#""([^"\\]|\\(.|\n))*\\?"#)]
	#[regex(r#"'([^'\\]|\\(.|\n))*\\?"#)]
	Unclosed,

	// `--key`, `--key=value`, `--key="quoted value"`
	#[regex(r#"--[^\s=]*"#)]
	#[regex(r#"--[^\s=]*=(([^\s\\"']|\\(.|\n))([^\s\\]|\\(.|\n))*\\?)?"#)]
	#[regex(r#"--[^\s=]*="([^"\\]|\\(.|\n))*""#)]
	#[regex(r#"--[^\s=]*='([^'\\]|\\(.|\n))*'"#)]
	Flag,

	#[regex(r#"([^\s\\"'-]|\\(.|\n)|-([^\s\\-]|\\(.|\n)))([^\s\\]|\\(.|\n))*\\?"#)]
	#[token("-")]
	Plain,
}

/// Splits a command input string.
///
/// Tokens are separated by whitespace unless it is escaped or enclosed in single or
/// double quotes. Flag keys (`--x`) can't be quoted and don't tolerate whitespace
/// between the first `-` and the end of their value.
pub struct Lexer<'a> {
	source: &'a str,
}

impl<'a> Lexer<'a> {
	pub fn new(source: &'a str) -> Self {
		Self { source }
	}

	pub fn tokenize(&self) -> Result<Tokenized, Error> {
		let mut out = Tokenized::default();

		for (piece, range) in Piece::lexer(self.source).spanned() {
			match piece {
				Ok(Piece::Quoted) => out.tokens.push(Span::new(range.start + 1, range.end - 1)),
				Ok(Piece::Unclosed) => {
					return Err(Error::UnterminatedQuote {
						quote: self.char_at(range.start),
						position: range.start,
					});
				}
				Ok(Piece::Flag) => {
					let (key, value) = self.flag(Span::new(range.start, range.end))?;
					out.floating.insert(key, value);
				}
				// Err is a lone backslash at the very end
				Ok(Piece::Plain) | Err(()) => out.tokens.push(Span::new(range.start, range.end)),
			}
		}

		Ok(out)
	}

	/// Key and value span of a `--key[=value]` piece.
	fn flag(&self, span: Span) -> Result<(String, Option<Span>), Error> {
		let text = span.text(self.source);
		let (key, value) = match text[2..].split_once('=') {
			Some((key, value)) => (key, Some(value)),
			None => (&text[2..], None),
		};

		if key.is_empty() {
			return Err(Error::MissingFlagName { position: span.start });
		}

		let value = value.map(|value| {
			let start = span.end - value.len();
			match value.chars().next() {
				Some('"' | '\'') => Span::new(start + 1, span.end - 1),
				_ => Span::new(start, span.end),
			}
		});

		Ok((key.to_string(), value))
	}

	fn char_at(&self, offset: usize) -> char {
		self.source[offset..].chars().next().unwrap_or('"')
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn texts<'a>(source: &'a str, tokenized: &Tokenized) -> Vec<&'a str> {
		tokenized.tokens.iter().map(|span| span.text(source)).collect()
	}

	#[test]
	fn splits_on_whitespace() {
		let source = "  install\tclient \n 1.20.1 ";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["install", "client", "1.20.1"]);
		assert!(tokenized.floating.is_empty());
	}

	#[test]
	fn quotes_keep_whitespace() {
		let source = r#"say "hello world" 'it''s' "a \" b""#;
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(
			texts(source, &tokenized),
			vec!["say", "hello world", "it", "s", r#"a \" b"#]
		);
	}

	#[test]
	fn escaped_whitespace_stays_in_token() {
		let source = r"my\ world next";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec![r"my\ world", "next"]);
	}

	#[test]
	fn collects_floating_arguments() {
		let source = r#"install --no-profile client --server-dir="my server" --log=debug 1.20"#;
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["install", "client", "1.20"]);
		assert_eq!(
			tokenized.floating.keys().collect::<Vec<_>>(),
			vec!["no-profile", "server-dir", "log"]
		);
		assert_eq!(tokenized.floating.get("no-profile"), Some(None));
		assert_eq!(
			tokenized.floating.get("server-dir").flatten().map(|s| s.text(source)),
			Some("my server")
		);
		assert_eq!(
			tokenized.floating.get("log").flatten().map(|s| s.text(source)),
			Some("debug")
		);
		assert_eq!(tokenized.floating.get("missing"), None);
	}

	#[test]
	fn quotes_split_only_at_token_start() {
		let source = r#"it's --dir="a b"c"#;
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["it's", "c"]);
		assert_eq!(
			tokenized.floating.get("dir").flatten().map(|s| s.text(source)),
			Some("a b")
		);
	}

	#[test]
	fn trailing_backslash_is_kept() {
		let source = r"a b\ \";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["a", r"b\ \"]);

		let source = r"a \";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["a", r"\"]);
	}

	#[test]
	fn single_dash_is_positional() {
		let source = "cat - -n";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(texts(source, &tokenized), vec!["cat", "-", "-n"]);
		assert!(tokenized.floating.is_empty());
	}

	#[test]
	fn repeated_flag_keeps_last_value() {
		let source = "--log=info --log=trace";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(tokenized.floating.len(), 1);
		assert_eq!(
			tokenized.floating.get("log").flatten().map(|s| s.text(source)),
			Some("trace")
		);
	}

	#[test]
	fn empty_flag_value() {
		let source = "--dir= x";
		let tokenized = Lexer::new(source).tokenize().unwrap();

		assert_eq!(tokenized.floating.get("dir").flatten().map(|s| s.is_empty()), Some(true));
		assert_eq!(texts(source, &tokenized), vec!["x"]);
	}

	#[test]
	fn unterminated_quotes_fail() {
		assert!(matches!(
			Lexer::new(r#"install "client"#).tokenize(),
			Err(Error::UnterminatedQuote {
				quote: '"',
				position: 8
			})
		));
		assert!(matches!(
			Lexer::new("--dir='/srv").tokenize(),
			Err(Error::UnterminatedQuote {
				quote: '\'',
				position: 6
			})
		));
		assert!(matches!(
			Lexer::new(r#"a "b\""#).tokenize(),
			Err(Error::UnterminatedQuote { .. })
		));
	}

	#[test]
	fn bare_double_dash_fails() {
		assert!(matches!(
			Lexer::new("install -- x").tokenize(),
			Err(Error::MissingFlagName { position: 8 })
		));
	}
}
