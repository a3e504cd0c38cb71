use logos::Logos;

use crate::util::error::Error;
use crate::util::text::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// `(` or `[`
	Open(char),
	/// `)` or `]`
	Close(char),
	Pipe,
	Equals,
	/// `...`
	Repeat,
	/// `<name>`
	Parameter,
	/// `--name`
	Flag,
	/// Any other run of non-whitespace.
	Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub span: Span,
}

/// Raw pieces of a usage string. Runs of text are split around `...`, which is why
/// trailing dots and a trailing lone backslash come out as pieces of their own.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum Piece {
	#[token("(", |_| '(')]
	#[token("[", |_| '[')]
	Open(char),

	#[token(")", |_| ')')]
	#[token("]", |_| ']')]
	Close(char),

	#[token("|")]
	Pipe,

	#[token("=")]
	Equals,

	#[token("...")]
	Repeat,

	#[regex(r"<[^>]*>")]
	Parameter,

	#[regex(r"<[^>]*")]
	UnclosedParameter,

	// never ends in a dot, so a following `...` stays a token
	#[regex(r"\.{0,2}([^\s()\[\]|=<>\\.]|\\(.|\n))(\.{0,2}([^\s()\[\]|=<>\\.]|\\(.|\n)))*")]
	Text,

	#[regex(r"\.\.?")]
	Dots,

	#[token(">")]
	Stray,
}

/// Splits a usage string into tokens.
pub struct Lexer<'a> {
	source: &'a str,
}

impl<'a> Lexer<'a> {
	pub fn new(source: &'a str) -> Self {
		Self { source }
	}

	pub fn tokenize(self) -> Result<Vec<Token>, Error> {
		let mut tokens: Vec<Token> = Vec::new();

		for (piece, range) in Piece::lexer(self.source).spanned() {
			let span = Span::new(range.start, range.end);

			let kind = match piece {
				Ok(Piece::Open(c)) => TokenKind::Open(c),
				Ok(Piece::Close(c)) => TokenKind::Close(c),
				Ok(Piece::Pipe) => TokenKind::Pipe,
				Ok(Piece::Equals) => TokenKind::Equals,
				Ok(Piece::Parameter) => TokenKind::Parameter,
				Ok(Piece::UnclosedParameter) => {
					return Err(Error::UnterminatedParameter { position: span.start });
				}
				Ok(Piece::Repeat) => {
					if self.follows_whitespace(span.start) {
						return Err(Error::DanglingRepeat { position: span.start });
					}
					TokenKind::Repeat
				}
				Ok(Piece::Stray) => TokenKind::Text,
				// text, dots and a lone trailing backslash glue onto the text right before them
				Ok(Piece::Text | Piece::Dots) | Err(()) => {
					match tokens.last_mut() {
						Some(last) if last.kind == TokenKind::Text && last.span.end == span.start => {
							last.span.end = span.end;
							continue;
						}
						_ => TokenKind::Text,
					}
				}
			};

			tokens.push(Token { kind, span });
		}

		for token in &mut tokens {
			let text = token.span.text(self.source);
			if token.kind == TokenKind::Text && text.len() > 2 && text.starts_with("--") {
				token.kind = TokenKind::Flag;
			}
		}

		Ok(tokens)
	}

	/// `...` has to come directly after the element it repeats.
	fn follows_whitespace(&self, offset: usize) -> bool {
		self.source[..offset]
			.chars()
			.next_back()
			.map_or(true, char::is_whitespace)
	}
}
