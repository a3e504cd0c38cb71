use std::ops::Range;

use crate::util::error::Error;
use crate::util::text::unescape;

use super::lexer::{Token, TokenKind};
use super::node::{Node, NodeKind};

/// Matcher skip masks are 64 bit wide.
pub const MAX_SEQUENCE_LEN: usize = 64;

/// Turns a usage token stream into a node tree.
pub struct Builder<'a> {
	source: &'a str,
	tokens: &'a [Token],
}

impl<'a> Builder<'a> {
	pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
		Self { source, tokens }
	}

	pub fn build(&self) -> Result<Node, Error> {
		self.build_range(0..self.tokens.len())
	}

	fn build_range(&self, range: Range<usize>) -> Result<Node, Error> {
		if range.is_empty() {
			return Ok(Node::empty());
		}

		// alternatives of this range, only set up once a | shows up
		let mut options: Option<Node> = None;
		// node being assembled, excluding the alternatives collected so far
		let mut current: Option<Node> = None;
		let mut is_sequence = false;
		// an empty node isn't part of current and can't be repeated
		let mut last_was_empty = false;

		let mut index = range.start;
		while index < range.end {
			let token = self.tokens[index];

			let node = match token.kind {
				TokenKind::Open(open) => {
					let close = self.find_close(index, range.end)?;
					let mut node = self.build_range(index + 1..close)?;
					if open == '[' {
						node.set_optional();
					}
					index = close;
					node
				}
				TokenKind::Pipe => {
					let collector = options.get_or_insert_with(Node::options);
					match current.take() {
						// (a|b) | c is a | b | c
						Some(cur)
							if matches!(cur.kind(), NodeKind::Options { .. })
								&& !cur.is_optional() && !cur.is_repeating() =>
						{
							for alternative in cur.into_children() {
								collector.push_alternative(Some(alternative));
							}
						}
						cur => collector.push_alternative(cur),
					}

					is_sequence = false;
					index += 1;
					continue;
				}
				TokenKind::Flag => {
					let (node, last) = self.floating(index, range.end)?;
					index = last;
					node
				}
				TokenKind::Repeat => {
					let Some(cur) = current.as_mut() else {
						return Err(Error::DanglingRepeat {
							position: token.span.start,
						});
					};

					if last_was_empty {
						// nothing to repeat
					} else if is_sequence {
						if let Some(last) = cur.last_child_mut() {
							last.set_repeating();
						}
					} else {
						cur.set_repeating();
					}

					index += 1;
					continue;
				}
				TokenKind::Parameter => {
					let text = token.span.text(self.source);
					Node::value_parameter(&text[1..text.len() - 1])
				}
				_ => Node::literal(unescape(token.span.text(self.source))),
			};

			index += 1;
			last_was_empty = node.is_empty();

			current = match current.take() {
				None => Some(node),
				Some(cur) if cur.is_empty() => Some(node),
				Some(cur) if last_was_empty => Some(cur),
				Some(cur) => {
					// 2+ consecutive nodes not separated by |
					let mut seq = if is_sequence {
						cur
					} else {
						is_sequence = true;
						Node::sequence(vec![cur])
					};

					if seq.children().len() == MAX_SEQUENCE_LEN {
						return Err(Error::SequenceTooLong {
							position: token.span.start,
						});
					}
					seq.push_child(node);
					Some(seq)
				}
			};
		}

		match options {
			Some(mut collector) => {
				collector.push_alternative(current);
				Ok(collector.simplify())
			}
			None => Ok(current.unwrap_or_else(Node::empty)),
		}
	}

	/// Index of the bracket closing the one at `open`, counting nested pairs of the same kind.
	fn find_close(&self, open: usize, end: usize) -> Result<usize, Error> {
		let token = self.tokens[open];
		let TokenKind::Open(open_char) = token.kind else {
			return Ok(open);
		};
		let close_char = if open_char == '(' { ')' } else { ']' };

		let mut depth = 1usize;
		for index in open + 1..end {
			match self.tokens[index].kind {
				TokenKind::Open(c) if c == open_char => depth += 1,
				TokenKind::Close(c) if c == close_char => {
					depth -= 1;
					if depth == 0 {
						return Ok(index);
					}
				}
				_ => {}
			}
		}

		Err(Error::UnterminatedGroup {
			open: open_char,
			position: token.span.start,
		})
	}

	/// Builds `--key`, `--key=value` or `--key[=value]` starting at `index`.
	///
	/// Returns the node and the index of the last token it consumed.
	fn floating(&self, index: usize, end: usize) -> Result<(Node, usize), Error> {
		let token = self.tokens[index];
		let name = unescape(&token.span.text(self.source)[2..]).into_owned();
		let kind_at = |i: usize| (i < end).then(|| self.tokens[i].kind);

		let (value_start, optional) = match (kind_at(index + 1), kind_at(index + 2)) {
			(Some(TokenKind::Equals), _) => (index + 2, false),
			(Some(TokenKind::Open('[')), Some(TokenKind::Equals)) => (index + 3, true),
			_ => return Ok((Node::floating(name, None), index)),
		};

		if value_start >= end {
			return Err(Error::MissingFlagValue {
				name,
				position: token.span.start,
			});
		}

		let value_end = match self.tokens[value_start].kind {
			TokenKind::Open(_) => self.find_close(value_start, end)? + 1,
			_ => value_start + 1,
		};
		let mut value = self.build_range(value_start..value_end)?;

		let last = if optional {
			if kind_at(value_end) != Some(TokenKind::Close(']')) {
				return Err(Error::UnclosedFlagValue {
					name,
					position: token.span.start,
				});
			}
			value.set_optional();
			value_end
		} else {
			value_end - 1
		};

		Ok((Node::floating(name, Some(value)), last))
	}
}
