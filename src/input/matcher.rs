use crate::grammar::{Node, NodeKind};
use crate::util::text::{unescape, Span};

use super::bindings::Bindings;
use super::lexer::FloatingArgs;

/// Lengths of the capture lists, restored on backtrack.
#[derive(Debug, Clone, Copy)]
struct Mark {
	bindings: usize,
	allowed: usize,
}

#[derive(Debug, Clone, Copy)]
enum Retry {
	/// Resume without the optional element.
	Skip,
	/// Resume letting the repeating element match at most this many times.
	Repeat(usize),
}

/// Saved state of a sequence to resume from at element `index`.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
	index: usize,
	token: usize,
	mark: Mark,
	skip: u64,
	retry: Retry,
}

/// State of one match of a tokenized input against a grammar tree.
pub struct Matcher<'a> {
	source: &'a str,
	tokens: &'a [Span],
	floating: &'a FloatingArgs,
	bindings: Bindings,
	/// Floating arguments recognized on the path taken so far.
	allowed: Vec<&'a str>,
	stack: Vec<Snapshot>,
}

impl<'a> Matcher<'a> {
	pub fn new(source: &'a str, tokens: &'a [Span], floating: &'a FloatingArgs) -> Self {
		Self {
			source,
			tokens,
			floating,
			bindings: Bindings::new(),
			allowed: Vec::new(),
			stack: Vec::new(),
		}
	}

	/// Matches the whole input, `None` if it doesn't fit.
	pub fn run(mut self, root: &'a Node) -> Option<Bindings> {
		self.process(root, 0, true, None)?;

		// every supplied flag has to be known on the path taken
		if let Some(unknown) = self.floating.keys().find(|key| !self.allowed.contains(key)) {
			log::trace!("floating argument --{unknown} isn't allowed here");
			return None;
		}

		Some(self.bindings)
	}

	/// Matches `node` at `token`, covering its optional and repeating flags.
	///
	/// Returns the next token and the number of occurrences matched. `last` requires
	/// the input to be used up afterwards, `limit` caps the occurrences of a
	/// repeating node.
	fn process(
		&mut self,
		node: &'a Node,
		token: usize,
		last: bool,
		limit: Option<usize>,
	) -> Option<(usize, usize)> {
		let mark = self.mark();
		let max = if node.is_repeating() {
			limit.unwrap_or(usize::MAX)
		} else {
			1
		};

		let mut count = 0;
		let mut current = token;
		while count < max {
			let occurrence = self.mark();

			match self.matches(node, current, last && !node.is_repeating()) {
				Some(next) => {
					count += 1;
					let progressed = next > current;
					current = next;
					if !progressed {
						break;
					}
				}
				None => {
					self.restore(occurrence);
					break;
				}
			}
		}

		if (count == 0 && !node.is_optional()) || (last && current < self.tokens.len()) {
			self.restore(mark);
			return None;
		}

		Some((current, count))
	}

	/// Matches a single occurrence of `node`, ignoring its flags.
	fn matches(&mut self, node: &'a Node, token: usize, last: bool) -> Option<usize> {
		match node.kind() {
			NodeKind::Empty => Some(token),
			NodeKind::Floating { name, value } => {
				self.match_floating(name, value.as_deref()).then_some(token)
			}
			NodeKind::Sequence { children } => self.match_sequence(children, token, last),
			NodeKind::Options { alternatives } => {
				let mark = self.mark();

				for alternative in alternatives {
					if let Some((next, _)) = self.process(alternative, token, last, None) {
						return Some(next);
					}
					self.restore(mark);
				}

				None
			}
			NodeKind::Literal { name } => {
				let span = self.tokens.get(token)?;
				if unescape(span.text(self.source)) != name.as_str() {
					return None;
				}

				self.bindings.push(format!("unnamed_{token}"), Some(name.clone()));
				Some(token + 1)
			}
			NodeKind::ValueParameter { name } => {
				let span = self.tokens.get(token)?;

				self.bindings.push(name.clone(), Some(unescape(span.text(self.source)).into_owned()));
				Some(token + 1)
			}
		}
	}

	fn match_floating(&mut self, name: &'a str, value: Option<&'a Node>) -> bool {
		let Some(supplied) = self.floating.get(name) else {
			return false;
		};

		match (supplied, value) {
			// missing value
			(None, Some(value)) if !value.is_optional() => return false,
			// excess value
			(Some(_), None) => return false,
			(Some(span), Some(value)) if !self.accepts_value(span, value) => return false,
			_ => {}
		}

		self.allowed.push(name);
		self.bindings.push(
			name.to_string(),
			supplied.map(|span| unescape(span.text(self.source)).into_owned()),
		);
		true
	}

	/// Whether a flag value fits the flag's value node, as a one token input.
	fn accepts_value(&self, span: Span, value: &'a Node) -> bool {
		// the value alone is the whole input, with no flags of its own
		let tokens = [span];
		let floating = FloatingArgs::default();

		Matcher::new(self.source, &tokens, &floating).run(value).is_some()
	}

	fn match_sequence(&mut self, children: &'a [Node], mut token: usize, last: bool) -> Option<usize> {
		let initial = self.mark();
		let base = self.stack.len();
		let mut skip = 0u64;
		// occurrence cap for the repeating element resumed from a snapshot
		let mut cap: Option<(usize, usize)> = None;

		let mut index = 0;
		while index < children.len() {
			if skip & bit(index) != 0 {
				index += 1;
				continue;
			}

			let child = &children[index];
			let limit = cap.take().filter(|&(at, _)| at == index).map(|(_, max)| max);
			let before = Snapshot {
				index,
				token,
				mark: self.mark(),
				skip,
				retry: Retry::Skip,
			};

			// try with the optional element present first, queue the attempt without it
			if limit.is_none() && bit(index) != 0 && child.is_optional() && child.is_position_dependent() {
				self.stack.push(Snapshot {
					skip: skip | bit(index),
					..before
				});
			}

			match self.process(child, token, last && index + 1 == children.len(), limit) {
				Some((next, count)) => {
					if child.is_repeating() && count > 1 {
						self.stack.push(Snapshot {
							retry: Retry::Repeat(count - 1),
							..before
						});
					}

					token = next;
					index += 1;
				}
				None => {
					let snapshot = if self.stack.len() > base {
						self.stack.pop()
					} else {
						None
					};

					// nothing left to try, undo the whole sequence for the caller
					let Some(snapshot) = snapshot else {
						self.restore(initial);
						return None;
					};

					log::trace!(
						"backtrack to element {} at token {} ({:?})",
						snapshot.index,
						snapshot.token,
						snapshot.retry
					);

					index = snapshot.index;
					token = snapshot.token;
					skip = snapshot.skip;
					self.restore(snapshot.mark);

					if let Retry::Repeat(max) = snapshot.retry {
						cap = Some((index, max));
					}
				}
			}
		}

		self.stack.truncate(base);
		Some(token)
	}

	fn mark(&self) -> Mark {
		Mark {
			bindings: self.bindings.len(),
			allowed: self.allowed.len(),
		}
	}

	fn restore(&mut self, mark: Mark) {
		self.bindings.truncate(mark.bindings);
		self.allowed.truncate(mark.allowed);
	}
}

/// Skip mask bit of a sequence element, zero past the 64th.
fn bit(index: usize) -> u64 {
	u32::try_from(index)
		.ok()
		.and_then(|shift| 1u64.checked_shl(shift))
		.unwrap_or(0)
}
