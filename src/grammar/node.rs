use std::fmt;

use serde::Serialize;

use crate::util::text::escape_literal;

/// One element of a compiled usage grammar.
///
/// Flags are orthogonal to the kind: `optional` lets the node be absent entirely,
/// `repeating` lets it occur one or more times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
	#[serde(flatten)]
	kind: NodeKind,
	optional: bool,
	repeating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
	/// Matches nothing and always succeeds.
	Empty,
	/// Input token that has to equal `name`.
	Literal { name: String },
	/// Any input token, captured under `name`.
	ValueParameter { name: String },
	/// Position independent `--name`, `--name=value` or `--name[=value]`.
	Floating { name: String, value: Option<Box<Node>> },
	/// Children matched consecutively.
	Sequence { children: Vec<Node> },
	/// Mutually exclusive alternatives, first match wins.
	Options { alternatives: Vec<Node> },
}

impl Node {
	fn new(kind: NodeKind) -> Self {
		Self {
			kind,
			optional: false,
			repeating: false,
		}
	}

	pub fn empty() -> Self {
		Self::new(NodeKind::Empty)
	}

	pub fn literal(name: impl Into<String>) -> Self {
		Self::new(NodeKind::Literal { name: name.into() })
	}

	pub fn value_parameter(name: impl Into<String>) -> Self {
		Self::new(NodeKind::ValueParameter { name: name.into() })
	}

	pub fn floating(name: impl Into<String>, value: Option<Node>) -> Self {
		Self::new(NodeKind::Floating {
			name: name.into(),
			value: value.map(Box::new),
		})
	}

	/// Sequence of the given children, optional if every child is.
	pub fn sequence(children: Vec<Node>) -> Self {
		let optional = children.iter().all(Node::is_optional);
		Self {
			kind: NodeKind::Sequence { children },
			optional,
			repeating: false,
		}
	}

	/// Alternatives collector, see [`Node::push_alternative`] and [`Node::simplify`].
	pub fn options() -> Self {
		Self::new(NodeKind::Options {
			alternatives: Vec::new(),
		})
	}

	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	pub fn is_optional(&self) -> bool {
		self.optional
	}

	pub fn is_repeating(&self) -> bool {
		self.repeating
	}

	pub fn is_empty(&self) -> bool {
		matches!(self.kind, NodeKind::Empty)
	}

	/// Whether matching this node consumes input from a fixed slot.
	pub fn is_position_dependent(&self) -> bool {
		match &self.kind {
			NodeKind::Empty | NodeKind::Floating { .. } => false,
			NodeKind::Literal { .. } | NodeKind::ValueParameter { .. } => true,
			NodeKind::Sequence { children } => children.iter().any(Node::is_position_dependent),
			NodeKind::Options { alternatives } => {
				alternatives.iter().any(Node::is_position_dependent)
			}
		}
	}

	/// Direct children of a sequence or alternatives of an options node.
	pub fn children(&self) -> &[Node] {
		match &self.kind {
			NodeKind::Sequence { children } => children,
			NodeKind::Options { alternatives } => alternatives,
			_ => &[],
		}
	}

	pub fn with_optional(mut self) -> Self {
		self.set_optional();
		self
	}

	pub fn with_repeating(mut self) -> Self {
		self.set_repeating();
		self
	}

	pub(crate) fn set_optional(&mut self) {
		if !self.is_empty() {
			self.optional = true;
		}
	}

	pub(crate) fn clear_optional(&mut self) {
		self.optional = false;
	}

	pub(crate) fn set_repeating(&mut self) {
		if !self.is_empty() {
			self.repeating = true;
		}
	}

	/// Appends to a sequence; a mandatory child makes the sequence mandatory.
	pub(crate) fn push_child(&mut self, node: Node) {
		if let NodeKind::Sequence { children } = &mut self.kind {
			if !node.optional {
				self.optional = false;
			}
			children.push(node);
		}
	}

	pub(crate) fn into_children(self) -> Vec<Node> {
		match self.kind {
			NodeKind::Sequence { children } => children,
			NodeKind::Options { alternatives } => alternatives,
			_ => Vec::new(),
		}
	}

	pub(crate) fn last_child_mut(&mut self) -> Option<&mut Node> {
		match &mut self.kind {
			NodeKind::Sequence { children } => children.last_mut(),
			_ => None,
		}
	}

	/// Adds an alternative. A missing or empty one, as in `(|x)` or `(x|)`, only
	/// makes the whole node optional.
	pub(crate) fn push_alternative(&mut self, node: Option<Node>) {
		let NodeKind::Options { alternatives } = &mut self.kind else {
			return;
		};

		match node {
			Some(node) if !node.is_empty() => {
				if node.optional {
					self.optional = true;
				}
				alternatives.push(node);
			}
			_ => self.optional = true,
		}
	}

	/// Collapses an options node with fewer than two alternatives.
	pub(crate) fn simplify(self) -> Node {
		let Node {
			kind,
			optional,
			repeating,
		} = self;

		match kind {
			NodeKind::Options { mut alternatives } if alternatives.len() < 2 => {
				match alternatives.pop() {
					None => Node::empty(),
					Some(mut single) => {
						if optional {
							single.set_optional();
						}
						if repeating {
							single.set_repeating();
						}
						single
					}
				}
			}
			kind => Node {
				kind,
				optional,
				repeating,
			},
		}
	}

	fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, grouped: bool) -> fmt::Result {
		let composite = matches!(
			self.kind,
			NodeKind::Sequence { .. } | NodeKind::Options { .. }
		);

		if self.optional {
			write!(f, "[")?;
			self.fmt_kind(f)?;
			write!(f, "]")?;
		} else if composite && (grouped || self.repeating) {
			write!(f, "(")?;
			self.fmt_kind(f)?;
			write!(f, ")")?;
		} else {
			self.fmt_kind(f)?;
		}

		if self.repeating {
			write!(f, "...")?;
		}

		Ok(())
	}

	fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			NodeKind::Empty => Ok(()),
			NodeKind::Literal { name } => write!(f, "{}", escape_literal(name)),
			NodeKind::ValueParameter { name } => write!(f, "<{name}>"),
			NodeKind::Floating { name, value } => {
				write!(f, "--{}", escape_literal(name))?;
				match value {
					None => Ok(()),
					Some(value) if value.optional => {
						write!(f, "[=")?;
						value.fmt_value(f)?;
						write!(f, "]")
					}
					Some(value) => {
						write!(f, "=")?;
						value.fmt_value(f)
					}
				}
			}
			NodeKind::Sequence { children } => {
				for (i, child) in children.iter().enumerate() {
					if i != 0 {
						write!(f, " ")?;
					}
					child.fmt_nested(f, true)?;
				}
				Ok(())
			}
			NodeKind::Options { alternatives } => {
				for (i, alternative) in alternatives.iter().enumerate() {
					if i != 0 {
						write!(f, " | ")?;
					}
					let nested = matches!(alternative.kind, NodeKind::Options { .. });
					alternative.fmt_nested(f, nested)?;
				}
				Ok(())
			}
		}
	}

	// flag values take exactly one token or group, the optional marker is the [=..] around it
	fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let composite = matches!(
			self.kind,
			NodeKind::Sequence { .. } | NodeKind::Options { .. }
		);

		// a trailing ... would repeat the flag itself
		if self.repeating {
			write!(f, "(")?;
		}

		if composite {
			write!(f, "(")?;
			self.fmt_kind(f)?;
			write!(f, ")")?;
		} else {
			self.fmt_kind(f)?;
		}

		if self.repeating {
			write!(f, "...)")?;
		}

		Ok(())
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.fmt_nested(f, false)
	}
}
