pub mod ambiguity;
pub mod builder;
pub mod lexer;
pub mod node;

use crate::input::{self, Bindings};
use crate::util::error::Error;

use builder::Builder;
use lexer::Lexer;
pub use node::{Node, NodeKind};

/// Parses a usage string into a node tree.
///
/// The usage string describes the acceptable parameters of a command, their order
/// and whether they are required. `a b` needs both in order, `a|b` either one (lowest
/// precedence), `[a]` makes `a` optional, `a...` repeats it (highest precedence) and
/// `(a b)` groups. `x` is a literal, `<x>` captures any token, `--x`, `--x=<v>` and
/// `--x[=<v>]` are flags that may show up anywhere in the input.
///
/// With `fix_ambiguity` sequences holding several optional position dependent
/// elements are rewritten, see [`ambiguity::fix_position_dependence`].
pub fn compile(usage: &str, fix_ambiguity: bool) -> Result<Node, Error> {
	let tokens = Lexer::new(usage).tokenize()?;
	let mut root = Builder::new(usage, &tokens).build()?;

	if fix_ambiguity {
		root = ambiguity::fix_position_dependence(root);
	}

	log::debug!("compiled usage {usage:?} into {root}");
	Ok(root)
}

/// A compiled usage string, reusable for any number of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
	usage: String,
	root: Node,
}

impl Grammar {
	pub fn compile(usage: &str, fix_ambiguity: bool) -> Result<Self, Error> {
		Ok(Self {
			usage: usage.to_string(),
			root: compile(usage, fix_ambiguity)?,
		})
	}

	pub fn usage(&self) -> &str {
		&self.usage
	}

	pub fn root(&self) -> &Node {
		&self.root
	}

	/// Matches one input string, `Ok(None)` if it doesn't fit the grammar.
	pub fn parse(&self, input: &str) -> Result<Option<Bindings>, Error> {
		input::match_input(input, &self.root)
	}
}
