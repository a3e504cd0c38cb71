pub mod bindings;
pub mod lexer;
pub mod matcher;

use crate::grammar::Node;
use crate::util::error::Error;

pub use bindings::Bindings;
use lexer::Lexer;
use matcher::Matcher;

/// Parses and validates a command input string against a compiled usage tree.
///
/// Returns `Ok(None)` when the input doesn't meet the usage requirements, which
/// includes leftover tokens and flags the matched path doesn't declare. Only
/// lexically broken input, like an unterminated quote, is an error.
///
/// Supported escape sequences are `\n`, `\r`, `\t` and `\b`; any other escaped
/// character stands for itself.
pub fn match_input(input: &str, root: &Node) -> Result<Option<Bindings>, Error> {
	let tokenized = Lexer::new(input).tokenize()?;
	log::trace!(
		"input {input:?}: {} positional tokens, {} floating arguments",
		tokenized.tokens.len(),
		tokenized.floating.len()
	);

	let bindings = Matcher::new(input, &tokenized.tokens, &tokenized.floating).run(root);

	match &bindings {
		Some(bindings) => log::debug!("input {input:?} matched with {} bindings", bindings.len()),
		None => log::debug!("input {input:?} doesn't match {root}"),
	}

	Ok(bindings)
}
