use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("usage: unterminated {open} at offset {position}")]
	UnterminatedGroup { open: char, position: usize },

	#[error("usage: unterminated < (missing >) at offset {position}")]
	UnterminatedParameter { position: usize },

	#[error("usage: ... not directly after something at offset {position}")]
	DanglingRepeat { position: usize },

	#[error("usage: missing value in --{name}=value at offset {position}")]
	MissingFlagValue { name: String, position: usize },

	#[error("usage: missing ] in --{name}[=value] at offset {position}")]
	UnclosedFlagValue { name: String, position: usize },

	#[error("usage: more than 64 consecutive elements at offset {position}")]
	SequenceTooLong { position: usize },

	#[error("input: unterminated {quote} at offset {position}")]
	UnterminatedQuote { quote: char, position: usize },

	#[error("input: -- not followed by key at offset {position}")]
	MissingFlagName { position: usize },

	#[error("json serialization: {0}")]
	JSONParse(#[from] serde_json::Error),
}

impl Error {
	/// Error in the usage string itself, raised while compiling.
	pub fn is_grammar(&self) -> bool {
		matches!(
			self,
			Self::UnterminatedGroup { .. }
				| Self::UnterminatedParameter { .. }
				| Self::DanglingRepeat { .. }
				| Self::MissingFlagValue { .. }
				| Self::UnclosedFlagValue { .. }
				| Self::SequenceTooLong { .. }
		)
	}

	/// Lexical error in a command input string, raised while matching.
	pub fn is_input(&self) -> bool {
		matches!(self, Self::UnterminatedQuote { .. } | Self::MissingFlagName { .. })
	}
}
