pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Unknown case mode {0:?}; expected sensitive, insensitive, or semi_sensitive.")]
	InvalidCaseMode(String),
	#[error("Unknown query syntax {0:?}; expected extended, fuzzy, or exact.")]
	InvalidSyntax(String),
	#[error("Failed to reserve room for {requested} ranked results.")]
	Capacity { requested: usize, source: std::collections::TryReserveError },
}
