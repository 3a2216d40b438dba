use std::path::PathBuf;

use thiserror::Error;

use crate::enzyme::ReadEnd;

/// Errors produced while loading, joining or exporting barcode tables.
#[derive(Debug, Error)]
pub enum Error {
	#[error("invalid {end} enzyme '{name}', valid choices are: {}", .valid.join(", "))]
	InvalidEnzyme {
		end: ReadEnd,
		name: String,
		valid: &'static [&'static str],
	},

	#[error("identifier column '{column}' not found in {}", .path.display())]
	UnknownIdColumn { path: PathBuf, column: String },

	#[error("at least one identifier column is required")]
	NoIdColumns,

	#[error("could not read {}: {source}", .path.display())]
	Input {
		path: PathBuf,
		#[source]
		source: csv::Error,
	},

	#[error("{} is missing required column '{column}'", .path.display())]
	MissingColumn { path: PathBuf, column: String },

	#[error("{}: line {line}: {message}", .path.display())]
	InvalidValue {
		path: PathBuf,
		line: u64,
		message: String,
	},

	#[error("duplicate {end} barcode for enzyme '{enzyme}' at position {position}")]
	DuplicateBarcode {
		end: ReadEnd,
		enzyme: String,
		position: String,
	},

	#[error("could not write {}: {source}", .path.display())]
	Output {
		path: PathBuf,
		#[source]
		source: csv::Error,
	},
}

impl Error {
	/// True for errors caused by invocation arguments rather than file contents.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			Error::InvalidEnzyme { .. } | Error::UnknownIdColumn { .. } | Error::NoIdColumns
		)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
