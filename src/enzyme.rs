use std::fmt;

use crate::error::{Error, Result};

/// Adapter names for read 1 correspond to the enzyme that cuts the adapter
/// dimer: "nhei" if xbai was used for cutting, "clai" if mspi was used.
pub const READ1_ENZYMES: &[&str] = &["nhei", "clai"];

pub const READ2_ENZYMES: &[&str] = &["ecori", "bamhi", "hindiii"];

/// Which end of a paired-end read a barcode sits on.
/// Read 1 is the i5 end and indexes plate rows, read 2 is the i7 end and
/// indexes plate columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadEnd {
	Read1,
	Read2,
}

impl ReadEnd {
	/// Value of the `read` column in the barcode reference.
	pub fn label(self) -> &'static str {
		match self {
			ReadEnd::Read1 => "read1",
			ReadEnd::Read2 => "read2",
		}
	}

	pub fn valid_enzymes(self) -> &'static [&'static str] {
		match self {
			ReadEnd::Read1 => READ1_ENZYMES,
			ReadEnd::Read2 => READ2_ENZYMES,
		}
	}
}

impl fmt::Display for ReadEnd {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// A whitelisted enzyme name bound to the read end it was validated for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enzyme {
	end: ReadEnd,
	name: &'static str,
}

impl Enzyme {
	pub fn parse(end: ReadEnd, name: &str) -> Result<Enzyme> {
		let valid = end.valid_enzymes();
		match valid.iter().find(|v| **v == name) {
			Some(v) => Ok(Enzyme { end, name: *v }),
			None => Err(Error::InvalidEnzyme {
				end,
				name: name.to_string(),
				valid,
			}),
		}
	}

	pub fn end(&self) -> ReadEnd {
		self.end
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl fmt::Display for Enzyme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_whitelists() {
		for name in READ1_ENZYMES {
			assert_eq!(Enzyme::parse(ReadEnd::Read1, name).unwrap().name(), *name);
		}
		for name in READ2_ENZYMES {
			assert_eq!(Enzyme::parse(ReadEnd::Read2, name).unwrap().name(), *name);
		}
	}

	#[test]
	fn test_enzyme_checked_against_its_own_end() {
		let err = Enzyme::parse(ReadEnd::Read1, "ecori").unwrap_err();
		assert!(err.is_configuration());
		assert!(Enzyme::parse(ReadEnd::Read2, "nhei").is_err());
		// names are case sensitive, as in the reference table
		assert!(Enzyme::parse(ReadEnd::Read1, "NheI").is_err());
	}
}
