pub mod barcodes;
pub mod enzyme;
pub mod error;
pub mod export;
pub mod join;
pub mod samples;

mod generate;

pub use barcodes::{BarcodeEntry, BarcodeReference, BarcodeSet};
pub use enzyme::{Enzyme, ReadEnd, READ1_ENZYMES, READ2_ENZYMES};
pub use error::{Error, Result};
pub use generate::{generate, Config, Summary};
pub use join::{join, Joined, JoinedRow};
pub use samples::SampleTable;

/// One barcode adapter after enzyme selection, as assigned to a well.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Barcode {
	pub enzyme: String,
	pub sequence: String,
	pub id: String,
}

/// Canonical join key for a well coordinate. Numbers compare by value, so
/// "1", "01" and "1.0" land on the same key; anything else compares as
/// trimmed text.
pub(crate) fn position_key(value: &str) -> String {
	numeric_key(value).unwrap_or_else(|| value.trim().to_string())
}

/// Like `position_key`, but only for values that parse as a number.
pub(crate) fn numeric_key(value: &str) -> Option<String> {
	match value.trim().parse::<f64>() {
		Ok(x) if x.is_finite() => Some(format!("{}", x)),
		_ => None,
	}
}
