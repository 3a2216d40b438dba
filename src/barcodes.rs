use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::{debug, warn};
use serde::Deserialize;

use crate::enzyme::{Enzyme, ReadEnd};
use crate::error::{Error, Result};
use crate::{numeric_key, position_key, Barcode};

/// One row of the barcode reference table.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct BarcodeEntry {
	pub read: String,
	pub enzyme: String,
	pub position: String,
	pub barcode_sequence: String,
	pub barcode_id: String,
}

/// The bundled table of barcode adapters, for every enzyme and both read ends.
#[derive(Clone, Debug)]
pub struct BarcodeReference {
	path: PathBuf,
	entries: Vec<BarcodeEntry>,
}

impl BarcodeReference {
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<BarcodeReference> {
		let path = path.as_ref();
		let rdr = ReaderBuilder::new()
			.delimiter(b',')
			.from_path(path)
			.map_err(|source| Error::Input {
				path: path.to_path_buf(),
				source,
			})?;
		Self::read(rdr, path)
	}

	/// Reads a reference table from any source; `origin` is only used in messages.
	pub fn from_reader<R: Read, P: AsRef<Path>>(src: R, origin: P) -> Result<BarcodeReference> {
		let rdr = ReaderBuilder::new().delimiter(b',').from_reader(src);
		Self::read(rdr, origin.as_ref())
	}

	fn read<R: Read>(mut rdr: csv::Reader<R>, path: &Path) -> Result<BarcodeReference> {
		let entries = rdr
			.deserialize()
			.collect::<std::result::Result<Vec<BarcodeEntry>, _>>()
			.map_err(|source| Error::Input {
				path: path.to_path_buf(),
				source,
			})?;

		debug!("Loaded {} barcode entries from {}", entries.len(), path.display());
		Ok(BarcodeReference {
			path: path.to_path_buf(),
			entries,
		})
	}

	pub fn entries(&self) -> &[BarcodeEntry] {
		&self.entries
	}

	/// Barcodes of one enzyme on one read end, keyed by well position.
	///
	/// With `reverse`, positions are handed out in reverse row order, for
	/// adapters that were loaded onto the plate backwards. Read 2 positions
	/// must be numeric. A position may only occur once per subset.
	pub fn select(&self, enzyme: &Enzyme, reverse: bool) -> Result<BarcodeSet> {
		let end = enzyme.end();
		let rows: Vec<&BarcodeEntry> = self
			.entries
			.iter()
			.filter(|e| e.read == end.label() && e.enzyme == enzyme.name())
			.collect();

		// row that each entry takes its position from
		let mut sources = rows.clone();
		if reverse {
			sources.reverse();
		}

		let mut by_position = HashMap::with_capacity(rows.len());
		for (i, (entry, source)) in rows.iter().zip(sources).enumerate() {
			let position = source.position.as_str();
			let key = match end {
				ReadEnd::Read1 => position_key(position),
				ReadEnd::Read2 => numeric_key(position).ok_or_else(|| Error::InvalidValue {
					path: self.path.clone(),
					line: self.line_of(source),
					message: format!("read2 position '{}' is not a number", position),
				})?,
			};
			let barcode = Barcode {
				enzyme: entry.enzyme.clone(),
				sequence: entry.barcode_sequence.clone(),
				id: entry.barcode_id.clone(),
			};
			if by_position.insert(key, (i, barcode)).is_some() {
				return Err(Error::DuplicateBarcode {
					end,
					enzyme: enzyme.name().to_string(),
					position: position.to_string(),
				});
			}
		}

		let set = BarcodeSet {
			enzyme: enzyme.clone(),
			by_position,
		};
		if set.is_empty() {
			warn!("No {} barcodes for enzyme {} in {}", end, enzyme, self.path.display());
		}
		Ok(set)
	}

	// header is line 1
	fn line_of(&self, entry: &BarcodeEntry) -> u64 {
		self.entries
			.iter()
			.position(|e| std::ptr::eq(e, entry))
			.map_or(0, |i| i as u64 + 2)
	}
}

/// Barcodes selected for one read end, ready to be joined on well position.
#[derive(Clone, Debug)]
pub struct BarcodeSet {
	enzyme: Enzyme,
	// value keeps the row order of the reference table
	by_position: HashMap<String, (usize, Barcode)>,
}

impl BarcodeSet {
	pub fn len(&self) -> usize {
		self.by_position.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_position.is_empty()
	}

	/// Barcode for a sample's `row` (read 1) or `column` (read 2) value.
	pub fn lookup(&self, position: &str) -> Option<&Barcode> {
		let key = match self.enzyme.end() {
			ReadEnd::Read1 => position_key(position),
			ReadEnd::Read2 => numeric_key(position)?,
		};
		self.by_position.get(&key).map(|(_, bc)| bc)
	}

	/// (position key, barcode) pairs in reference table order.
	#[cfg(test)]
	fn assignments(&self) -> Vec<(&str, &Barcode)> {
		let mut out: Vec<(usize, &str, &Barcode)> = self
			.by_position
			.iter()
			.map(|(k, (i, bc))| (*i, k.as_str(), bc))
			.collect();
		out.sort_by_key(|(i, _, _)| *i);
		out.into_iter().map(|(_, k, bc)| (k, bc)).collect()
	}
}
