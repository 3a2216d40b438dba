use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::error::{Error, Result};

pub const PLATE_ID: &str = "plate_id";
pub const PLATE_INDEX: &str = "plate_index";
pub const ROW: &str = "row";
pub const COLUMN: &str = "column";

/// Sample layout: one record per well, with whatever columns the user supplied.
#[derive(Clone, Debug)]
pub struct SampleTable {
	path: PathBuf,
	headers: StringRecord,
	records: Vec<StringRecord>,
}

/// Positions of the columns the join and the exporter need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
	pub plate_id: usize,
	pub plate_index: usize,
	pub row: usize,
	pub column: usize,
	pub id_cols: Vec<usize>,
}

impl SampleTable {
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SampleTable> {
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

	pub fn from_reader<R: Read, P: AsRef<Path>>(src: R, origin: P) -> Result<SampleTable> {
		let rdr = ReaderBuilder::new().delimiter(b',').from_reader(src);
		Self::read(rdr, origin.as_ref())
	}

	fn read<R: Read>(mut rdr: csv::Reader<R>, path: &Path) -> Result<SampleTable> {
		let input_err = |source| Error::Input {
			path: path.to_path_buf(),
			source,
		};
		let headers = rdr.headers().map_err(input_err)?.clone();
		let records = rdr
			.records()
			.collect::<std::result::Result<Vec<_>, _>>()
			.map_err(input_err)?;

		debug!("Loaded {} samples from {}", records.len(), path.display());
		Ok(SampleTable {
			path: path.to_path_buf(),
			headers,
			records,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn headers(&self) -> &StringRecord {
		&self.headers
	}

	pub fn records(&self) -> &[StringRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.headers.iter().position(|h| h.trim() == name)
	}

	fn required(&self, name: &str) -> Result<usize> {
		self.column_index(name).ok_or_else(|| Error::MissingColumn {
			path: self.path.clone(),
			column: name.to_string(),
		})
	}

	/// Resolves the required columns and the identifier columns, in the order given.
	pub fn layout<S: AsRef<str>>(&self, id_cols: &[S]) -> Result<Layout> {
		if id_cols.is_empty() {
			return Err(Error::NoIdColumns);
		}
		let id_cols = id_cols
			.iter()
			.map(|c| {
				let c = c.as_ref();
				self.column_index(c).ok_or_else(|| Error::UnknownIdColumn {
					path: self.path.clone(),
					column: c.to_string(),
				})
			})
			.collect::<Result<Vec<usize>>>()?;

		Ok(Layout {
			plate_id: self.required(PLATE_ID)?,
			plate_index: self.required(PLATE_INDEX)?,
			row: self.required(ROW)?,
			column: self.required(COLUMN)?,
			id_cols,
		})
	}

	/// File line of the i-th record (header is line 1).
	pub fn line(&self, i: usize) -> u64 {
		self.records[i]
			.position()
			.map_or(i as u64 + 2, |p| p.line())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PLATE: &str = "\
plate_id,plate_index,row,column,sample_id,species
1,1,A,1,s1,Aedes
1,2,B,1,s2,Culex
";

	#[test]
	fn test_read_and_layout() {
		let table = SampleTable::from_reader(PLATE.as_bytes(), "plate.csv").unwrap();
		assert_eq!(table.len(), 2);
		assert_eq!(table.line(1), 3);

		let layout = table.layout(&["species", "sample_id"]).unwrap();
		assert_eq!(layout.plate_id, 0);
		assert_eq!(layout.column, 3);
		assert_eq!(layout.id_cols, vec![5, 4]);
	}

	#[test]
	fn test_unknown_id_column() {
		let table = SampleTable::from_reader(PLATE.as_bytes(), "plate.csv").unwrap();
		let err = table.layout(&["well"]).unwrap_err();
		assert!(matches!(err, Error::UnknownIdColumn { ref column, .. } if column == "well"));
		assert!(err.is_configuration());

		let none: [&str; 0] = [];
		assert!(matches!(table.layout(&none), Err(Error::NoIdColumns)));
	}

	#[test]
	fn test_missing_required_column() {
		let src = "plate_id,row,column,sample_id\n1,A,1,s1\n";
		let table = SampleTable::from_reader(src.as_bytes(), "plate.csv").unwrap();
		match table.layout(&["sample_id"]) {
			Err(Error::MissingColumn { column, .. }) => assert_eq!(column, "plate_index"),
			other => panic!("expected MissingColumn, got {:?}", other),
		}
	}

	#[test]
	fn test_ragged_row_is_input_error() {
		let src = "plate_id,plate_index,row,column,sample_id\n1,1,A,1\n";
		let err = SampleTable::from_reader(src.as_bytes(), "plate.csv").unwrap_err();
		assert!(matches!(err, Error::Input { .. }));
	}

	#[test]
	fn test_missing_file() {
		let err = SampleTable::from_path("does/not/exist.csv").unwrap_err();
		assert!(err.to_string().starts_with("could not read does/not/exist.csv"));
	}
}
