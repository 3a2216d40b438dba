use std::cmp::Ordering;

use csv::StringRecord;
use log::{debug, info};

use crate::barcodes::BarcodeSet;
use crate::error::{Error, Result};
use crate::{numeric_key, position_key};
use crate::samples::{Layout, SampleTable};
use crate::Barcode;

/// Columns appended to each sample in the combined output.
pub const BARCODE_HEADERS: [&str; 6] = [
	"read1_enzyme",
	"read1_barcode_sequence",
	"read1_barcode_id",
	"read2_enzyme",
	"read2_barcode_sequence",
	"read2_barcode_id",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinedRow {
	pub sample: StringRecord,
	/// Plate id with numbers in canonical form, so "01" and "1" are one plate.
	pub plate_id: String,
	/// Identifier columns joined with '_'.
	pub sample_name: String,
	pub read1: Barcode,
	pub read2: Barcode,
}

impl JoinedRow {
	/// Sample fields followed by the barcode columns, as written to the combined output.
	pub fn fields(&self) -> Vec<&str> {
		let mut fields: Vec<&str> = self.sample.iter().collect();
		fields.extend_from_slice(&[
			self.read1.enzyme.as_str(),
			self.read1.sequence.as_str(),
			self.read1.id.as_str(),
			self.read2.enzyme.as_str(),
			self.read2.sequence.as_str(),
			self.read2.id.as_str(),
		]);
		fields
	}
}

/// Samples with their barcodes, sorted by plate and position on the plate.
#[derive(Clone, Debug)]
pub struct Joined {
	pub headers: StringRecord,
	pub rows: Vec<JoinedRow>,
	/// Samples without a barcode for their row or column, in input order.
	pub dropped: Vec<String>,
}

impl Joined {
	pub fn headers(&self) -> Vec<&str> {
		let mut headers: Vec<&str> = self.headers.iter().collect();
		headers.extend_from_slice(&BARCODE_HEADERS);
		headers
	}
}

/// Inner join of the samples against the read 1 barcodes on `row` and the
/// read 2 barcodes on `column`, then a stable sort on (plate_id, plate_index).
///
/// Samples whose well has no barcode are left out of the result and listed in
/// `Joined::dropped` by their combined identifier.
pub fn join(samples: &SampleTable, layout: &Layout, read1: &BarcodeSet, read2: &BarcodeSet) -> Result<Joined> {
	let mut rows = Vec::with_capacity(samples.len());
	let mut keys = Vec::with_capacity(samples.len());
	let mut dropped = Vec::new();

	for (i, record) in samples.records().iter().enumerate() {
		let column = &record[layout.column];
		// an empty cell is a well without a barcode, anything else must be a number
		if !column.trim().is_empty() && numeric_key(column).is_none() {
			return Err(Error::InvalidValue {
				path: samples.path().to_path_buf(),
				line: samples.line(i),
				message: format!("column '{}' is not a number", column),
			});
		}

		let sample_name = layout
			.id_cols
			.iter()
			.map(|c| &record[*c])
			.collect::<Vec<&str>>()
			.join("_");

		let (bc1, bc2) = match (read1.lookup(&record[layout.row]), read2.lookup(column)) {
			(Some(bc1), Some(bc2)) => (bc1, bc2),
			_ => {
				debug!("No barcode pair for {} (row {}, column {})", sample_name, &record[layout.row], column);
				dropped.push(sample_name);
				continue;
			}
		};

		let plate_id = position_key(&record[layout.plate_id]);
		keys.push((plate_id.clone(), record[layout.plate_index].to_string()));
		rows.push(JoinedRow {
			sample: record.clone(),
			plate_id,
			sample_name,
			read1: bc1.clone(),
			read2: bc2.clone(),
		});
	}

	info!("Assigned barcodes to {} of {} samples", rows.len(), samples.len());

	let plate_numeric = all_numeric(keys.iter().map(|(p, _)| p.as_str()));
	let index_numeric = all_numeric(keys.iter().map(|(_, i)| i.as_str()));
	let mut order: Vec<usize> = (0..rows.len()).collect();
	order.sort_by(|&a, &b| {
		compare(&keys[a].0, &keys[b].0, plate_numeric)
			.then_with(|| compare(&keys[a].1, &keys[b].1, index_numeric))
	});

	let mut rows: Vec<Option<JoinedRow>> = rows.into_iter().map(Some).collect();
	let rows = order.into_iter().filter_map(|i| rows[i].take()).collect();

	Ok(Joined {
		headers: samples.headers().clone(),
		rows,
		dropped,
	})
}

// A sort column is numeric only when every value in it is.
fn all_numeric<'a, I: Iterator<Item = &'a str>>(mut values: I) -> bool {
	values.all(|v| v.trim().parse::<f64>().map_or(false, |x| !x.is_nan()))
}

fn compare(a: &str, b: &str, numeric: bool) -> Ordering {
	if numeric {
		let x: f64 = a.trim().parse().unwrap_or(f64::NAN);
		let y: f64 = b.trim().parse().unwrap_or(f64::NAN);
		x.partial_cmp(&y).unwrap_or(Ordering::Equal)
	} else {
		a.cmp(b)
	}
}
