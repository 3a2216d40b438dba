use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use itertools::Itertools;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::join::Joined;

pub const COMBINED_FILE: &str = "out.csv";

/// Barcode file for one plate, as read by stacks / ipyrad.
pub fn plate_file_name(plate_id: &str) -> String {
	format!("tags-indiv-{}.tsv", plate_id)
}

/// Writes every joined sample with all of its columns and a header row.
pub fn write_combined(joined: &Joined, path: &Path) -> Result<()> {
	let output_err = |source| Error::Output {
		path: path.to_path_buf(),
		source,
	};
	let mut wtr = WriterBuilder::new()
		.delimiter(b',')
		.from_path(path)
		.map_err(output_err)?;

	wtr.write_record(joined.headers()).map_err(output_err)?;
	for row in &joined.rows {
		wtr.write_record(row.fields()).map_err(output_err)?;
	}
	wtr.flush().map_err(|e| output_err(e.into()))?;

	info!("Wrote {} samples to {}", joined.rows.len(), path.display());
	Ok(())
}

/// Writes one headerless, tab separated file per plate into `outdir`: sample
/// identifier, read 1 barcode and read 2 barcode, with the identifier moved to
/// the end when `id_last` is set. Rows keep the order of the joined table.
pub fn write_plates(joined: &Joined, outdir: &Path, id_last: bool) -> Result<Vec<PathBuf>> {
	let mut written = Vec::new();

	for (plate_id, rows) in &joined.rows.iter().group_by(|r| r.plate_id.clone()) {
		let path = outdir.join(plate_file_name(&plate_id));
		let output_err = |source| Error::Output {
			path: path.clone(),
			source,
		};
		let mut wtr = WriterBuilder::new()
			.delimiter(b'\t')
			.has_headers(false)
			.from_path(&path)
			.map_err(output_err)?;

		let mut n = 0;
		for row in rows {
			let name = row.sample_name.as_str();
			let r1 = row.read1.sequence.as_str();
			let r2 = row.read2.sequence.as_str();
			let record = if id_last { [r1, r2, name] } else { [name, r1, r2] };
			wtr.write_record(&record).map_err(output_err)?;
			n += 1;
		}
		wtr.flush().map_err(|e| output_err(e.into()))?;

		debug!("Wrote {} samples for plate {} to {}", n, plate_id, path.display());
		written.push(path);
	}

	info!("Wrote {} plate barcode files to {}", written.len(), outdir.display());
	Ok(written)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::barcodes::BarcodeReference;
	use crate::enzyme::{Enzyme, ReadEnd};
	use crate::join::join;
	use crate::samples::SampleTable;
	use std::fs;

	fn joined() -> Joined {
		let reference = "\
read,enzyme,position,barcode_sequence,barcode_id
read1,clai,A,AAAA,c1
read2,hindiii,1,GGGG,h1
read2,hindiii,2,TTTT,h2
";
		let samples = "\
plate_id,plate_index,row,column,sample_id,note
B,2,A,2,s2,\"has, comma\"
A,1,A,1,s1,
B,1,A,1,s3,
";
		let reference = BarcodeReference::from_reader(reference.as_bytes(), "barcodes.csv").unwrap();
		let r1 = reference.select(&Enzyme::parse(ReadEnd::Read1, "clai").unwrap(), false).unwrap();
		let r2 = reference.select(&Enzyme::parse(ReadEnd::Read2, "hindiii").unwrap(), false).unwrap();
		let samples = SampleTable::from_reader(samples.as_bytes(), "plate.csv").unwrap();
		let layout = samples.layout(&["sample_id"]).unwrap();
		join(&samples, &layout, &r1, &r2).unwrap()
	}

	#[test]
	fn test_write_combined() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(COMBINED_FILE);
		write_combined(&joined(), &path).unwrap();

		let text = fs::read_to_string(&path).unwrap();
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(
			lines,
			vec![
				"plate_id,plate_index,row,column,sample_id,note,read1_enzyme,read1_barcode_sequence,read1_barcode_id,read2_enzyme,read2_barcode_sequence,read2_barcode_id",
				"A,1,A,1,s1,,clai,AAAA,c1,hindiii,GGGG,h1",
				"B,1,A,1,s3,,clai,AAAA,c1,hindiii,GGGG,h1",
				"B,2,A,2,s2,\"has, comma\",clai,AAAA,c1,hindiii,TTTT,h2",
			]
		);
	}

	#[test]
	fn test_write_plates() {
		let dir = tempfile::tempdir().unwrap();
		let written = write_plates(&joined(), dir.path(), false).unwrap();
		assert_eq!(written, vec![dir.path().join("tags-indiv-A.tsv"), dir.path().join("tags-indiv-B.tsv")]);

		assert_eq!(fs::read_to_string(&written[0]).unwrap(), "s1\tAAAA\tGGGG\n");
		assert_eq!(fs::read_to_string(&written[1]).unwrap(), "s3\tAAAA\tGGGG\ns2\tAAAA\tTTTT\n");
	}

	#[test]
	fn test_write_plates_id_last() {
		let dir = tempfile::tempdir().unwrap();
		let written = write_plates(&joined(), dir.path(), true).unwrap();
		assert_eq!(fs::read_to_string(&written[1]).unwrap(), "AAAA\tGGGG\ts3\nAAAA\tTTTT\ts2\n");
	}

	#[test]
	fn test_unwritable_outdir() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("no_such_dir");
		let err = write_plates(&joined(), &missing, false).unwrap_err();
		assert!(matches!(err, Error::Output { .. }));
		assert!(write_combined(&joined(), &missing.join(COMBINED_FILE)).is_err());
	}
}
