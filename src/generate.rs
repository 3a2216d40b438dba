use std::path::PathBuf;

use log::{debug, info, warn};

use crate::barcodes::BarcodeReference;
use crate::enzyme::{Enzyme, ReadEnd};
use crate::error::Result;
use crate::export::{write_combined, write_plates, COMBINED_FILE};
use crate::join::join;
use crate::samples::SampleTable;

/// Settings for one barcode assignment run.
#[derive(Clone, Debug)]
pub struct Config {
	pub input: PathBuf,
	pub barcodes: PathBuf,
	pub outdir: PathBuf,
	pub read1_enzyme: String,
	pub read2_enzyme: String,
	pub reverse_read1: bool,
	pub reverse_read2: bool,
	pub id_last: bool,
	pub id_cols: Vec<String>,
	/// Log each sample that has no barcode for its well.
	pub warn_dropped: bool,
}

impl Config {
	pub fn new<P: Into<PathBuf>>(input: P, read1_enzyme: &str, read2_enzyme: &str) -> Config {
		Config {
			input: input.into(),
			barcodes: PathBuf::from("data/barcodes.csv"),
			outdir: PathBuf::from("."),
			read1_enzyme: read1_enzyme.to_string(),
			read2_enzyme: read2_enzyme.to_string(),
			reverse_read1: false,
			reverse_read2: false,
			id_last: false,
			id_cols: vec!["sample_id".to_string()],
			warn_dropped: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
	pub samples: usize,
	pub assigned: usize,
	/// Combined identifiers of samples left out by the join.
	pub dropped: Vec<String>,
	pub combined: PathBuf,
	pub plates: Vec<PathBuf>,
}

/// Assigns barcodes to every sample in `config.input` and writes `out.csv`
/// plus one `tags-indiv-<plate_id>.tsv` per plate into `config.outdir`.
///
/// Enzyme names are checked before anything is read, so a bad choice never
/// leaves output behind.
pub fn generate(config: &Config) -> Result<Summary> {
	let read1_enzyme = Enzyme::parse(ReadEnd::Read1, &config.read1_enzyme)?;
	let read2_enzyme = Enzyme::parse(ReadEnd::Read2, &config.read2_enzyme)?;

	let samples = SampleTable::from_path(&config.input)?;
	let layout = samples.layout(config.id_cols.as_slice())?;
	let reference = BarcodeReference::from_path(&config.barcodes)?;
	info!(
		"Loaded {} samples and {} barcode entries",
		samples.len(),
		reference.entries().len()
	);

	let read1 = reference.select(&read1_enzyme, config.reverse_read1)?;
	let read2 = reference.select(&read2_enzyme, config.reverse_read2)?;
	debug!(
		"Selected {} {} and {} {} barcodes",
		read1.len(),
		read1_enzyme,
		read2.len(),
		read2_enzyme
	);
	let joined = join(&samples, &layout, &read1, &read2)?;

	if config.warn_dropped {
		for name in &joined.dropped {
			warn!("Sample {} has no barcode for its well and was left out", name);
		}
	}

	let combined = config.outdir.join(COMBINED_FILE);
	write_combined(&joined, &combined)?;
	let plates = write_plates(&joined, &config.outdir, config.id_last)?;

	Ok(Summary {
		samples: samples.len(),
		assigned: joined.rows.len(),
		dropped: joined.dropped,
		combined,
		plates,
	})
}
