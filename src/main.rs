use std::process::ExitCode;

use anyhow::Context;
use clap::{App, Arg, ArgMatches};
use log::{error, info};

use plate_barcodes::{generate, Config, READ1_ENZYMES, READ2_ENZYMES};

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = parse_args();
	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{:#}", e);
			ExitCode::FAILURE
		}
	}
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
	let config = config_from_args(args);
	let summary = generate(&config)
		.with_context(|| format!("Could not assign barcodes for {}", config.input.display()))?;

	if !summary.dropped.is_empty() && !config.warn_dropped {
		info!(
			"{} samples had no barcode for their well (use --warn-dropped to list them)",
			summary.dropped.len()
		);
	}
	info!(
		"Done: {} of {} samples assigned, {} plate files",
		summary.assigned,
		summary.samples,
		summary.plates.len()
	);
	Ok(())
}

fn config_from_args(args: &ArgMatches) -> Config {
	let mut config = Config::new(
		args.value_of("input").unwrap_or_default(),
		args.value_of("read1_enzyme").unwrap_or_default(),
		args.value_of("read2_enzyme").unwrap_or_default(),
	);
	if let Some(barcodes) = args.value_of("barcodes") {
		config.barcodes = barcodes.into();
	}
	if let Some(outdir) = args.value_of("outdir") {
		config.outdir = outdir.into();
	}
	if let Some(cols) = args.values_of("id_cols") {
		config.id_cols = cols.flat_map(str::split_whitespace).map(String::from).collect();
	}
	config.reverse_read1 = args.is_present("reverse_read1");
	config.reverse_read2 = args.is_present("reverse_read2");
	config.id_last = args.is_present("id_last");
	config.warn_dropped = args.is_present("warn_dropped");
	config
}

fn parse_args() -> ArgMatches<'static> {
	let read1_help = format!("Read 1 (i5) enzyme, one of: {}", READ1_ENZYMES.join(", "));
	let read2_help = format!("Read 2 (i7) enzyme, one of: {}", READ2_ENZYMES.join(", "));

	App::new("plate-barcodes")
		.version("0.1")
		.about("Assign read 1 / read 2 barcodes to samples by plate well")
		.arg(Arg::with_name("input")
			.value_name("INPUT_CSV")
			.help("Sample layout with plate_id, plate_index, row, column and identifier columns")
			.required(true)
			.index(1))
		.arg(Arg::with_name("read1_enzyme")
			.value_name("READ1_ENZYME")
			.help(read1_help.as_str())
			.required(true)
			.index(2))
		.arg(Arg::with_name("read2_enzyme")
			.value_name("READ2_ENZYME")
			.help(read2_help.as_str())
			.required(true)
			.index(3))
		.arg(Arg::with_name("reverse_read1")
			.long("reverse-read1")
			.help("Adapters for read 1 were loaded in reverse row order"))
		.arg(Arg::with_name("reverse_read2")
			.long("reverse-read2")
			.help("Adapters for read 2 were loaded in reverse column order"))
		.arg(Arg::with_name("id_last")
			.long("id-last")
			.help("Write the sample identifier after the barcodes in plate files"))
		.arg(Arg::with_name("id_cols")
			.long("id-cols")
			.value_name("COLS")
			.help("Columns joined with '_' into the sample identifier, space separated")
			.multiple(true)
			.number_of_values(1)
			.default_value("sample_id"))
		.arg(Arg::with_name("barcodes")
			.short("b")
			.long("barcodes")
			.value_name("FILE")
			.help("Barcode reference table")
			.default_value("data/barcodes.csv"))
		.arg(Arg::with_name("outdir")
			.short("o")
			.long("outdir")
			.value_name("DIR")
			.help("Directory for out.csv and the tags-indiv-*.tsv files")
			.default_value("."))
		.arg(Arg::with_name("warn_dropped")
			.long("warn-dropped")
			.help("Log every sample whose well has no barcode"))
		.get_matches()
}
