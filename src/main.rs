use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod index;
mod io;
mod search;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bw-readmap", author, version, about = "Burrows-Wheeler read mapper with bounded edit distance", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preprocess: build and persist the FM index for a reference
    Index {
        /// Reference FASTA file
        reference: String,
        /// Output prefix for the index records (defaults to the reference path)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rebuild the index from the reference and compare against the persisted one
    Validate {
        /// Reference FASTA file
        reference: String,
        /// Index prefix (defaults to the reference path)
        #[arg(short = 'i', long = "index")]
        index: Option<String>,
    },
    /// Map reads (FASTQ) against a persisted index, emitting SAM lines
    Map {
        /// Reference FASTA file
        reference: String,
        /// Reads FASTQ file
        reads: String,
        /// Index prefix (defaults to the reference path)
        #[arg(short = 'i', long = "index")]
        index: Option<String>,
        /// Maximum edit distance for the search
        #[arg(short = 'd', long = "distance", default_value_t = 0)]
        distance: usize,
        /// Emit =/X instead of M for match/mismatch
        #[arg(short = 'x', long = "extended-cigar")]
        extended_cigar: bool,
        /// Output SAM path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Index { reference, output } => {
            let prefix = output.unwrap_or_else(|| reference.clone());
            run_index(&reference, &prefix)
        }
        Commands::Validate { reference, index } => {
            let prefix = index.unwrap_or_else(|| reference.clone());
            run_validate(&reference, &prefix)
        }
        Commands::Map { reference, reads, index, distance, extended_cigar, out, threads } => {
            let prefix = index.unwrap_or_else(|| reference.clone());
            let opt = search::MapOpt { max_edits: distance, extended_cigar, threads };
            run_map(&reference, &prefix, &reads, out.as_deref(), opt)
        }
    }
}

fn load_reference(reference: &str) -> Result<Vec<io::fasta::FastaRecord>> {
    let fh = std::fs::File::open(reference)
        .with_context(|| format!("cannot open reference FASTA '{reference}'"))?;
    let records = io::fasta::read_fasta_records(std::io::BufReader::new(fh))?;
    if records.is_empty() {
        anyhow::bail!("FASTA file '{reference}' contains no sequences");
    }
    if records.iter().all(|r| r.seq.is_empty()) {
        anyhow::bail!("FASTA file '{reference}' contains only empty sequences");
    }
    Ok(records)
}

fn run_index(reference: &str, prefix: &str) -> Result<()> {
    let records = load_reference(reference)?;
    let total_len: usize = records.iter().map(|r| r.seq.len()).sum();

    println!("reference: {}", reference);
    println!("sequences: {}", records.len());
    println!("total_len: {}", total_len);

    let mut indexes = Vec::with_capacity(records.len());
    for rec in &records {
        indexes.push(index::FmIndex::build(&rec.name, &rec.seq));
        println!("indexed {} ({} bp)", rec.name, rec.seq.len());
    }

    index::store::write(&indexes, prefix)
        .with_context(|| format!("cannot write index records to prefix '{prefix}'"))?;
    println!(
        "index saved: {prefix}.{{suffix_arrays,c_tables,o_tables}} at {}",
        chrono::Utc::now().to_rfc3339()
    );
    Ok(())
}

fn run_validate(reference: &str, prefix: &str) -> Result<()> {
    let records = load_reference(reference)?;
    index::store::validate(&records, prefix)
        .with_context(|| format!("index at prefix '{prefix}' does not validate"))?;
    println!("index at '{prefix}' validates against '{reference}'");
    Ok(())
}

fn run_map(
    reference: &str,
    prefix: &str,
    reads: &str,
    out: Option<&str>,
    opt: search::MapOpt,
) -> Result<()> {
    let records = load_reference(reference)?;
    let indexes = index::store::read(&records, prefix)
        .with_context(|| format!("cannot load index at prefix '{prefix}'"))?;
    search::map_fastq(&indexes, reads, out, opt)
}
