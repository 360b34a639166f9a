use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "doi2pdfname",
    about = "Derive a PDF filename from a DOI metadata record",
    version = "0.1.0"
)]
pub struct Args {
    /// DOI metadata document (Crossref deposit XML)
    #[arg(
        value_name = "INPUT",
        help = "Path to the metadata XML document, or - to read standard input"
    )]
    pub input: PathBuf,
}

impl Args {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
