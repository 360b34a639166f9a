mod cli;
mod error;
mod extractor;
mod loader;
mod normalizer;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use loader::Element;
use log::{info, warn};
use std::io;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    info!("Starting doi2pdfname with args: {:?}", args);

    let root = if args.reads_stdin() {
        loader::load_reader(io::stdin().lock()).context("Failed to load metadata from stdin")?
    } else {
        loader::load_path(&args.input)
            .with_context(|| format!("Failed to load metadata from {:?}", args.input))?
    };

    let filename = filename_for(&root)
        .with_context(|| format!("Failed to extract metadata from {:?}", args.input))?;

    println!("{}", filename);
    Ok(())
}

fn filename_for(root: &Element) -> error::Result<String> {
    let extraction = extractor::extract(root)?;
    if extraction.records == 0 {
        warn!("No journal_article, content_item or book record found");
    }
    Ok(normalizer::generate_filename(&extraction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    const CROSSREF_NS: &str = "http://www.crossref.org/schema/4.3.7";

    fn filename_for_str(doc: &str) -> String {
        filename_for(&parse_document(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_document_without_records() {
        let doc = format!(
            r#"<doi_batch xmlns="{CROSSREF_NS}"><head><doi_batch_id>42</doi_batch_id></head></doi_batch>"#
        );
        assert_eq!(filename_for_str(&doc), "__.pdf");
    }

    #[test]
    fn test_journal_article() {
        let doc = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<doi_records>
  <doi_record owner="10.1000" timestamp="2015-01-01">
    <crossref xmlns="{CROSSREF_NS}">
      <journal>
        <journal_metadata language="en">
          <full_title>Journal of Examples</full_title>
        </journal_metadata>
        <journal_article publication_type="full_text">
          <titles>
            <title>A   Study
of Things</title>
          </titles>
          <contributors>
            <person_name sequence="first" contributor_role="author">
              <given_name>Jane</given_name>
              <surname>smith</surname>
            </person_name>
            <person_name sequence="additional" contributor_role="author">
              <given_name>John</given_name>
              <surname>JONES</surname>
            </person_name>
          </contributors>
          <doi_data><doi>10.1000/example.1</doi></doi_data>
        </journal_article>
      </journal>
    </crossref>
  </doi_record>
</doi_records>"#
        );

        assert_eq!(filename_for_str(&doc), "Smith_Jones__A_Study_of_Things.pdf");
    }

    #[test]
    fn test_book_with_series() {
        let doc = format!(
            r#"<crossref xmlns="{CROSSREF_NS}">
  <book book_type="monograph">
    <book_series_metadata language="en">
      <series_metadata>
        <titles><title>Lecture Notes in Examples</title></titles>
        <issn>0000-0000</issn>
      </series_metadata>
      <contributors>
        <person_name contributor_role="author" sequence="first">
          <given_name>Pat</given_name>
          <surname>o'brien</surname>
        </person_name>
      </contributors>
      <titles><title>Intro -- -- to X</title></titles>
    </book_series_metadata>
  </book>
</crossref>"#
        );

        let name = filename_for_str(&doc);
        assert_eq!(name, "O'Brien__Intro_-_-_to_X_BOOK.pdf");
        assert!(name.ends_with("_BOOK.pdf"));
    }

    #[test]
    fn test_book_title_dash_run() {
        let name = filename_for_str(
            "<book><surname>o'brien</surname><title>Intro--to X</title></book>",
        );
        assert!(name.contains("Intro-to"));
        assert!(name.starts_with("O'Brien__"));
    }

    #[test]
    fn test_multi_record_document() {
        let name = filename_for_str(
            "<doi_batch><body>
               <journal_article><titles><title>First Paper</title></titles>
                 <contributors><person_name><surname>alpha</surname></person_name></contributors>
               </journal_article>
               <journal_article><titles><title>Second Paper</title></titles>
                 <contributors><person_name><surname>beta</surname></person_name></contributors>
               </journal_article>
             </body></doi_batch>",
        );
        assert_eq!(name, "Alpha_Beta__First_Paper.pdf");
    }

    #[test]
    fn test_sanitized_fields() {
        let name = filename_for_str(
            "<content_item><surname>de la cruz/ruiz</surname><title>TCP/IP  over  Avian Carriers</title></content_item>",
        );
        assert_eq!(name, "DeLaCruz_Ruiz__TCP_IP_over_Avian_Carriers.pdf");
    }

    #[test]
    fn test_rerun_is_identical() {
        let doc = "<book><content_item><surname>b</surname><surname>a</surname><title>T</title></content_item></book>";
        let root = parse_document(doc).unwrap();

        let first = filename_for(&root).unwrap();
        let second = filename_for(&root).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "B_A_B_A__T_BOOK.pdf");
    }

    #[test]
    fn test_missing_surname_is_an_error() {
        let root = parse_document("<journal_article><surname/></journal_article>").unwrap();
        assert!(filename_for(&root).is_err());
    }
}
