//! Text extraction from Word `.docx` files.
//!
//! A docx is a ZIP container; the body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p><w:r><w:t>Senior QA Engineer</w:t></w:r></w:p>
//!     <w:p><w:r><w:t>Selenium</w:t><w:tab/><w:t>Cypress</w:t></w:r></w:p>
//!   </w:body>
//! </w:document>
//! ```
//! Only `w:t` runs carry text. `w:tab` becomes a tab, `w:br`/`w:cr` a line
//! break, and every closed paragraph ends with a newline.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::IngestError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extract the body text of the docx at `path`.
pub fn extract_docx(path: &Path) -> Result<String, IngestError> {
    let file = File::open(path)?;
    extract_docx_from(file)
}

/// Extract the body text of a docx read from any seekable source.
pub fn extract_docx_from<R: Read + Seek>(source: R) -> Result<String, IngestError> {
    let mut archive =
        zip::ZipArchive::new(source).map_err(|e| IngestError::Docx(format!("not a docx container: {e}")))?;
    let document = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| IngestError::Docx(format!("missing {DOCUMENT_XML}: {e}")))?;
    parse_document_xml(BufReader::new(document))
}

fn parse_document_xml<R: BufRead>(reader: R) -> Result<String, IngestError> {
    let mut xml_reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_run_text = true;
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| IngestError::Docx(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(IngestError::Docx(format!(
                    "malformed {DOCUMENT_XML} at byte {}: {e}",
                    xml_reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
