//! Reading label texts from a file or stream
//!
//! Labels are paragraphs separated by blank lines. Lines starting with `#`
//! are comments. The lines of a label are joined with the line-break
//! marker, which the job turns back into real line breaks.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::Error;

/// Split `lines` into label texts, joining lines with `nl_sep`
pub fn read_label_texts<'a, I>(lines: I, nl_sep: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut texts = Vec::new();
    let mut label: Option<String> = None;
    for line in lines {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim_start().starts_with('#') {
            continue;
        }
        if line.trim().is_empty() {
            if let Some(done) = label.take() {
                texts.push(strip_separator(done, nl_sep));
            }
        } else {
            let text = label.get_or_insert_with(String::new);
            text.push_str(line);
            text.push_str(nl_sep);
        }
    }
    if let Some(done) = label {
        texts.push(strip_separator(done, nl_sep));
    }
    texts
}

fn strip_separator(mut text: String, nl_sep: &str) -> String {
    if !nl_sep.is_empty() && text.ends_with(nl_sep) {
        text.truncate(text.len() - nl_sep.len());
    }
    text
}

/// Read label texts from `reader` until end of input
pub fn read_labels<R: BufRead>(reader: R, nl_sep: &str) -> std::io::Result<Vec<String>> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    Ok(read_label_texts(lines.iter().map(String::as_str), nl_sep))
}

/// Read label texts from the file at `path`
pub fn read_label_file(path: &Path, nl_sep: &str) -> crate::Result<Vec<String>> {
    let input_error = |source| Error::InputFile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(input_error)?;
    let texts = read_labels(BufReader::new(file), nl_sep).map_err(input_error)?;
    tracing::debug!(path = %path.display(), labels = texts.len(), "read label file");
    Ok(texts)
}
