use thiserror::Error;

use super::entry::PatchEntry;

/// Lines of multipart framing before the first record
const HEADER_LINES: usize = 5;
/// Lines of framing after the last record (closing boundary, trailing CRLF)
const FOOTER_LINES: usize = 2;

const HASHED_FIELDS: usize = 9;
const UNHASHED_FIELDS: usize = 6;

/// Errors that can occur while parsing a patch list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchListError {
    /// Body is too short to contain the multipart framing
    #[error("Patch list has {0} lines, too few for the multipart framing")]
    Truncated(usize),

    /// Record has neither the hashed nor the unhashed field count
    #[error("Patch record on line {line} has {count} fields, expected 6 or 9")]
    FieldCount {
        /// Zero-based line index in the body
        line: usize,
        /// Number of tab separated fields found
        count: usize,
    },

    /// Numeric field could not be parsed
    #[error("Patch record on line {line} has an invalid {field}: {value:?}")]
    InvalidNumber {
        /// Zero-based line index in the body
        line: usize,
        /// Field name
        field: &'static str,
        /// Raw field value
        value: String,
    },

    /// URL path is too short to name a repository
    #[error("Patch record on line {line} has an unusable URL: {url}")]
    InvalidUrl {
        /// Zero-based line index in the body
        line: usize,
        /// Raw URL
        url: String,
    },

    /// Hashed record with a zero hash block size
    #[error("Patch record on line {0} has hashes but a zero hash block size")]
    ZeroBlockSize(usize),
}

/// Ordered list of patches, in the order they must be installed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchList {
    patches: Vec<PatchEntry>,
}

impl PatchList {
    /// Parse a patch list response body
    ///
    /// An empty body means there is nothing to install. Any malformed record
    /// rejects the whole list, since skipping one would change install order.
    pub fn parse(body: &str) -> Result<Self, PatchListError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let lines: Vec<&str> = body.split("\r\n").collect();
        if lines.len() < HEADER_LINES + FOOTER_LINES {
            return Err(PatchListError::Truncated(lines.len()));
        }

        let patches = lines[HEADER_LINES..lines.len() - FOOTER_LINES]
            .iter()
            .enumerate()
            .map(|(offset, record)| parse_record(HEADER_LINES + offset, record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Parsed patch list with {} patches", patches.len());
        Ok(Self { patches })
    }

    /// Patches in install order
    pub fn patches(&self) -> &[PatchEntry] {
        &self.patches
    }

    /// Number of patches
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether there is nothing to install
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Combined size of all patch files in bytes
    pub fn total_length(&self) -> u64 {
        self.patches.iter().map(|patch| patch.length).sum()
    }
}

fn parse_record(line: usize, record: &str) -> Result<PatchEntry, PatchListError> {
    let fields: Vec<&str> = record.split('\t').collect();

    let (hash_type, hash_block_size, hashes) = match fields.len() {
        HASHED_FIELDS => {
            let block_size = parse_number(line, "hash block size", fields[6])?;
            if block_size == 0 {
                return Err(PatchListError::ZeroBlockSize(line));
            }
            let hashes = fields[7]
                .split(',')
                .filter(|hash| !hash.is_empty())
                .map(str::to_string)
                .collect();
            (Some(fields[5].to_string()), block_size, hashes)
        }
        UNHASHED_FIELDS => (None, 0, Vec::new()),
        count => return Err(PatchListError::FieldCount { line, count }),
    };

    let length = parse_number(line, "length", fields[0])?;
    let version = fields[4].to_string();
    let url = fields[fields.len() - 1].to_string();
    let repository = repository_from_url(&url).ok_or_else(|| PatchListError::InvalidUrl {
        line,
        url: url.clone(),
    })?;

    Ok(PatchEntry {
        name: version.clone(),
        url,
        repository,
        version,
        hash_type,
        hashes,
        hash_block_size,
        length,
    })
}

fn parse_number(line: usize, field: &'static str, value: &str) -> Result<u64, PatchListError> {
    value
        .trim()
        .parse()
        .map_err(|_| PatchListError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        })
}

/// Third path segment from the end, e.g. `ex1` in `.../game/ex1/6b936f08/D2023.patch`
fn repository_from_url(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() < 3 {
        return None;
    }
    let repository = segments[segments.len() - 3];
    if repository.is_empty() {
        return None;
    }
    Some(repository.to_string())
}
