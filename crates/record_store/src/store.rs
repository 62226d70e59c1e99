use std::fs::{self, File};
use std::path::{Path, PathBuf};

use models::{BillingRow, PeriodKey, RawRow};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::schema::{read_rows, write_rows};

/// Separates the company segment from the month segment in a file stem.
/// Sanitized segments never contain it, so stems decode unambiguously.
const COMPANY_SEPARATOR: &str = "__";
const EXTENSION: &str = "csv";

/// Storage abstraction for billing periods.
/// This allows swapping the CSV directory for another backend in tests.
pub trait RecordStore {
    /// Rows saved under `key`. Absent or unreadable periods come back empty.
    fn load(&self, key: &PeriodKey) -> Vec<RawRow>;
    /// Replaces whatever was saved under `key` with `rows`.
    fn save(&self, key: &PeriodKey, rows: &[BillingRow]) -> Result<()>;
    /// Every saved period, sorted by display label.
    fn list_keys(&self) -> Result<Vec<PeriodKey>>;
}

/// One CSV file per period under a root directory.
///
/// Not safe against concurrent writers: `save` truncates and rewrites in place.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the backing file of a period, e.g.
    /// `Kitengela` + `August 2025` -> `<root>/Kitengela__August_2025.csv`.
    pub fn key_to_path(&self, key: &PeriodKey) -> Result<PathBuf> {
        let month = sanitize_segment(&key.month);
        if month.is_empty() {
            return Err(StoreError::MissingMonth);
        }
        let company = key
            .company
            .as_deref()
            .map(sanitize_segment)
            .filter(|c| !c.is_empty());

        let stem = match company {
            Some(company) => format!("{company}{COMPANY_SEPARATOR}{month}"),
            None => month,
        };
        Ok(self.root.join(format!("{stem}.{EXTENSION}")))
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self, key: &PeriodKey) -> Vec<RawRow> {
        let path = match self.key_to_path(key) {
            Ok(path) => path,
            Err(e) => {
                warn!(key = %key, "cannot resolve period file: {e}");
                return Vec::new();
            }
        };

        if !path.exists() {
            info!(path = %path.display(), "no saved period, starting empty");
            return Vec::new();
        }

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), "cannot open period file, starting empty: {e}");
                return Vec::new();
            }
        };

        match read_rows(file) {
            Ok(rows) => {
                debug!(path = %path.display(), rows = rows.len(), "loaded period");
                rows
            }
            Err(e) => {
                warn!(path = %path.display(), "corrupt period file, starting empty: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, key: &PeriodKey, rows: &[BillingRow]) -> Result<()> {
        let path = self.key_to_path(key)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        write_rows(file, rows).map_err(|e| StoreError::csv(&path, e))?;

        info!(path = %path.display(), rows = rows.len(), "saved period");
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<PeriodKey>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).and_then(decode_file_stem) {
                Some(key) => keys.push(key),
                None => debug!(path = %path.display(), "skipping file with undecodable name"),
            }
        }

        keys.sort_by(|a, b| a.label().cmp(&b.label()));
        keys.dedup();
        Ok(keys)
    }
}

/// Turns a free-text label into a filename segment.
///
/// Runs of whitespace and underscores become a single `_`, so `August 2025`
/// and `August_2025` name the same period. Characters that are unsafe in
/// filenames, and `%` itself, are written as `%XX` per UTF-8 byte, which keeps
/// `08/2025` apart from `08-2025`.
pub fn sanitize_segment(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .map(escape_part)
        .collect::<Vec<_>>()
        .join("_")
}

fn escape_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        if c == '%' || is_unsafe(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_unsafe(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

/// Reverses the `%XX` escapes of [`sanitize_segment`] and turns `_` back into
/// spaces. Text that does not decode to UTF-8 is kept as written.
fn unescape_segment(segment: &str) -> String {
    let spaced = segment.replace('_', " ");
    let bytes = spaced.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let decoded = spaced
                .get(idx + 1..idx + 3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8(out).unwrap_or(spaced)
}

/// Decodes a file stem written by [`FileRecordStore`] back into a display key.
pub fn decode_file_stem(stem: &str) -> Option<PeriodKey> {
    let (company, month) = match stem.split_once(COMPANY_SEPARATOR) {
        Some((company, month)) => (Some(unescape_segment(company)), unescape_segment(month)),
        None => (None, unescape_segment(stem)),
    };
    let key = PeriodKey::new(company.as_deref(), &month);
    if key.month.is_empty() {
        None
    } else {
        Some(key)
    }
}
