//! Label table: integer class index to human-readable name.
//!
//! The on-disk format is one entry per line, `"<index><space><name>"`,
//! trailing whitespace trimmed. Any malformed line makes the whole load
//! fail; there is no partial or best-effort table.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

#[derive(Clone, Debug)]
pub struct LabelTable {
    entries: HashMap<usize, String>,
}

impl LabelTable {
    /// Load a table from disk. A missing file or any malformed line is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read label table {}", path.display()))?;
        Self::parse(&raw)
            .with_context(|| format!("failed to parse label table {}", path.display()))
    }

    /// Parse table text. Blank lines are rejected like any other malformed
    /// line, except trailing empty lines which `lines()` never yields.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim_end();
            let (idx, name) = line
                .split_once(' ')
                .ok_or_else(|| anyhow!("line {}: expected \"<index> <label>\"", lineno + 1))?;
            let idx: usize = idx
                .parse()
                .map_err(|e| anyhow!("line {}: bad index {:?}: {}", lineno + 1, idx, e))?;
            if name.is_empty() {
                return Err(anyhow!("line {}: empty label", lineno + 1));
            }
            if entries.insert(idx, name.to_string()).is_some() {
                return Err(anyhow!("line {}: duplicate index {}", lineno + 1, idx));
            }
        }
        if entries.is_empty() {
            return Err(anyhow!("label table is empty"));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(&idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_valid_table() -> Result<()> {
        let table = LabelTable::parse("0 no_mask\n1 mask\n2 incorrect\n")?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("no_mask"));
        assert_eq!(table.get(1), Some("mask"));
        assert_eq!(table.get(2), Some("incorrect"));
        assert_eq!(table.get(3), None);
        Ok(())
    }

    #[test]
    fn trims_trailing_whitespace() -> Result<()> {
        let table = LabelTable::parse("0 with_mask  \n1 without_mask\t\n")?;
        assert_eq!(table.get(0), Some("with_mask"));
        assert_eq!(table.get(1), Some("without_mask"));
        Ok(())
    }

    #[test]
    fn any_malformed_line_is_fatal() {
        assert!(LabelTable::parse("0 ok\nnot_a_table\n").is_err());
        assert!(LabelTable::parse("x mask\n").is_err());
        assert!(LabelTable::parse("0 \n").is_err());
        assert!(LabelTable::parse("0 a\n0 b\n").is_err());
        assert!(LabelTable::parse("").is_err());
    }

    #[test]
    fn loads_from_disk() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "0 no_mask\n1 mask\n")?;
        let table = LabelTable::load(file.path())?;
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn missing_file_is_fatal() {
        assert!(LabelTable::load("/nonexistent/labels.txt").is_err());
    }
}
