//! Tagged-post records written by `tagwise batch`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tagwise_core::{AnalysisResult, BatchItem};

/// One line of batch output: the post identity plus its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedRecord {
    pub id: String,
    pub url: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl TaggedRecord {
    pub fn new(item: &BatchItem, result: &AnalysisResult) -> Self {
        Self {
            id: item.id.clone(),
            url: item.request.url.clone(),
            result: result.clone(),
        }
    }
}

/// Writes records as JSONL, flushing after every line so an interrupted run
/// keeps everything tagged so far.
pub struct RecordWriter<W: Write> {
    writer: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, record: &TaggedRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Ids already present in an earlier output file, for `--skip-existing`.
pub fn load_existing_ids(path: &Path) -> anyhow::Result<HashSet<String>> {
    let mut ids = HashSet::new();
    if !path.exists() {
        return Ok(ids);
    }

    let content = std::fs::read_to_string(path)?;
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<TaggedRecord>(line) {
            Ok(record) => {
                ids.insert(record.id);
            }
            Err(e) => tracing::debug!("Ignoring unreadable output line: {e}"),
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> AnalysisResult {
        AnalysisResult {
            tags: vec!["travel".to_string(), "beach".to_string()],
            suggested_collection: Some("Trips".to_string()),
            mood: Some("calm".to_string()),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_record_flattens_result() {
        let item = BatchItem::new("p1", "https://a/1", None);
        let json = serde_json::to_string(&TaggedRecord::new(&item, &result())).unwrap();
        assert!(json.contains("\"id\":\"p1\""));
        assert!(json.contains("\"tags\":[\"travel\",\"beach\"]"));
        assert!(json.contains("\"suggestedCollection\":\"Trips\""));
    }

    #[test]
    fn test_writer_emits_one_line_per_record() {
        let mut buf = Vec::new();
        {
            let mut writer = RecordWriter::new(&mut buf);
            for id in ["1", "2"] {
                let item = BatchItem::new(id, "https://a", None);
                writer.write(&TaggedRecord::new(&item, &result())).unwrap();
            }
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_load_existing_ids() {
        let file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut writer = RecordWriter::new(std::fs::File::create(file.path()).unwrap());
            let item = BatchItem::new("done-1", "https://a", None);
            writer.write(&TaggedRecord::new(&item, &result())).unwrap();
        }
        std::fs::OpenOptions::new()
            .append(true)
            .open(file.path())
            .unwrap()
            .write_all(b"garbage line\n")
            .unwrap();

        let ids = load_existing_ids(file.path()).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("done-1"));
    }

    #[test]
    fn test_load_existing_ids_missing_file() {
        let ids = load_existing_ids(Path::new("/definitely/not/here.jsonl")).unwrap();
        assert!(ids.is_empty());
    }
}
