use crate::audit::event::{is_hex64, AuditEvent, ZERO_HASH_64};
use anyhow::{bail, Context};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only NDJSON file of hash-chained audit events.
pub struct AuditLog {
    path: PathBuf,
    last_hash: String,
}

impl AuditLog {
    /// Opens an existing log and resumes its chain, or creates an empty one.
    pub fn open_or_create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut last_hash = ZERO_HASH_64.to_string();
        if path.exists() {
            if let Some(event) = read_events(&path)?.pop() {
                last_hash = event.event_hash;
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&path)?;
        }
        Ok(Self { path, last_hash })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    /// Links `event` to the current tail, seals it and writes one line.
    pub fn append(&mut self, mut event: AuditEvent) -> anyhow::Result<AuditEvent> {
        event.prev_event_hash = self.last_hash.clone();
        let event = event.seal()?;
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');
        OpenOptions::new()
            .append(true)
            .open(&self.path)?
            .write_all(line.as_bytes())?;
        self.last_hash = event.event_hash.clone();
        Ok(event)
    }

    /// Re-hashes every event and checks each links to its predecessor.
    /// Returns the number of events verified.
    pub fn verify_chain(path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let events = read_events(path.as_ref())?;
        let mut prev = ZERO_HASH_64;
        for (idx, event) in events.iter().enumerate() {
            if event.prev_event_hash != prev {
                bail!("audit chain broken at event {}: prev_event_hash mismatch", idx);
            }
            if !is_hex64(&event.event_hash) || event.compute_hash()? != event.event_hash {
                bail!("audit chain broken at event {}: event_hash mismatch", idx);
            }
            prev = event.event_hash.as_str();
        }
        Ok(events.len())
    }
}

fn read_events(path: &Path) -> anyhow::Result<Vec<AuditEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading audit log {}", path.display()))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("audit log line {} is not an event", n + 1))
        })
        .collect()
}
