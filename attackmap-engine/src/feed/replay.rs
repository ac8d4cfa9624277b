use anyhow::{Context, Result};
use attackmap_messages::AttackEvent;
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::AttackSource;

/// Replays attacks recorded one JSON object per line.
///
/// Lines that fail to parse are skipped. If `loop_on_eof` is set the
/// recording restarts from the beginning, unless it holds no valid events.
#[derive(Debug)]
pub struct ReplaySource {
    path: PathBuf,
    reader: BufReader<File>,
    loop_on_eof: bool,
    line_number: usize,
    events_since_rewind: usize,
}

impl ReplaySource {
    pub fn new<P: AsRef<Path>>(path: P, loop_on_eof: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("cannot open recording {}", path.display()))?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
            loop_on_eof,
            line_number: 0,
            events_since_rewind: 0,
        })
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        self.events_since_rewind = 0;
        Ok(())
    }
}

impl AttackSource for ReplaySource {
    fn next_attack(&mut self) -> Result<Option<AttackEvent>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                // EOF
                if self.loop_on_eof && self.events_since_rewind > 0 {
                    self.rewind()?;
                    continue;
                }
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<AttackEvent>(trimmed) {
                Ok(attack) => {
                    self.events_since_rewind += 1;
                    return Ok(Some(attack));
                }
                Err(e) => warn!(
                    "Skipping malformed attack at {}:{}: {}",
                    self.path.display(),
                    self.line_number,
                    e
                ),
            }
        }
    }
}
