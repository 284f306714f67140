use std::path::Path;

use anyhow::{Context, Result};
use saber_core::{MatchInstant, SensorFrame};
use saber_executor::LandmarkSource;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader, Lines},
};

/// Plays back recorded sensor frames from a JSON-lines file, one frame per tick.
pub struct ReplaySensor {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl ReplaySensor {
    /// Open a recording. Failing to open it is a sensor initialization error.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open replay file {}", path.display()))?;
        tracing::info!("Replaying sensor frames from {}", path.display());
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl LandmarkSource for ReplaySensor {
    async fn detect(&mut self, _now: MatchInstant) -> Result<Option<SensorFrame>> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line)
                .with_context(|| format!("Malformed sensor frame on line {}", self.line_no))?;
            return Ok(Some(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_replay_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp_ms": 33.0, "bodies": [[{{"x": 0.5, "y": 0.5}}]]}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"timestamp_ms": 66.0}}"#).unwrap();

        let mut sensor = ReplaySensor::open(file.path()).await.unwrap();
        let now = MatchInstant::default();

        let frame = sensor.detect(now).await.unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 33.0);
        assert_eq!(frame.bodies.len(), 1);
        assert!(frame.hands.is_empty());

        let err = sensor.detect(now).await.unwrap_err();
        assert!(err.to_string().contains("line 3"));

        // A bad line only costs its own tick
        let frame = sensor.detect(now).await.unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 66.0);
        assert!(frame.bodies.is_empty());

        assert!(sensor.detect(now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReplaySensor::open(&dir.path().join("missing.jsonl")).await;
        assert!(result.is_err());
    }
}
