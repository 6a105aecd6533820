//! Tesseract command-line engine.
//!
//! # Responsibilities
//! - Write the upload to a scratch file under `upload_dir`
//! - Run `tesseract <file> stdout -l <lang> tsv` under a deadline
//! - Remove the scratch file on every path
//! - Rebuild text and mean confidence from the TSV word rows

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::admission::UploadedFile;
use crate::config::{OcrConfig, UploadConfig};
use crate::ocr::engine::{OcrEngine, OcrError, Recognition};

/// TSV row level for a single word.
const WORD_LEVEL: u32 = 5;

/// Number of TSV columns before `text`.
const TSV_FIXED_COLUMNS: usize = 11;

/// OCR engine that shells out to the `tesseract` binary.
pub struct TesseractEngine {
    binary: String,
    language: String,
    timeout: Duration,
    upload_dir: PathBuf,
}

impl TesseractEngine {
    pub fn new(ocr: &OcrConfig, uploads: &UploadConfig) -> Self {
        Self {
            binary: ocr.binary.clone(),
            language: ocr.language.clone(),
            timeout: Duration::from_secs(ocr.timeout_secs),
            upload_dir: PathBuf::from(&uploads.upload_dir),
        }
    }

    fn scratch_path(&self, file: &UploadedFile) -> PathBuf {
        // The extension is client-controlled; keep it only when it is plain.
        let extension = file
            .extension
            .as_deref()
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin");
        self.upload_dir.join(format!("{}.{}", Uuid::new_v4(), extension))
    }

    async fn run(&self, path: &Path) -> Result<Recognition, OcrError> {
        let mut command = Command::new(&self.binary);
        command
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("tsv")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(OcrError::Spawn {
                    binary: self.binary.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(OcrError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(OcrError::Exited {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| OcrError::Output(e.to_string()))?;
        parse_tsv(&stdout)
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, file: &UploadedFile) -> Result<Recognition, OcrError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.scratch_path(file);
        tokio::fs::write(&path, &file.bytes).await?;

        tracing::debug!(path = %path.display(), size = file.size, "Running tesseract");
        let result = self.run(&path).await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove OCR scratch file");
        }

        result
    }
}

/// Rebuild text and confidence from tesseract TSV output.
///
/// Words on the same (block, paragraph, line) are joined by spaces, lines by
/// a newline, and blocks by a blank line. Confidence is the mean of the
/// non-negative word confidences.
pub fn parse_tsv(tsv: &str) -> Result<Recognition, OcrError> {
    let mut text = String::new();
    let mut last_key: Option<(u32, u32, u32)> = None;
    let mut confidence_sum = 0.0;
    let mut confidence_count = 0usize;

    for (line_no, line) in tsv.lines().enumerate() {
        if line.is_empty() || line.starts_with("level") {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < TSV_FIXED_COLUMNS {
            return Err(OcrError::Output(format!(
                "line {} has {} columns",
                line_no + 1,
                columns.len()
            )));
        }

        let number = |idx: usize| -> Result<u32, OcrError> {
            columns[idx].trim().parse().map_err(|_| {
                OcrError::Output(format!("line {}: bad column {} '{}'", line_no + 1, idx, columns[idx]))
            })
        };

        if number(0)? != WORD_LEVEL {
            continue;
        }

        let word = columns.get(TSV_FIXED_COLUMNS).map(|w| w.trim()).unwrap_or_default();
        if word.is_empty() {
            continue;
        }

        let key = (number(2)?, number(3)?, number(4)?);
        match last_key {
            Some((block, _, _)) if block != key.0 => text.push_str("\n\n"),
            Some(previous) if previous != key => text.push('\n'),
            Some(_) => text.push(' '),
            None => {}
        }
        text.push_str(word);
        last_key = Some(key);

        let confidence: f64 = columns[10]
            .trim()
            .parse()
            .map_err(|_| OcrError::Output(format!("line {}: bad confidence '{}'", line_no + 1, columns[10])))?;
        if confidence >= 0.0 {
            confidence_sum += confidence;
            confidence_count += 1;
        }
    }

    let confidence = if confidence_count == 0 {
        0.0
    } else {
        confidence_sum / confidence_count as f64
    };

    Ok(Recognition { text, confidence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    const HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn row(level: u32, block: u32, par: u32, line: u32, word: u32, conf: &str, text: &str) -> String {
        format!("{level}\t1\t{block}\t{par}\t{line}\t{word}\t0\t0\t10\t10\t{conf}\t{text}")
    }

    #[test]
    fn test_parse_words_lines_and_blocks() {
        let tsv = [
            HEADER.to_string(),
            row(1, 0, 0, 0, 0, "-1", ""),
            row(2, 1, 0, 0, 0, "-1", ""),
            row(5, 1, 1, 1, 1, "96", "Hello"),
            row(5, 1, 1, 1, 2, "90", "World"),
            row(5, 1, 1, 2, 1, "84", "again"),
            row(4, 2, 1, 1, 0, "-1", ""),
            row(5, 2, 1, 1, 1, "90", "Footer"),
        ]
        .join("\n");

        let recognition = parse_tsv(&tsv).unwrap();
        assert_eq!(recognition.text, "Hello World\nagain\n\nFooter");
        assert!((recognition.confidence - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_confidence_ignored() {
        let tsv = [HEADER.to_string(), row(5, 1, 1, 1, 1, "-1", "x"), row(5, 1, 1, 1, 2, "80.5", "y")].join("\n");
        let recognition = parse_tsv(&tsv).unwrap();
        assert_eq!(recognition.text, "x y");
        assert!((recognition.confidence - 80.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_output() {
        let recognition = parse_tsv(HEADER).unwrap();
        assert_eq!(recognition.text, "");
        assert_eq!(recognition.confidence, 0.0);
    }

    #[test]
    fn test_truncated_row_is_an_error() {
        let tsv = format!("{HEADER}\n5\t1\t1");
        assert!(matches!(parse_tsv(&tsv), Err(OcrError::Output(_))));
    }

    #[test]
    fn test_scratch_path_sanitizes_extension() {
        let engine = TesseractEngine::new(&OcrConfig::default(), &UploadConfig::default());
        let mut file = UploadedFile {
            field_name: "image".into(),
            original_name: "x.png".into(),
            mime_type: None,
            extension: Some("png".into()),
            size: 0,
            bytes: Bytes::new(),
        };
        assert_eq!(engine.scratch_path(&file).extension().unwrap(), "png");

        file.extension = Some("png/../../etc".into());
        let path = engine.scratch_path(&file);
        assert_eq!(path.extension().unwrap(), "bin");
        assert_eq!(path.parent().unwrap(), Path::new("uploads"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let dir = std::env::temp_dir().join(format!("ocr-gateway-test-{}", Uuid::new_v4()));
        let ocr = OcrConfig {
            binary: "definitely-not-tesseract-binary".into(),
            ..OcrConfig::default()
        };
        let uploads = UploadConfig {
            upload_dir: dir.to_string_lossy().into_owned(),
            ..UploadConfig::default()
        };
        let engine = TesseractEngine::new(&ocr, &uploads);
        let file = UploadedFile {
            field_name: "image".into(),
            original_name: "x.png".into(),
            mime_type: Some("image/png".into()),
            extension: Some("png".into()),
            size: 3,
            bytes: Bytes::from_static(b"abc"),
        };

        let err = engine.recognize(&file).await.unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));

        // Scratch file is cleaned up even on failure.
        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
