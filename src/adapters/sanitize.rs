//! Log redaction for personal data.
//!
//! Formatted log lines pass through `SanitizingMakeWriter`, which replaces:
//! - session and prediction identifiers (UUIDs)
//! - e-mail addresses
//! - body measurements written as `key=value` / `key: value`
//!   (age, weight, height, BMI)
//!
//! Call sites should still avoid logging raw form values. Input longer than
//! `OBESCAN_SANITIZE_MAX_BYTES` (default 16 KiB) is truncated before scanning.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<RedactionPatterns> = OnceLock::new();

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct RedactionRule {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionPatterns {
    set: RegexSet,
    rules: Vec<RedactionRule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("OBESCAN_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn patterns() -> &'static RedactionPatterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-ID]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"(?i)\b(?:age|weight|height(?:_cm|_m)?|bmi)\b\s*[:=]\s*-?\d+(?:\.\d+)?",
                "[REDACTED-MEASUREMENT]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| RedactionRule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionPatterns { set, rules }
    })
}

/// Replace personal data in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// `MakeWriter` wrapper that redacts each formatted line before it reaches
/// the inner sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.inner
            .write_all(sanitize(&String::from_utf8_lossy(bytes)).as_bytes())
    }

    fn write_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.emit(&line)?;
        }
        Ok(())
    }

    fn write_pending(&mut self) -> std::io::Result<()> {
        let pending = std::mem::take(&mut self.buffer);
        if pending.is_empty() {
            return Ok(());
        }
        self.emit(&pending)
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line with no newline is cut once it grows past twice the cap.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            self.write_pending()?;
            self.inner.write_all(b"\n")?;
        } else {
            self.write_lines()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.write_lines()?;
        self.write_pending()?;
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}
