//! OpenTelemetry span exporter that appends JSON lines to a file.
//!
//! Each exported span becomes one flat JSON object:
//!
//! ```json
//! {"service":"mealcast","name":"rank_by_context","trace_id":"…","span_id":"…",
//!  "parent_span_id":null,"start_unix_nano":"1760860800000000000","duration_us":412,
//!  "status":"unset","attributes":{"limit":20,"user_id":"1"},"events":[]}
//! ```
//!
//! When the file grows past [`MAX_FILE_SIZE_BYTES`] it is renamed to
//! `<file>.1`, replacing any previous backup, and a fresh file is started.

use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size at which the span file is rotated (5 MB).
const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Append-only span file with single-backup rotation.
#[derive(Debug)]
struct SpanFile {
    path: PathBuf,
    /// Opened lazily on first write.
    file: Option<File>,
}

impl SpanFile {
    const fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate_if_full(&mut self) -> io::Result<()> {
        let full = fs::metadata(&self.path).is_ok_and(|m| m.len() >= MAX_FILE_SIZE_BYTES);
        if full {
            self.file = None;
            fs::rename(&self.path, self.backup_path())?;
        }
        Ok(())
    }

    fn append(&mut self, lines: &str) -> io::Result<()> {
        self.rotate_if_full()?;

        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "span file not open"))?;

        file.write_all(lines.as_bytes())?;
        file.flush()
    }
}

/// Exports finished spans as JSON lines.
#[derive(Debug)]
struct SpanFileExporter {
    service_name: &'static str,
    file: SpanFile,
    is_shutdown: bool,
}

fn unix_nanos(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos())
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        other => json!(other.as_str()),
    }
}

fn attributes_object(attributes: &[KeyValue]) -> Map<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

impl SpanFileExporter {
    const fn new(file_path: PathBuf, service_name: &'static str) -> Self {
        Self {
            service_name,
            file: SpanFile::new(file_path),
            is_shutdown: false,
        }
    }

    fn span_json(&self, span: &SpanData) -> JsonValue {
        let duration_us = span
            .end_time
            .duration_since(span.start_time)
            .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));

        let parent = (span.parent_span_id != SpanId::INVALID)
            .then(|| format!("{:016x}", span.parent_span_id));

        let status = match &span.status {
            Status::Unset => json!("unset"),
            Status::Ok => json!("ok"),
            Status::Error { description } => json!({ "error": description.to_string() }),
        };

        let events: Vec<&str> = span.events.iter().map(|e| &*e.name).collect();

        json!({
            "service": self.service_name,
            "name": span.name,
            "trace_id": format!("{:032x}", span.span_context.trace_id()),
            "span_id": format!("{:016x}", span.span_context.span_id()),
            "parent_span_id": parent,
            "start_unix_nano": unix_nanos(span.start_time).to_string(),
            "duration_us": duration_us,
            "status": status,
            "attributes": attributes_object(&span.attributes),
            "events": events,
        })
    }
}

impl SpanExporter for SpanFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            let mut lines = String::new();
            for span in &batch {
                lines.push_str(&self.span_json(span).to_string());
                lines.push('\n');
            }
            self.file
                .append(&lines)
                .map_err(|e| TraceError::from(e.to_string()))
        };

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
        self.file.file = None;
    }
}

/// Builds a tracer provider that exports every span to `file_path`.
///
/// Uses the simple (synchronous, unbatched) span processor so spans reach the
/// file without a background runtime.
pub fn create_tracer_provider(file_path: PathBuf, service_name: &'static str) -> TracerProvider {
    let resource = Resource::new(vec![KeyValue::new("service.name", service_name)]);
    let exporter = SpanFileExporter::new(file_path, service_name);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
