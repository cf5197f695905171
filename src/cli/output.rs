use std::fmt::Write as FmtWrite;

use crate::models::OutputFormat;
use crate::services::{Plan, PushStats};

pub trait Formatter {
    fn format_push_stats(&self, stats: &PushStats) -> String;
    fn format_plan(&self, plan: &Plan) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_push_stats(&self, stats: &PushStats) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Push complete");
        let _ = writeln!(output, "-------------");
        let _ = writeln!(output, "Records:   {}", stats.records);
        let _ = writeln!(output, "Documents: {}", stats.batches);
        let _ = writeln!(output, "Requests:  {}", stats.requests);
        let _ = writeln!(output, "Chunks:    {}", stats.chunks);
        if stats.retries > 0 {
            let _ = writeln!(output, "Retries:   {}", stats.retries);
        }
        let _ = writeln!(output, "Duration:  {}ms", stats.duration_ms);
        output
    }

    fn format_plan(&self, plan: &Plan) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{} records -> {} documents -> {} requests ({} chunks, id scheme v{})\n",
            plan.records,
            plan.batches,
            plan.requests.len(),
            plan.total_chunks(),
            plan.id_scheme_version
        );

        for (i, request) in plan.requests.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. namespace={} doc={} chunks={}",
                i + 1,
                request.namespace,
                request.doc_id,
                request.chunks
            );
            if request.first_chunk_id == request.last_chunk_id {
                let _ = writeln!(output, "   {}", request.first_chunk_id);
            } else {
                let _ = writeln!(
                    output,
                    "   {} .. {}",
                    request.first_chunk_id, request.last_chunk_id
                );
            }
        }

        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        // Value serialization cannot fail: keys are strings, floats are finite
        rendered.unwrap_or_default() + "\n"
    }
}

impl Formatter for JsonFormatter {
    fn format_push_stats(&self, stats: &PushStats) -> String {
        self.render(&serde_json::to_value(stats).unwrap_or_default())
    }

    fn format_plan(&self, plan: &Plan) -> String {
        let json = serde_json::json!({
            "records": plan.records,
            "batches": plan.batches,
            "chunks": plan.total_chunks(),
            "id_scheme_version": plan.id_scheme_version,
            "requests": plan.requests,
        });
        self.render(&json)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
