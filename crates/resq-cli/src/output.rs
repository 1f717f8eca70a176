//! Console rendering for each output format.
//!
//! Text mode prints everything on stdout for the operator. Markdown and JSON
//! keep stdout for the report alone and send messages to stderr.

use resq_core::ResearchReport;

use crate::progress::Stream;
use crate::OutputFormat;

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    /// Stream that carries messages and log lines for this format.
    pub fn message_stream(&self) -> Stream {
        if self.is_text() {
            Stream::Stdout
        } else {
            Stream::Stderr
        }
    }

    pub fn question(&self, question: &str) {
        if self.is_text() {
            println!("\n🔍 Research Question: {question}\n");
        }
    }

    pub fn queries(&self, queries: &[String]) {
        if self.is_text() {
            println!("🔎 Generated Search Queries:");
            for query in queries {
                println!(" - {query}");
            }
        }
    }

    pub fn report(&self, report: &ResearchReport) -> Result<(), serde_json::Error> {
        match self.format {
            OutputFormat::Text => {
                println!("\n🧠 Synthesized Answer:\n");
                println!("{}", report.answer.text);
                if !report.answer.fallback {
                    println!("\n📚 Sources:");
                    for (n, source) in report.sources.numbered() {
                        println!(" [{n}] {} - {}", source.title, source.link);
                    }
                }
            }
            OutputFormat::Markdown => print!("{}", report.to_markdown()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        }
        Ok(())
    }

    pub fn error(&self, message: &str) {
        if self.is_text() {
            println!("{message}");
        } else {
            eprintln!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if self.is_text() {
            println!("\n⚠️ {message}");
        } else {
            eprintln!("{message}");
        }
    }
}
