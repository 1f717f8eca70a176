use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use resq_core::config::ConfigError;
use resq_core::{
    init_telemetry_with_writer, Config, GoogleSearchClient, Provider, ResearchError,
    ResearchProgress, ResearchReport, ResearchRunner, TelemetryOptions,
};
use tokio::sync::mpsc;

mod output;
mod progress;

use output::Printer;
use progress::{LogWriter, Stream};

#[derive(Parser)]
#[command(name = "resq", version)]
#[command(about = "Answer a research question from web search results, with citations", long_about = None)]
struct Cli {
    /// The research question, quoted
    question: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Override the language model
    #[arg(long)]
    model: Option<String>,

    /// Log requests and pipeline stages
    #[arg(short, long)]
    verbose: bool,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

const USAGE: &str = "Usage: resq \"<your research question>\"";

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", Config::default_config_string());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(question) = cli.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(1));
    };

    let printer = Printer::new(cli.format);
    let spinner = progress::spinner();

    let stream = printer.message_stream();
    let with_ansi = match stream {
        Stream::Stdout => std::io::stdout().is_terminal(),
        Stream::Stderr => std::io::stderr().is_terminal(),
    };
    let log_writer = LogWriter::new(spinner.clone(), stream);
    init_telemetry_with_writer(
        TelemetryOptions {
            env_filter: cli.verbose.then(|| "resq_core=debug,resq=debug,warn".to_string()),
            with_ansi,
        },
        move || log_writer.clone(),
    )?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => Config::load().wrap_err("failed to load configuration")?,
    };
    if let Some(model) = cli.model {
        config.llm.model = Some(model);
    }
    config.validate()?;

    // No network activity before every credential is present.
    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(ConfigError::MissingCredentials(missing)) => {
            for credential in missing {
                printer.error(&credential.to_string());
            }
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err.into()),
    };

    let llm = Provider::from_config(&config.llm, &credentials).build();
    let search = GoogleSearchClient::from_config(&config.search, &credentials);
    let runner = ResearchRunner::from_config(llm, search, &config);

    printer.question(question);
    progress::start(&spinner, "Generating search queries");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let updates = {
        let spinner = spinner.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    ResearchProgress::QueriesGenerated(queries) => {
                        spinner.suspend(|| printer.queries(&queries));
                    }
                    ResearchProgress::SearchCompleted { query, .. } => {
                        spinner.set_message(format!("Searched: {query}"));
                    }
                    ResearchProgress::Synthesizing { sources } => {
                        spinner.set_message(format!("Synthesizing answer from {sources} sources"));
                    }
                }
            }
        })
    };

    let result = runner.run_with_progress(question, tx).await;
    updates.await?;
    spinner.finish_and_clear();

    let status = conclude(&printer, result)?;
    Ok(ExitCode::from(status))
}

/// Prints the outcome of a run and returns the process status.
///
/// Any printed answer is a success, the fallback answer included.
fn conclude(
    printer: &Printer,
    result: Result<ResearchReport, ResearchError>,
) -> Result<u8, serde_json::Error> {
    match result {
        Ok(report) => {
            printer.report(&report)?;
            Ok(0)
        }
        Err(err @ ResearchError::NoQueries) | Err(err @ ResearchError::EmptyQuestion) => {
            printer.error(&format!("Error: {err}"));
            Ok(1)
        }
        Err(err @ ResearchError::InsufficientInformation { .. }) => {
            printer.warning(&err.to_string());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use resq_core::{ResultSet, SearchResult, SynthesizedAnswer, FALLBACK_ANSWER};

    fn report(answer: SynthesizedAnswer) -> ResearchReport {
        ResearchReport {
            id: "run".to_string(),
            question: "q".to_string(),
            queries: vec!["q1".to_string()],
            outcomes: Vec::new(),
            sources: ResultSet::from(vec![SearchResult::new("t", "s", "https://t.org")]),
            answer,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_conclude_status() {
        let printer = Printer::new(OutputFormat::Json);

        let answered = report(SynthesizedAnswer::new("Yes [Source 1]."));
        assert_eq!(conclude(&printer, Ok(answered)).unwrap(), 0);

        let fallback = report(SynthesizedAnswer {
            text: FALLBACK_ANSWER.to_string(),
            fallback: true,
        });
        assert_eq!(conclude(&printer, Ok(fallback)).unwrap(), 0);

        assert_eq!(conclude(&printer, Err(ResearchError::NoQueries)).unwrap(), 1);
        assert_eq!(conclude(&printer, Err(ResearchError::EmptyQuestion)).unwrap(), 1);
        let insufficient = ResearchError::InsufficientInformation {
            queries: vec!["q1".to_string()],
        };
        assert_eq!(conclude(&printer, Err(insufficient)).unwrap(), 1);
    }
}
