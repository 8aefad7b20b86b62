//! Output formatters for the rolecolor CLI
//!
//! Provides two output formats:
//!
//! - **Human**: Colored, readable report for terminal use
//! - **JSON**: Structured output for scripting and jq
//!
//! ## Example
//!
//! ```rust,no_run
//! use rolecolor::cli::output::{create_formatter, OutputFormat};
//!
//! let formatter = create_formatter(OutputFormat::Json, false);
//! let mut stdout = std::io::stdout();
//! formatter.format_error("no input", &mut stdout).unwrap();
//! ```

use serde::Serialize;
use std::io::{self, Write};

use crate::pipeline::Analysis;
use crate::roles::RoleSet;
use crate::scoring::ScoringResult;

/// Width of the probability bar in human output
const BAR_WIDTH: usize = 30;
/// Longest sentence shown in the per-sentence table before truncation
const SENTENCE_PREVIEW_CHARS: usize = 72;
/// Longest excerpt of the document's own summary shown next to the generated one
const ORIGINAL_SUMMARY_CHARS: usize = 200;

// =============================================================================
// Output Format Enum
// =============================================================================

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output with optional colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

// =============================================================================
// Serializable Output Types
// =============================================================================

/// Role listing entry for JSON serialization
#[derive(Debug, Serialize)]
pub struct RoleOutput<'a> {
    pub id: &'a str,
    pub description: &'a str,
    pub has_template: bool,
}

// =============================================================================
// Output Formatter Trait
// =============================================================================

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one analyzed document
    fn format_analysis(
        &self,
        analysis: &Analysis,
        show_sentences: bool,
        writer: &mut dyn Write,
    ) -> io::Result<()>;

    /// Format the active role taxonomy
    fn format_roles(&self, roles: &RoleSet, writer: &mut dyn Write) -> io::Result<()>;

    /// Format an error message
    fn format_error(&self, error: &str, writer: &mut dyn Write) -> io::Result<()>;
}

// =============================================================================
// Human Formatter
// =============================================================================

/// Human-readable output formatter
pub struct HumanFormatter {
    use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.use_color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    /// Format a similarity with color based on value
    fn format_similarity(&self, similarity: f64) -> String {
        let text = format!("{:+.3}", similarity);
        if !self.use_color {
            return text;
        }

        let color = if similarity >= 0.5 {
            "32" // Green
        } else if similarity >= 0.2 {
            "33" // Yellow
        } else {
            "90" // Gray
        };

        self.colorize(&text, color)
    }

    fn bar(&self, probability: f64) -> String {
        let filled = ((probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize)
            .min(BAR_WIDTH);
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", cut)
    }
}

fn preview(text: &str) -> String {
    truncate(text, SENTENCE_PREVIEW_CHARS)
}

/// Sentences per best-match role, most frequent first, ties in taxonomy order
fn best_match_tally(result: &ScoringResult) -> Vec<(&str, usize)> {
    let mut tally: Vec<(&str, usize)> = result.scores.iter().map(|(role, _)| (role, 0)).collect();

    for record in &result.sentence_scores {
        let role = record.best_match_role.as_str();
        match tally.iter_mut().find(|(id, _)| *id == role) {
            Some(entry) => entry.1 += 1,
            None => tally.push((role, 1)),
        }
    }

    tally.retain(|(_, count)| *count > 0);
    // Stable sort keeps taxonomy order among equal counts
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

impl OutputFormatter for HumanFormatter {
    fn format_analysis(
        &self,
        analysis: &Analysis,
        show_sentences: bool,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        let result = &analysis.scoring;

        if let Some(ref error) = result.error {
            writeln!(writer, "{}: {}", self.colorize("Warning", "1;33"), error)?;
            writeln!(
                writer,
                "{}",
                self.colorize(
                    &format!(
                        "Found {} qualifying sentences; scores below are uniform.",
                        result.total_sentences
                    ),
                    "90"
                )
            )?;
            writeln!(writer)?;
        } else {
            let header = format!(
                "Dominant role: {} ({:.1}%)",
                result.dominant_role,
                result.confidence * 100.0
            );
            writeln!(writer, "{}", self.colorize(&header, "1;32"))?;
            writeln!(
                writer,
                "{}",
                self.colorize(
                    &format!(
                        "{} sentences, {} dims, model {}",
                        result.total_sentences, result.embedding_dim, analysis.model_id
                    ),
                    "90"
                )
            )?;
            writeln!(writer)?;
        }

        let width = result.scores.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
        for (role, probability) in result.scores.iter() {
            let name = format!("{:<width$}", role, width = width);
            let name = if role == result.dominant_role {
                self.colorize(&name, "1")
            } else {
                name
            };
            writeln!(
                writer,
                "  {}  {}  {:>5.1}%",
                name,
                self.colorize(&self.bar(probability), "36"),
                probability * 100.0
            )?;
        }

        if !result.top_sentences.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "{}", self.colorize("Evidence:", "1;36"))?;
            for (i, sentence) in result.top_sentences.iter().enumerate() {
                writeln!(writer, "  {}. {}", i + 1, sentence)?;
            }
        }

        if let Some(ref summary) = analysis.summary {
            writeln!(writer)?;
            writeln!(writer, "{}", self.colorize("Original summary:", "1;36"))?;
            match analysis.metadata.original_summary {
                Some(ref original) => {
                    writeln!(writer, "  {}", truncate(original, ORIGINAL_SUMMARY_CHARS))?
                }
                None => writeln!(
                    writer,
                    "  {}",
                    self.colorize("No summary section found in the document.", "90")
                )?,
            }

            writeln!(writer)?;
            writeln!(writer, "{}", self.colorize("Summary:", "1;36"))?;
            writeln!(writer, "  {}", summary.text)?;
        }

        if show_sentences && !result.sentence_scores.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "{}", self.colorize("Sentences:", "1;36"))?;
            for record in &result.sentence_scores {
                writeln!(
                    writer,
                    "  {:>3}. [{} {}] {}",
                    record.index + 1,
                    record.best_match_role,
                    self.format_similarity(record.best_match_score),
                    preview(&record.sentence)
                )?;
            }

            let counts: Vec<String> = best_match_tally(result)
                .into_iter()
                .map(|(role, count)| {
                    let noun = if count == 1 { "sentence" } else { "sentences" };
                    format!("{}: {} {}", role, count, noun)
                })
                .collect();
            writeln!(
                writer,
                "  {}",
                self.colorize(&format!("Best match: {}", counts.join(", ")), "90")
            )?;
        }

        Ok(())
    }

    fn format_roles(&self, roles: &RoleSet, writer: &mut dyn Write) -> io::Result<()> {
        let header = self.colorize(&format!("Roles ({}):", roles.len()), "1;36");
        writeln!(writer, "{}", header)?;

        for role in roles {
            writeln!(writer, "  {}", self.colorize(&role.id, "1"))?;
            writeln!(writer, "    {}", role.description)?;
        }

        Ok(())
    }

    fn format_error(&self, error: &str, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}: {}", self.colorize("Error", "1;31"), error)
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// JSON output formatter
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

fn write_json(writer: &mut dyn Write, value: &impl Serialize) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(
        &self,
        analysis: &Analysis,
        show_sentences: bool,
        writer: &mut dyn Write,
    ) -> io::Result<()> {
        if show_sentences {
            return write_json(writer, analysis);
        }

        let mut value = serde_json::to_value(analysis)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(scoring) = value.get_mut("scoring").and_then(|s| s.as_object_mut()) {
            scoring.remove("sentence_scores");
        }
        write_json(writer, &value)
    }

    fn format_roles(&self, roles: &RoleSet, writer: &mut dyn Write) -> io::Result<()> {
        let outputs: Vec<RoleOutput<'_>> = roles
            .iter()
            .map(|r| RoleOutput {
                id: &r.id,
                description: &r.description,
                has_template: r.template.is_some(),
            })
            .collect();

        let json = serde_json::json!({
            "count": outputs.len(),
            "roles": outputs
        });
        write_json(writer, &json)
    }

    fn format_error(&self, error: &str, writer: &mut dyn Write) -> io::Result<()> {
        let json = serde_json::json!({
            "type": "error",
            "message": error
        });
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&json).unwrap_or_default()
        )
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create a formatter for the given format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

// =============================================================================
// Tests
// =============================================================================
