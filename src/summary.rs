//! Template-based profile summaries
//!
//! Renders a short first-person-style summary for the dominant role from the
//! role's template and a few facts pulled from the document (title, years of
//! experience, recognizable skills). Purely local string work; no model calls.
//!
//! ## Template placeholders
//!
//! | Placeholder    | Value                                                  |
//! |----------------|--------------------------------------------------------|
//! | `{title}`      | detected title, or `professional`                      |
//! | `{Title}`      | same with the first letter upper-cased                 |
//! | `{experience}` | `with 7 years of experience` / `with extensive experience` |
//! | `{skills}`     | up to three detected skills, or `modern technologies`  |
//! | `{role}`       | dominant role id                                       |
//! | `{role_lower}` | dominant role id, lower-cased                          |

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::roles::RoleSet;
use crate::scoring::ScoringResult;

/// Template used for roles that don't define their own
pub const GENERIC_TEMPLATE: &str = "Experienced {title} {experience}, demonstrating strong \
    alignment with {role} principles through professional work. Leverage skills in {skills} \
    to apply {role_lower} approaches and deliver consistent value.";

/// Recognized skills: (lowercase pattern, display name), in reporting order
const KNOWN_SKILLS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("react", "React"),
    ("node", "Node"),
    ("aws", "AWS"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("sql", "SQL"),
    ("machine learning", "Machine Learning"),
    ("data science", "Data Science"),
    ("api", "API"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("postgresql", "PostgreSQL"),
    ("redis", "Redis"),
    ("kafka", "Kafka"),
    ("graphql", "GraphQL"),
    ("microservices", "Microservices"),
];

/// At most this many skills are kept in metadata
const MAX_SKILLS: usize = 5;
/// At most this many skills are named in a summary
const SUMMARY_SKILLS: usize = 3;
/// Only the first few lines are searched for a title
const TITLE_SEARCH_LINES: usize = 5;

/// Headers that open the document's own summary section
const SUMMARY_HEADERS: &[&str] = &["summary", "objective", "profile", "about"];

/// Headers that close it
const SECTION_HEADERS: &[&str] = &[
    "experience",
    "professional experience",
    "work experience",
    "education",
    "skills",
    "technical skills",
    "work history",
    "employment",
    "projects",
    "certifications",
    "awards",
];

fn years_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\+?\s*years?").expect("valid years regex"))
}

fn title_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z][a-z]+(\s+[A-Z][a-z]+){1,3}$").expect("valid title regex")
    })
}

fn skill_patterns() -> &'static [(Regex, &'static str)] {
    static RE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RE.get_or_init(|| {
        KNOWN_SKILLS
            .iter()
            .map(|(pattern, display)| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(pattern)))
                    .expect("valid skill regex");
                (re, *display)
            })
            .collect()
    })
}

/// Facts pulled from the document for summary templates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileMetadata {
    /// Years of experience as written, e.g. "7"
    pub years: Option<String>,
    /// Title-cased line near the top, e.g. "Senior Software Engineer"
    pub title: Option<String>,
    pub skills: Vec<String>,
    /// The document's own Summary/Objective/Profile/About section, joined into one line
    pub original_summary: Option<String>,
}

impl ProfileMetadata {
    pub fn extract(text: &str) -> Self {
        let years = years_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let title = text
            .lines()
            .take(TITLE_SEARCH_LINES)
            .map(str::trim)
            .find(|line| title_pattern().is_match(line))
            .map(str::to_string);

        let skills = skill_patterns()
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, display)| display.to_string())
            .take(MAX_SKILLS)
            .collect();

        Self {
            years,
            title,
            skills,
            original_summary: extract_original_summary(text),
        }
    }

    fn experience_phrase(&self) -> String {
        match &self.years {
            Some(years) => format!("with {} years of experience", years),
            None => "with extensive experience".to_string(),
        }
    }

    fn skills_phrase(&self) -> String {
        if self.skills.is_empty() {
            "modern technologies".to_string()
        } else {
            self.skills
                .iter()
                .take(SUMMARY_SKILLS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Text after a summary header, `Some("")` for a bare header, `None` otherwise
fn summary_header_rest(line: &str) -> Option<&str> {
    let lower = line.to_lowercase();
    SUMMARY_HEADERS.iter().find_map(|header| {
        if lower == *header {
            Some("")
        } else if lower.starts_with(header) && lower[header.len()..].starts_with(':') {
            Some(line.get(header.len() + 1..).map(str::trim).unwrap_or(""))
        } else {
            None
        }
    })
}

fn is_section_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    SECTION_HEADERS.iter().any(|header| {
        lower == *header
            || lower
                .strip_prefix(header)
                .is_some_and(|rest| rest.starts_with(':') || rest.starts_with(' '))
    })
}

/// Find the document's existing summary section
///
/// The section starts after a line that is exactly a summary header (or the
/// header followed by a colon, whose trailing text is kept) and runs until the
/// next section header such as "Experience" or "Education".
pub fn extract_original_summary(text: &str) -> Option<String> {
    let mut collected: Vec<&str> = Vec::new();
    let mut in_summary = false;

    for line in text.lines().map(str::trim) {
        if let Some(rest) = summary_header_rest(line) {
            in_summary = true;
            if !rest.is_empty() {
                collected.push(rest);
            }
            continue;
        }

        if !in_summary {
            continue;
        }
        if is_section_header(line) {
            break;
        }
        if !line.is_empty() {
            collected.push(line);
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join(" "))
    }
}

/// A rendered summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub role: String,
    pub text: String,
    /// Always "template"; kept so consumers can tell generated text apart
    pub method: String,
}

/// Renders summaries from role templates
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    roles: RoleSet,
}

impl SummaryGenerator {
    pub fn new(roles: RoleSet) -> Self {
        Self { roles }
    }

    /// Summary for the result's dominant role, or `None` for a degraded result
    pub fn generate(&self, result: &ScoringResult, metadata: &ProfileMetadata) -> Option<Summary> {
        if result.is_degraded() {
            return None;
        }

        let role = result.dominant_role.as_str();
        let template = self
            .roles
            .get(role)
            .and_then(|r| r.template.as_deref())
            .unwrap_or(GENERIC_TEMPLATE);

        Some(Summary {
            role: role.to_string(),
            text: render(template, role, metadata),
            method: "template".to_string(),
        })
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fill template placeholders
pub fn render(template: &str, role: &str, metadata: &ProfileMetadata) -> String {
    let title = metadata
        .title
        .clone()
        .unwrap_or_else(|| "professional".to_string());

    template
        .replace("{Title}", &capitalize(&title))
        .replace("{title}", &title)
        .replace("{experience}", &metadata.experience_phrase())
        .replace("{skills}", &metadata.skills_phrase())
        .replace("{role_lower}", &role.to_lowercase())
        .replace("{role}", role)
}
