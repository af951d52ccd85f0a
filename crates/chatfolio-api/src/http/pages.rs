//! Server-rendered HTML pages.
//!
//! Templates are embedded at compile time and registered with a single
//! [`Tera`] instance. `.html` templates are auto-escaped, so stored user input
//! and model answers are always rendered as text.

use std::collections::HashMap;

use chrono::DateTime;
use tera::{Context as TeraContext, Tera, Value};

use chatfolio_types::project::{Conversation, Project, MAX_PROJECT_NAME_LEN};

const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const CHAT_TEMPLATE: &str = include_str!("../../templates/chat.html");

/// Display format for conversation timestamps, e.g. `01Mar2024 12:00:00`.
pub const DATETIME_FORMAT: &str = "%d%b%Y %H:%M:%S";

/// Renders the project list and chat transcript pages.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("chat.html", CHAT_TEMPLATE),
        ])?;
        tera.register_filter("formatdatetime", format_datetime);
        Ok(Self { tera })
    }

    /// The project list, optionally with an error shown above the form.
    pub fn index(&self, projects: &[Project], error: Option<&str>) -> Result<String, tera::Error> {
        let mut context = TeraContext::new();
        context.insert("projects", projects);
        context.insert("error", &error);
        context.insert("max_name_len", &MAX_PROJECT_NAME_LEN);
        self.tera.render("index.html", &context)
    }

    /// A project's transcript, oldest turn first.
    pub fn chat(
        &self,
        project: &Project,
        conversations: &[Conversation],
        notice: Option<&str>,
    ) -> Result<String, tera::Error> {
        let mut context = TeraContext::new();
        context.insert("project", project);
        context.insert("conversations", conversations);
        context.insert("notice", &notice);
        self.tera.render("chat.html", &context)
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer").finish_non_exhaustive()
    }
}

/// `formatdatetime` filter: RFC 3339 string to [`DATETIME_FORMAT`].
///
/// Accepts an optional `format` argument. Null renders as an empty string.
fn format_datetime(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) => s,
        other => {
            return Err(tera::Error::msg(format!(
                "formatdatetime expects a datetime string, got {other}"
            )));
        }
    };
    let format = args
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or(DATETIME_FORMAT);

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("formatdatetime: invalid datetime '{raw}': {e}")))?;
    Ok(Value::String(parsed.format(format).to_string()))
}
