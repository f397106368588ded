/// Represents ways to locate elements inside the rendered document.
///
/// Selectors are interpreted by the [`UiDriver`](crate::driver::UiDriver)
/// implementation against whatever document representation it drives. They
/// stay deliberately structural (tag/role/attribute/text) so that both real
/// drivers and the in-memory test driver can evaluate them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Select by tag name (e.g. `select`, `input`, `label`).
    Tag(String),
    /// Select by `role` attribute (e.g. `combobox`, `listbox`, `option`).
    Role(String),
    /// Select by attribute presence, or presence with an exact value.
    Attr {
        name: String,
        value: Option<String>,
    },
    /// Select by class-list membership.
    Class(String),
    /// Select by trimmed visible text equality.
    Text(String),
    /// Elements matching every inner selector at once.
    All(Vec<Selector>),
    /// Elements matching at least one inner selector.
    Any(Vec<Selector>),
    /// Descendant chaining: each step searches within the previous matches.
    Chain(Vec<Selector>),
    /// Represents an invalid selector string, with a reason.
    Invalid(String),
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Selector {
    /// Convenience for `Attr` with no expected value.
    pub fn attr(name: &str) -> Self {
        Selector::Attr {
            name: name.to_string(),
            value: None,
        }
    }

    /// Convenience for `Attr` with an exact expected value.
    pub fn attr_eq(name: &str, value: &str) -> Self {
        Selector::Attr {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        // Handle chained selectors first
        let parts: Vec<&str> = s.split(">>").map(|p| p.trim()).collect();
        if parts.len() > 1 {
            return Selector::Chain(parts.into_iter().map(Selector::from).collect());
        }

        match s {
            _ if s.starts_with("role:") => Selector::Role(s[5..].trim().to_string()),
            _ if s.starts_with("tag:") => Selector::Tag(s[4..].trim().to_string()),
            _ if s.starts_with("text:") => Selector::Text(s[5..].to_string()),
            _ if s.starts_with("class:") => Selector::Class(s[6..].trim().to_string()),
            _ if s.starts_with('.') => Selector::Class(s[1..].to_string()),
            _ if s.starts_with('[') && s.ends_with(']') => {
                let body = &s[1..s.len() - 1];
                match body.split_once('=') {
                    Some((name, value)) => {
                        Selector::attr_eq(name.trim(), value.trim().trim_matches('"'))
                    }
                    None => Selector::attr(body.trim()),
                }
            }
            // Bare names of common form controls read as tag selectors.
            "select" | "input" | "button" | "label" | "option" | "li" | "ul" | "textarea" => {
                Selector::Tag(s.to_string())
            }
            _ => Selector::Invalid(format!(
                "Unknown selector format: \"{s}\". Use prefixes like 'role:', 'tag:', \
                 'text:', 'class:', or an '[attr=value]' expression."
            )),
        }
    }
}
