//! Guard against packaging a catalogue whose metadata still carries the
//! example values from the template.

use std::fmt;

/// Fields checked against known placeholder values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedField {
    Name,
    Summary,
    User,
    Contact,
    FirstColumnDescription,
    Readme,
}

impl GuardedField {
    pub fn label(self) -> &'static str {
        match self {
            GuardedField::Name => "name",
            GuardedField::Summary => "summary",
            GuardedField::User => "user",
            GuardedField::Contact => "contact",
            GuardedField::FirstColumnDescription => "column_descriptions[0]",
            GuardedField::Readme => "readme",
        }
    }
}

impl fmt::Display for GuardedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Current values of the guarded fields, borrowed from a package request.
pub struct GuardedValues<'a> {
    pub name: &'a str,
    pub summary: &'a str,
    pub user: &'a str,
    pub contact: &'a str,
    pub first_column_description: Option<&'a str>,
    pub readme: &'a str,
}

/// Table of placeholder values per guarded field.
///
/// The default table lists the strings shipped in the example metadata
/// descriptor; teams with their own templates substitute their own table.
#[derive(Debug, Clone)]
pub struct SentinelPolicy {
    entries: Vec<(GuardedField, String)>,
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self::new(vec![
            (GuardedField::Name, "dummy".to_string()),
            (GuardedField::Summary, "This is a dummy catalogue".to_string()),
            (GuardedField::User, "Your name".to_string()),
            (GuardedField::Contact, "your@email.here".to_string()),
            (
                GuardedField::FirstColumnDescription,
                "Description of column 1".to_string(),
            ),
            (
                GuardedField::Readme,
                "Please replace this dummy readme".to_string(),
            ),
        ])
    }
}

impl SentinelPolicy {
    pub fn new(entries: Vec<(GuardedField, String)>) -> Self {
        Self { entries }
    }

    /// Returns the first guarded field whose current value exactly matches
    /// its placeholder, together with the matched placeholder.
    pub fn check(&self, values: &GuardedValues<'_>) -> Option<(GuardedField, String)> {
        for (field, placeholder) in &self.entries {
            let current = match field {
                GuardedField::Name => Some(values.name),
                GuardedField::Summary => Some(values.summary),
                GuardedField::User => Some(values.user),
                GuardedField::Contact => Some(values.contact),
                GuardedField::FirstColumnDescription => values.first_column_description,
                GuardedField::Readme => Some(values.readme),
            };
            if current == Some(placeholder.as_str()) {
                return Some((*field, placeholder.clone()));
            }
        }
        None
    }
}
