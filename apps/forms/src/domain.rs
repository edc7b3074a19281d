use serde::{Deserialize, Serialize};

/// The closed set of input kinds a form field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
    Select,
    Checkbox,
    Multiselect,
    Number,
    Date,
}

impl FieldType {
    pub const ALL: [Self; 9] = [
        Self::Text,
        Self::Email,
        Self::Phone,
        Self::Textarea,
        Self::Select,
        Self::Checkbox,
        Self::Multiselect,
        Self::Number,
        Self::Date,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Multiselect => "multiselect",
            Self::Number => "number",
            Self::Date => "date",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "TEXT", rename_all = "lowercase")
)]
pub enum SubmissionStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl SubmissionStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Read, Self::Replied, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "new" => Some(Self::New),
            "read" => Some(Self::Read),
            "replied" => Some(Self::Replied),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Read => "Read",
            Self::Replied => "Replied",
            Self::Archived => "Archived",
        }
    }

    /// Next status in triage order, wrapping around.
    pub const fn next(self) -> Self {
        match self {
            Self::New => Self::Read,
            Self::Read => Self::Replied,
            Self::Replied => Self::Archived,
            Self::Archived => Self::New,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "TEXT", rename_all = "lowercase")
)]
pub enum RegistrationStatus {
    #[default]
    Confirmed,
    Waitlisted,
    Cancelled,
}

impl RegistrationStatus {
    pub const ALL: [Self; 3] = [Self::Confirmed, Self::Waitlisted, Self::Cancelled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlisted => "waitlisted",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "confirmed" => Some(Self::Confirmed),
            "waitlisted" => Some(Self::Waitlisted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Waitlisted => "Waitlisted",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Confirmed => Self::Waitlisted,
            Self::Waitlisted => Self::Cancelled,
            Self::Cancelled => Self::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "TEXT", rename_all = "lowercase")
)]
pub enum EventCategory {
    Basketball,
    Swimming,
    Fitness,
    Social,
    #[default]
    Other,
}

impl EventCategory {
    pub const ALL: [Self; 5] = [
        Self::Basketball,
        Self::Swimming,
        Self::Fitness,
        Self::Social,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basketball => "basketball",
            Self::Swimming => "swimming",
            Self::Fitness => "fitness",
            Self::Social => "social",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basketball => "Basketball",
            Self::Swimming => "Swimming",
            Self::Fitness => "Fitness",
            Self::Social => "Social",
            Self::Other => "Other",
        }
    }
}

/// How visitors sign up for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "TEXT", rename_all = "lowercase")
)]
pub enum RegistrationType {
    /// No registration; just show up.
    #[default]
    #[serde(rename = "none")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "none"))]
    NotRequired,
    /// Registration happens on a third-party site (`registration_url`).
    External,
    /// Registration goes through our own form and capacity gate.
    Internal,
}

impl RegistrationType {
    pub const ALL: [Self; 3] = [Self::NotRequired, Self::External, Self::Internal];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "none",
            Self::External => "external",
            Self::Internal => "internal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotRequired => "No registration",
            Self::External => "External site",
            Self::Internal => "Our form",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_parse_is_case_insensitive() {
        assert_eq!(FieldType::parse(" Email "), Some(FieldType::Email));
        assert_eq!(FieldType::parse("multiselect"), Some(FieldType::Multiselect));
        assert_eq!(FieldType::parse("radio"), None);
    }

    #[test]
    fn registration_type_uses_none_on_the_wire() {
        let json = serde_json::to_string(&RegistrationType::NotRequired).unwrap();
        assert_eq!(json, "\"none\"");
        let parsed: RegistrationType = serde_json::from_str("\"internal\"").unwrap();
        assert_eq!(parsed, RegistrationType::Internal);
    }

    #[test]
    fn status_cycles_through_every_value() {
        let mut status = SubmissionStatus::New;
        for _ in 0..SubmissionStatus::ALL.len() {
            status = status.next();
        }
        assert_eq!(status, SubmissionStatus::New);
        assert_eq!(RegistrationStatus::Cancelled.next(), RegistrationStatus::Confirmed);
    }
}
