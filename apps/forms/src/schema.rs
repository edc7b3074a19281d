use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FieldType;

pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch soon.";

/// One input of a dynamic form.
///
/// `id` is the key under which the value is stored in every submission. Once
/// submissions reference an id, renaming it orphans the historical values
/// under the old key: old rows keep the old key and are not migrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(
        default,
        rename = "helpText",
        alias = "help_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub help_text: Option<String>,
}

impl FormField {
    pub fn new(id: &str, field_type: FieldType, label: &str) -> Self {
        Self {
            id: id.to_string(),
            field_type,
            label: label.to_string(),
            placeholder: None,
            required: false,
            options: None,
            help_text: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    #[must_use]
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub fn help(mut self, help_text: &str) -> Self {
        self.help_text = Some(help_text.to_string());
        self
    }

    /// Options offered by this field, empty when it has none.
    pub fn option_list(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// A checkbox without options is a single yes/no toggle stored as
    /// `"true"`/`"false"`; with options it behaves like a multiselect.
    pub fn is_toggle(&self) -> bool {
        self.field_type == FieldType::Checkbox && self.option_list().is_empty()
    }

    /// Value a freshly opened form binds to this field.
    pub fn initial_value(&self) -> String {
        if self.is_toggle() {
            "false".to_string()
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field #{position} is missing an id")]
    MissingId { position: usize },
    #[error("Field id \"{0}\" is used more than once")]
    DuplicateId(String),
    #[error("Field \"{0}\" needs at least one option")]
    MissingOptions(String),
    #[error("Form type must be a lowercase slug (letters, digits, '_' or '-')")]
    InvalidFormType,
}

/// An admin-editable form definition, keyed by `form_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    pub submit_button_text: String,
    pub success_message: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FormSchema {
    /// Schema used when an upsert targets a form type that does not exist yet.
    pub fn blank(form_type: &str) -> Self {
        Self {
            form_type: form_type.to_string(),
            title: form_type.to_string(),
            description: String::new(),
            fields: Vec::new(),
            submit_button_text: DEFAULT_SUBMIT_TEXT.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            enabled: true,
            updated_at: None,
        }
    }

    /// Applies a partial update; attributes left as `None` keep their value.
    pub fn apply(&mut self, update: SchemaUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(fields) = update.fields {
            self.fields = fields;
        }
        if let Some(text) = update.submit_button_text {
            self.submit_button_text = text;
        }
        if let Some(message) = update.success_message {
            self.success_message = message;
        }
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn check_definition(&self) -> Result<(), SchemaError> {
        if !is_slug(&self.form_type) {
            return Err(SchemaError::InvalidFormType);
        }
        check_fields(&self.fields)
    }
}

/// Structural checks for a field list: ids present and unique, choice fields
/// carry options.
pub fn check_fields(fields: &[FormField]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for (position, field) in fields.iter().enumerate() {
        if field.id.trim().is_empty() {
            return Err(SchemaError::MissingId {
                position: position + 1,
            });
        }
        if !seen.insert(field.id.as_str()) {
            return Err(SchemaError::DuplicateId(field.id.clone()));
        }
        let needs_options = matches!(field.field_type, FieldType::Select | FieldType::Multiselect);
        if needs_options && field.option_list().is_empty() {
            return Err(SchemaError::MissingOptions(field.id.clone()));
        }
    }
    Ok(())
}

/// Lowercase ASCII letters, digits, `_` and `-`.
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Partial schema update as sent by the admin surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// A form schema scoped to one event, plus its optional capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistrationSchema {
    pub event_id: i64,
    pub schema: FormSchema,
    pub max_registrations: Option<i64>,
}

/// Fields used when an internal-registration event defines none of its own.
pub fn default_registration_fields() -> Vec<FormField> {
    vec![
        FormField::new("name", FieldType::Text, "Full Name")
            .placeholder("Your name")
            .required(),
        FormField::new("email", FieldType::Email, "Email Address")
            .placeholder("your@email.com")
            .required(),
        FormField::new("phone", FieldType::Phone, "Phone Number").placeholder("(555) 123-4567"),
    ]
}

/// The form definitions installed on first initialization.
pub fn default_schemas() -> Vec<FormSchema> {
    vec![
        seeded(
            "contact",
            "Contact Us",
            "Have a question or want to get involved? Send us a message.",
            "Send Message",
            "Thank you for reaching out! We'll get back to you within 2 business days.",
            vec![
                FormField::new("name", FieldType::Text, "Your Name")
                    .placeholder("Jane Doe")
                    .required(),
                FormField::new("email", FieldType::Email, "Email Address")
                    .placeholder("your@email.com")
                    .required(),
                FormField::new("phone", FieldType::Phone, "Phone Number"),
                FormField::new("subject", FieldType::Select, "Subject")
                    .options(&["General Question", "Programs", "Donations", "Media", "Other"])
                    .required(),
                FormField::new("message", FieldType::Textarea, "Message").required(),
            ],
        ),
        seeded(
            "volunteer",
            "Volunteer With Us",
            "Help athletes with disabilities get in the game.",
            "Apply to Volunteer",
            "Thank you for volunteering! We'll reach out to discuss next steps.",
            vec![
                FormField::new("name", FieldType::Text, "Full Name").required(),
                FormField::new("email", FieldType::Email, "Email Address").required(),
                FormField::new("phone", FieldType::Phone, "Phone Number").required(),
                FormField::new("interests", FieldType::Multiselect, "Areas of Interest")
                    .options(&["Coaching", "Event Support", "Transportation", "Fundraising"])
                    .required(),
                FormField::new("availability", FieldType::Select, "Availability")
                    .options(&["Weekdays", "Evenings", "Weekends", "Flexible"]),
                FormField::new("experience", FieldType::Textarea, "Relevant Experience")
                    .help("Adaptive sports, coaching, or healthcare experience is welcome but not required."),
            ],
        ),
        seeded(
            "grant_application",
            "Equipment Grant Application",
            "Apply for help covering the cost of adaptive sports equipment.",
            "Submit Application",
            "Your application has been received. Our grants committee reviews applications monthly.",
            vec![
                FormField::new("name", FieldType::Text, "Applicant Name").required(),
                FormField::new("email", FieldType::Email, "Email Address").required(),
                FormField::new("phone", FieldType::Phone, "Phone Number"),
                FormField::new("sport", FieldType::Select, "Sport")
                    .options(&["Wheelchair Basketball", "Adaptive Swimming", "Handcycling", "Other"])
                    .required(),
                FormField::new("need", FieldType::Textarea, "What equipment do you need?").required(),
                FormField::new("estimated_cost", FieldType::Number, "Estimated Cost (USD)"),
                FormField::new("story", FieldType::Textarea, "Tell us your story"),
            ],
        ),
        seeded(
            "patient_referral",
            "Patient Referral",
            "Healthcare providers: refer a patient to our adaptive sports programs.",
            "Submit Referral",
            "Thank you for the referral. We'll contact the patient within one week.",
            vec![
                FormField::new("referrer_name", FieldType::Text, "Your Name").required(),
                FormField::new("email", FieldType::Email, "Your Email").required(),
                FormField::new("referrer_organization", FieldType::Text, "Organization"),
                FormField::new("referrer_role", FieldType::Text, "Role"),
                FormField::new("patient_name", FieldType::Text, "Patient Name").required(),
                FormField::new("patient_phone", FieldType::Phone, "Patient Phone"),
                FormField::new("patient_needs", FieldType::Textarea, "Patient Needs").required(),
                FormField::new("consent", FieldType::Checkbox, "The patient agreed to be contacted"),
            ],
        ),
        seeded(
            "equipment_donation",
            "Donate Equipment",
            "Gently used sports wheelchairs, prosthetics and gear find a second life with our athletes.",
            "Offer Donation",
            "Thank you for your generosity! We'll contact you to arrange pickup or drop-off.",
            vec![
                FormField::new("name", FieldType::Text, "Your Name").required(),
                FormField::new("email", FieldType::Email, "Email Address").required(),
                FormField::new("phone", FieldType::Phone, "Phone Number"),
                FormField::new("equipment_type", FieldType::Select, "Equipment Type")
                    .options(&["Sports Wheelchair", "Prosthetic", "Handcycle", "Other"])
                    .required(),
                FormField::new("condition", FieldType::Select, "Condition")
                    .options(&["New", "Like New", "Good", "Fair"]),
                FormField::new("description", FieldType::Textarea, "Description").required(),
                FormField::new("available_from", FieldType::Date, "Available From")
                    .placeholder("YYYY-MM-DD"),
            ],
        ),
        seeded(
            "corporate_sponsorship",
            "Corporate Sponsorship",
            "Partner with us to bring adaptive sports to more athletes.",
            "Send Inquiry",
            "Thank you for your interest! Our partnerships team will be in touch within 2 business days.",
            vec![
                FormField::new("contact_name", FieldType::Text, "Contact Name").required(),
                FormField::new("email", FieldType::Email, "Email Address").required(),
                FormField::new("company", FieldType::Text, "Company").required(),
                FormField::new("phone", FieldType::Phone, "Phone Number"),
                FormField::new("level", FieldType::Checkbox, "Sponsorship Interests")
                    .options(&["Event Sponsor", "Equipment Fund", "Team Sponsor", "In-kind"]),
                FormField::new("message", FieldType::Textarea, "Message"),
            ],
        ),
    ]
}

fn seeded(
    form_type: &str,
    title: &str,
    description: &str,
    submit_button_text: &str,
    success_message: &str,
    fields: Vec<FormField>,
) -> FormSchema {
    FormSchema {
        form_type: form_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        fields,
        submit_button_text: submit_button_text.to_string(),
        success_message: success_message.to_string(),
        enabled: true,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seeded_schemas_are_well_formed() {
        for schema in default_schemas() {
            assert_eq!(schema.check_definition(), Ok(()), "{}", schema.form_type);
        }
    }

    #[test]
    fn partial_update_only_touches_given_attributes() {
        let mut schema = default_schemas().remove(0);
        let before = schema.clone();

        schema.apply(SchemaUpdate {
            title: Some("X".to_string()),
            ..SchemaUpdate::default()
        });

        assert_eq!(schema.title, "X");
        assert_eq!(schema.fields, before.fields);
        assert_eq!(schema.success_message, before.success_message);
        assert_eq!(schema.submit_button_text, before.submit_button_text);
        assert_eq!(schema.enabled, before.enabled);
    }

    #[test]
    fn select_without_options_is_rejected() {
        let fields = vec![FormField::new("sport", FieldType::Select, "Sport")];
        assert_eq!(
            check_fields(&fields),
            Err(SchemaError::MissingOptions("sport".to_string()))
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let fields = vec![
            FormField::new("email", FieldType::Email, "Email"),
            FormField::new("email", FieldType::Text, "Email again"),
        ];
        assert_eq!(
            check_fields(&fields),
            Err(SchemaError::DuplicateId("email".to_string()))
        );
    }

    #[test]
    fn field_json_uses_type_and_help_text_keys() {
        let json = r#"{"id":"age","type":"number","label":"Age","helpText":"Years"}"#;
        let field: FormField = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert!(!field.required);
        assert_eq!(field.help_text.as_deref(), Some("Years"));
    }

    #[test]
    fn toggle_checkbox_starts_false() {
        let toggle = FormField::new("consent", FieldType::Checkbox, "Consent");
        let choices = FormField::new("days", FieldType::Checkbox, "Days").options(&["Mon"]);
        assert_eq!(toggle.initial_value(), "false");
        assert_eq!(choices.initial_value(), "");
    }
}
