//! Admin record editor: a column of labelled fields edited one at a time,
//! turned into the matching update body when saved.

use adapt_forms::{
    Event, EventCategory, EventRegistration, EventUpdate, FormSchema, NewEvent,
    RegistrationType, RegistrationUpdate, SchemaUpdate, Setting,
};

/// The one setting visitors see: where the donate button points.
pub const DONATION_URL_KEY: &str = "donation_url";

/// What the editor writes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    NewEvent,
    Event(i64),
    Schema(String),
    Setting(String),
    RegistrationNotes(i64),
}

impl EditTarget {
    pub fn title(&self) -> String {
        match self {
            Self::NewEvent => "New event".to_string(),
            Self::Event(id) => format!("Edit event #{id}"),
            Self::Schema(form_type) => format!("Edit form: {form_type}"),
            Self::Setting(key) => format!("Setting: {key}"),
            Self::RegistrationNotes(id) => format!("Notes for registration #{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits only; empty means "no value".
    Number,
    /// Index into a fixed option list, cycled with ←/→.
    Choice(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl EditorField {
    fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }

    fn number(key: &'static str, label: &'static str, value: Option<i64>) -> Self {
        Self {
            key,
            label,
            value: value.map(|v| v.to_string()).unwrap_or_default(),
            kind: FieldKind::Number,
        }
    }

    fn choice(key: &'static str, label: &'static str, index: usize) -> Self {
        let mut field = Self {
            key,
            label,
            value: String::new(),
            kind: FieldKind::Choice(index),
        };
        field.value = field.choice_label(index).to_string();
        field
    }

    pub fn options(&self) -> &'static [&'static str] {
        match self.key {
            "category" => &CATEGORY_LABELS,
            "registration_type" => &REGISTRATION_LABELS,
            _ => &[],
        }
    }

    fn choice_label(&self, index: usize) -> &'static str {
        self.options().get(index).copied().unwrap_or_default()
    }

    pub const fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }
}

const CATEGORY_LABELS: [&str; 5] = [
    EventCategory::ALL[0].label(),
    EventCategory::ALL[1].label(),
    EventCategory::ALL[2].label(),
    EventCategory::ALL[3].label(),
    EventCategory::ALL[4].label(),
];

const REGISTRATION_LABELS: [&str; 3] = [
    RegistrationType::ALL[0].label(),
    RegistrationType::ALL[1].label(),
    RegistrationType::ALL[2].label(),
];

/// A finished edit, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorSave {
    CreateEvent(NewEvent),
    UpdateEvent(i64, EventUpdate),
    UpdateSchema(String, SchemaUpdate),
    PutSetting(String, String),
    RegistrationNotes(i64, RegistrationUpdate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub target: EditTarget,
    pub fields: Vec<EditorField>,
    /// Focused slot; `fields.len()` is the Save button.
    pub field: usize,
    /// Whether keys currently go into the focused field.
    pub editing: bool,
}

impl EditorState {
    fn new(target: EditTarget, fields: Vec<EditorField>) -> Self {
        Self {
            target,
            fields,
            field: 0,
            editing: false,
        }
    }

    pub fn for_new_event() -> Self {
        Self::new(EditTarget::NewEvent, event_fields(None))
    }

    pub fn for_event(event: &Event) -> Self {
        Self::new(EditTarget::Event(event.id), event_fields(Some(event)))
    }

    pub fn for_schema(schema: &FormSchema) -> Self {
        Self::new(
            EditTarget::Schema(schema.form_type.clone()),
            vec![
                EditorField::text("title", "Title", schema.title.as_str()),
                EditorField::text("description", "Description", schema.description.as_str()),
                EditorField::text(
                    "submit_button_text",
                    "Submit button",
                    schema.submit_button_text.as_str(),
                ),
                EditorField::text(
                    "success_message",
                    "Success message",
                    schema.success_message.as_str(),
                ),
            ],
        )
    }

    pub fn for_setting(setting: &Setting) -> Self {
        Self::new(
            EditTarget::Setting(setting.key.clone()),
            vec![EditorField::text("value", "Value", setting.value.as_str())],
        )
    }

    pub fn for_registration_notes(registration: &EventRegistration) -> Self {
        Self::new(
            EditTarget::RegistrationNotes(registration.id),
            vec![EditorField::text(
                "notes",
                "Notes",
                registration.notes.clone().unwrap_or_default(),
            )],
        )
    }

    pub fn slots(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn on_save_button(&self) -> bool {
        self.field == self.fields.len()
    }

    pub fn focused(&self) -> Option<&EditorField> {
        self.fields.get(self.field)
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map_or("", |field| field.value.as_str())
    }

    fn choice(&self, key: &str) -> usize {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map_or(0, |field| match field.kind {
                FieldKind::Choice(index) => index,
                FieldKind::Text | FieldKind::Number => 0,
            })
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.slots();
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + self.slots() - 1) % self.slots();
    }

    pub fn push(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.field) else {
            return;
        };
        match field.kind {
            FieldKind::Text => field.value.push(c),
            FieldKind::Number if c.is_ascii_digit() => field.value.push(c),
            FieldKind::Number | FieldKind::Choice(_) => {}
        }
    }

    pub fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.field) {
            if !field.is_choice() {
                field.value.pop();
            }
        }
    }

    /// Steps a choice field forwards or backwards, wrapping at the ends.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.field) else {
            return;
        };
        let FieldKind::Choice(index) = field.kind else {
            return;
        };
        let len = field.options().len();
        if len == 0 {
            return;
        }
        let index = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        field.kind = FieldKind::Choice(index);
        field.value = field.choice_label(index).to_string();
    }

    /// Builds the request for this edit, or says what still needs fixing.
    pub fn save_request(&self) -> Result<EditorSave, String> {
        match &self.target {
            EditTarget::NewEvent => {
                let event = self.new_event()?;
                let missing = event.missing_fields();
                if !missing.is_empty() {
                    return Err(format!("Missing required fields: {}", missing.join(", ")));
                }
                if !event.has_valid_date() {
                    return Err("Date must be YYYY-MM-DD".to_string());
                }
                Ok(EditorSave::CreateEvent(event))
            }
            EditTarget::Event(id) => {
                let event = self.new_event()?;
                if !event.has_valid_date() {
                    return Err("Date must be YYYY-MM-DD".to_string());
                }
                Ok(EditorSave::UpdateEvent(
                    *id,
                    EventUpdate {
                        title: Some(event.title),
                        date: Some(event.date),
                        time: Some(event.time),
                        location: Some(event.location),
                        description: Some(event.description),
                        category: Some(event.category),
                        // Empty strings and a zero capacity clear the value.
                        image_url: Some(event.image_url.unwrap_or_default()),
                        registration_type: Some(event.registration_type),
                        registration_url: Some(event.registration_url.unwrap_or_default()),
                        registration_fields: None,
                        max_registrations: Some(event.max_registrations.unwrap_or(0)),
                    },
                ))
            }
            EditTarget::Schema(form_type) => Ok(EditorSave::UpdateSchema(
                form_type.clone(),
                SchemaUpdate {
                    title: Some(self.value("title").to_string()),
                    description: Some(self.value("description").to_string()),
                    submit_button_text: Some(self.value("submit_button_text").to_string()),
                    success_message: Some(self.value("success_message").to_string()),
                    ..SchemaUpdate::default()
                },
            )),
            EditTarget::Setting(key) => Ok(EditorSave::PutSetting(
                key.clone(),
                self.value("value").trim().to_string(),
            )),
            EditTarget::RegistrationNotes(id) => Ok(EditorSave::RegistrationNotes(
                *id,
                RegistrationUpdate {
                    status: None,
                    notes: Some(self.value("notes").to_string()),
                },
            )),
        }
    }

    fn new_event(&self) -> Result<NewEvent, String> {
        let max_registrations = match self.value("max_registrations") {
            "" => None,
            digits => Some(
                digits
                    .parse::<i64>()
                    .map_err(|_| "Capacity must be a whole number".to_string())?,
            )
            .filter(|max| *max > 0),
        };

        Ok(NewEvent {
            title: self.value("title").trim().to_string(),
            date: self.value("date").trim().to_string(),
            time: self.value("time").trim().to_string(),
            location: self.value("location").trim().to_string(),
            description: self.value("description").trim().to_string(),
            category: EventCategory::ALL
                .get(self.choice("category"))
                .copied()
                .unwrap_or_default(),
            image_url: optional(self.value("image_url")),
            registration_type: RegistrationType::ALL
                .get(self.choice("registration_type"))
                .copied()
                .unwrap_or_default(),
            registration_url: optional(self.value("registration_url")),
            registration_fields: Vec::new(),
            max_registrations,
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn event_fields(event: Option<&Event>) -> Vec<EditorField> {
    let text = |value: Option<&str>| value.unwrap_or_default().to_string();
    let category = event.map_or(EventCategory::default(), |e| e.category);
    let registration_type = event.map_or(RegistrationType::default(), |e| e.registration_type);

    vec![
        EditorField::text("title", "Title", text(event.map(|e| e.title.as_str()))),
        EditorField::text("date", "Date (YYYY-MM-DD)", text(event.map(|e| e.date.as_str()))),
        EditorField::text("time", "Time", text(event.map(|e| e.time.as_str()))),
        EditorField::text("location", "Location", text(event.map(|e| e.location.as_str()))),
        EditorField::text("description", "Description", text(event.map(|e| e.description.as_str()))),
        EditorField::choice(
            "category",
            "Category",
            EventCategory::ALL
                .iter()
                .position(|c| *c == category)
                .unwrap_or_default(),
        ),
        EditorField::text(
            "image_url",
            "Image URL",
            text(event.and_then(|e| e.image_url.as_deref())),
        ),
        EditorField::choice(
            "registration_type",
            "Registration",
            RegistrationType::ALL
                .iter()
                .position(|t| *t == registration_type)
                .unwrap_or_default(),
        ),
        EditorField::text(
            "registration_url",
            "Registration URL",
            text(event.and_then(|e| e.registration_url.as_deref())),
        ),
        EditorField::number(
            "max_registrations",
            "Capacity",
            event.and_then(|e| e.max_registrations),
        ),
    ]
}
