use adapt_forms::schema::default_schemas;
use adapt_forms::{Event, EventRegistration, FormSchema, Submission};

use crate::app::editor::EditorState;
use crate::app::search::{fuzzy_filter, SearchState};
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::form::{FormSession, FormTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Forms,
    Form,
    Events,
    Submissions,
    SubmissionDetail,
    Registrations,
    Schemas,
    Editor,
}

/// Entries of the home menu; admin entries only show with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Forms,
    Events,
    Submissions,
    Registrations,
    Schemas,
    DonationUrl,
    Initialize,
    Quit,
}

impl HomeItem {
    pub const ALL: [Self; 8] = [
        Self::Forms,
        Self::Events,
        Self::Submissions,
        Self::Registrations,
        Self::Schemas,
        Self::DonationUrl,
        Self::Initialize,
        Self::Quit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Forms => "Fill in a form",
            Self::Events => "Upcoming events",
            Self::Submissions => "Submissions",
            Self::Registrations => "Event registrations",
            Self::Schemas => "Form schemas",
            Self::DonationUrl => "Donation link",
            Self::Initialize => "Initialize database",
            Self::Quit => "Quit",
        }
    }

    pub const fn requires_admin(self) -> bool {
        !matches!(self, Self::Forms | Self::Events | Self::Quit)
    }
}

/// Work the event loop runs after the current key press has been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    LoadForm,
    SubmitForm,
    LoadEvents,
    LoadSchemas,
    LoadSubmissions,
    LoadRegistrations,
    CycleSubmissionStatus,
    SaveSubmissionNotes,
    DeleteSubmission,
    CycleRegistrationStatus,
    DeleteRegistration,
    ToggleSchema,
    ExportSubmissions,
    ExportRegistrations,
    /// Sends whatever the open editor holds.
    SaveEditor,
    DeleteEvent,
    EditDonationUrl,
    InitializeDatabase,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub config: ClientConfig,
    pub client: ApiClient,
    pub pending: Option<PendingAction>,

    pub home_index: usize,

    pub form_types: Vec<String>,
    pub forms_index: usize,
    pub form: Option<FormSession>,
    /// Screen `Esc` returns to from the form.
    pub form_origin: AppScreen,

    pub events: Vec<Event>,
    pub events_index: usize,

    pub submissions: Vec<Submission>,
    pub submissions_index: usize,
    pub submission_filter: Option<String>,
    pub search: SearchState,
    pub notes_input: Option<String>,
    pub confirm_delete: bool,

    pub registrations: Vec<EventRegistration>,
    pub registrations_index: usize,
    pub registration_event: Option<i64>,

    pub schemas: Vec<FormSchema>,
    pub schemas_index: usize,

    pub editor: Option<EditorState>,
    /// Screen the editor returns to when closed or saved.
    pub editor_origin: AppScreen,
}

impl App {
    pub fn new(config: ClientConfig, client: ApiClient) -> Self {
        let form_types = default_schemas()
            .into_iter()
            .map(|schema| schema.form_type)
            .collect();

        Self {
            running: true,
            screen: AppScreen::Home,
            show_help: false,
            status_message: String::new(),
            config,
            client,
            pending: None,
            home_index: 0,
            form_types,
            forms_index: 0,
            form: None,
            form_origin: AppScreen::Forms,
            events: Vec::new(),
            events_index: 0,
            submissions: Vec::new(),
            submissions_index: 0,
            submission_filter: None,
            search: SearchState::default(),
            notes_input: None,
            confirm_delete: false,
            registrations: Vec::new(),
            registrations_index: 0,
            registration_event: None,
            schemas: Vec::new(),
            schemas_index: 0,
            editor: None,
            editor_origin: AppScreen::Home,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.client.has_token()
    }

    pub fn home_items(&self) -> Vec<HomeItem> {
        let admin = self.is_admin();
        HomeItem::ALL
            .into_iter()
            .filter(|item| admin || !item.requires_admin())
            .collect()
    }

    /// Opens a fresh form session and queues its load.
    pub fn open_form(&mut self, target: FormTarget, origin: AppScreen) {
        match self.form.as_mut() {
            Some(session) if *session.target() == target => session.reopen(),
            _ => self.form = Some(FormSession::open(target)),
        }
        self.form_origin = origin;
        self.screen = AppScreen::Form;
        self.pending = Some(PendingAction::LoadForm);
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.screen = self.form_origin;
    }

    pub fn open_editor(&mut self, editor: EditorState, origin: AppScreen) {
        self.editor = Some(editor);
        self.editor_origin = origin;
        self.screen = AppScreen::Editor;
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
        self.screen = self.editor_origin;
    }

    /// Indices into `submissions` matching the search query, best match first.
    pub fn visible_submissions(&self) -> Vec<usize> {
        fuzzy_filter(&self.submissions, self.search.query(), |submission| {
            let mut haystack = format!("{} {}", submission.form_type, submission.status.as_str());
            for value in submission.data.values() {
                haystack.push(' ');
                haystack.push_str(value);
            }
            haystack
        })
    }

    pub fn selected_submission(&self) -> Option<&Submission> {
        self.visible_submissions()
            .get(self.submissions_index)
            .and_then(|index| self.submissions.get(*index))
    }

    pub fn selected_registration(&self) -> Option<&EventRegistration> {
        self.registrations.get(self.registrations_index)
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.events_index)
    }

    pub fn selected_schema(&self) -> Option<&FormSchema> {
        self.schemas.get(self.schemas_index)
    }

    pub fn event_title(&self, event_id: i64) -> Option<&str> {
        self.events
            .iter()
            .find(|event| event.id == event_id)
            .map(|event| event.title.as_str())
    }

    /// Distinct form types seen in loaded submissions, for the filter cycle.
    pub fn submission_form_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .form_types
            .iter()
            .cloned()
            .chain(self.submissions.iter().map(|s| s.form_type.clone()))
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.submissions_index = 0;
    }

    pub fn clamp_selections(&mut self) {
        self.submissions_index = clamp(self.submissions_index, self.visible_submissions().len());
        self.registrations_index = clamp(self.registrations_index, self.registrations.len());
        self.events_index = clamp(self.events_index, self.events.len());
        self.schemas_index = clamp(self.schemas_index, self.schemas.len());
        self.forms_index = clamp(self.forms_index, self.form_types.len());
    }
}

const fn clamp(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index >= len {
        len - 1
    } else {
        index
    }
}
