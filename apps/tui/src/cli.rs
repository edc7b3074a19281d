use clap::{CommandFactory, Parser, ValueEnum};

/// Which record set a headless export writes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Submissions,
    Registrations,
}

#[derive(Debug, Parser)]
#[command(name = "adapt-tui", version, about = "Adapt forms and triage terminal")]
pub struct CliArgs {
    /// Print submission stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Write records as CSV to stdout and exit (needs an admin token)
    #[arg(long, value_enum, value_name = "KIND")]
    pub export: Option<ExportKind>,

    /// Only export submissions of this form type
    #[arg(long = "form-type", value_name = "SLUG")]
    pub form_type: Option<String>,

    /// Only export registrations for this event
    #[arg(long = "event-id", value_name = "ID")]
    pub event_id: Option<i64>,

    /// Log to adapt-tui.log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Override the forms service base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Admin session token
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Override the CSV export directory
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("API_URL", url);
        }
        if let Some(token) = &self.token {
            std::env::set_var("ADMIN_TOKEN", token);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("EXPORT_DIR", dir);
        }
        if self.debug {
            std::env::set_var("RUST_LOG", "debug");
        }
    }

    /// True when the run prints and exits instead of opening the terminal UI.
    pub const fn is_headless(&self) -> bool {
        self.headless || self.json || self.export.is_some()
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_flag_implies_headless() {
        let args = CliArgs::parse_from(["adapt-tui", "--export", "registrations", "--event-id", "4"]);
        assert_eq!(args.export, Some(ExportKind::Registrations));
        assert_eq!(args.event_id, Some(4));
        assert!(args.is_headless());
    }

    #[test]
    fn plain_run_opens_the_ui() {
        let args = CliArgs::parse_from(["adapt-tui"]);
        assert!(!args.is_headless());
    }

    #[test]
    fn help_mentions_export_directory() {
        assert!(CliArgs::help_text().contains("--export-dir"));
    }
}
