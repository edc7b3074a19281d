use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_NAME: &str = "adapt.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_FROM_EMAIL: &str = "noreply@adapttolife.org";
pub const DEFAULT_SITE_URL: &str = "https://adapttolife.org";

/// Server settings resolved from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Session tokens accepted on admin routes.
    pub admin_tokens: Vec<String>,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// Resend API key; mail is skipped when unset.
    pub api_key: Option<String>,
    pub from: String,
    pub admin_recipients: Vec<String>,
    pub site_url: String,
}

pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());
    let database_url = if db_name == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        let base_dir: PathBuf = env::current_dir()?;
        let database_path = base_dir.join(&db_name);
        if let Some(parent) = database_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        database_url_for(&database_path)?
    };

    Ok(AppConfig {
        database_url,
        bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        admin_tokens: split_list(&env::var("ADMIN_TOKENS").unwrap_or_default()),
        mail: MailConfig {
            api_key: env::var("RESEND_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            from: env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            admin_recipients: split_list(&env::var("ADMIN_NOTIFICATION_EMAILS").unwrap_or_default()),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
        },
    })
}

/// SQLx wants `sqlite:///abs/path` for absolute paths and `sqlite://rel/path`
/// otherwise.
pub fn database_url_for(path: &Path) -> color_eyre::eyre::Result<String> {
    let path_str = path.to_str().ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');
    if path.is_absolute() {
        Ok(format!("sqlite:///{clean_path}"))
    } else {
        Ok(format!("sqlite://{clean_path}"))
    }
}

/// Comma-separated list with blanks dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_get_three_slashes() {
        let url = database_url_for(Path::new("/var/lib/adapt/adapt.db")).unwrap();
        assert_eq!(url, "sqlite:///var/lib/adapt/adapt.db");
    }

    #[test]
    fn relative_paths_get_two_slashes() {
        let url = database_url_for(Path::new("data/adapt.db")).unwrap();
        assert_eq!(url, "sqlite://data/adapt.db");
    }

    #[test]
    fn lists_skip_blank_entries() {
        assert_eq!(
            split_list(" a@x.org, ,b@x.org,"),
            vec!["a@x.org".to_string(), "b@x.org".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
