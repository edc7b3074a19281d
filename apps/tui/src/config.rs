use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub admin_token: Option<String>,
    pub export_dir: PathBuf,
}

impl ClientConfig {
    pub const fn is_admin(&self) -> bool {
        self.admin_token.is_some()
    }
}

/// Reads `.env` and the environment into a [`ClientConfig`].
pub fn init_client_config() -> color_eyre::eyre::Result<ClientConfig> {
    dotenv().ok();

    let api_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let admin_token = env::var("ADMIN_TOKEN")
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| DEFAULT_EXPORT_DIR.to_string());
    let base_dir = env::current_dir()?;

    Ok(ClientConfig {
        api_url: normalize_base_url(&api_url),
        admin_token,
        export_dir: base_dir.join(export_dir),
    })
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_dropped() {
        assert_eq!(
            normalize_base_url(" http://localhost:3000// "),
            "http://localhost:3000"
        );
    }
}
