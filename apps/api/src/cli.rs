use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "adapt-api", version, about = "Dynamic forms and event registration service")]
pub struct CliArgs {
    /// Run migrations and seed defaults, then exit
    #[arg(long = "migrate-only")]
    pub migrate_only: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override database path (":memory:" for a throwaway database)
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override listen address
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Comma-separated admin session tokens
    #[arg(long = "admin-tokens", value_name = "TOKENS")]
    pub admin_tokens: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(bind) = &self.bind {
            std::env::set_var("BIND_ADDR", bind);
        }
        if let Some(tokens) = &self.admin_tokens {
            std::env::set_var("ADMIN_TOKENS", tokens);
        }
        if self.debug && std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "adapt_api=debug,tower_http=debug,info");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::parse_from(["adapt-api", "--db", ":memory:", "--bind", "0.0.0.0:8080"]);
        assert_eq!(args.db.as_deref(), Some(":memory:"));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        assert!(!args.migrate_only);
    }

    #[test]
    fn migrate_only_flag() {
        assert!(CliArgs::parse_from(["adapt-api", "--migrate-only"]).migrate_only);
    }
}
