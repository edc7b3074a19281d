// Application state, the input layer and the actions it queues.

pub mod actions;
pub mod editor;
pub mod input;
pub mod search;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen, HomeItem, PendingAction};

#[cfg(test)]
pub(crate) fn test_app(token: Option<&str>) -> App {
    use crate::client::ApiClient;
    use crate::config::ClientConfig;

    let config = ClientConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        admin_token: token.map(ToString::to_string),
        export_dir: std::env::temp_dir().join("adapt-tui-tests"),
    };
    let client = ApiClient::new(&config).unwrap();
    App::new(config, client)
}
