use std::time::Duration;

use reqwest::Client;

/// Build the client used for remote icon fetches.
///
/// `user_agent` identifies this service to icon hosts; `timeout` bounds the
/// whole request so a slow host cannot hold a render open.
pub fn icon_http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .timeout(timeout)
        .build()
}
