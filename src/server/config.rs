use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Where the voting frontend lives; used for CORS and the OAuth redirect.
    pub frontend_uri: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8888,
            frontend_uri: "http://localhost:3000".to_string(),
        }
    }
}
