pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Public origin used to build verification URLs embedded in
    /// certificates, e.g. `https://greenpass.example.org`.
    pub public_url: String,
    pub test_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(39080);

        Self {
            port,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:greenpass.db?mode=rwc".to_string()),
            public_url: std::env::var("GREENPASS_PUBLIC_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            test_mode: std::env::var("GREENPASS_TEST_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
