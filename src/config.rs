use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub push_service_url: String,
    pub root_username: String,
    pub root_email: String,
    pub root_password: String,
    /// `L` for venue searches: more matches than this yields the zoom-in reply.
    pub venues_search_limit: usize,
    /// `L` for event searches.
    pub events_search_limit: usize,
    pub open_invite_contact_limit: usize,
    pub min_app_version: f64,
    pub index_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN")
                .unwrap_or_else(|_| "test-token-1".to_string()),
            push_service_url: env::var("PUSH_SERVICE_URL")
                .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".to_string()),
            root_username: env::var("ROOT_USERNAME").unwrap_or_else(|_| "root".to_string()),
            root_email: env::var("ROOT_EMAIL")
                .unwrap_or_else(|_| "root@localhost".to_string()),
            root_password: env::var("ROOT_PASSWORD").expect("ROOT_PASSWORD must be set"),
            venues_search_limit: parse_or("VENUES_SEARCH_LIMIT", 100),
            events_search_limit: parse_or("EVENTS_SEARCH_LIMIT", 100),
            open_invite_contact_limit: parse_or("OPEN_INVITE_CONTACT_LIMIT", 16),
            min_app_version: env::var("MIN_APP_VERSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.0),
            index_refresh_secs: parse_or("INDEX_REFRESH_SECS", 30),
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
