//! Environment-driven configuration.

use chrono::Duration;

use depot_auth::{Role, UserRecord};
use depot_reports::DEFAULT_LOW_STOCK_THRESHOLD;

/// Everything the application reads from its environment.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_secret: String,
    pub session_ttl: Duration,
    /// When set, the Postgres store is used; otherwise the in-memory store.
    pub database_url: Option<String>,
    pub low_stock_threshold: i64,
    /// Accounts for the static identity provider.
    pub users: Vec<UserRecord>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
            tracing::warn!("SESSION_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let session_ttl_hours = env_parse("SESSION_TTL_HOURS", 24i64);
        let low_stock_threshold = env_parse("LOW_STOCK_THRESHOLD", DEFAULT_LOW_STOCK_THRESHOLD);

        let users = match std::env::var("DEPOT_USERS") {
            Ok(raw) => parse_users(&raw),
            Err(_) => {
                tracing::warn!("DEPOT_USERS not set; using built-in dev accounts");
                dev_users()
            }
        };

        Self {
            bind_addr,
            session_secret,
            session_ttl: Duration::hours(session_ttl_hours),
            database_url: std::env::var("DATABASE_URL").ok(),
            low_stock_threshold,
            users,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(name, raw = %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Parse `user:password:role[,user:password:role...]`.
fn parse_users(raw: &str) -> Vec<UserRecord> {
    let mut users = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(username), Some(password), Some(role))
                if !username.is_empty() && !password.is_empty() && !role.is_empty() =>
            {
                users.push(UserRecord {
                    username: username.to_string(),
                    password: password.to_string(),
                    display_name: username.to_string(),
                    roles: vec![Role::new(role.to_string())],
                });
            }
            _ => tracing::warn!(entry, "ignoring malformed DEPOT_USERS entry"),
        }
    }

    users
}

fn dev_users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            display_name: "Administrator".to_string(),
            roles: vec![Role::admin()],
        },
        UserRecord {
            username: "operator".to_string(),
            password: "operator123".to_string(),
            display_name: "Operator".to_string(),
            roles: vec![Role::operator()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_list_parses_well_formed_entries() {
        let users = parse_users("alice:secret:admin, bob:hunter2:operator");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].roles, vec![Role::admin()]);
        assert_eq!(users[1].username, "bob");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let users = parse_users("alice:secret:admin,broken,:x:y,");
        assert_eq!(users.len(), 1);
    }
}
