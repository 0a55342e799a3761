use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the time_tracking module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeTrackingConfig {
    /// Cookie carrying the session token when no `Authorization` header is sent.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for TimeTrackingConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

impl TimeTrackingConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_batch_size: self.max_batch_size,
        }
    }
}

fn default_session_cookie() -> String {
    "sb-access-token".to_string()
}

fn default_max_batch_size() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let cfg: TimeTrackingConfig = serde_json::from_str(r#"{"max_batch_size": 10}"#).unwrap();
        assert_eq!(cfg.session_cookie, "sb-access-token");
        assert_eq!(cfg.max_batch_size, 10);
        assert_eq!(cfg.service_config().max_batch_size, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<TimeTrackingConfig, _> = serde_json::from_str(r#"{"page_size": 10}"#);
        assert!(res.is_err());
    }
}
