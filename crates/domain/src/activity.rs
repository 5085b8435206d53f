use backoffice_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};

/// Persisted administrator activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// Administrator who performed the action.
    pub actor_id: i64,
    /// Short action identifier, e.g. `subscription.sold`.
    pub action: String,
    /// Optional free-text detail.
    pub description: Option<String>,
    /// Client network address, when known.
    pub source_address: Option<String>,
    /// Client user agent, when known.
    pub agent_string: Option<String>,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Validated input for appending one activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityRecord {
    actor_id: i64,
    action: NonEmptyString,
    description: Option<String>,
    source_address: Option<String>,
    agent_string: Option<String>,
}

impl NewActivityRecord {
    /// Validates required fields before anything is persisted.
    pub fn new(
        actor_id: Option<i64>,
        action: Option<String>,
        description: Option<String>,
        source_address: Option<String>,
        agent_string: Option<String>,
    ) -> AppResult<Self> {
        let actor_id =
            actor_id.ok_or_else(|| AppError::Validation("id_admin is required".to_owned()))?;
        if actor_id <= 0 {
            return Err(AppError::Validation(format!(
                "id_admin must be a positive integer, got {actor_id}"
            )));
        }

        let action = NonEmptyString::for_field("action", action.unwrap_or_default())?;

        Ok(Self {
            actor_id,
            action,
            description: non_blank(description),
            source_address: non_blank(source_address),
            agent_string: non_blank(agent_string),
        })
    }

    /// Returns the acting administrator.
    #[must_use]
    pub fn actor_id(&self) -> i64 {
        self.actor_id
    }

    /// Returns the action identifier.
    #[must_use]
    pub fn action(&self) -> &NonEmptyString {
        &self.action
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional client address.
    #[must_use]
    pub fn source_address(&self) -> Option<&str> {
        self.source_address.as_deref()
    }

    /// Returns the optional client user agent.
    #[must_use]
    pub fn agent_string(&self) -> Option<&str> {
        self.agent_string.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::NewActivityRecord;

    #[test]
    fn missing_action_is_rejected() {
        let result = NewActivityRecord::new(Some(7), None, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn missing_actor_is_rejected() {
        let result = NewActivityRecord::new(None, Some("login".to_owned()), None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_actor_is_rejected() {
        let result = NewActivityRecord::new(Some(0), Some("login".to_owned()), None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let result = NewActivityRecord::new(
            Some(3),
            Some("subscription.sold".to_owned()),
            Some("  ".to_owned()),
            Some("10.0.0.4".to_owned()),
            None,
        );

        let Ok(input) = result else {
            panic!("valid activity rejected");
        };
        assert_eq!(input.description(), None);
        assert_eq!(input.source_address(), Some("10.0.0.4"));
        assert_eq!(input.action().as_str(), "subscription.sold");
    }
}
