use uuid::Uuid;

/// A short-lived bearer credential for the remote task/calendar stores,
/// paired with the authenticated user's email. Sourced once per login and
/// discarded on logout.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub user_email: String,
    /// Rotates on every login. Responses carrying data fetched under an
    /// older epoch are dropped instead of overwriting current state.
    pub epoch: Uuid,
}

impl Credential {
    pub fn new(user_email: &str, access_token: String) -> Self {
        Credential {
            access_token,
            user_email: user_email.to_string(),
            epoch: Uuid::new_v4(),
        }
    }

    /// Display name derived from the local part of the email.
    pub fn display_name(&self) -> &str {
        self.user_email
            .split('@')
            .next()
            .unwrap_or(&self.user_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_local_part() {
        let cred = Credential::new("alice@example.com", "tok".to_string());
        assert_eq!(cred.display_name(), "alice");
    }

    #[test]
    fn epochs_differ_across_logins() {
        let a = Credential::new("alice@example.com", "tok".to_string());
        let b = Credential::new("alice@example.com", "tok".to_string());
        assert_ne!(a.epoch, b.epoch);
    }
}
