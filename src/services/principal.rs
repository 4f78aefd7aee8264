use super::ServiceError;

/// Request-scoped caller context, resolved once per request by the auth
/// middleware and passed explicitly into every handler. Never cached across
/// requests.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    /// External-auth subject from the token (or backdoor header).
    pub auth_id: Option<String>,

    /// Account id for the subject, when an account exists.
    pub account_id: Option<i64>,

    /// Household the account belongs to, when it has joined one.
    pub household_id: Option<i64>,

    pub scopes: Vec<String>,
}

impl Principal {
    /// A principal with no identity claim. Requests carrying this fail any
    /// handler that calls `auth_id_or_forbidden`.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_auth_id(auth_id: impl Into<String>) -> Self {
        Self {
            auth_id: Some(auth_id.into()),
            ..Self::default()
        }
    }

    pub fn auth_id_or_forbidden(&self) -> Result<&str, ServiceError> {
        self.auth_id
            .as_deref()
            .ok_or_else(|| ServiceError::forbidden("No identity claim present"))
    }

    pub fn household_id_or_forbidden(&self) -> Result<i64, ServiceError> {
        self.household_id
            .ok_or_else(|| ServiceError::forbidden("Caller has no household"))
    }

    pub fn account_id_or_forbidden(&self) -> Result<i64, ServiceError> {
        self.account_id
            .ok_or_else(|| ServiceError::forbidden("Caller has no account"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_principal_is_forbidden_everywhere() {
        let principal = Principal::anonymous();
        assert!(principal.auth_id_or_forbidden().is_err());
        assert!(principal.household_id_or_forbidden().is_err());
        assert!(principal.account_id_or_forbidden().is_err());
    }

    #[test]
    fn auth_id_resolves_without_household() {
        let principal = Principal::for_auth_id("auth0|1234567890");
        assert_eq!(principal.auth_id_or_forbidden().unwrap(), "auth0|1234567890");
        assert!(principal.household_id_or_forbidden().is_err());
    }
}
