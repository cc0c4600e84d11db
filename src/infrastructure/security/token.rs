// src/infrastructure/security/token.rs
use crate::application::{
    ApplicationResult,
    dto::auth::{AuthenticatedUser, Role},
    error::ApplicationError,
    ports::security::TokenManager,
};
use crate::config::ApiTokenEntry;
use async_trait::async_trait;
use std::collections::HashMap;

/// Token manager backed by a fixed token table from configuration.
/// Lookup is exact-match; tokens never appear in logs or errors.
pub struct StaticTokenManager {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticTokenManager {
    pub fn from_entries(entries: &[ApiTokenEntry]) -> Result<Self, ApplicationError> {
        let mut tokens = HashMap::with_capacity(entries.len());
        for entry in entries {
            let role: Role = entry
                .role
                .parse()
                .map_err(|err: crate::domain::errors::DomainError| {
                    ApplicationError::validation(err.to_string())
                })?;
            tokens.insert(
                entry.token.clone(),
                AuthenticatedUser {
                    id: entry.user_id,
                    role,
                },
            );
        }
        Ok(Self { tokens })
    }
}

#[async_trait]
impl TokenManager for StaticTokenManager {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApplicationError::unauthorized("invalid token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, user_id: i64, role: &str) -> ApiTokenEntry {
        ApiTokenEntry {
            token: token.into(),
            user_id,
            role: role.into(),
        }
    }

    #[tokio::test]
    async fn resolves_known_tokens() {
        let manager =
            StaticTokenManager::from_entries(&[entry("alpha", 7, "editor")]).unwrap();
        let user = manager.authenticate("alpha").await.unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Editor);
    }

    #[tokio::test]
    async fn rejects_unknown_tokens() {
        let manager = StaticTokenManager::from_entries(&[]).unwrap();
        assert!(matches!(
            manager.authenticate("nope").await,
            Err(ApplicationError::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_unknown_roles_at_construction() {
        assert!(StaticTokenManager::from_entries(&[entry("t", 1, "owner")]).is_err());
    }
}
