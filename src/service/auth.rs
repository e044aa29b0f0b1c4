//! Credential gate: identity lookup plus one-way credential verification.

use crate::entity::{Account, AccountField};
use crate::error::AppError;
use crate::service::password;
use crate::store::Store;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Issued on a verified credential match, bound to the account identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

pub struct CredentialGate {
    accounts: Arc<dyn Store<Account>>,
    session_ttl: Duration,
}

impl Clone for CredentialGate {
    fn clone(&self) -> Self {
        CredentialGate {
            accounts: self.accounts.clone(),
            session_ttl: self.session_ttl,
        }
    }
}

impl CredentialGate {
    pub fn new(accounts: Arc<dyn Store<Account>>, session_ttl: Duration) -> Self {
        CredentialGate {
            accounts,
            session_ttl,
        }
    }

    /// Unknown identity and wrong credential both report `Unauthorized`; the
    /// caller cannot tell which, so accounts cannot be enumerated.
    pub async fn authenticate(&self, email: &str, supplied: &str) -> Result<Session, AppError> {
        let account = match self.accounts.find_by_field(AccountField::Email, email).await {
            Ok(account) => account,
            Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };
        if !password::verify(&account.password_hash, supplied) {
            return Err(AppError::Unauthorized);
        }
        Ok(Session {
            token: Uuid::new_v4().to_string(),
            account_id: account.id,
            expires_at: Utc::now() + self.session_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, NewAccount};
    use crate::store::MemStore;

    async fn gate_with_account() -> CredentialGate {
        let accounts: Arc<MemStore<Account>> = Arc::new(MemStore::new());
        let record = Account::new_record(NewAccount {
            handle: "ana".into(),
            password: "hunter22".into(),
            display_name: "Ana".into(),
            email: "ana@example.com".into(),
        })
        .unwrap();
        accounts.create(record).await.unwrap();
        CredentialGate::new(accounts, Duration::hours(1))
    }

    #[tokio::test]
    async fn correct_credentials_issue_a_session() {
        let gate = gate_with_account().await;
        let session = gate.authenticate("ana@example.com", "hunter22").await.unwrap();
        assert_eq!(session.account_id, 1);
        assert!(session.expires_at > Utc::now());
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let gate = gate_with_account().await;
        let wrong_password = gate
            .authenticate("ana@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = gate
            .authenticate("ghost@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, AppError::Unauthorized));
        assert!(matches!(unknown_email, AppError::Unauthorized));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn sessions_use_fresh_tokens() {
        let gate = gate_with_account().await;
        let a = gate.authenticate("ana@example.com", "hunter22").await.unwrap();
        let b = gate.authenticate("ana@example.com", "hunter22").await.unwrap();
        assert_ne!(a.token, b.token);
    }
}
