//! Account-activation rules: matricule format, role derivation and the
//! in-process store of pending email codes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::sync::RwLock;

/// Role encoded by the matricule prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainee => "trainee",
        }
    }

    pub fn from_db(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            _ => Role::Trainee,
        }
    }

    /// Surface each role lands on after login.
    pub fn redirect_target(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Trainee => "/dashboard",
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_matricule(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Derives the role from a normalized matricule, rejecting anything that is
/// not `AD-<digits>` or `MAT-<digits>`. Unknown prefixes are never defaulted.
pub fn role_for_matricule(matricule: &str) -> Option<Role> {
    let (prefix, number) = matricule.split_once('-')?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match prefix {
        "AD" => Some(Role::Admin),
        "MAT" => Some(Role::Trainee),
        _ => None,
    }
}

/// Uniform random 6-digit activation code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[derive(Debug, Clone)]
pub struct PendingCode {
    pub code: String,
    pub matricule: String,
    pub issued_at: DateTime<Utc>,
}

/// Pending activation codes keyed by lowercased email. At most one live code
/// per address; a new issue overwrites the previous one. No expiry is
/// enforced, only last-write-wins per email.
#[derive(Debug, Default)]
pub struct CodeStore {
    entries: RwLock<HashMap<String, PendingCode>>,
}

impl CodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, email: &str, code: String, matricule: String) {
        let entry = PendingCode {
            code,
            matricule,
            issued_at: Utc::now(),
        };
        self.entries
            .write()
            .await
            .insert(normalize_email(email), entry);
    }

    pub async fn get(&self, email: &str) -> Option<PendingCode> {
        self.entries
            .read()
            .await
            .get(&normalize_email(email))
            .cloned()
    }

    pub async fn remove(&self, email: &str) {
        self.entries.write().await.remove(&normalize_email(email));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_follows_matricule_prefix() {
        assert_eq!(role_for_matricule("AD-0001"), Some(Role::Admin));
        assert_eq!(role_for_matricule("MAT-0002"), Some(Role::Trainee));
        assert_eq!(role_for_matricule("XX-0003"), None);
        assert_eq!(role_for_matricule("MAT-"), None);
        assert_eq!(role_for_matricule("MAT-12a"), None);
        assert_eq!(role_for_matricule("MAT12"), None);
    }

    #[test]
    fn normalization_uppercases_matricule_and_lowercases_email() {
        assert_eq!(normalize_matricule("  mat-7 ").as_str(), "MAT-7");
        assert_eq!(normalize_email(" Bob@Example.COM ").as_str(), "bob@example.com");
        assert_eq!(role_for_matricule(&normalize_matricule("ad-42")), Some(Role::Admin));
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn a_new_code_overwrites_the_previous_one() {
        let store = CodeStore::new();
        store.put("a@x.com", "111111".into(), "MAT-7".into()).await;
        store.put("A@X.com ", "222222".into(), "MAT-7".into()).await;

        let pending = store.get("a@x.com").await.unwrap();
        assert_eq!(pending.code, "222222");

        store.remove("a@x.com").await;
        assert!(store.get("a@x.com").await.is_none());
    }

    #[tokio::test]
    async fn emails_are_independent_keys() {
        let store = CodeStore::new();
        store.put("a@x.com", "111111".into(), "MAT-1".into()).await;
        store.put("b@x.com", "222222".into(), "MAT-2".into()).await;

        assert_eq!(store.get("a@x.com").await.unwrap().code, "111111");
        assert_eq!(store.get("b@x.com").await.unwrap().code, "222222");
    }
}
