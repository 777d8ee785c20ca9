use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use serde::{Deserialize, Serialize};
use crate::domain::models::{auth::{AuthResponse, UserProfile}, user::UserRole};
use super::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub access_token: String,
    pub refresh_token: String,
    pub profile: UserProfile,
}

impl SessionContext {
    pub fn role(&self) -> UserRole {
        self.profile.role
    }

    pub fn user_id(&self) -> &str {
        &self.profile.id
    }
}

impl From<AuthResponse> for SessionContext {
    fn from(resp: AuthResponse) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            profile: resp.user,
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionContext>, ClientError>;
    fn save(&self, session: &SessionContext) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<SessionContext>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionContext>>, ClientError> {
        self.inner.lock().map_err(|_| ClientError::Storage(std::io::Error::other("session lock poisoned")))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionContext>, ClientError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &SessionContext) -> Result<(), ClientError> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot()? = None;
        Ok(())
    }
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionContext>, ClientError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &SessionContext) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() && !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionContext {
        SessionContext {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            profile: UserProfile {
                id: "u1".into(),
                email: "ana@example.cl".into(),
                display_name: "Ana".into(),
                phone: None,
                role: UserRole::Provider,
            },
        }
    }

    #[test]
    fn memory_store_saves_and_clears() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap().map(|s| s.role()), Some(UserRole::Provider));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).save(&session()).unwrap();
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(session()));

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert_eq!(reopened.load().unwrap(), None);
    }
}
