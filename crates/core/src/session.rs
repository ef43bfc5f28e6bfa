use crate::error::SessionError;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;
use walkdir::WalkDir;

pub trait SessionStore: Send + Sync {
    fn create(&self, text: &str) -> Result<String, SessionError>;
    fn load(&self, session_id: &str) -> Result<String, SessionError>;
    fn list(&self) -> Result<Vec<String>, SessionError>;
}

fn validate_session_id(session_id: &str) -> Result<(), SessionError> {
    let shape = Regex::new(r"^[0-9a-f]{8}(-[0-9a-f]{4}){3}-[0-9a-f]{12}$")?;
    if shape.is_match(session_id) {
        Ok(())
    } else {
        Err(SessionError::InvalidId(session_id.to_string()))
    }
}

pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("{session_id}.txt"))
    }
}

impl SessionStore for FileSessionStore {
    fn create(&self, text: &str) -> Result<String, SessionError> {
        fs::create_dir_all(&self.root)?;
        let session_id = Uuid::new_v4().to_string();
        fs::write(self.session_path(&session_id), text)?;
        Ok(session_id)
    }

    fn load(&self, session_id: &str) -> Result<String, SessionError> {
        validate_session_id(session_id)?;
        match fs::read_to_string(self.session_path(session_id)) {
            Ok(text) => Ok(text),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(SessionError::NotFound(session_id.to_string()))
            }
            Err(error) => Err(SessionError::Io(error)),
        }
    }

    fn list(&self) -> Result<Vec<String>, SessionError> {
        let mut sessions = Vec::new();
        if !self.root.exists() {
            return Ok(sessions);
        }

        for entry in WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let is_session_blob = entry
                .path()
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("txt"));
            if !is_session_blob {
                continue;
            }
            if let Some(stem) = entry.path().file_stem().and_then(|stem| stem.to_str()) {
                if validate_session_id(stem).is_ok() {
                    sessions.push(stem.to_string());
                }
            }
        }

        sessions.sort_unstable();
        Ok(sessions)
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, text: &str) -> Result<String, SessionError> {
        let session_id = Uuid::new_v4().to_string();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(session_id.clone(), text.to_string());
        Ok(session_id)
    }

    fn load(&self, session_id: &str) -> Result<String, SessionError> {
        validate_session_id(session_id)?;
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, SessionError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut sessions: Vec<String> = entries.keys().cloned().collect();
        sessions.sort_unstable();
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_text_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path());

        let text = "Photosynthesis converts light into chemical energy.\nСвет → энергия.";
        let session_id = store.create(text)?;
        assert_eq!(store.load(&session_id)?, text);
        Ok(())
    }

    #[test]
    fn created_ids_are_distinct() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path());

        let first = store.create("first")?;
        let second = store.create("second")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn unknown_session_is_not_found() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileSessionStore::new(dir.path());

        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            store.load(&missing),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_session_id_is_rejected() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileSessionStore::new(dir.path());

        for bad_id in ["../escape", "123", "DEADBEEF", "rm -rf", ""] {
            assert!(
                matches!(store.load(bad_id), Err(SessionError::InvalidId(_))),
                "id {bad_id:?} should be rejected"
            );
        }
    }

    #[test]
    fn list_is_sorted_and_skips_foreign_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path());

        let mut created = vec![
            store.create("one")?,
            store.create("two")?,
            store.create("three")?,
        ];
        created.sort_unstable();
        fs::write(dir.path().join("notes.md"), "not a session")?;
        fs::write(dir.path().join("not-a-uuid.txt"), "not a session either")?;

        assert_eq!(store.list()?, created);
        Ok(())
    }

    #[test]
    fn listing_a_missing_root_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path().join("never-created"));
        assert!(store.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn memory_store_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let store = MemorySessionStore::new();
        let session_id = store.create("in memory text")?;

        assert_eq!(store.load(&session_id)?, "in memory text");
        assert_eq!(store.list()?, vec![session_id]);

        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            store.load(&missing),
            Err(SessionError::NotFound(_))
        ));
        Ok(())
    }
}
