use crate::error::SessionError;
use crate::events::Event;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    app_name: String,
    user_id: String,
    session_id: String,
}

impl SessionKey {
    fn new(app_name: &str, user_id: &str, session_id: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        }
    }

    fn not_found(&self) -> SessionError {
        SessionError::NotFound {
            app_name: self.app_name.clone(),
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    pub events: Vec<Event>,
    pub last_update_time: DateTime<Utc>,
}

/// Conversation state held in process memory.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session, SessionError> {
        let key = SessionKey::new(app_name, user_id, session_id);
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&key) {
            return Err(SessionError::AlreadyExists(session_id.to_string()));
        }

        let session = Session {
            id: session_id.to_string(),
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            events: Vec::new(),
            last_update_time: Utc::now(),
        };
        sessions.insert(key, session.clone());
        tracing::info!("Created session {} for {}/{}", session_id, app_name, user_id);
        Ok(session)
    }

    /// Returns a snapshot of the session.
    pub async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session, SessionError> {
        let key = SessionKey::new(app_name, user_id, session_id);
        self.sessions
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| key.not_found())
    }

    pub async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        event: Event,
    ) -> Result<(), SessionError> {
        let key = SessionKey::new(app_name, user_id, session_id);
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&key).ok_or_else(|| key.not_found())?;
        session.last_update_time = event.timestamp;
        session.events.push(event);
        Ok(())
    }

    pub async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), SessionError> {
        let key = SessionKey::new(app_name, user_id, session_id);
        self.sessions
            .write()
            .await
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| key.not_found())
    }

    /// Session ids for one user of an app, sorted.
    pub async fn list_sessions(&self, app_name: &str, user_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .await
            .keys()
            .filter(|k| k.app_name == app_name && k.user_id == user_id)
            .map(|k| k.session_id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Content;

    #[tokio::test]
    async fn test_create_and_append() {
        let service = InMemorySessionService::new();
        let session = service.create_session("app", "u1", "s1").await.unwrap();
        assert!(session.events.is_empty());

        let event = Event::new("inv", "user", Some(Content::user_text("hi")));
        service
            .append_event("app", "u1", "s1", event.clone())
            .await
            .unwrap();

        let loaded = service.get_session("app", "u1", "s1").await.unwrap();
        assert_eq!(loaded.events, vec![event.clone()]);
        assert_eq!(loaded.last_update_time, event.timestamp);
    }

    #[tokio::test]
    async fn test_duplicate_and_missing() {
        let service = InMemorySessionService::new();
        service.create_session("app", "u1", "s1").await.unwrap();
        assert_eq!(
            service.create_session("app", "u1", "s1").await.unwrap_err(),
            SessionError::AlreadyExists("s1".to_string())
        );

        let err = service.get_session("app", "u2", "s1").await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound { .. }));

        let event = Event::new("inv", "user", None);
        assert!(service.append_event("other", "u1", "s1", event).await.is_err());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let service = InMemorySessionService::new();
        service.create_session("app", "u1", "b").await.unwrap();
        service.create_session("app", "u1", "a").await.unwrap();
        service.create_session("app", "u2", "c").await.unwrap();
        assert_eq!(service.list_sessions("app", "u1").await, vec!["a", "b"]);

        service.delete_session("app", "u1", "a").await.unwrap();
        assert_eq!(service.list_sessions("app", "u1").await, vec!["b"]);
        assert!(service.delete_session("app", "u1", "a").await.is_err());
    }
}
