use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::info;
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::session::ChatSession;

/// One chat session per widget instance on a page, keyed by widget id.
/// Sessions share nothing but the configuration they were created with.
pub struct SessionRegistry {
    config: WidgetConfig,
    sessions: DashMap<String, Arc<ChatSession>>,
}

impl SessionRegistry {
    pub fn new(config: WidgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(SessionRegistry {
            config,
            sessions: DashMap::new(),
        })
    }

    pub fn get_or_create(&self, widget_id: &str) -> Result<Arc<ChatSession>> {
        match self.sessions.entry(widget_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let session = Arc::new(ChatSession::with_id(widget_id, self.config.clone())?);
                entry.insert(session.clone());
                info!("🧩 Registered chat widget {}", widget_id);
                Ok(session)
            }
        }
    }

    pub fn get(&self, widget_id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.get(widget_id).map(|entry| entry.value().clone())
    }

    /// Tear a widget's session down; its pending replies are dropped
    pub async fn remove(&self, widget_id: &str) -> Option<Arc<ChatSession>> {
        let (_, session) = self.sessions.remove(widget_id)?;
        session.shutdown().await;
        info!("🧩 Removed chat widget {}", widget_id);
        Some(session)
    }

    pub async fn reset_all(&self) {
        // Collect first so no map guard is held across an await
        let sessions: Vec<_> = self.sessions.iter().map(|entry| entry.value().clone()).collect();
        for session in sessions {
            session.reset().await;
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
