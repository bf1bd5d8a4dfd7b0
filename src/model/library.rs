//! Liked songs of the signed-in identity

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::track::Track;

/// The signed-in principal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub is_anonymous: bool,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn name(&self) -> &str {
        match &self.display_name {
            Some(name) => name,
            None if self.is_anonymous => "Guest",
            None => "User",
        }
    }
}

/// Treat a missing identity the same as an anonymous one.
pub fn is_guest(identity: Option<&Identity>) -> bool {
    identity.is_none_or(|i| i.is_anonymous)
}

/// Collection holding one document per liked track
pub fn liked_songs_collection(app_id: &str, uid: &str) -> String {
    format!("artifacts/{}/users/{}/likedSongs", app_id, uid)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LikeChange {
    Added(Track),
    Removed(Track),
}

/// A like/unlike already applied locally and waiting on the store write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingLike {
    pub uid: String,
    pub change: LikeChange,
}

#[derive(Clone, Debug, Default)]
pub struct LibrarySync {
    uid: Option<String>,
    liked: Vec<Track>,
    ids: HashSet<String>,
}

impl LibrarySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_liked(&self, track_id: &str) -> bool {
        self.ids.contains(track_id)
    }

    pub fn liked_tracks(&self) -> &[Track] {
        &self.liked
    }

    /// Switch to a new identity. The liked set is cleared until the next
    /// snapshot arrives; guests never get one.
    pub fn set_identity(&mut self, identity: Option<&Identity>) {
        self.uid = identity.filter(|i| !i.is_anonymous).map(|i| i.uid.clone());
        self.liked.clear();
        self.ids.clear();
    }

    /// Flip the liked state of `track` locally and describe the store write.
    pub fn toggle_like(&mut self, track: &Track) -> Result<PendingLike> {
        let Some(uid) = self.uid.clone() else {
            return Err(AppError::NotAuthenticated);
        };

        let change = if self.is_liked(&track.id) {
            self.remove(&track.id);
            LikeChange::Removed(track.clone())
        } else {
            self.insert(track.clone());
            LikeChange::Added(track.clone())
        };
        Ok(PendingLike { uid, change })
    }

    /// Undo an optimistic change after its write failed.
    pub fn revert(&mut self, pending: &PendingLike) {
        if self.uid.as_deref() != Some(pending.uid.as_str()) {
            return;
        }
        match &pending.change {
            LikeChange::Added(track) => self.remove(&track.id),
            LikeChange::Removed(track) => self.insert(track.clone()),
        }
    }

    /// Replace the liked set with the store's view. Snapshots for another
    /// identity are dropped.
    pub fn apply_snapshot(&mut self, uid: &str, tracks: Vec<Track>) -> bool {
        if self.uid.as_deref() != Some(uid) {
            tracing::debug!(uid, "Ignoring liked songs snapshot for another identity");
            return false;
        }
        self.ids = tracks.iter().map(|t| t.id.clone()).collect();
        self.liked = tracks;
        true
    }

    fn insert(&mut self, track: Track) {
        if self.ids.insert(track.id.clone()) {
            self.liked.push(track);
        }
    }

    fn remove(&mut self, track_id: &str) {
        if self.ids.remove(track_id) {
            self.liked.retain(|t| t.id != track_id);
        }
    }
}
