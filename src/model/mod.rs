//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `track`: Canonical track and playlist records
//! - `playback`: Playback state and the engine that owns the media output
//! - `queue`: Play queue and cursor movement
//! - `player`: Coordination of engine and queue
//! - `view_state`: Active screen and overlays
//! - `library`: Liked songs of the signed-in identity
//! - `content`: Trending, playlists, search, radio and artists
//! - `app_model`: Main application model

mod app_model;
mod content;
mod library;
mod playback;
mod player;
mod queue;
pub(crate) mod track;
mod view_state;

pub use app_model::{AppModel, ListEntry, NotificationKind};
pub use content::{public_playlists_collection, Station, SEED_PLAYLISTS, TRENDING_QUERY};
pub use library::{liked_songs_collection, Identity, LikeChange, PendingLike};
pub use playback::{PlaybackEngine, PlaybackState, TransportState};
pub use player::Player;
pub use track::{format_duration, Playlist, Track};
pub use view_state::ViewState;

#[cfg(test)]
pub(crate) use content::STATIONS;
#[cfg(test)]
pub(crate) use playback::mock::MockOutput;
