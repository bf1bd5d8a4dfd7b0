//! Play queue with a cursor

use rand::seq::IndexedRandom;
use rand::Rng;

use super::track::{Playlist, Track};

/// Result of stepping backwards through the queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Retreat {
    Track(Track),
    /// The current track is not in the queue; replay it instead
    RestartCurrent,
    Nothing,
}

#[derive(Clone, Debug, Default)]
pub struct QueueController {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl QueueController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Replace the queue. The cursor points at `start` if it is a member.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start: &Track) {
        self.tracks = tracks;
        self.select(start);
        tracing::debug!(len = self.tracks.len(), cursor = ?self.cursor, "Queue replaced");
    }

    /// Move the cursor to `track`, or unset it when the track is not queued.
    pub fn select(&mut self, track: &Track) {
        self.cursor = self.tracks.iter().position(|t| t.id == track.id);
    }

    /// Pick the next track and move the cursor to it.
    ///
    /// With an empty queue a random song from a random catalog playlist is
    /// returned and the queue stays untouched.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        shuffle: bool,
        catalog: &[Playlist],
        rng: &mut R,
    ) -> Option<Track> {
        if self.tracks.is_empty() {
            let playlist = catalog.choose(rng)?;
            return playlist.songs.choose(rng).cloned();
        }

        let len = self.tracks.len();
        let next = if shuffle {
            rng.random_range(0..len)
        } else {
            match self.cursor {
                Some(i) => (i + 1) % len,
                None => 0,
            }
        };
        self.cursor = Some(next);
        self.tracks.get(next).cloned()
    }

    pub fn retreat(&mut self) -> Retreat {
        if self.tracks.is_empty() {
            return Retreat::Nothing;
        }
        let Some(cursor) = self.cursor else {
            return Retreat::RestartCurrent;
        };

        let len = self.tracks.len();
        let prev = (cursor + len - 1) % len;
        self.cursor = Some(prev);
        match self.tracks.get(prev) {
            Some(track) => Retreat::Track(track.clone()),
            None => Retreat::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::sample_track;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn abc() -> Vec<Track> {
        vec![sample_track("a"), sample_track("b"), sample_track("c")]
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_sequential_advance_wraps() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("b"));
        assert_eq!(queue.cursor(), Some(1));

        let next = queue.advance(false, &[], &mut rng()).unwrap();
        assert_eq!(next.id, "c");
        let next = queue.advance(false, &[], &mut rng()).unwrap();
        assert_eq!(next.id, "a");
    }

    #[test]
    fn test_start_track_outside_queue_unsets_cursor() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("z"));
        assert_eq!(queue.cursor(), None);
        assert_eq!(queue.advance(false, &[], &mut rng()).unwrap().id, "a");
    }

    #[test]
    fn test_shuffle_single_track_returns_same() {
        let mut queue = QueueController::new();
        queue.set_queue(vec![sample_track("a")], &sample_track("a"));
        let mut rng = rng();
        for _ in 0..10 {
            assert_eq!(queue.advance(true, &[], &mut rng).unwrap().id, "a");
        }
    }

    #[test]
    fn test_shuffle_stays_in_queue() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("a"));
        let mut rng = rng();
        for _ in 0..50 {
            let track = queue.advance(true, &[], &mut rng).unwrap();
            assert!(["a", "b", "c"].contains(&track.id.as_str()));
            assert_eq!(queue.tracks()[queue.cursor().unwrap()].id, track.id);
        }
    }

    #[test]
    fn test_retreat_wraps_from_first() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("a"));
        assert_eq!(queue.retreat(), Retreat::Track(sample_track("c")));
        assert_eq!(queue.cursor(), Some(2));
    }

    #[test]
    fn test_retreat_without_cursor_restarts() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("z"));
        assert_eq!(queue.retreat(), Retreat::RestartCurrent);
    }

    #[test]
    fn test_retreat_on_empty_queue() {
        let mut queue = QueueController::new();
        assert_eq!(queue.retreat(), Retreat::Nothing);
    }

    #[test]
    fn test_empty_queue_falls_back_to_catalog() {
        let mut queue = QueueController::new();
        let catalog = vec![Playlist {
            id: "p1".into(),
            title: "Lofi Beats".into(),
            songs: vec![sample_track("x")],
            ..Playlist::default()
        }];
        let track = queue.advance(false, &catalog, &mut rng()).unwrap();
        assert_eq!(track.id, "x");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue_and_catalog_is_noop() {
        let mut queue = QueueController::new();
        assert!(queue.advance(true, &[], &mut rng()).is_none());
        let catalog = vec![Playlist::default()];
        assert!(queue.advance(false, &catalog, &mut rng()).is_none());
    }

    #[test]
    fn test_select_moves_cursor() {
        let mut queue = QueueController::new();
        queue.set_queue(abc(), &sample_track("a"));
        queue.select(&sample_track("c"));
        assert_eq!(queue.cursor(), Some(2));
        queue.select(&sample_track("q"));
        assert_eq!(queue.cursor(), None);
    }
}
