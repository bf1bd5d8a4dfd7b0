//! Coordinates the playback engine and the queue

use rand::Rng;

use super::playback::{EndOfTrack, PlaybackEngine, PlaybackState};
use super::queue::{QueueController, Retreat};
use super::track::{Playlist, Track};

pub struct Player {
    pub engine: PlaybackEngine,
    pub queue: QueueController,
}

impl Player {
    pub fn new(engine: PlaybackEngine) -> Self {
        Self {
            engine,
            queue: QueueController::new(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.engine.state()
    }

    /// Play a track, optionally replacing the queue with `context`.
    pub fn play_track(&mut self, track: &Track, context: Option<Vec<Track>>) {
        match context {
            Some(tracks) => self.queue.set_queue(tracks, track),
            None => self.queue.select(track),
        }
        self.engine.load_and_play(track);
    }

    /// User-requested skip. Repeat only applies to a track ending by itself.
    pub fn next<R: Rng + ?Sized>(&mut self, catalog: &[Playlist], rng: &mut R) {
        let shuffle = self.engine.state().shuffle;
        match self.queue.advance(shuffle, catalog, rng) {
            Some(track) => self.skip_to(&track),
            None => tracing::debug!("Nothing to advance to"),
        }
    }

    pub fn previous(&mut self) {
        match self.queue.retreat() {
            Retreat::Track(track) => self.skip_to(&track),
            Retreat::RestartCurrent => self.engine.restart(),
            Retreat::Nothing => {}
        }
    }

    /// Skipping onto the track that is already loaded replays it instead of
    /// toggling pause.
    fn skip_to(&mut self, track: &Track) {
        if self.engine.current().is_some_and(|t| t.id == track.id) {
            self.engine.restart();
        } else {
            self.engine.load_and_play(track);
        }
    }

    pub fn on_track_ended<R: Rng + ?Sized>(&mut self, catalog: &[Playlist], rng: &mut R) {
        if self.engine.on_track_ended() == EndOfTrack::Advance {
            self.next(catalog, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::playback::mock::MockOutput;
    use crate::model::playback::TransportState;
    use crate::model::track::sample_track;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player() -> (Player, MockOutput) {
        let output = MockOutput::default();
        let player = Player::new(PlaybackEngine::new(Box::new(output.clone()), 100));
        (player, output)
    }

    fn abc() -> Vec<Track> {
        vec![sample_track("a"), sample_track("b"), sample_track("c")]
    }

    fn current_id(player: &Player) -> String {
        player.state().current.as_ref().unwrap().id.clone()
    }

    #[test]
    fn test_next_follows_queue_order() {
        let (mut player, _) = player();
        let mut rng = StdRng::seed_from_u64(1);
        player.play_track(&sample_track("b"), Some(abc()));

        player.next(&[], &mut rng);
        assert_eq!(current_id(&player), "c");
        player.next(&[], &mut rng);
        assert_eq!(current_id(&player), "a");
    }

    #[test]
    fn test_repeat_keeps_same_track_on_end() {
        let (mut player, _) = player();
        let mut rng = StdRng::seed_from_u64(1);
        player.play_track(&sample_track("a"), Some(abc()));
        player.engine.toggle_repeat();

        player.on_track_ended(&[], &mut rng);
        assert_eq!(current_id(&player), "a");
        assert_eq!(player.state().position_ms, 0);
        assert_eq!(player.queue.cursor(), Some(0));
    }

    #[test]
    fn test_end_without_repeat_advances() {
        let (mut player, _) = player();
        let mut rng = StdRng::seed_from_u64(1);
        player.play_track(&sample_track("a"), Some(abc()));
        player.on_track_ended(&[], &mut rng);
        assert_eq!(current_id(&player), "b");
        assert_eq!(player.state().transport, TransportState::Playing);
    }

    #[test]
    fn test_previous_wraps() {
        let (mut player, _) = player();
        player.play_track(&sample_track("a"), Some(abc()));
        player.previous();
        assert_eq!(current_id(&player), "c");
    }

    #[test]
    fn test_previous_restarts_track_outside_queue() {
        let (mut player, output) = player();
        player.play_track(&sample_track("a"), Some(abc()));
        player.play_track(&sample_track("z"), None);
        assert_eq!(player.queue.cursor(), None);

        player.previous();
        assert_eq!(current_id(&player), "z");
        assert!(output.calls().contains(&"restart".to_string()));
    }

    #[test]
    fn test_play_without_context_keeps_queue() {
        let (mut player, _) = player();
        player.play_track(&sample_track("a"), Some(abc()));
        player.play_track(&sample_track("c"), None);
        assert_eq!(player.queue.tracks().len(), 3);
        assert_eq!(player.queue.cursor(), Some(2));
    }

    #[test]
    fn test_shuffle_with_single_track() {
        let (mut player, _) = player();
        let mut rng = StdRng::seed_from_u64(3);
        player.play_track(&sample_track("a"), Some(vec![sample_track("a")]));
        player.engine.toggle_shuffle();
        player.next(&[], &mut rng);
        assert_eq!(current_id(&player), "a");
        assert_eq!(player.state().transport, TransportState::Playing);
    }
}
