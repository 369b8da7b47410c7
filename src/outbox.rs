//! Outbox - requests toward external collaborators
//!
//! The core never swaps scenes or plays audio itself; it only issues
//! named requests that the embedder drains after each tick. Queues are
//! collected during the frame and drained at specific points, so systems
//! stay decoupled from whatever consumes them.

use tracing::trace;

/// A queue for requests of a single type.
#[derive(Debug)]
pub struct RequestQueue<T> {
    items: Vec<T>,
}

impl<T> RequestQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a request.
    pub fn send(&mut self, item: T) {
        self.items.push(item);
    }

    /// Iterate without clearing.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drain all requests (returns iterator and clears queue).
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for RequestQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Request to switch to a named scene (portal destinations, game over).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRequest {
    pub scene: String,
}

/// Request to play a named audio cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCue {
    pub cue: String,
}

/// All outbound requests produced during a tick.
pub struct Outbox {
    pub scenes: RequestQueue<SceneRequest>,
    pub audio: RequestQueue<AudioCue>,
}

impl Outbox {
    pub fn new() -> Self {
        Self {
            scenes: RequestQueue::new(),
            audio: RequestQueue::new(),
        }
    }

    /// Convenience: request a scene transition by name.
    pub fn request_scene(&mut self, scene: impl Into<String>) {
        let scene = scene.into();
        trace!(%scene, "scene transition requested");
        self.scenes.send(SceneRequest { scene });
    }

    /// Convenience: request an audio cue by name.
    pub fn play(&mut self, cue: impl Into<String>) {
        self.audio.send(AudioCue { cue: cue.into() });
    }
}

impl Default for Outbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drain() {
        let mut queue: RequestQueue<i32> = RequestQueue::new();
        queue.send(1);
        queue.send(2);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_outbox_requests() {
        let mut outbox = Outbox::new();
        outbox.request_scene("cave-2");
        outbox.play("jump");

        assert_eq!(
            outbox.scenes.drain().collect::<Vec<_>>(),
            vec![SceneRequest {
                scene: "cave-2".into()
            }]
        );
        assert_eq!(outbox.audio.len(), 1);
    }
}
