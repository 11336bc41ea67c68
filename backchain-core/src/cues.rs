//! Fire-and-forget side effects emitted by the simulation.
//!
//! The core never waits on a cue. Hosts drain them after each frame and route
//! them to audio, music and screen flashes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "camelCase")]
pub enum Cue {
    Jump,
    Land,
    /// Entering a room; carries the room's accent colour
    RoomEnter { color: u32 },
    Warning,
    Victory,
    GameOver,
    /// Start the ambient track for a room template
    MusicStart { template_id: String },
    MusicStop,
}

/// Receiver for cues
pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

impl CueSink for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn cue(&mut self, _: Cue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink = Vec::new();
        sink.cue(Cue::Jump);
        sink.cue(Cue::RoomEnter { color: 0x00aaff });
        assert_eq!(sink, vec![Cue::Jump, Cue::RoomEnter { color: 0x00aaff }]);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Cue::MusicStart {
            template_id: "azure".into(),
        })
        .unwrap();
        assert_eq!(json["cue"], "musicStart");
        assert_eq!(json["template_id"], "azure");
    }
}
