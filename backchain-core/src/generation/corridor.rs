//! Connector corridors between rooms.

use serde::{Deserialize, Serialize};

use super::rng::Lcg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorridorKind {
    Straight,
    LeftTurn,
    RightTurn,
    RampUp,
    RampDown,
    SCurve,
}

impl CorridorKind {
    pub const ALL: [CorridorKind; 6] = [
        CorridorKind::Straight,
        CorridorKind::LeftTurn,
        CorridorKind::RightTurn,
        CorridorKind::RampUp,
        CorridorKind::RampDown,
        CorridorKind::SCurve,
    ];

    pub fn base_length(self) -> i32 {
        match self {
            CorridorKind::Straight => 8,
            CorridorKind::LeftTurn | CorridorKind::RightTurn => 10,
            CorridorKind::RampUp | CorridorKind::RampDown => 12,
            CorridorKind::SCurve => 15,
        }
    }

    /// Heading change in degrees; negative turns left
    pub fn turn_angle(self) -> f32 {
        match self {
            CorridorKind::LeftTurn => -90.0,
            CorridorKind::RightTurn => 90.0,
            _ => 0.0,
        }
    }

    pub fn height_change(self) -> f32 {
        match self {
            CorridorKind::RampUp => 3.0,
            CorridorKind::RampDown => -3.0,
            _ => 0.0,
        }
    }

    pub fn curves(self) -> Option<Vec<f32>> {
        match self {
            CorridorKind::SCurve => Some(vec![45.0, -45.0]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corridor {
    #[serde(rename = "type")]
    pub kind: CorridorKind,
    pub length: i32,
    pub turn_angle: f32,
    pub height_change: f32,
    pub curves: Option<Vec<f32>>,
}

/// Pick a corridor shape from `seed`, jittering its length by up to two units
pub fn generate_corridor(seed: u64) -> Corridor {
    let mut rng = Lcg::new(seed);
    let kind = CorridorKind::ALL[rng.index(CorridorKind::ALL.len())];
    let length = kind.base_length() + rng.random_int(-2, 2);
    Corridor {
        kind,
        length,
        turn_angle: kind.turn_angle(),
        height_change: kind.height_change(),
        curves: kind.curves(),
    }
}
