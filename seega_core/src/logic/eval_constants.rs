// Terminal scores
pub const WIN_SCORE: f64 = 10_000.0;

// Safety bonuses
pub const SAFETY_CENTER: f64 = 5.0;
pub const SAFETY_PER_FRIENDLY_NEIGHBOR: f64 = 0.5;

// Positioning: corners 3, other edge cells 1, plus 0.5 per step of
// Manhattan distance under 6 from the center.
// Symmetric, so the same table serves both players.

#[rustfmt::skip]
pub const PST_POSITIONING: [[f64; 7]; 7] = [
    [3.0, 1.5, 2.0, 2.5, 2.0, 1.5, 3.0],
    [1.5, 1.0, 1.5, 2.0, 1.5, 1.0, 1.5],
    [2.0, 1.5, 2.0, 2.5, 2.0, 1.5, 2.0],
    [2.5, 2.0, 2.5, 3.0, 2.5, 2.0, 2.5],
    [2.0, 1.5, 2.0, 2.5, 2.0, 1.5, 2.0],
    [1.5, 1.0, 1.5, 2.0, 1.5, 1.0, 1.5],
    [3.0, 1.5, 2.0, 2.5, 2.0, 1.5, 3.0],
];
