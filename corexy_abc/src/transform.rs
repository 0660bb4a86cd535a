//! CoreXY forward transform.
//!
//! One belt drives `x + y`, the other `x - y`, and the third rail passes
//! straight through:
//!
//! ```text
//! x = (p0 + p1) / 2
//! y = (p0 - p1) / 2
//! z = p2
//! ```
//!
//! The inverse (machine → rail) belongs to the step-generation side and is
//! selected per rail by [`SolverBinding`](crate::rail::SolverBinding).

/// Machine coordinate for rail positions `[p0, p1, p2]`.
#[inline]
pub fn forward(rails: [f64; 3]) -> [f64; 3] {
    let [p0, p1, p2] = rails;
    [0.5 * (p0 + p1), 0.5 * (p0 - p1), p2]
}
