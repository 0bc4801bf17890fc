//! Discrete-thrust trajectory integration
//!
//! Each command digit picks an acceleration from a 3x3 keypad:
//!
//! ```text
//! 7 8 9      (-1, 1) (0, 1) (1, 1)
//! 4 5 6  =>  (-1, 0) (0, 0) (1, 0)
//! 1 2 3      (-1,-1) (0,-1) (1,-1)
//! ```
//!
//! Velocity is updated first, then position moves by the new velocity.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One integrated sample: position and velocity after some prefix of commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: i64,
    pub y: i64,
    pub vx: i64,
    pub vy: i64,
}

impl Waypoint {
    /// Initial state of every trajectory
    pub const ORIGIN: Waypoint = Waypoint {
        x: 0,
        y: 0,
        vx: 0,
        vy: 0,
    };

    pub const fn new(x: i64, y: i64, vx: i64, vy: i64) -> Self {
        Self { x, y, vx, vy }
    }

    /// Apply one command. Characters outside `1`-`9` leave the state untouched.
    pub fn step(self, command: char) -> Self {
        match thrust(command) {
            Some((ax, ay)) => {
                let vx = self.vx + ax;
                let vy = self.vy + ay;
                Self {
                    x: self.x + vx,
                    y: self.y + vy,
                    vx,
                    vy,
                }
            }
            None => self,
        }
    }

    /// Where the ship lands next if no thrust is applied
    pub fn drift(self) -> Self {
        self.step('5')
    }

    /// Position in logical space
    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }
}

/// Keypad acceleration for a command character
pub fn thrust(command: char) -> Option<(i64, i64)> {
    let digit = command.to_digit(10).filter(|d| (1..=9).contains(d))? as i64 - 1;
    Some((digit % 3 - 1, digit / 3 - 1))
}

/// Integrate a full command string. The result has one more sample than the
/// string has characters, starting with `Waypoint::ORIGIN`.
pub fn integrate(commands: &str) -> Vec<Waypoint> {
    let mut waypoints = Vec::with_capacity(commands.len() + 1);
    waypoints.push(Waypoint::ORIGIN);
    waypoints.extend(integrate_from(Waypoint::ORIGIN, commands));
    waypoints
}

/// Continue integrating from `start`. Only the samples after each command are
/// returned; `start` itself is not included.
pub fn integrate_from(start: Waypoint, commands: &str) -> Vec<Waypoint> {
    commands
        .chars()
        .scan(start, |state, c| {
            *state = state.step(c);
            Some(*state)
        })
        .collect()
}

/// Integrate an already-executed prefix and a planned suffix.
///
/// Returns `(executed, future)`: `executed` is `integrate(executed)` and
/// `future` continues from its last sample, so the two halves concatenate to
/// `integrate(executed + future)`.
pub fn split_waypoints(executed: &str, future: &str) -> (Vec<Waypoint>, Vec<Waypoint>) {
    let done = integrate(executed);
    let last = done.last().copied().unwrap_or(Waypoint::ORIGIN);
    let ahead = integrate_from(last, future);
    (done, ahead)
}

/// Parse checkpoint text: one `x y` pair per line. Lines that don't hold
/// exactly two integers are skipped.
pub fn parse_checkpoints(text: &str) -> Vec<(i64, i64)> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            Some((x, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_layout() {
        assert_eq!(thrust('1'), Some((-1, -1)));
        assert_eq!(thrust('2'), Some((0, -1)));
        assert_eq!(thrust('3'), Some((1, -1)));
        assert_eq!(thrust('4'), Some((-1, 0)));
        assert_eq!(thrust('5'), Some((0, 0)));
        assert_eq!(thrust('6'), Some((1, 0)));
        assert_eq!(thrust('7'), Some((-1, 1)));
        assert_eq!(thrust('8'), Some((0, 1)));
        assert_eq!(thrust('9'), Some((1, 1)));
        assert_eq!(thrust('0'), None);
        assert_eq!(thrust('x'), None);
    }

    #[test]
    fn test_integrate_examples() {
        assert_eq!(integrate("5"), vec![Waypoint::ORIGIN, Waypoint::ORIGIN]);
        assert_eq!(
            integrate("6"),
            vec![Waypoint::ORIGIN, Waypoint::new(1, 0, 1, 0)]
        );
        assert_eq!(
            integrate("69"),
            vec![
                Waypoint::ORIGIN,
                Waypoint::new(1, 0, 1, 0),
                Waypoint::new(3, 1, 2, 1),
            ]
        );
    }

    #[test]
    fn test_empty_commands() {
        assert_eq!(integrate(""), vec![Waypoint::ORIGIN]);
    }

    #[test]
    fn test_unknown_characters_hold_state() {
        let waypoints = integrate("6x6");
        assert_eq!(waypoints.len(), 4);
        assert_eq!(waypoints[1], waypoints[2]);
        assert_eq!(waypoints[3], Waypoint::new(3, 0, 2, 0));
    }

    #[test]
    fn test_split_matches_concatenation() {
        let (done, ahead) = split_waypoints("236", "659");
        let whole = integrate("236659");
        assert_eq!(done, &whole[..4]);
        assert_eq!(ahead, &whole[4..]);
    }

    #[test]
    fn test_drift_keeps_velocity() {
        let w = Waypoint::new(3, 1, 2, 1);
        assert_eq!(w.drift(), Waypoint::new(5, 2, 2, 1));
    }

    #[test]
    fn test_parse_checkpoints() {
        let points = parse_checkpoints("1 -1\n1 -3\n\n2 -5 7\nfoo bar\n 2  -8 \n");
        assert_eq!(points, vec![(1, -1), (1, -3), (2, -8)]);
    }
}
