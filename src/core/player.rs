//! Player identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe identifier for one of the two seats at a Blue Moon table.
//!
//! ## PlayerPair
//!
//! Fixed two-entry storage indexed by `PlayerId`. Every per-player value in
//! the engine (players, controllers, scores) lives in one of these.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats at a table.
pub const SEATS: usize = 2;

/// Seat identifier. The first seat is `PlayerId::new(0)`.
///
/// Only [`PlayerId::new`] builds one, so every id names a real seat:
///
/// ```compile_fail
/// use bluemoon::core::PlayerId;
///
/// let _ = PlayerId(5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// Panics if `id` is not a valid seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < SEATS, "Blue Moon is a two-player game");
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    ///
    /// ```
    /// use bluemoon::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).opponent(), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).opponent(), PlayerId::new(0));
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both seats in order.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        (0..SEATS as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat with O(1) access.
///
/// ## Example
///
/// ```
/// use bluemoon::core::{PlayerId, PlayerPair};
///
/// let mut dragons: PlayerPair<u8> = PlayerPair::new(|_| 0);
/// dragons[PlayerId::new(1)] += 2;
///
/// assert_eq!(dragons[PlayerId::new(0)], 0);
/// assert_eq!(dragons[PlayerId::new(1)], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; SEATS],
}

impl<T> PlayerPair<T> {
    /// Create a pair with values from a factory function.
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Create a pair from explicit values.
    pub fn from_array(data: [T; SEATS]) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }
}

impl<T: Default> Default for PlayerPair<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(p0.opponent(), p1);
        assert_eq!(format!("{}", p1), "Player 1");
    }

    #[test]
    #[should_panic]
    fn test_third_seat_rejected() {
        let _ = PlayerId::new(2);
    }

    #[test]
    fn test_pair_indexing() {
        let mut pair = PlayerPair::from_array(["hoax", "vulca"]);
        pair[PlayerId::new(0)] = "flit";

        assert_eq!(pair[PlayerId::new(0)], "flit");
        assert_eq!(*pair.get(PlayerId::new(1)), "vulca");
    }
}
