//! A single grid cell: owner and accumulated power.
//!
//! Only rules data lives here. Animation cues are produced by the cascade
//! processor as separate events and never stored on the cell.

use serde::{Deserialize, Serialize};

use crate::core::{BoardError, PlayerId};

/// Rules state of one grid position.
///
/// Fields are private so an unowned cell always has zero power.
/// Deserialisation goes through the same check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCell")]
pub struct Cell {
    owner: Option<PlayerId>,
    power: u32,
}

/// Wire form of a cell before validation.
#[derive(Deserialize)]
struct RawCell {
    owner: Option<PlayerId>,
    power: u32,
}

impl TryFrom<RawCell> for Cell {
    type Error = BoardError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        match raw.owner {
            Some(owner) => Ok(Cell::owned(owner, raw.power)),
            None if raw.power == 0 => Ok(Cell::EMPTY),
            None => Err(BoardError::UnownedPower { power: raw.power }),
        }
    }
}

impl Cell {
    /// Unowned, no power.
    pub const EMPTY: Cell = Cell {
        owner: None,
        power: 0,
    };

    /// A cell held by `owner`. Zero power yields an empty cell.
    #[must_use]
    pub const fn owned(owner: PlayerId, power: u32) -> Self {
        if power == 0 {
            Self::EMPTY
        } else {
            Self {
                owner: Some(owner),
                power,
            }
        }
    }

    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Add one unit of power and hand the cell to `owner`.
    ///
    /// Returns the previous owner.
    pub(crate) fn charge(&mut self, owner: PlayerId) -> Option<PlayerId> {
        self.power += 1;
        self.owner.replace(owner)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{}:{}", owner.0, self.power),
            None => write!(f, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell() {
        let cell = Cell::EMPTY;
        assert!(cell.is_empty());
        assert_eq!(cell.power(), 0);
        assert_eq!(cell, Cell::default());
    }

    #[test]
    fn test_owned_zero_power_is_empty() {
        assert_eq!(Cell::owned(PlayerId::new(2), 0), Cell::EMPTY);
    }

    #[test]
    fn test_charge_reports_previous_owner() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        let mut cell = Cell::EMPTY;
        assert_eq!(cell.charge(p0), None);
        assert_eq!(cell, Cell::owned(p0, 1));

        assert_eq!(cell.charge(p1), Some(p0));
        assert!(cell.is_owned_by(p1));
        assert_eq!(cell.power(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::EMPTY.to_string(), ".");
        assert_eq!(Cell::owned(PlayerId::new(3), 2).to_string(), "3:2");
    }

    #[test]
    fn test_deserialize_checks_invariant() {
        let cell = Cell::owned(PlayerId::new(1), 2);
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(serde_json::from_str::<Cell>(&json).unwrap(), cell);

        let empty: Cell = serde_json::from_str(r#"{"owner":null,"power":0}"#).unwrap();
        assert_eq!(empty, Cell::EMPTY);

        // Owned with no power collapses to empty, as `Cell::owned` does.
        let drained: Cell = serde_json::from_str(r#"{"owner":2,"power":0}"#).unwrap();
        assert_eq!(drained, Cell::EMPTY);

        let err = serde_json::from_str::<Cell>(r#"{"owner":null,"power":5}"#).unwrap_err();
        assert!(err.to_string().contains("unowned cell cannot hold power"));
    }
}
