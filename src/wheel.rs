use crate::palette::{self, Rgb};
use serde::Serialize;
use thiserror::Error;

/// A wheel never holds fewer than this many options.
pub const MIN_ITEMS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("label must not be blank")]
    EmptyLabel,
    #[error("a wheel needs at least {MIN_ITEMS} options")]
    BelowMinimum,
    #[error("no option with id {0}")]
    UnknownId(ItemId),
}

/// Opaque option identifier. Ids count up from 1 and are never reused,
/// even after the option they named is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WheelItem {
    pub id: ItemId,
    pub label: String,
    pub color: Rgb,
}

/// Ordered option store. Options are only appended by [`Wheel::add`] and
/// removed in place by [`Wheel::remove`]; everything else is a read.
#[derive(Clone, Debug)]
pub struct Wheel {
    items: Vec<WheelItem>,
    next_id: u64,
}

impl Wheel {
    /// Build a wheel from seed labels. Labels are trimmed; blank ones are
    /// skipped. Fails if fewer than [`MIN_ITEMS`] usable labels remain.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, WheelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wheel = Wheel {
            items: Vec::new(),
            next_id: 1,
        };
        for label in labels {
            // Seeding tolerates blanks so callers can pass raw CLI input.
            let _ = wheel.add(label.as_ref());
        }
        if wheel.items.len() < MIN_ITEMS {
            return Err(WheelError::BelowMinimum);
        }
        Ok(wheel)
    }

    pub fn add(&mut self, label: &str) -> Result<&WheelItem, WheelError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(WheelError::EmptyLabel);
        }
        let created = self.items.len();
        let item = WheelItem {
            id: self.fresh_id(),
            label: label.to_string(),
            color: palette::color_for(created),
        };
        self.items.push(item);
        Ok(&self.items[created])
    }

    /// Remove the option with `id`, preserving the order of the rest.
    /// Refused without mutating when the wheel would drop under
    /// [`MIN_ITEMS`], or when no option carries `id`.
    pub fn remove(&mut self, id: ItemId) -> Result<WheelItem, WheelError> {
        let pos = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(WheelError::UnknownId(id))?;
        if self.items.len() <= MIN_ITEMS {
            return Err(WheelError::BelowMinimum);
        }
        Ok(self.items.remove(pos))
    }

    pub fn items(&self) -> &[WheelItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn fresh_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Wheel::from_labels(["Yes", "No", "Maybe", "Ask again"])
            .expect("default labels satisfy the minimum")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;

    #[test]
    fn add_trims_and_appends() {
        let mut wheel = Wheel::default();
        let id = wheel.add("  Pizza  ").unwrap().id;
        let last = wheel.items().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.label, "Pizza");
    }

    #[test]
    fn add_rejects_blank_labels() {
        let mut wheel = Wheel::default();
        assert_eq!(wheel.add(""), Err(WheelError::EmptyLabel));
        assert_eq!(wheel.add("   \t"), Err(WheelError::EmptyLabel));
        assert_eq!(wheel.len(), 4);
    }

    #[test]
    fn colors_cycle_with_list_length() {
        let mut wheel = Wheel::from_labels(["a", "b"]).unwrap();
        while wheel.len() < PALETTE.len() + 1 {
            wheel.add("filler").unwrap();
        }
        let items = wheel.items();
        assert_eq!(items[0].color, items[PALETTE.len()].color);
        assert_eq!(items[0].color, PALETTE[0]);
        assert_eq!(items[1].color, PALETTE[1]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut wheel = Wheel::from_labels(["a", "b", "c", "d"]).unwrap();
        let id = wheel.items()[1].id;
        wheel.remove(id).unwrap();
        let labels: Vec<_> = wheel.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["a", "c", "d"]);
    }

    #[test]
    fn remove_refuses_below_minimum() {
        let mut wheel = Wheel::from_labels(["a", "b"]).unwrap();
        let before = wheel.items().to_vec();
        let id = before[0].id;
        assert_eq!(wheel.remove(id), Err(WheelError::BelowMinimum));
        assert_eq!(wheel.items(), &before[..]);
    }

    #[test]
    fn remove_unknown_id_is_refused() {
        let mut wheel = Wheel::from_labels(["a", "b", "c"]).unwrap();
        let bogus = ItemId(9999);
        assert_eq!(wheel.remove(bogus), Err(WheelError::UnknownId(bogus)));
        assert_eq!(wheel.len(), 3);
    }

    #[test]
    fn add_then_remove_roundtrips() {
        let mut wheel = Wheel::from_labels(["a", "b", "c"]).unwrap();
        let before = wheel.items().to_vec();
        let id = wheel.add("X").unwrap().id;
        wheel.remove(id).unwrap();
        assert_eq!(wheel.items(), &before[..]);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut wheel = Wheel::from_labels(["a", "b", "c"]).unwrap();
        let removed = wheel.items()[2].id;
        wheel.remove(removed).unwrap();
        let fresh = wheel.add("d").unwrap().id;
        assert_ne!(fresh, removed);
        assert!(fresh > removed);
    }

    #[test]
    fn from_labels_skips_blanks_and_enforces_minimum() {
        assert!(Wheel::from_labels(["a", "  ", ""]).is_err());
        let wheel = Wheel::from_labels(["a", " ", "b"]).unwrap();
        assert_eq!(wheel.len(), 2);
    }
}
