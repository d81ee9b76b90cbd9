use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered, duplicate-free list of catalog item ids.
///
/// Order is append order; removal keeps the relative order of what remains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Uuid>", into = "Vec<Uuid>")]
pub struct Watchlist(Vec<Uuid>);

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item_id: &Uuid) -> bool {
        self.0.contains(item_id)
    }

    /// Appends `item_id` unless it is already present. Returns whether the list changed.
    pub fn insert(&mut self, item_id: Uuid) -> bool {
        if self.contains(&item_id) {
            return false;
        }
        self.0.push(item_id);
        true
    }

    /// Removes `item_id`. Returns whether it was present.
    pub fn remove(&mut self, item_id: &Uuid) -> bool {
        match self.0.iter().position(|id| id == item_id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Uuid>> for Watchlist {
    fn from(ids: Vec<Uuid>) -> Self {
        let mut list = Watchlist::new();
        for id in ids {
            list.insert(id);
        }
        list
    }
}

impl From<Watchlist> for Vec<Uuid> {
    fn from(list: Watchlist) -> Self {
        list.0
    }
}
