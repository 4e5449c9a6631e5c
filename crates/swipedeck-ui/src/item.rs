use std::fmt::Debug;
use std::hash::Hash;

/// A unit of content shown by the deck.
///
/// The deck never looks at an item beyond its key, which must be unique
/// within one sequence and stable for the item's lifetime.
pub trait DeckItem {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

impl<T: DeckItem> DeckItem for std::rc::Rc<T> {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        (**self).key()
    }
}
