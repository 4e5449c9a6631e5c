//! Render projection: what the host should paint for the current state.

use swipedeck_animation::CardLayout;
use swipedeck_foundation::gesture_constants::{STACKED_CARD_Z_INDEX, TOP_CARD_Z_INDEX};

use crate::item::DeckItem;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardPlacement {
    /// The top card, moved by the live position.
    Top(CardLayout),
    /// A card waiting underneath, pushed down by `top`.
    Stacked { top: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardNode<K, N> {
    pub key: K,
    /// Position of the item in the deck's sequence.
    pub index: usize,
    pub placement: CardPlacement,
    pub z_index: i32,
    /// Only the top card accepts gestures, and not while it is swiping out.
    pub interactive: bool,
    pub node: N,
}

impl<K, N> CardNode<K, N> {
    pub fn is_top(&self) -> bool {
        matches!(self.placement, CardPlacement::Top(_))
    }
}

/// One render of the deck.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckFrame<K, N> {
    /// Remaining cards in paint order: the deepest card first, the top card
    /// last.
    Cards(Vec<CardNode<K, N>>),
    /// Every item has been swiped.
    Exhausted(N),
}

impl<K, N> DeckFrame<K, N> {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, DeckFrame::Exhausted(_))
    }

    pub fn cards(&self) -> &[CardNode<K, N>] {
        match self {
            DeckFrame::Cards(cards) => cards,
            DeckFrame::Exhausted(_) => &[],
        }
    }

    pub fn top(&self) -> Option<&CardNode<K, N>> {
        self.cards().last().filter(|card| card.is_top())
    }

    /// Keys in paint order.
    pub fn keys(&self) -> Vec<&K> {
        self.cards().iter().map(|card| &card.key).collect()
    }
}

/// Build the card nodes for an active deck.
///
/// Items before `cursor` are skipped. The item at `cursor` gets `top_layout`;
/// each later item is offset by `stack_step` per position below the top.
/// Nodes come out in reverse sequence order so that painting them in order
/// leaves the top card visible.
pub fn project_cards<T, N>(
    items: &[T],
    cursor: usize,
    top_layout: CardLayout,
    top_interactive: bool,
    stack_step: f32,
    mut render_card: impl FnMut(&T) -> N,
) -> Vec<CardNode<T::Key, N>>
where
    T: DeckItem,
{
    let Some(remaining) = items.get(cursor..) else {
        return Vec::new();
    };
    remaining
        .iter()
        .enumerate()
        .rev()
        .map(|(depth, item)| {
            let index = cursor + depth;
            let (placement, z_index) = if depth == 0 {
                (CardPlacement::Top(top_layout), TOP_CARD_Z_INDEX)
            } else {
                (
                    CardPlacement::Stacked {
                        top: stack_step * depth as f32,
                    },
                    STACKED_CARD_Z_INDEX,
                )
            };
            CardNode {
                key: item.key(),
                index,
                placement,
                z_index,
                interactive: depth == 0 && top_interactive,
                node: render_card(item),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Card(u32);

    impl DeckItem for Card {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn cards(n: u32) -> Vec<Card> {
        (1..=n).map(Card).collect()
    }

    #[test]
    fn paint_order_is_reversed_with_top_last() {
        let items = cards(4);
        let layout = CardLayout {
            x: 5.0,
            y: 1.0,
            rotation_degrees: 0.75,
        };
        let nodes = project_cards(&items, 1, layout, true, 10.0, |card| card.0 * 100);

        let keys: Vec<u32> = nodes.iter().map(|node| node.key).collect();
        assert_eq!(keys, vec![4, 3, 2]);

        let top = nodes.last().expect("top card");
        assert_eq!(top.placement, CardPlacement::Top(layout));
        assert_eq!(top.z_index, 99);
        assert!(top.interactive);
        assert_eq!(top.node, 200);
    }

    #[test]
    fn stacked_cards_step_down_by_depth() {
        let items = cards(4);
        let nodes = project_cards(&items, 1, CardLayout::default(), true, 10.0, |_| ());

        assert_eq!(nodes[0].placement, CardPlacement::Stacked { top: 20.0 });
        assert_eq!(nodes[1].placement, CardPlacement::Stacked { top: 10.0 });
        assert!(nodes[..2].iter().all(|node| node.z_index == 5 && !node.interactive));
        assert_eq!(nodes[0].index, 3);
    }

    #[test]
    fn consumed_items_are_never_projected() {
        let items = cards(3);
        for cursor in 0..=3 {
            let nodes = project_cards(&items, cursor, CardLayout::default(), true, 10.0, |_| ());
            assert_eq!(nodes.len(), 3 - cursor);
            assert!(nodes.iter().all(|node| node.index >= cursor));
        }
        assert!(project_cards(&items, 7, CardLayout::default(), true, 10.0, |_| ()).is_empty());
    }

    #[test]
    fn swiping_top_card_is_not_interactive() {
        let items = cards(2);
        let nodes = project_cards(&items, 0, CardLayout::default(), false, 10.0, |_| ());
        assert!(nodes.iter().all(|node| !node.interactive));
    }

    #[test]
    fn frame_accessors() {
        let items = cards(2);
        let frame: DeckFrame<u32, ()> = DeckFrame::Cards(project_cards(
            &items,
            0,
            CardLayout::default(),
            true,
            10.0,
            |_| (),
        ));
        assert_eq!(frame.keys(), vec![&2, &1]);
        assert_eq!(frame.top().map(|card| card.key), Some(1));

        let exhausted: DeckFrame<u32, &str> = DeckFrame::Exhausted("done");
        assert!(exhausted.is_exhausted());
        assert!(exhausted.cards().is_empty());
        assert!(exhausted.top().is_none());
    }
}
