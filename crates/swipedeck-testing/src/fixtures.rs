use std::fmt;

use swipedeck_ui::DeckItem;

/// Minimal deck item for tests and benches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCard {
    pub id: u32,
    pub label: String,
}

impl TestCard {
    pub fn new(id: u32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

impl DeckItem for TestCard {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for TestCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Cards labelled `A`, `B`, `C`... with ids starting at 1.
pub fn test_cards(count: usize) -> Vec<TestCard> {
    (0..count)
        .map(|index| {
            let letter = (b'A' + (index % 26) as u8) as char;
            let label = if index < 26 {
                letter.to_string()
            } else {
                format!("{letter}{}", index / 26)
            };
            TestCard::new(index as u32 + 1, label)
        })
        .collect()
}
