use crate::{CardCounts, TableError};

/// The authoritative multiset of cards not yet dealt.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    card_count: CardCounts,
}

impl Shoe {
    /// Creates a shoe with the canonical composition for the given number
    /// of decks. Non-positive deck counts are coerced to one deck.
    pub fn new(number_of_decks: u8) -> Shoe {
        let number_of_decks = number_of_decks.max(1);
        Shoe {
            number_of_decks,
            card_count: CardCounts::with_number_of_decks(number_of_decks),
        }
    }

    /// Resets the shoe to the canonical composition for the given number
    /// of decks, coerced to at least one.
    pub fn configure(&mut self, number_of_decks: u8) {
        let number_of_decks = number_of_decks.max(1);
        self.number_of_decks = number_of_decks;
        self.card_count = CardCounts::with_number_of_decks(number_of_decks);
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    pub fn count_of(&self, card_value: u8) -> u16 {
        self.card_count[card_value]
    }

    pub fn total(&self) -> u16 {
        self.card_count.get_total()
    }

    /// Removes one card of the given rank value. Returns false (and leaves
    /// the shoe untouched) when no card of that rank remains. The error
    /// case means the cached total lost sync with the counts, which the
    /// count check makes unreachable.
    pub fn decrement(&mut self, card_value: u8) -> Result<bool, TableError> {
        let count = self.card_count[card_value];
        if count == 0 {
            return Ok(false);
        }
        if self.card_count.get_total() == 0 {
            return Err(TableError::ShoeOutOfSync {
                rank: card_value,
                count,
                total: 0,
            });
        }

        self.card_count.remove_card(card_value);
        Ok(true)
    }

    /// An owned copy of the composition for the pure engine.
    pub fn snapshot(&self) -> CardCounts {
        self.card_count.clone()
    }

    pub fn card_count(&self) -> &CardCounts {
        &self.card_count
    }
}
