use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Index;

const MOD: u128 = 3817949514078926267; // A prime number with 62 bits.
const BASE: u128 = 211;
const POW_BASE: [u128; 10] = get_powers_of_base();

const fn get_powers_of_base() -> [u128; 10] {
    let mut ret: [u128; 10] = [0; 10];
    ret[0] = 1;

    let mut i = 1;
    while i < ret.len() {
        ret[i] = ret[i - 1] * BASE % MOD;
        i += 1;
    }

    ret
}

/// A multiset of card rank values (1 to 10 inclusive) with cached total,
/// cached ace-as-1 sum and a rolling hash, so it can index a `StateMap`
/// in O(1) after every single-card update.
#[derive(Debug, Clone)]
pub struct CardCounts {
    counts: [u16; 10],
    hash_value: u128,
    sum: u16,
    total: u16,
}

impl CardCounts {
    pub fn new(counts: &[u16; 10]) -> CardCounts {
        let mut card_counts = CardCounts {
            counts: *counts,
            hash_value: 0,
            sum: 0,
            total: 0,
        };

        card_counts.propagate_counts();

        card_counts
    }

    /// The canonical shoe composition: 4 cards per rank value 1 to 9 and
    /// 16 tens per deck. Zero decks gives an empty multiset.
    pub fn with_number_of_decks(number_of_decks: u8) -> CardCounts {
        let mut counts = [number_of_decks as u16 * 4; 10];
        counts[9] = number_of_decks as u16 * 16;
        Self::new(&counts)
    }

    /// Add a card of given rank value.
    ///
    /// Note that this method won't check if the rank value is valid.
    pub fn add_card(&mut self, card_value: u8) {
        let index = (card_value - 1) as usize;
        self.counts[index] += 1;
        self.hash_value = (self.hash_value + POW_BASE[index]) % MOD;
        self.sum += card_value as u16;
        self.total += 1;
    }

    /// Remove a card of given rank value.
    ///
    /// Note that this method won't check if the rank value is valid. It also
    /// won't check if the number of the given rank value is already 0.
    pub fn remove_card(&mut self, card_value: u8) {
        let index = (card_value - 1) as usize;
        self.counts[index] -= 1;
        self.hash_value = (self.hash_value + MOD - POW_BASE[index]) % MOD;
        self.sum -= card_value as u16;
        self.total -= 1;
    }

    /// Note that this method treats Ace as 1.
    pub fn get_sum(&self) -> u16 {
        self.sum
    }

    pub fn get_total(&self) -> u16 {
        self.total
    }

    pub fn is_soft(&self) -> bool {
        self.counts[0] > 0
    }

    /// Hand total with ace flexibility: one ace counts 11 while that keeps
    /// the total at 21 or below.
    pub fn get_actual_sum(&self) -> u16 {
        if self.is_soft() && self.sum + 10 <= 21 {
            self.sum + 10
        } else {
            self.sum
        }
    }

    fn propagate_counts(&mut self) {
        self.hash_value = 0;
        self.sum = 0;
        self.total = 0;
        for i in 0..self.counts.len() {
            self.hash_value += (self.counts[i] as u128) * POW_BASE[i];
            self.sum += ((i + 1) as u16) * self.counts[i];
            self.total += self.counts[i];
        }
        self.hash_value %= MOD;
    }
}

impl Index<u8> for CardCounts {
    type Output = u16;
    fn index(&self, index: u8) -> &Self::Output {
        &self.counts[(index - 1) as usize]
    }
}

impl Hash for CardCounts {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u128(self.hash_value);
    }
}

impl PartialEq for CardCounts {
    fn eq(&self, other: &Self) -> bool {
        self.hash_value == other.hash_value
    }
}

/// This struct provides a convenient way to use CardCounts as the index of
/// an array.
#[derive(Debug, Default, Clone)]
pub struct StateMap<T: Default> {
    data: HashMap<u128, T>,
}

impl<T: Default> StateMap<T> {
    pub fn new() -> StateMap<T> {
        StateMap {
            data: HashMap::new(),
        }
    }

    pub fn contains_state(&self, index: &CardCounts) -> bool {
        self.data.contains_key(&index.hash_value)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Default> Index<&CardCounts> for StateMap<T> {
    type Output = T;
    fn index(&self, index: &CardCounts) -> &Self::Output {
        &self.data[&index.hash_value]
    }
}

impl<T: Default> std::ops::IndexMut<&CardCounts> for StateMap<T> {
    fn index_mut(&mut self, index: &CardCounts) -> &mut Self::Output {
        self.data.entry(index.hash_value).or_default()
    }
}
