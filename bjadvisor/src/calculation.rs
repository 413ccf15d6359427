//! Pure probability computations over a shoe snapshot. Nothing in here
//! mutates caller state; the session passes snapshots in and caches the
//! results.

use std::collections::BTreeMap;

use crate::{CardCounts, StateMap};

/// Probability of drawing one card of the given rank value from the shoe.
pub fn prob_draw(shoe: &CardCounts, card_value: u8) -> f64 {
    if shoe.get_total() == 0 {
        return 0.0;
    }
    shoe[card_value] as f64 / shoe.get_total() as f64
}

/// Probability that exactly one more card pushes `hand_total` above 21.
///
/// Below 12 no single card can bust the hand. Aces count as their face
/// value of 1 here; an ace alone never busts.
pub fn prob_to_bust(shoe: &CardCounts, hand_total: u16) -> f64 {
    if hand_total < 12 {
        return 0.0;
    }
    if shoe.get_total() == 0 {
        return 0.0;
    }

    let bust_threshold = 22_i32 - hand_total as i32;
    let mut bust_cards: u16 = 0;
    for card_value in 1..=10u8 {
        if card_value as i32 >= bust_threshold {
            bust_cards += shoe[card_value];
        }
    }

    bust_cards as f64 / shoe.get_total() as f64
}

/// One-draw probabilities of landing exactly on each total in [12, 21].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReachOdds {
    pub(crate) probabilities: [f64; 10],
}

impl ReachOdds {
    pub fn get(&self, total: u16) -> f64 {
        match total {
            12..=21 => self.probabilities[(total - 12) as usize],
            _ => 0.0,
        }
    }

    pub fn to_map(&self) -> BTreeMap<u16, f64> {
        (12..=21).map(|total| (total, self.get(total))).collect()
    }
}

/// The probability that the player's next card lands the hand exactly on
/// each total in [12, 21]. Single-draw semantics: a target already reached
/// or more than one card away has probability 0.
pub fn player_reach_odds(shoe: &CardCounts, current_total: u16) -> ReachOdds {
    let mut odds = ReachOdds::default();
    if shoe.get_total() == 0 {
        return odds;
    }

    let shoe_total = shoe.get_total() as f64;
    for target in 12..=21u16 {
        if current_total >= target {
            continue;
        }
        let needed = target - current_total;
        if (1..=10).contains(&needed) {
            odds.probabilities[(target - 12) as usize] = shoe[needed as u8] as f64 / shoe_total;
        }
    }

    odds
}

/// Where the dealer's forced policy stops: the terminal totals [17, 21] and
/// the probability of finishing on each.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TerminalOdds {
    pub(crate) probabilities: [f64; 5],
}

impl TerminalOdds {
    pub fn get(&self, total: u16) -> f64 {
        match total {
            17..=21 => self.probabilities[(total - 17) as usize],
            _ => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn to_map(&self) -> BTreeMap<u16, f64> {
        (17..=21).map(|total| (total, self.get(total))).collect()
    }

    fn end_with_total(&mut self, total: u16) {
        self.probabilities[(total - 17) as usize] = 1.0;
    }

    fn add_assign_with_p(&mut self, rhs: &Self, p: f64) {
        for i in 0..self.probabilities.len() {
            self.probabilities[i] += rhs.probabilities[i] * p;
        }
    }

    fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            for p in self.probabilities.iter_mut() {
                *p /= sum;
            }
        }
    }
}

/// Terminal-total distribution for a dealer who draws until reaching 17 and
/// stands otherwise, expanded exhaustively over the remaining shoe with
/// sampling-without-replacement draw weights.
///
/// Running totals are raw ace-as-1 sums; the displayed hand total applies
/// ace flexibility, the forced draw here does not. Bust branches contribute
/// nothing and the surviving mass is renormalised, so the result reads as
/// "where the dealer stops, given she does not bust". When no branch
/// reaches [17, 21] at all, every bucket stays 0.
pub fn dealer_terminal_odds(shoe: &CardCounts, dealer_start_total: u16) -> TerminalOdds {
    let mut odds: StateMap<TerminalOdds> = StateMap::new();
    let mut drawn = CardCounts::with_number_of_decks(0);
    memoization_dealer_draws(shoe, dealer_start_total, &mut drawn, &mut odds);

    let mut result = odds[&drawn];
    result.normalize();
    result
}

fn memoization_dealer_draws(
    // Input parameters
    shoe: &CardCounts,
    start_total: u16,

    // Parameters to maintain current state
    drawn: &mut CardCounts,

    // Output parameters
    odds: &mut StateMap<TerminalOdds>,
) {
    if odds.contains_state(drawn) {
        return;
    }

    // Case 1: Dealer must stand.
    let running_total = start_total + drawn.get_sum();
    if (17..=21).contains(&running_total) {
        let mut terminal = TerminalOdds::default();
        terminal.end_with_total(running_total);
        odds[drawn] = terminal;
        return;
    }
    if running_total > 21 {
        // Bust mass is dropped; the final normalisation redistributes it.
        odds[drawn] = TerminalOdds::default();
        return;
    }

    // Case 2: Dealer must hit. An exhausted shoe leaves the subtree empty.
    let remaining_total = (shoe.get_total() - drawn.get_total()) as f64;
    let mut accumulated = TerminalOdds::default();
    for card_value in 1..=10u8 {
        let remaining = shoe[card_value] - drawn[card_value];
        if remaining == 0 {
            continue;
        }
        let p = remaining as f64 / remaining_total;

        drawn.add_card(card_value);
        memoization_dealer_draws(shoe, start_total, drawn, odds);
        accumulated.add_assign_with_p(&odds[drawn], p);
        drawn.remove_card(card_value);
    }
    odds[drawn] = accumulated;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe_from_counts(counts: [u16; 10]) -> CardCounts {
        CardCounts::new(&counts)
    }

    #[test]
    fn prob_draw_is_count_over_total() {
        let shoe = CardCounts::with_number_of_decks(1);
        assert_eq!(prob_draw(&shoe, 10), 16.0 / 52.0);
        assert_eq!(prob_draw(&shoe, 1), 4.0 / 52.0);

        let empty = CardCounts::with_number_of_decks(0);
        assert_eq!(prob_draw(&empty, 5), 0.0);
    }

    #[test]
    fn bust_is_impossible_below_twelve() {
        let shoe = CardCounts::with_number_of_decks(1);
        for total in 0..12 {
            assert_eq!(prob_to_bust(&shoe, total), 0.0);
        }
    }

    #[test]
    fn bust_probability_counts_ranks_above_threshold() {
        // Single deck minus one ten and one six, player on 16: every rank
        // in [6, 10] busts.
        let shoe = shoe_from_counts([4, 4, 4, 4, 4, 3, 4, 4, 4, 15]);
        let p = prob_to_bust(&shoe, 16);
        assert_eq!(p, 30.0 / 50.0);

        // Fresh deck, player on 12: only a ten busts.
        let fresh = CardCounts::with_number_of_decks(1);
        assert_eq!(prob_to_bust(&fresh, 12), 16.0 / 52.0);

        // Already busted hands see certainty.
        assert_eq!(prob_to_bust(&fresh, 22), 1.0);
    }

    #[test]
    fn bust_probability_on_empty_shoe_is_zero() {
        let empty = CardCounts::with_number_of_decks(0);
        assert_eq!(prob_to_bust(&empty, 16), 0.0);
    }

    #[test]
    fn reach_odds_are_single_draw_ratios() {
        let shoe = CardCounts::with_number_of_decks(1);
        let odds = player_reach_odds(&shoe, 12);

        // The current total itself is not reachable.
        assert_eq!(odds.get(12), 0.0);
        for target in 13..=21u16 {
            let needed = (target - 12) as u8;
            assert_eq!(odds.get(target), shoe[needed] as f64 / 52.0);
        }
    }

    #[test]
    fn reach_odds_ignore_targets_more_than_one_card_away() {
        let shoe = CardCounts::with_number_of_decks(1);
        let odds = player_reach_odds(&shoe, 5);
        // Totals above 15 would need a card bigger than a ten.
        for target in 16..=21u16 {
            assert_eq!(odds.get(target), 0.0);
        }
        assert_eq!(odds.get(15), 16.0 / 52.0);
        assert_eq!(odds.get(12), 4.0 / 52.0);
    }

    #[test]
    fn reach_odds_empty_shoe_all_zero() {
        let empty = CardCounts::with_number_of_decks(0);
        let odds = player_reach_odds(&empty, 16);
        for target in 12..=21 {
            assert_eq!(odds.get(target), 0.0);
        }
    }

    #[test]
    fn dealer_lands_where_the_single_card_puts_her() {
        // Only a five left; 16 + 5 = 21.
        let shoe = shoe_from_counts([0, 0, 0, 0, 1, 0, 0, 0, 0, 0]);
        let odds = dealer_terminal_odds(&shoe, 16);
        assert_eq!(odds.get(21), 1.0);
        assert_eq!(odds.sum(), 1.0);
    }

    #[test]
    fn dealer_bust_mass_redistributes_to_survivors() {
        // From 16: the ace stops on 17, the ten busts and is discarded.
        let shoe = shoe_from_counts([1, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        let odds = dealer_terminal_odds(&shoe, 16);
        assert_eq!(odds.get(17), 1.0);
        for total in 18..=21 {
            assert_eq!(odds.get(total), 0.0);
        }
    }

    #[test]
    fn dealer_expansion_follows_multi_draw_branches() {
        // From 13 with {2, 4}: drawing the 2 forces the 4 next (19);
        // drawing the 4 stops at 17. Both branches weigh 1/2.
        let shoe = shoe_from_counts([0, 1, 0, 1, 0, 0, 0, 0, 0, 0]);
        let odds = dealer_terminal_odds(&shoe, 13);
        assert_eq!(odds.get(17), 0.5);
        assert_eq!(odds.get(19), 0.5);
        assert!((odds.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dealer_exhausted_shoe_leaves_zero_mass() {
        // 13 + 2 = 15, nothing left to reach 17 with.
        let shoe = shoe_from_counts([0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
        let odds = dealer_terminal_odds(&shoe, 13);
        assert_eq!(odds.sum(), 0.0);
    }

    #[test]
    fn dealer_from_sixteen_on_a_live_shoe_is_uniform_over_low_ranks() {
        // Single deck minus one ten and one six. From 16 every draw
        // terminates: ranks 1..=5 land on 17..=21, the rest bust. Each
        // surviving rank still has 4 cards, so the conditional
        // distribution is uniform.
        let shoe = shoe_from_counts([4, 4, 4, 4, 4, 3, 4, 4, 4, 15]);
        let odds = dealer_terminal_odds(&shoe, 16);
        for total in 17..=21u16 {
            assert!((odds.get(total) - 0.2).abs() < 1e-9);
        }
        assert!((odds.sum() - 1.0).abs() < 1e-9);
        assert!(odds.get(17) > 0.0);
    }

    #[test]
    fn dealer_distribution_is_normalised_on_deep_expansions() {
        let shoe = CardCounts::with_number_of_decks(1);
        for start in [4u16, 9, 12, 16] {
            let odds = dealer_terminal_odds(&shoe, start);
            assert!((odds.sum() - 1.0).abs() < 1e-9, "start {start}");
            for total in 17..=21u16 {
                let p = odds.get(total);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn dealer_already_standing_keeps_its_bucket() {
        let shoe = CardCounts::with_number_of_decks(1);
        for start in 17..=21u16 {
            let odds = dealer_terminal_odds(&shoe, start);
            assert_eq!(odds.get(start), 1.0);
            assert_eq!(odds.sum(), 1.0);
        }
    }
}
