pub mod hand;
pub mod shoe;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::advisor;
use crate::calculation::{self, ReachOdds, TerminalOdds};
use crate::{Action, Rule, TableError};

use self::{hand::Hand, shoe::Shoe};

/// One assistant table: the authoritative shoe, the two tracked hands, the
/// turn flags and the derived outputs. This is the only mutator; the
/// probability engine only ever sees shoe snapshots.
pub struct Session {
    rule: Rule,
    shoe: Shoe,
    player_hand: Hand,
    dealer_hand: Hand,
    player_active: bool,
    dealer_active: bool,

    // Derived outputs, recomputed after every applied draw.
    p_player_bust: f64,
    p_dealer_bust: f64,
    player_reach: ReachOdds,
    dealer_terminal: TerminalOdds,
    recommendation: Action,
}

/// Snapshot of everything the front-end renders. Probabilities are raw
/// values in [0, 1]; formatting is the caller's concern.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub player_total: u16,
    pub dealer_total: u16,
    pub player_busted: bool,
    pub shoe_remaining: u16,
    pub per_rank_remaining: BTreeMap<u8, u16>,
    pub p_player_bust: f64,
    pub p_dealer_bust: f64,
    pub player_reach: BTreeMap<u16, f64>,
    pub dealer_terminal: BTreeMap<u16, f64>,
    pub recommendation: Action,
}

impl Session {
    pub fn new(rule: &Rule) -> Session {
        let mut session = Session {
            rule: *rule,
            shoe: Shoe::new(rule.number_of_decks),
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            player_active: false,
            dealer_active: false,
            p_player_bust: 0.0,
            p_dealer_bust: 0.0,
            player_reach: ReachOdds::default(),
            dealer_terminal: TerminalOdds::default(),
            recommendation: Action::default(),
        };
        session.refresh_recommendation();
        session
    }

    /// Clears both hands and resets the shoe to the canonical composition
    /// for the given number of decks (coerced to at least one).
    pub fn configure_shoe(&mut self, number_of_decks: u8) {
        self.shoe.configure(number_of_decks);
        self.clear_round_state();
        tracing::debug!(
            decks = self.shoe.number_of_decks(),
            shoe_remaining = self.shoe.total(),
            "shoe configured"
        );
    }

    /// The reset button: back to a single deck with empty hands.
    pub fn reset_all(&mut self) {
        self.configure_shoe(1);
    }

    pub fn set_player_active(&mut self, active: bool) {
        self.player_active = active;
        if active && self.rule.exclusive_turns {
            self.dealer_active = false;
        }
    }

    pub fn set_dealer_active(&mut self, active: bool) {
        self.dealer_active = active;
        if active && self.rule.exclusive_turns {
            self.player_active = false;
        }
    }

    pub fn is_player_active(&self) -> bool {
        self.player_active
    }

    pub fn is_dealer_active(&self) -> bool {
        self.dealer_active
    }

    /// The single consolidated draw event. The shoe decrement happens even
    /// with both turn flags off (a dealt or burned card); each hand takes
    /// the card only while its flag is set and its stopping bound (21 for
    /// the player, 17 for the dealer) has not been reached.
    pub fn draw_card(&mut self, card_value: u8) -> Result<(), TableError> {
        if !(1..=10).contains(&card_value) {
            tracing::trace!(rank = card_value, "draw ignored, rank out of range");
            return Ok(());
        }
        if !self.shoe.decrement(card_value)? {
            tracing::trace!(rank = card_value, "draw ignored, rank exhausted");
            return Ok(());
        }

        let shoe = self.shoe.snapshot();
        let mut to_player = false;
        let mut to_dealer = false;

        if self.player_active && self.player_hand.total() < 21 && shoe.get_total() > 0 {
            self.player_hand.append(card_value);
            let player_total = self.player_hand.total();
            self.p_player_bust = calculation::prob_to_bust(&shoe, player_total);
            self.player_reach = calculation::player_reach_odds(&shoe, player_total);
            to_player = true;
        }

        if self.dealer_active && self.dealer_hand.total() < 17 && shoe.get_total() > 0 {
            self.dealer_hand.append(card_value);
            let dealer_total = self.dealer_hand.total();
            self.p_dealer_bust = calculation::prob_to_bust(&shoe, dealer_total);
            self.dealer_terminal = calculation::dealer_terminal_odds(&shoe, dealer_total);
            to_dealer = true;
        }

        self.refresh_recommendation();
        tracing::debug!(
            rank = card_value,
            to_player,
            to_dealer,
            player_total = self.player_hand.total(),
            dealer_total = self.dealer_hand.total(),
            shoe_remaining = self.shoe.total(),
            "card drawn"
        );
        Ok(())
    }

    /// Clears both hands and the outputs derived from them. The shoe keeps
    /// its current composition.
    pub fn reset_hands(&mut self) {
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.zero_outputs();
        self.refresh_recommendation();
    }

    pub fn player_total(&self) -> u16 {
        self.player_hand.total()
    }

    pub fn dealer_total(&self) -> u16 {
        self.dealer_hand.total()
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn recommendation(&self) -> Action {
        self.recommendation
    }

    /// The query record for the front-end.
    pub fn view(&self) -> TableView {
        let per_rank_remaining = (1..=10u8)
            .map(|value| (value, self.shoe.count_of(value)))
            .collect();

        TableView {
            player_total: self.player_hand.total(),
            dealer_total: self.dealer_hand.total(),
            player_busted: self.player_hand.is_busted(),
            shoe_remaining: self.shoe.total(),
            per_rank_remaining,
            p_player_bust: self.p_player_bust,
            p_dealer_bust: self.p_dealer_bust,
            player_reach: self.player_reach.to_map(),
            dealer_terminal: self.dealer_terminal.to_map(),
            recommendation: self.recommendation,
        }
    }

    fn clear_round_state(&mut self) {
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.zero_outputs();
        self.refresh_recommendation();
    }

    fn zero_outputs(&mut self) {
        self.p_player_bust = 0.0;
        self.p_dealer_bust = 0.0;
        self.player_reach = ReachOdds::default();
        self.dealer_terminal = TerminalOdds::default();
    }

    fn refresh_recommendation(&mut self) {
        self.recommendation = advisor::best_choice(
            self.player_hand.total(),
            self.dealer_hand.total(),
            self.p_player_bust,
            self.p_dealer_bust,
            &self.player_reach,
            &self.dealer_terminal,
        );
    }
}
