//! Heuristic action selection on top of the probability engine.

use crate::calculation::{ReachOdds, TerminalOdds};
use crate::Action;

/// Above this bust risk the player stops drawing...
const STAND_PLAYER_BUST_RISK: f64 = 0.51;
/// ...unless the dealer is herself likely enough to bust.
const STAND_DEALER_BUST_CEILING: f64 = 0.69;
/// Dealer bust likelihood above which a reach comparison can still call
/// for one more card.
const HIT_DEALER_BUST_FLOOR: f64 = 0.70;
/// Minimum one-draw survival probability for doubling down.
const DOUBLE_SURVIVAL_FLOOR: f64 = 0.75;

/// Picks the recommended action from the current totals and distributions.
/// Rules are evaluated in order; the first match wins.
pub fn best_choice(
    player_total: u16,
    _dealer_total: u16,
    p_player_bust: f64,
    p_dealer_bust: f64,
    player_reach: &ReachOdds,
    dealer_terminal: &TerminalOdds,
) -> Action {
    if player_total == 21 {
        return Action::Stand;
    }

    if p_player_bust > STAND_PLAYER_BUST_RISK && p_dealer_bust < STAND_DEALER_BUST_CEILING {
        return Action::Stand;
    }

    if p_dealer_bust > HIT_DEALER_BUST_FLOOR && should_hit(player_reach, dealer_terminal) {
        return Action::Hit;
    }

    let survival = 1.0 - p_player_bust;
    if survival > DOUBLE_SURVIVAL_FLOOR && (9..=11).contains(&player_total) {
        return Action::DoubleDown;
    }

    Action::Hit
}

/// One more card is worth it while the dealer is more likely to finish on
/// some total in [17, 21] than the player is to reach it.
fn should_hit(player_reach: &ReachOdds, dealer_terminal: &TerminalOdds) -> bool {
    (17..=21).any(|total| player_reach.get(total) < dealer_terminal.get(total))
}
