use super::model::SetResult;
use crate::error::OrderViolation;
use crate::game_log::{winner_by_stocks, Game, Side};

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub sets: Vec<SetResult>,
    /// Games older than every claimed game, left over once all sets were filled.
    pub unclaimed_games: usize,
}

/// Verifies the ordering the reconciler relies on: games ascending by finish
/// time and sets ascending by start time.
pub fn check_reconcile_order(games: &[Game], sets: &[SetResult]) -> Result<(), OrderViolation> {
    if let Some(index) = games
        .windows(2)
        .position(|pair| pair[1].finished_at() < pair[0].finished_at())
    {
        return Err(OrderViolation::GamesOutOfOrder { index: index + 1 });
    }

    if let Some(index) = sets
        .windows(2)
        .position(|pair| pair[1].started_at < pair[0].started_at)
    {
        return Err(OrderViolation::SetsOutOfOrder { index: index + 1 });
    }

    Ok(())
}

/// Attributes games to sets, walking both from the most recent end.
///
/// Callers must supply `games` in ascending time order and `sets` in the same
/// relative order; see [`check_reconcile_order`]. Set boundaries are inferred
/// only from win counts, so one stray game shifts every earlier set.
pub fn reconcile_sets(mut games: Vec<Game>, mut sets: Vec<SetResult>) -> Reconciliation {
    for set in sets.iter_mut().rev() {
        fill_set(set, &mut games);
        set.annotate_player_names();

        if !set.is_complete() {
            tracing::warn!(
                section_id = set.section_id,
                round_id = set.round_id,
                attached_games = set.games.len(),
                wins_required = set.wins_required,
                "Ran out of games before set reached its required wins"
            );
        }

        let games_outside_window = set.games_outside_window();
        if games_outside_window > 0 {
            tracing::warn!(
                section_id = set.section_id,
                round_id = set.round_id,
                games_outside_window,
                "Attributed games fall outside the reported set window"
            );
        }
    }

    if !games.is_empty() {
        tracing::info!(
            unclaimed_games = games.len(),
            "Dropping games not claimed by any set"
        );
    }

    Reconciliation {
        sets,
        unclaimed_games: games.len(),
    }
}

fn fill_set(set: &mut SetResult, game_stack: &mut Vec<Game>) {
    let mut player_one_wins = 0;
    let mut player_two_wins = 0;

    while let Some(mut game) = game_stack.pop() {
        game.winner = winner_by_stocks(&game.summary);
        match game.winner {
            Some(Side::PlayerOne) => player_one_wins += 1,
            Some(Side::PlayerTwo) => player_two_wins += 1,
            None => {}
        }
        set.games.push(game);

        if player_one_wins >= set.wins_required {
            set.winner_side = Some(Side::PlayerOne);
            break;
        }
        if player_two_wins >= set.wins_required {
            set.winner_side = Some(Side::PlayerTwo);
            break;
        }
    }
}
