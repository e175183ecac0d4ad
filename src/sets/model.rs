use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::game_log::{Game, Side};

/// One reported tournament set and the games attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResult {
    pub section_id: i64,
    pub round_id: i64,
    pub player_one_name: String,
    pub player_two_name: String,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: DateTime<FixedOffset>,
    pub winner_name: String,
    pub wins_required: u32,
    /// Unset until one side reaches `wins_required`.
    pub winner_side: Option<Side>,
    /// Most recent game first.
    pub games: Vec<Game>,
}

impl SetResult {
    /// The reported name that is not the winner's. Falls back to the second
    /// name when both reported names equal the winner.
    pub fn loser_name(&self) -> &str {
        if self.player_one_name != self.winner_name {
            &self.player_one_name
        } else {
            &self.player_two_name
        }
    }

    pub fn is_complete(&self) -> bool {
        self.winner_side.is_some()
    }

    pub fn games_in_play_order(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().rev()
    }

    pub fn wins_for(&self, side: Side) -> u32 {
        self.games
            .iter()
            .filter(|game| game.winner == Some(side))
            .count() as u32
    }

    /// `(winner wins, loser wins)` once the set is decided.
    pub fn score(&self) -> Option<(u32, u32)> {
        let winner_side = self.winner_side?;
        Some((self.wins_for(winner_side), self.wins_for(winner_side.opponent())))
    }

    /// From the first game's parameters to the last game's summary.
    pub fn duration(&self) -> Option<chrono::Duration> {
        let first_game = self.games.last()?;
        let last_game = self.games.first()?;
        Some(last_game.finished_at() - first_game.started_at())
    }

    /// Attached games that fall outside the reported set window.
    pub fn games_outside_window(&self) -> usize {
        self.games
            .iter()
            .filter(|game| game.started_at() < self.started_at || game.finished_at() > self.ended_at)
            .count()
    }

    /// Names each attached game's players after the decided set result.
    pub fn annotate_player_names(&mut self) {
        let Some(winner_side) = self.winner_side else {
            return;
        };

        let winner_name = self.winner_name.clone();
        let loser_name = self.loser_name().to_string();
        for game in &mut self.games {
            game.assign_player_name(winner_side, &winner_name);
            game.assign_player_name(winner_side.opponent(), &loser_name);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{game_at, set_result};
    use crate::game_log::Side;

    #[test]
    fn loser_is_the_name_that_did_not_win() {
        assert_eq!(set_result("Mango", "Armada", "Armada", 2).loser_name(), "Mango");
        assert_eq!(set_result("Mango", "Armada", "Mango", 2).loser_name(), "Armada");
    }

    #[test]
    fn loser_falls_back_to_second_name_when_both_match_winner() {
        assert_eq!(set_result("Hbox", "Hbox", "Hbox", 2).loser_name(), "Hbox");
        assert_eq!(set_result("Hbox", "PPMD", "PPMD", 2).loser_name(), "Hbox");
    }

    #[test]
    fn score_and_duration_follow_attached_games() {
        let mut set = set_result("Mango", "Armada", "Armada", 2);
        set.games = vec![game_at(20, [0, 2]), game_at(10, [3, 0]), game_at(0, [0, 1])];
        set.winner_side = Some(Side::PlayerTwo);

        assert_eq!(set.score(), Some((2, 1)));
        assert_eq!(
            set.duration().map(|duration| duration.num_minutes()),
            Some(23)
        );
        assert_eq!(set.games_outside_window(), 0);

        let play_order: Vec<_> = set
            .games_in_play_order()
            .map(|game| game.started_at())
            .collect();
        assert!(play_order.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn annotates_names_only_for_decided_sets() {
        let mut undecided = set_result("Mango", "Armada", "Armada", 2);
        undecided.games = vec![game_at(0, [0, 2])];
        undecided.annotate_player_names();
        assert_eq!(undecided.games[0].parameters.players[0].name, None);

        let mut decided = undecided.clone();
        decided.winner_side = Some(Side::PlayerTwo);
        decided.annotate_player_names();
        assert_eq!(
            decided.games[0].parameters.players[1].name.as_deref(),
            Some("Armada")
        );
        assert_eq!(
            decided.games[0].parameters.players[0].name.as_deref(),
            Some("Mango")
        );
    }

    #[test]
    fn games_outside_reported_window_are_counted() {
        let mut set = set_result("Mango", "Armada", "Armada", 2);
        set.ended_at = set.started_at + chrono::Duration::minutes(30);
        set.games = vec![game_at(40, [0, 2]), game_at(10, [0, 2]), game_at(-5, [0, 1])];

        assert_eq!(set.games_outside_window(), 2);
    }
}
