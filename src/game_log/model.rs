use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

const FRAMES_PER_SECOND: f64 = 60.0;

/// Win condition reported when a game ended without a decisive result.
pub const NO_DECISIVE_WIN_CONDITION: u8 = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockRecord {
    pub time_seconds: f32,
    pub percent: f32,
    pub move_last_hit_by: u8,
    pub last_animation: u16,
    pub openings_allowed: u16,
    pub is_stock_lost: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerSummary {
    pub stocks_remaining: u8,
    pub apm: f32,
    pub average_distance_from_center: f32,
    pub percent_time_closest_center: f32,
    pub percent_time_above_others: f32,
    pub percent_time_in_shield: f32,
    pub seconds_without_damage: f32,
    pub roll_count: u16,
    pub spot_dodge_count: u16,
    pub air_dodge_count: u16,
    pub recovery_attempts: u16,
    pub successful_recoveries: u16,
    pub edgeguard_chances: u16,
    pub edgeguard_conversions: u16,
    /// Times this player started a combo string.
    pub number_of_openings: u16,
    pub average_damage_per_string: f32,
    pub average_time_per_string: f32,
    pub average_hits_per_string: f32,
    pub most_damage_string: f32,
    /// Longest combo string, in frames.
    pub most_time_string: u32,
    pub most_hits_string: u16,
    pub stocks: Vec<StockRecord>,
}

impl PlayerSummary {
    /// Stock entries that were actually lost, skipping placeholder entries.
    pub fn lost_stocks(&self) -> impl Iterator<Item = &StockRecord> {
        self.stocks.iter().filter(|stock| stock.is_stock_lost)
    }

    pub fn lost_stock_count(&self) -> usize {
        self.lost_stocks().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchSummary {
    #[serde(skip_deserializing)]
    pub timestamp: DateTime<FixedOffset>,
    pub frames: u32,
    pub frames_missed: u32,
    pub win_condition: u8,
    pub players: Vec<PlayerSummary>,
}

impl MatchSummary {
    pub fn stocks_remaining(&self, player_index: usize) -> u8 {
        self.players
            .get(player_index)
            .map(|player| player.stocks_remaining)
            .unwrap_or(0)
    }

    pub fn has_decisive_result(&self) -> bool {
        self.win_condition != NO_DECISIVE_WIN_CONDITION
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerParameters {
    pub port: u8,
    pub character: u8,
    pub color: u8,
    #[serde(rename = "type")]
    pub player_type: u8,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchParameters {
    #[serde(skip_deserializing)]
    pub timestamp: DateTime<FixedOffset>,
    pub stage: u16,
    pub players: Vec<PlayerParameters>,
}

/// Port-order side of a two player game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    PlayerOne,
    PlayerTwo,
}

impl Side {
    pub fn player_index(self) -> usize {
        match self {
            Side::PlayerOne => 0,
            Side::PlayerTwo => 1,
        }
    }

    /// 1 or 2, the numbering used by set results.
    pub fn number(self) -> u8 {
        self.player_index() as u8 + 1
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::PlayerOne => Side::PlayerTwo,
            Side::PlayerTwo => Side::PlayerOne,
        }
    }
}

/// Side with more stocks left at the end of the game. Equal stock counts
/// leave the winner undetermined.
pub fn winner_by_stocks(summary: &MatchSummary) -> Option<Side> {
    let player_one_stocks = summary.stocks_remaining(0);
    let player_two_stocks = summary.stocks_remaining(1);

    if player_one_stocks > player_two_stocks {
        Some(Side::PlayerOne)
    } else if player_two_stocks > player_one_stocks {
        Some(Side::PlayerTwo)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub parameters: MatchParameters,
    pub summary: MatchSummary,
    pub winner: Option<Side>,
}

impl Game {
    pub fn new(parameters: MatchParameters, summary: MatchSummary) -> Self {
        let winner = winner_by_stocks(&summary);
        Self {
            parameters,
            summary,
            winner,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.summary.frames) / FRAMES_PER_SECOND
    }

    pub fn started_at(&self) -> DateTime<FixedOffset> {
        self.parameters.timestamp
    }

    pub fn finished_at(&self) -> DateTime<FixedOffset> {
        self.summary.timestamp
    }

    /// Lost stocks match `starting_stocks - stocks_remaining` for every player.
    /// Games without a decisive result are exempt.
    pub fn has_consistent_stock_counts(&self, starting_stocks: u8) -> bool {
        if !self.summary.has_decisive_result() {
            return true;
        }

        self.summary.players.iter().all(|player| {
            player.lost_stock_count()
                == usize::from(starting_stocks.saturating_sub(player.stocks_remaining))
        })
    }

    pub(crate) fn assign_player_name(&mut self, side: Side, name: &str) {
        if let Some(player) = self.parameters.players.get_mut(side.player_index()) {
            player.name = Some(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{winner_by_stocks, Game, MatchSummary, PlayerSummary, Side, StockRecord};

    fn lost_stock(percent: f32) -> StockRecord {
        StockRecord {
            time_seconds: 42.5,
            percent,
            move_last_hit_by: 14,
            last_animation: 3,
            openings_allowed: 4,
            is_stock_lost: true,
        }
    }

    fn player(stocks_remaining: u8, lost: usize) -> PlayerSummary {
        PlayerSummary {
            stocks_remaining,
            apm: 250.0,
            stocks: (0..lost).map(|index| lost_stock(80.0 + index as f32)).collect(),
            ..PlayerSummary::default()
        }
    }

    fn summary(win_condition: u8, players: Vec<PlayerSummary>) -> MatchSummary {
        MatchSummary {
            frames: 10_800,
            win_condition,
            players,
            ..MatchSummary::default()
        }
    }

    #[test]
    fn player_summary_survives_json_roundtrip() {
        let mut original = player(1, 3);
        original.average_distance_from_center = 31.25;
        original.percent_time_in_shield = 4.5;
        original.roll_count = 12;
        original.edgeguard_chances = 6;
        original.edgeguard_conversions = 2;
        original.most_time_string = 187;
        original.stocks.push(StockRecord {
            is_stock_lost: false,
            ..StockRecord::default()
        });

        let serialized = serde_json::to_string(&original).expect("Expected summary to serialize");
        assert!(serialized.contains("\"stocksRemaining\":1"));
        assert!(serialized.contains("\"isStockLost\":false"));

        let reparsed: PlayerSummary =
            serde_json::from_str(&serialized).expect("Expected summary to deserialize");
        assert_eq!(reparsed, original);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let parsed: PlayerSummary = serde_json::from_str(r#"{"apm": 120.5, "unknownField": 9}"#)
            .expect("Expected permissive deserialization");

        assert_eq!(parsed.apm, 120.5);
        assert_eq!(parsed.stocks_remaining, 0);
        assert!(parsed.stocks.is_empty());
    }

    #[test]
    fn placeholder_stocks_are_not_counted_as_lost() {
        let mut summary = player(2, 2);
        summary.stocks.push(StockRecord::default());

        assert_eq!(summary.stocks.len(), 3);
        assert_eq!(summary.lost_stock_count(), 2);
    }

    #[test]
    fn winner_follows_remaining_stocks() {
        assert_eq!(
            winner_by_stocks(&summary(2, vec![player(2, 2), player(0, 4)])),
            Some(Side::PlayerOne)
        );
        assert_eq!(
            winner_by_stocks(&summary(2, vec![player(0, 4), player(1, 3)])),
            Some(Side::PlayerTwo)
        );
        assert_eq!(
            winner_by_stocks(&summary(0, vec![player(3, 1), player(3, 1)])),
            None,
            "Equal stocks should leave the winner undetermined"
        );
    }

    #[test]
    fn stock_counts_match_starting_stocks_for_decisive_games() {
        let game = Game::new(
            Default::default(),
            summary(2, vec![player(2, 2), player(0, 4)]),
        );
        assert!(game.has_consistent_stock_counts(4));

        let inconsistent = Game::new(
            Default::default(),
            summary(2, vec![player(2, 1), player(0, 4)]),
        );
        assert!(!inconsistent.has_consistent_stock_counts(4));

        let forfeited = Game::new(
            Default::default(),
            summary(0, vec![player(3, 0), player(4, 0)]),
        );
        assert!(forfeited.has_consistent_stock_counts(4));
    }

    #[test]
    fn duration_is_derived_from_frames_at_sixty_fps() {
        let game = Game::new(Default::default(), summary(2, vec![player(1, 3), player(0, 4)]));
        assert_eq!(game.duration_seconds(), 180.0);
    }

    #[test]
    fn side_numbering_matches_port_order() {
        assert_eq!(Side::PlayerOne.number(), 1);
        assert_eq!(Side::PlayerTwo.number(), 2);
        assert_eq!(Side::PlayerOne.opponent(), Side::PlayerTwo);
    }
}
