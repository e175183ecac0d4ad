use serde::Serialize;

use super::model::Game;
use crate::settings::PipelineSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    CpuPlayer,
    LowApm,
    EarlyForfeit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub cpu_games: u64,
    pub low_apm_games: u64,
    pub early_forfeit_games: u64,
    pub passed_games: u64,
}

impl FilterStats {
    fn record(&mut self, rejection: Option<RejectionReason>) {
        match rejection {
            Some(RejectionReason::CpuPlayer) => self.cpu_games += 1,
            Some(RejectionReason::LowApm) => self.low_apm_games += 1,
            Some(RejectionReason::EarlyForfeit) => self.early_forfeit_games += 1,
            None => self.passed_games += 1,
        }
    }

    pub fn rejected_games(&self) -> u64 {
        self.cpu_games + self.low_apm_games + self.early_forfeit_games
    }
}

#[derive(Debug, Clone)]
pub struct FilteredGames {
    pub games: Vec<Game>,
    pub stats: FilterStats,
}

/// Rejects games that were not genuine competitive matches.
#[derive(Debug, Clone, Copy)]
pub struct MatchFilter {
    cpu_player_type: u8,
    minimum_apm: f32,
}

impl MatchFilter {
    pub fn new(cpu_player_type: u8, minimum_apm: f32) -> Self {
        Self {
            cpu_player_type,
            minimum_apm,
        }
    }

    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new(settings.cpu_player_type, settings.minimum_apm)
    }

    /// First matching reason, checked in order: CPU player, low APM, early forfeit.
    pub fn rejection_reason(&self, game: &Game) -> Option<RejectionReason> {
        if game
            .parameters
            .players
            .iter()
            .any(|player| player.player_type == self.cpu_player_type)
        {
            return Some(RejectionReason::CpuPlayer);
        }

        if game
            .summary
            .players
            .iter()
            .any(|player| player.apm < self.minimum_apm)
        {
            return Some(RejectionReason::LowApm);
        }

        let anyone_near_elimination = game
            .summary
            .players
            .iter()
            .any(|player| player.stocks_remaining <= 1);
        if !anyone_near_elimination && !game.summary.has_decisive_result() {
            return Some(RejectionReason::EarlyForfeit);
        }

        None
    }

    pub fn apply(&self, games: Vec<Game>) -> FilteredGames {
        let mut stats = FilterStats::default();
        let mut kept_games = Vec::with_capacity(games.len());

        for game in games {
            let rejection = self.rejection_reason(&game);
            stats.record(rejection);

            match rejection {
                Some(reason) => {
                    tracing::debug!(
                        ?reason,
                        finished_at = %game.finished_at(),
                        "Dropping non-competitive game"
                    );
                }
                None => kept_games.push(game),
            }
        }

        tracing::info!(
            passed_games = stats.passed_games,
            cpu_games = stats.cpu_games,
            low_apm_games = stats.low_apm_games,
            early_forfeit_games = stats.early_forfeit_games,
            "Filtered non-competitive games"
        );

        FilteredGames {
            games: kept_games,
            stats,
        }
    }
}
