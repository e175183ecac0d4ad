use serde::Serialize;

use super::model::{Game, Side};

/// Per-player figures derived from one game's stock records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
    pub kill_count: u32,
    pub average_kill_percent: Option<f32>,
    pub death_count: u32,
    pub average_death_percent: Option<f32>,
    pub damage_done: f32,
    pub damage_taken: f32,
}

impl Game {
    /// Kill/death accounting for one side. Placeholder stocks still add to
    /// damage dealt and taken.
    pub fn player_stats(&self, side: Side) -> PlayerGameStats {
        let mut stats = PlayerGameStats::default();
        let own_summary = self.summary.players.get(side.player_index());
        let opponent_summary = self.summary.players.get(side.opponent().player_index());

        let mut kill_percent_sum = 0.0;
        for stock in opponent_summary.iter().flat_map(|player| player.stocks.iter()) {
            if stock.is_stock_lost {
                stats.kill_count += 1;
                kill_percent_sum += stock.percent;
            }
            stats.damage_done += stock.percent;
        }

        let mut death_percent_sum = 0.0;
        for stock in own_summary.iter().flat_map(|player| player.stocks.iter()) {
            if stock.is_stock_lost {
                stats.death_count += 1;
                death_percent_sum += stock.percent;
            }
            stats.damage_taken += stock.percent;
        }

        stats.average_kill_percent = average(kill_percent_sum, stats.kill_count);
        stats.average_death_percent = average(death_percent_sum, stats.death_count);
        stats
    }
}

fn average(sum: f32, count: u32) -> Option<f32> {
    (count > 0).then(|| sum / count as f32)
}
