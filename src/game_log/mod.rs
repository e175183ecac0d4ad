mod assembler;
mod classifier;
mod filter;
pub mod model;
mod stats;

pub use assembler::{assemble_games, Assembly, AssemblyStats, GameAssembler};
pub use classifier::{
    parse_log_timestamp, LengthThresholdClassifier, LogRecord, PayloadClassifier, PayloadKind,
    RecordClassifier,
};
pub use filter::{FilterStats, FilteredGames, MatchFilter, RejectionReason};
pub use model::{
    winner_by_stocks, Game, MatchParameters, MatchSummary, PlayerParameters, PlayerSummary, Side,
    StockRecord,
};
pub use stats::PlayerGameStats;
