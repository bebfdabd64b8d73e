//! Bracket business logic: seeding, construction, advancement, records, roster, simulation.

mod advancement;
mod builder;
mod records;
mod roster;
mod seeding;
mod simulation;
mod standings;

pub use advancement::{record_result, AdvancementEvent};
pub use builder::create_bracket;
pub use records::{log_result, set_game_mode, set_mvp_svp, set_score};
pub use roster::{
    add_player, add_player_with_stats, add_team, move_player, recompute_team_totals,
    remove_player, remove_team, update_player_stats,
};
pub use seeding::{byes, first_round, next_power_of_two, slot_order, FirstRoundSlot};
pub use simulation::{create_demo_roster, demo_team_names, play_out, random_stats, simulate_winner};
pub use standings::{bracket_status, bracket_view, lives, BracketStatus, BracketView, TeamStanding};
