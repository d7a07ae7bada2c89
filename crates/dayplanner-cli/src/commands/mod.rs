pub mod config;
pub mod plan;
pub mod task;

use dayplanner_core::{Config, Database, DayPlanner, PlannerContext};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the planner for `user`, falling back to the configured user.
pub fn open_planner(
    user: Option<String>,
) -> Result<(DayPlanner<Database>, PlannerContext), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let user = user.unwrap_or_else(|| config.user.clone());
    let db = Database::open()?;
    Ok((DayPlanner::from_config(db, &config), PlannerContext::current(user)))
}
