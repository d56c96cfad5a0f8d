use clap::Subcommand;
use clockroom_core::{Database, FullscreenIntent};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Show pending navigation handoff
    Status,
    /// End the browsing session, dropping handoff data
    End,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        SessionAction::Status => {
            let pending = FullscreenIntent::peek(&db.navigation());
            println!("fullscreen intent: {}", if pending { "pending" } else { "none" });
        }
        SessionAction::End => {
            let removed = db.clear_navigation()?;
            println!("session ended ({removed} entries cleared)");
        }
    }
    Ok(())
}
