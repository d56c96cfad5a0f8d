use clap::Args;
use clockroom_core::{ClockMode, Database, FullscreenIntent, Navigator};

use super::terminal::PrintNavigator;

#[derive(Args)]
pub struct NavigateArgs {
    /// Destination page
    to: ClockMode,
    /// The current page is in fullscreen; the next one should be too
    #[arg(long)]
    fullscreen: bool,
}

pub fn run(args: NavigateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    if args.fullscreen {
        let mut navigation = db.navigation();
        FullscreenIntent::post(&mut navigation);
    }
    PrintNavigator.navigate(args.to.path());
    Ok(())
}
