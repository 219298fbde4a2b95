use clap::Parser;
use std::path::PathBuf;

use crate::model::OutputOptions;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Game directory (or its data/ folder) with the exported JSON files
    pub input: PathBuf,
    /// Output transcript file
    #[arg(short, long, default_value = "comprehensive_story.txt")]
    pub output: PathBuf,
    /// Drop events whose map name or event name contains the marker
    #[arg(long)]
    pub filter_flashbacks: bool,
    /// Marker substring used by --filter-flashbacks (case-insensitive)
    #[arg(long, default_value = "回想")]
    pub flashback_marker: String,
    /// Omit trigger descriptions
    #[arg(long)]
    pub no_triggers: bool,
    /// Omit variable-change lines
    #[arg(long)]
    pub no_variable_changes: bool,
    /// Omit scene-transfer lines
    #[arg(long)]
    pub no_transfers: bool,
    /// Omit the outcome-branch annotation on choices
    #[arg(long)]
    pub no_choice_outcomes: bool,
    /// Omit the trigger-kind label (condition clauses still print)
    #[arg(long)]
    pub no_player_condition: bool,
    /// Omit the tile position on touch triggers
    #[arg(long)]
    pub no_touch_details: bool,
}

impl Cli {
    /// Everything prints by default; the `--no-*` flags switch parts off.
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            triggers: !self.no_triggers,
            variable_changes: !self.no_variable_changes,
            transfers: !self.no_transfers,
            choice_outcomes: !self.no_choice_outcomes,
            player_condition: !self.no_player_condition,
            touch_details: !self.no_touch_details,
        }
    }
}
