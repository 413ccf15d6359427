use bjadvisor::{Session, TableError};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub table: ConfigTable,
    /// The event sequence the demo binary replays against a fresh session.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTable {
    pub number_of_decks: u8,
    #[serde(default)]
    pub exclusive_turns: bool,
}

impl From<ConfigTable> for bjadvisor::Rule {
    fn from(table: ConfigTable) -> bjadvisor::Rule {
        bjadvisor::Rule {
            number_of_decks: table.number_of_decks,
            exclusive_turns: table.exclusive_turns,
        }
    }
}

/// One scripted table event, in the order the front-end would have sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Configure { decks: u8 },
    PlayerTurn { active: bool },
    DealerTurn { active: bool },
    Draw { rank: u8 },
    ResetHands,
}

/// Replays every step of the script against the given session.
pub fn replay_script(session: &mut Session, script: &[ScriptStep]) -> Result<(), TableError> {
    for step in script {
        match step {
            ScriptStep::Configure { decks } => session.configure_shoe(*decks),
            ScriptStep::PlayerTurn { active } => session.set_player_active(*active),
            ScriptStep::DealerTurn { active } => session.set_dealer_active(*active),
            ScriptStep::Draw { rank } => session.draw_card(*rank)?,
            ScriptStep::ResetHands => session.reset_hands(),
        }
    }
    Ok(())
}

/// Reads the content of a given config file and parses it to a Config.
///
/// Panics if any error occurs.
pub fn parse_config_from_file(filename: &str) -> Config {
    let file_content = fs::read_to_string(filename).unwrap();
    serde_yaml::from_str(&file_content).unwrap()
}
