/*!
 * Console commands: parsing a line into a [`Command`] and running it
 */

use diesel::SqliteConnection;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::models::{GameId, PlayerId, VictoryId};

pub mod record;
pub mod report;

pub type StringResult = Result<String>;

/// Name and usage line of every command, in help order.
const USAGES: &[(&str, &str)] = &[
    ("AddPlayer", "AddPlayer <Player ID> \"<Player Name>\""),
    ("AddGame", "AddGame <Game ID> \"<Game Name>\""),
    ("AddVictory", "AddVictory <Game ID> <Victory ID> \"<Victory Name>\" <Victory Points>"),
    ("Plays", "Plays <Player ID> <Game ID> \"<Player IGN>\""),
    ("AddFriends", "AddFriends <Player ID1> <Player ID2>"),
    ("WinVictory", "WinVictory <Player ID> <Game ID> <Victory ID>"),
    ("FriendsWhoPlay", "FriendsWhoPlay <Player ID> <Game ID>"),
    ("ComparePlayers", "ComparePlayers <Player ID1> <Player ID2> <Game ID>"),
    ("SummarizePlayer", "SummarizePlayer <Player ID>"),
    ("SummarizeGame", "SummarizeGame <Game ID>"),
    ("SummarizeVictory", "SummarizeVictory <Game ID> <Victory ID>"),
    ("VictoryRanking", "VictoryRanking"),
    ("Help", "Help"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlayer { player_id: PlayerId, name: String },
    AddGame { game_id: GameId, name: String },
    AddVictory { game_id: GameId, victory_id: VictoryId, name: String, points: i32 },
    Plays { player_id: PlayerId, game_id: GameId, ign: String },
    AddFriends { player1_id: PlayerId, player2_id: PlayerId },
    WinVictory { player_id: PlayerId, game_id: GameId, victory_id: VictoryId },
    FriendsWhoPlay { player_id: PlayerId, game_id: GameId },
    ComparePlayers { player1_id: PlayerId, player2_id: PlayerId, game_id: GameId },
    SummarizePlayer { player_id: PlayerId },
    SummarizeGame { game_id: GameId },
    SummarizeVictory { game_id: GameId, victory_id: VictoryId },
    VictoryRanking,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let mut words = line.trim_start().splitn(2, char::is_whitespace);
        let name = words.next().unwrap_or_default();
        let rest = words.next().unwrap_or_default();

        let &(name, usage) = USAGES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownCommand(name.to_owned()))?;
        let mut args = Args::new(rest, usage)?;

        let cmd = match name {
            "AddPlayer" => Command::AddPlayer { player_id: args.id()?, name: args.name()? },
            "AddGame" => Command::AddGame { game_id: args.id()?, name: args.name()? },
            "AddVictory" => Command::AddVictory {
                game_id: args.id()?,
                victory_id: args.id()?,
                name: args.name()?,
                points: args.int()?,
            },
            "Plays" => Command::Plays { player_id: args.id()?, game_id: args.id()?, ign: args.name()? },
            "AddFriends" => Command::AddFriends { player1_id: args.id()?, player2_id: args.id()? },
            "WinVictory" => Command::WinVictory {
                player_id: args.id()?,
                game_id: args.id()?,
                victory_id: args.id()?,
            },
            "FriendsWhoPlay" => Command::FriendsWhoPlay { player_id: args.id()?, game_id: args.id()? },
            "ComparePlayers" => Command::ComparePlayers {
                player1_id: args.id()?,
                player2_id: args.id()?,
                game_id: args.id()?,
            },
            "SummarizePlayer" => Command::SummarizePlayer { player_id: args.id()? },
            "SummarizeGame" => Command::SummarizeGame { game_id: args.id()? },
            "SummarizeVictory" => Command::SummarizeVictory { game_id: args.id()?, victory_id: args.id()? },
            "VictoryRanking" => Command::VictoryRanking,
            _ => Command::Help,
        };
        args.finish()?;

        Ok(cmd)
    }

    #[instrument(skip(conn))]
    pub fn run(self, conn: &mut SqliteConnection) -> StringResult {
        debug!("Running command");
        match self {
            Command::AddPlayer { player_id, name } => record::add_player(conn, player_id, name),
            Command::AddGame { game_id, name } => record::add_game(conn, game_id, name),
            Command::AddVictory { game_id, victory_id, name, points } => {
                record::add_victory(conn, game_id, victory_id, name, points)
            }
            Command::Plays { player_id, game_id, ign } => record::plays(conn, player_id, game_id, ign),
            Command::AddFriends { player1_id, player2_id } => {
                record::add_friends(conn, player1_id, player2_id)
            }
            Command::WinVictory { player_id, game_id, victory_id } => {
                record::win_victory(conn, player_id, game_id, victory_id)
            }
            Command::FriendsWhoPlay { player_id, game_id } => {
                report::friends_who_play(conn, player_id, game_id)
            }
            Command::ComparePlayers { player1_id, player2_id, game_id } => {
                report::compare_players(conn, player1_id, player2_id, game_id)
            }
            Command::SummarizePlayer { player_id } => report::summarize_player(conn, player_id),
            Command::SummarizeGame { game_id } => report::summarize_game(conn, game_id),
            Command::SummarizeVictory { game_id, victory_id } => {
                report::summarize_victory(conn, game_id, victory_id)
            }
            Command::VictoryRanking => report::victory_ranking(conn),
            Command::Help => Ok(help()),
        }
    }
}

pub fn help() -> String {
    format!("Commands:\n{}", USAGES.iter().map(|(_, usage)| format!("  {}", usage)).join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
}

/// Splits on whitespace, keeping `"double quoted"` runs together. `None` on an
/// unterminated quote.
fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = vec![];
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut quoted = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => quoted.push(c),
                    None => return None,
                }
            }
            tokens.push(Token::Quoted(quoted));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Some(tokens)
}

struct Args {
    tokens: std::vec::IntoIter<Token>,
    usage: &'static str,
}

impl Args {
    fn new(input: &str, usage: &'static str) -> Result<Self> {
        let tokens = tokenize(input).ok_or(Error::Usage(usage))?;
        Ok(Self { tokens: tokens.into_iter(), usage })
    }

    fn word(&mut self) -> Result<String> {
        match self.tokens.next() {
            Some(Token::Word(w)) => Ok(w),
            _ => Err(Error::Usage(self.usage)),
        }
    }

    /// Unsigned integer, no sign allowed
    fn id(&mut self) -> Result<i32> {
        let word = self.word()?;
        if !word.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Usage(self.usage));
        }
        word.parse().map_err(|_| Error::Usage(self.usage))
    }

    /// Integer with an optional sign
    fn int(&mut self) -> Result<i32> {
        self.word()?.parse().map_err(|_| Error::Usage(self.usage))
    }

    fn name(&mut self) -> Result<String> {
        match self.tokens.next() {
            Some(Token::Quoted(s)) => Ok(s),
            _ => Err(Error::Usage(self.usage)),
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(_) => Err(Error::Usage(self.usage)),
        }
    }
}
