use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHARACTER_SCHEMA_VERSION: u8 = 1;
pub const NPC_SCHEMA_VERSION: u8 = 1;
pub const ROOM_SCHEMA_VERSION: u8 = 1;

pub const DEFAULT_HP: i32 = 8;
pub const DEFAULT_MP: i32 = 8;
pub const DEFAULT_ECHO_RATE_SECS: u64 = 42;
pub const DEFAULT_ECHO_CHANCE: f64 = 0.3;

/// The eight compass directions an exit key can name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
    Northeast,
    Southeast,
    Southwest,
    Northwest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Northeast,
        Direction::Southeast,
        Direction::Southwest,
        Direction::Northwest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::Northeast => "northeast",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
            Direction::Northwest => "northwest",
        }
    }

    /// Exact match on the exit key. "up", "portal" and friends are not compass
    /// directions.
    pub fn from_exit_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == key)
    }
}

/// Link from a character to the account puppeting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountLink {
    pub username: String,
    /// Account preference: render for screen readers (no ASCII art).
    #[serde(default)]
    pub screenreader: bool,
}

impl AccountLink {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            screenreader: false,
        }
    }

    pub fn uses_screenreader(&self) -> bool {
        self.screenreader
    }
}

/// Playable character stat bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterRecord {
    pub id: String,
    pub key: String,
    pub location: Option<String>,
    #[serde(default)]
    pub account: Option<AccountLink>,

    pub hp: i32,
    pub hp_max: i32,
    pub mp: i32,
    pub mp_max: i32,
    pub level: u32,
    pub xp: u32,
    pub copper: u32,

    #[serde(default)]
    pub posse: Option<String>,
    #[serde(default)]
    pub posse_permission: bool,
    #[serde(default)]
    pub invites: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl CharacterRecord {
    pub fn new(id: &str, key: &str) -> Self {
        Self {
            id: id.to_string(),
            key: key.to_string(),
            location: None,
            account: None,
            hp: DEFAULT_HP,
            hp_max: DEFAULT_HP,
            mp: DEFAULT_MP,
            mp_max: DEFAULT_MP,
            level: 1,
            xp: 0,
            copper: 0,
            posse: None,
            posse_permission: false,
            invites: Vec::new(),
            created_at: Utc::now(),
            schema_version: CHARACTER_SCHEMA_VERSION,
        }
    }

    pub fn with_account(mut self, account: AccountLink) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_location(mut self, room_id: &str) -> Self {
        self.location = Some(room_id.to_string());
        self
    }

    /// True when an account is puppeting this character.
    pub fn is_player(&self) -> bool {
        self.account.is_some()
    }
}

fn default_friendly() -> bool {
    true
}

pub fn default_friendly_lines() -> Vec<String> {
    vec![
        "Greetings, stranger.".to_string(),
        "Greetings, friend.".to_string(),
        "How d'ya do?".to_string(),
    ]
}

pub fn default_aggressive_lines() -> Vec<String> {
    vec![
        "You better get lost, friend.".to_string(),
        "You better get lost, stranger.".to_string(),
    ]
}

/// Non-player character: a character with canned arrival dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NpcRecord {
    pub character: CharacterRecord,
    #[serde(default = "default_friendly")]
    pub friendly: bool,
    #[serde(default = "default_friendly_lines")]
    pub friendly_lines: Vec<String>,
    #[serde(default = "default_aggressive_lines")]
    pub aggressive_lines: Vec<String>,
    pub schema_version: u8,
}

impl NpcRecord {
    pub fn new(id: &str, key: &str) -> Self {
        Self {
            character: CharacterRecord::new(id, key),
            friendly: true,
            friendly_lines: default_friendly_lines(),
            aggressive_lines: default_aggressive_lines(),
            schema_version: NPC_SCHEMA_VERSION,
        }
    }

    pub fn id(&self) -> &str {
        &self.character.id
    }

    pub fn key(&self) -> &str {
        &self.character.key
    }

    pub fn location(&self) -> Option<&str> {
        self.character.location.as_deref()
    }

    pub fn with_location(mut self, room_id: &str) -> Self {
        self.character.location = Some(room_id.to_string());
        self
    }

    pub fn hostile(mut self) -> Self {
        self.friendly = false;
        self
    }

    pub fn with_friendly_lines(mut self, lines: Vec<String>) -> Self {
        self.friendly_lines = lines;
        self
    }

    pub fn with_aggressive_lines(mut self, lines: Vec<String>) -> Self {
        self.aggressive_lines = lines;
        self
    }
}

/// A directional link from one room to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExitRecord {
    /// Exit name as typed by players ("north", "portal", ...).
    pub key: String,
    /// Destination room id.
    pub destination: String,
}

/// Periodic echo settings that turn a room into an echoing room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EchoConfig {
    #[serde(default)]
    pub echoes: Vec<String>,
    /// Seconds between ticks.
    #[serde(default = "default_echo_rate")]
    pub echo_rate: u64,
    /// Probability in `[0, 1]` that a tick produces an echo.
    #[serde(default = "default_echo_chance")]
    pub echo_chance: f64,
}

fn default_echo_rate() -> u64 {
    DEFAULT_ECHO_RATE_SECS
}

fn default_echo_chance() -> f64 {
    DEFAULT_ECHO_CHANCE
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            echoes: Vec::new(),
            echo_rate: DEFAULT_ECHO_RATE_SECS,
            echo_chance: DEFAULT_ECHO_CHANCE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomRecord {
    pub id: String,
    pub key: String,
    pub desc: String,
    #[serde(default)]
    pub exits: Vec<ExitRecord>,
    /// Present for echoing rooms.
    #[serde(default)]
    pub echo: Option<EchoConfig>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl RoomRecord {
    pub fn new(id: &str, key: &str, desc: &str) -> Self {
        Self {
            id: id.to_string(),
            key: key.to_string(),
            desc: desc.to_string(),
            exits: Vec::new(),
            echo: None,
            created_at: Utc::now(),
            schema_version: ROOM_SCHEMA_VERSION,
        }
    }

    pub fn with_exit(mut self, key: &str, destination: &str) -> Self {
        self.exits.push(ExitRecord {
            key: key.to_string(),
            destination: destination.to_string(),
        });
        self
    }

    pub fn with_echo(mut self, echo: EchoConfig) -> Self {
        self.echo = Some(echo);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_echoing(&self) -> bool {
        self.echo.is_some()
    }
}
