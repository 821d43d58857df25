use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A tunable channel, named by its (major, minor) pair as parsed from a
/// `/auto/vMAJOR.MINOR` command path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId {
    pub major: u32,
    pub minor: u32,
}

impl ChannelId {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One lineup entry: what to tell the tuner, what to tell the player, and
/// where to send the browser. Static configuration, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub channel: ChannelId,
    /// Tuner effector command, relative to the configured effector directory.
    pub tuner_command: String,
    /// Player effector command, with optional arguments.
    pub player_command: String,
    pub player_args: Vec<String>,
    /// URL path the client is redirected to after a successful tune.
    pub stream_path: String,
}

impl ChannelEntry {
    /// Entry with the appliance's conventional naming for a channel:
    /// `tune/<major>-<minor>`, the shared player, `/stream/<major>.<minor>`.
    pub fn derived(channel: ChannelId) -> Self {
        Self {
            channel,
            tuner_command: format!("tune/{}-{}", channel.major, channel.minor),
            player_command: default_player(),
            player_args: Vec::new(),
            stream_path: format!("/stream/{}", channel),
        }
    }
}

fn default_player() -> String {
    "deps/vlc/vlc".to_string()
}

#[derive(Debug, Error)]
pub enum ChannelTableError {
    #[error("duplicate channel {0} in lineup")]
    DuplicateChannel(ChannelId),
    #[error("failed to read lineup file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lineup file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize lineup: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result of matching a request path against the command namespace.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandMatch<'a> {
    /// A well-formed `vMAJOR.MINOR` command with a lineup entry.
    Entry(&'a ChannelEntry),
    /// Either not a channel command at all, or a well-formed identifier
    /// naming an unassigned slot.
    NoMatch,
    /// `v`-shaped command whose MAJOR or MINOR is not a decimal integer.
    Malformed,
}

/// The channel lineup: one entry per `ChannelId`, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    entries: BTreeMap<ChannelId, ChannelEntry>,
}

impl ChannelTable {
    pub fn from_entries(
        entries: impl IntoIterator<Item = ChannelEntry>,
    ) -> Result<Self, ChannelTableError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let id = entry.channel;
            if map.insert(id, entry).is_some() {
                return Err(ChannelTableError::DuplicateChannel(id));
            }
        }
        Ok(Self { entries: map })
    }

    /// Load the lineup from a TOML file. A missing file is seeded with the
    /// default lineup, same as `Config::load` seeds `config.toml`.
    pub fn load(path: &Path) -> Result<Self, ChannelTableError> {
        if !path.exists() {
            tracing::info!("no lineup at {:?}, seeding default", path);
            let table = Self::default_lineup();
            table.save(path)?;
            return Ok(table);
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), ChannelTableError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = TomlChannelFile {
            channel: self.entries.values().map(TomlChannel::from).collect(),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn parse_toml(content: &str) -> Result<Self, ChannelTableError> {
        let file: TomlChannelFile = toml::from_str(content)?;
        Self::from_entries(file.channel.into_iter().map(ChannelEntry::from))
    }

    /// The out-of-the-box lineup: majors 2 through 6, minors 1 through 5,
    /// with conventionally derived commands and stream paths.
    pub fn default_lineup() -> Self {
        let entries = (2..=6).flat_map(|major| {
            (1..=5).map(move |minor| ChannelEntry::derived(ChannelId::new(major, minor)))
        });
        Self::from_entries(entries).expect("derived lineup has no duplicates")
    }

    pub fn get(&self, id: ChannelId) -> Option<&ChannelEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a request path against the command namespace. Matching is exact
    /// on the canonical `/auto/vMAJOR.MINOR` form, never substring search.
    pub fn match_command(&self, path: &str) -> CommandMatch<'_> {
        let Some(command) = path.strip_prefix("/auto/v") else {
            return CommandMatch::NoMatch;
        };
        let Some(id) = parse_channel_id(command) else {
            return CommandMatch::Malformed;
        };
        match self.entries.get(&id) {
            Some(entry) => CommandMatch::Entry(entry),
            None => CommandMatch::NoMatch,
        }
    }
}

/// Parse `MAJOR.MINOR` into a `ChannelId`. Exactly one dot, both sides
/// non-empty decimal integers.
fn parse_channel_id(s: &str) -> Option<ChannelId> {
    let (major, minor) = s.split_once('.')?;
    Some(ChannelId::new(major.parse().ok()?, minor.parse().ok()?))
}

// ── TOML lineup schema ────────────────────────────────────────────────────────

/// Matches the `[[channel]]` tables of `channels.toml`. Kept separate from
/// `ChannelEntry` so the file schema can stay sparse: omitted commands and
/// stream paths fall back to the conventional derived forms.
#[derive(Debug, Serialize, Deserialize)]
struct TomlChannelFile {
    channel: Vec<TomlChannel>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlChannel {
    major: u32,
    minor: u32,
    #[serde(default)]
    tuner: Option<String>,
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    player_args: Vec<String>,
    #[serde(default)]
    stream: Option<String>,
}

impl From<TomlChannel> for ChannelEntry {
    fn from(c: TomlChannel) -> Self {
        let id = ChannelId::new(c.major, c.minor);
        let derived = ChannelEntry::derived(id);
        Self {
            channel: id,
            tuner_command: c.tuner.unwrap_or(derived.tuner_command),
            player_command: c.player.unwrap_or(derived.player_command),
            player_args: c.player_args,
            stream_path: c.stream.unwrap_or(derived.stream_path),
        }
    }
}

impl From<&ChannelEntry> for TomlChannel {
    fn from(e: &ChannelEntry) -> Self {
        Self {
            major: e.channel.major,
            minor: e.channel.minor,
            tuner: Some(e.tuner_command.clone()),
            player: Some(e.player_command.clone()),
            player_args: e.player_args.clone(),
            stream: Some(e.stream_path.clone()),
        }
    }
}
