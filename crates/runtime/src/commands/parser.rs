//! Turns raw command arguments into a [`CompassCommand`].

use std::str::FromStr;

/// Fixed sub-verbs of the compass command.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Help,
    Reload,
    Current,
    Biome,
    Village,
    Anything,
}

/// A parsed compass command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompassCommand {
    Help,
    Reload,
    Current,
    /// `biome <name>`; the name may be missing.
    Biome(Option<String>),
    Village,
    Anything,
    /// Anything that is not a verb names a structure.
    Structure(String),
}

impl CompassCommand {
    /// Parses the arguments after the command label. `None` when empty.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Option<Self> {
        let first = args.first()?.as_ref();

        let command = match Verb::from_str(first) {
            Ok(Verb::Help) => Self::Help,
            Ok(Verb::Reload) => Self::Reload,
            Ok(Verb::Current) => Self::Current,
            Ok(Verb::Biome) => Self::Biome(args.get(1).map(|name| name.as_ref().to_owned())),
            Ok(Verb::Village) => Self::Village,
            Ok(Verb::Anything) => Self::Anything,
            Err(_) => Self::Structure(first.to_owned()),
        };

        Some(command)
    }
}
