use schema::EncounterType;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the mystery encounter engine.
///
/// Ineligibility is deliberately absent: a requirement or option that does
/// not pass is reported as a plain `bool` or [`crate::option::Ineligibility`].
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Errors raised while loading or validating [`crate::config::EncounterSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid setting `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Authoring mistakes in encounter, option, requirement or enemy definitions.
/// These abort loading of the offending definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("encounter {0} defines no options")]
    NoOptions(EncounterType),
    #[error("encounter {encounter} defines {count} options, at most 4 are supported")]
    TooManyOptions { encounter: EncounterType, count: usize },
    #[error("wave modulus requirement uses a modulus of zero")]
    ZeroModulus,
    #[error("boss segment modifier {modifier} drives {segments} segments below zero")]
    NegativeBossSegments { segments: u32, modifier: i32 },
    #[error("enemy pokemon config requests level 0")]
    ZeroLevel,
    #[error("trainer party configures {0} pokemon, at most 6 are allowed")]
    TrainerPartyTooLarge(usize),
}

/// Misuse of the option selection flow by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("option index {index} is out of range ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("option {0} does not meet its requirements")]
    OptionNotSelectable(usize),
    #[error("option {0} has no option phase and cannot be acted on")]
    OptionNotActionable(usize),
    #[error("no option has been selected for this encounter")]
    NoOptionSelected,
}

/// Result type alias for engine operations.
pub type EncounterResult<T> = Result<T, EncounterError>;

/// Result type alias for definition building.
pub type DefinitionResult<T> = Result<T, DefinitionError>;
