#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("unknown user")]
    UnknownUser,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("{0} already exists")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Mismatch between the exercise catalog and the normalization table.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no profiles defined")]
    NoProfiles,
    #[error("duplicate category \"{0}\"")]
    DuplicateCategory(String),
    #[error("duplicate exercise \"{exercise}\" in category \"{category}\"")]
    DuplicateExercise { category: String, exercise: String },
    #[error("no reference maximum for \"{exercise}\" in \"{category}\" of profile \"{profile}\"")]
    MissingMaximum {
        profile: String,
        category: String,
        exercise: String,
    },
    #[error("invalid reference maximum for \"{exercise}\" of profile \"{profile}\" ({value})")]
    InvalidMaximum {
        profile: String,
        exercise: String,
        value: f32,
    },
    #[error("invalid weight for \"{exercise}\" ({value})")]
    InvalidWeight { exercise: String, value: f32 },
    #[error("\"{exercise}\" is not part of category \"{category}\"")]
    UnknownExercise { category: String, exercise: String },
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
    #[error("invalid configuration: {0}")]
    Format(String),
}

/// Request that does not match the loaded scoring configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
    #[error("unknown profile \"{0}\"")]
    UnknownProfile(String),
}
