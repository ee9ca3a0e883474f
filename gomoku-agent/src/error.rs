use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("failed to load options: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl From<figment::Error> for TrainError {
    fn from(err: figment::Error) -> Self {
        TrainError::Config(Box::new(err))
    }
}
