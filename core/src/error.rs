use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("At least 3 ordinary tile kinds are required")]
    TooFewTileKinds,
    #[error("Too many ordinary tile kinds")]
    TooManyTileKinds,
    #[error("Match threshold must be at least 3")]
    InvalidMatchCount,
    #[error("Board must be at least as wide as the match threshold")]
    InvalidBoardSize,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board contains empty cells")]
    IncompleteBoard,
    #[error("At least one cascade iteration must be allowed")]
    InvalidCascadeCap,
}

pub type Result<T> = core::result::Result<T, GameError>;
