use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// Errors surfaced while assembling or bootstrapping the content runtime.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
