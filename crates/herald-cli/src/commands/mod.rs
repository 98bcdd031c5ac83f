//! CLI command implementations.

pub mod check;
pub mod deliver;

use herald_core::{Annotated, Reporter};

/// Surface an annotated error through the reporter and turn it into the
/// command's failure.
pub(crate) fn fail<E: Annotated>(reporter: &dyn Reporter, error: E) -> anyhow::Error {
    reporter.error(&error.annotation(), error.file());
    anyhow::anyhow!(error.failure())
}
