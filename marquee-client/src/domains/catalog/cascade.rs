//! Two-stage dependent fetches.
//!
//! The second stage is built from a reference to the first stage's output,
//! so it cannot start before the first stage has succeeded.

use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome<R, C, E> {
    /// Stage one failed; stage two never ran.
    ReferenceFailed(E),
    /// Stage one succeeded, stage two failed.
    CatalogFailed { reference: R, error: E },
    Completed { reference: R, catalog: C },
}

impl<R, C, E> CascadeOutcome<R, C, E> {
    pub fn reference(&self) -> Option<&R> {
        match self {
            CascadeOutcome::ReferenceFailed(_) => None,
            CascadeOutcome::CatalogFailed { reference, .. }
            | CascadeOutcome::Completed { reference, .. } => Some(reference),
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            CascadeOutcome::ReferenceFailed(error)
            | CascadeOutcome::CatalogFailed { error, .. } => Some(error),
            CascadeOutcome::Completed { .. } => None,
        }
    }
}

/// Awaits `reference`, then the future `catalog` builds from its output.
pub async fn run_cascade<R, C, E, Ref, Cat, CatFut>(
    reference: Ref,
    catalog: Cat,
) -> CascadeOutcome<R, C, E>
where
    Ref: Future<Output = Result<R, E>>,
    Cat: FnOnce(&R) -> CatFut,
    CatFut: Future<Output = Result<C, E>>,
{
    let reference = match reference.await {
        Ok(reference) => reference,
        Err(error) => return CascadeOutcome::ReferenceFailed(error),
    };

    match catalog(&reference).await {
        Ok(catalog) => CascadeOutcome::Completed { reference, catalog },
        Err(error) => CascadeOutcome::CatalogFailed { reference, error },
    }
}
