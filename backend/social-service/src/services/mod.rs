pub mod engagement;
pub mod follow;

use crate::error::{ServiceError, ServiceResult};

/// Translate an exhausted conflict retry into the terminal
/// [`ServiceError::Conflict`], keeping the attempt budget visible to
/// the caller.
fn surface_conflict<T>(result: ServiceResult<T>, attempts: u32) -> ServiceResult<T> {
    match result {
        Err(err) if err.is_transient_conflict() => Err(ServiceError::Conflict { attempts }),
        other => other,
    }
}
