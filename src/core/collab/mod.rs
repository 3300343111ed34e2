// ─── Collaborator Interfaces ───
// Seams to the systems the installation pipeline depends on but does not
// own: authentication, the mod catalog, and the game process itself.

mod catalog;
mod identity;
mod runner;

pub use catalog::{CatalogError, CatalogStore, ModEntry};
pub use identity::{
    authenticate_with_timeout, AuthError, AuthTokens, IdentityProvider, PlayerProfile,
    AUTH_WAIT_TIMEOUT,
};
pub use runner::{CommandRunner, ProcessEvent, ProcessRunner, RunnerError};
