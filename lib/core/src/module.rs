use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, records, attendance, ...) implements this
/// trait to register its API endpoints. The server binary collects all
/// modules and nests their routes into a single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes. Routers carry their own path prefixes
    /// ("/auth/...", "/users/...") and are mounted under the server's
    /// `/api` prefix.
    fn routes(&self) -> Router;
}
