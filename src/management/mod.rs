mod auth;
mod favorites;
mod search;
mod session;

pub use auth::AuthContext;
pub use auth::AuthState;
pub use favorites::FavoritesManager;
pub use search::SearchSession;
pub use search::SearchView;
pub use session::SessionManager;
