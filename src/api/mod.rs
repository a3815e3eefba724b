pub mod routes;
mod server;
pub use server::{app, serve};
pub mod public;
mod state;
pub use state::AppState;
mod utils;
pub use utils::{USER_ADMIN_HEADER, USER_ID_HEADER};
