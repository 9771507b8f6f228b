//! Proverb board: connect a wallet, read short proverbs from a contract,
//! and post new ones.

pub mod blockchain;
pub mod config;
pub mod ledger;
pub mod observability;
pub mod session;
pub mod ui;

pub use config::AppConfig;
pub use session::SessionController;
