//! Watchlist management: favorite instruments, search, and custom display
//! names.

pub mod watchlist_model;
pub mod watchlist_service;
pub mod watchlist_traits;


pub use watchlist_model::{FavoriteQuote, Instrument};
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::WatchlistStore;
