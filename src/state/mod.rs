/// State management module
///
/// This module handles all application state, including:
/// - Facility records and their display helpers (data.rs)
/// - The immutable facility dataset and statistics (store.rs)
/// - Filter, search text and user location (interaction.rs)

pub mod data;
pub mod interaction;
pub mod store;
