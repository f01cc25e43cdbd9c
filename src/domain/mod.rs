pub mod debounce;
pub mod entry;
pub mod state;
