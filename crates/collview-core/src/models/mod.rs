pub mod collection;
pub mod plugin;
pub mod theme;
