pub mod serde_defaults;
