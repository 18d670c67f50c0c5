#![forbid(unsafe_code)]

pub mod error;
pub mod exec;
pub mod settings;
pub mod stats;

pub mod decompile {
    pub mod chain;
    pub mod dispatch;
    pub mod engine;
    pub mod stage;
}

pub mod bundle {
    pub mod writer;
}

pub mod devmode {
    pub mod watcher;
}

// Re-exports: stable API surface
pub use bundle::writer::{BundleOptions, bundle};
pub use decompile::dispatch::decompile_dir;
pub use decompile::stage::{decompile_archive, decompile_archives};
pub use settings::Settings;
