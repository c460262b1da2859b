pub mod config;
pub mod db;
pub mod drill;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod server;
pub mod session;
pub mod stats;
pub mod terminal;

// Re-exports for convenience
pub use config::{Config, ConfigArgs, StorageBackend};
pub use db::{LevelStore, Stores, WordStore, edit_level, open_stores};
pub use drill::{ArabicDrill, DrillFeedback};
pub use error::{SessionError, StoreError};
pub use models::{CustomLevel, LevelType, NewLevel, Word, WordPatch};
pub use quiz::QuizDirection;
pub use session::{QuizMode, QuizSession, SessionController, SessionState};
pub use stats::VocabularyStats;
