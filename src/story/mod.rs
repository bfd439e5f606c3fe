//! Story materialization: splitting generated text and persisting the parts.

pub mod ids;
pub mod splitter;
pub mod store;

pub use ids::StorageKey;
pub use splitter::{STORY_PART_COUNT, StoryParts, split_story};
pub use store::{StorageError, StorageResult, StoryStore, part_file_name};
