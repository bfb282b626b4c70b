pub mod liked_storage;

pub use liked_storage::{FileStorage, LikedStorage, MemoryStorage};
