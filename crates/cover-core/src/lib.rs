pub mod color;
pub mod controls;
pub mod id;
pub mod model;
pub mod presets;
pub mod store;

pub use color::{Color, Hsl};
pub use controls::ControlValues;
pub use id::LayerId;
pub use model::*;
pub use store::{
    MemoryStorage, STORAGE_KEY, Storage, StorageError, StorageResult, load, load_from, save, save_to,
};
