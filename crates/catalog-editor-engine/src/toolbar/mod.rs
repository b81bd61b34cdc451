//! Toolbar side of the editor: selection classification, action dispatch and
//! the store that keeps the toolbar state current.

pub mod dispatcher;
pub mod embed;
pub mod inspector;
pub mod options;
pub mod state;
pub mod store;

pub use dispatcher::{DispatchOutcome, ToolbarAction, ToolbarError, UserPrompt, dispatch};
pub use embed::youtube_video_id;
pub use inspector::{classify, inspect};
pub use state::{BlockType, ToolbarState};
pub use store::ToolbarStore;
