pub mod composer;
pub mod editing;
pub mod error;
pub mod parsing;
pub mod serialize;
pub mod toolbar;

// Re-export key types for easier usage
pub use composer::{DescriptionEditor, EditorOptions};
pub use editing::*;
pub use error::EditorError;
pub use serialize::{ChangeSerializer, HtmlSerializer, HtmlTheme, to_html};
pub use toolbar::{
    BlockType, DispatchOutcome, ToolbarAction, ToolbarError, ToolbarState, ToolbarStore,
    UserPrompt, classify, dispatch, inspect, youtube_video_id,
};
