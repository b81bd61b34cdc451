//! Turns toolbar actions into editor commands.

use log::{debug, warn};
use thiserror::Error;

use crate::EditorError;
use crate::editing::{
    Alignment, BlockTarget, Cmd, Editor, Embed, LinkAttrs, LinkRel, StyleProperty, TextFormat,
};
use crate::toolbar::embed::youtube_video_id;
use crate::toolbar::inspector::classify;
use crate::toolbar::state::BlockType;

pub const LINK_PROMPT: &str = "Enter the URL:";
pub const EMBED_PROMPT: &str = "Enter YouTube video URL:";

/// Something the user clicked or picked in the toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    ToggleFormat(TextFormat),
    SetBlockType(BlockType),
    ToggleLink { no_follow: bool },
    InsertEmbed,
    SetFontFamily(String),
    SetFontSize(String),
    SetAlignment(Alignment),
    Undo,
    Redo,
}

/// Blocking text prompt and alert provided by the host UI
pub trait UserPrompt {
    /// Ask for a line of text; `None` when the user cancels
    fn prompt(&mut self, message: &str) -> Option<String>;

    fn alert(&mut self, message: &str);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolbarError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidEmbedUrl(String),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Commands were committed as editor version `version`
    Applied { version: u64 },
    /// The user backed out; nothing happened
    Cancelled,
    Rejected(ToolbarError),
}

/// Map `action` to commands and run them against `editor`
pub fn dispatch(
    editor: &mut Editor,
    action: ToolbarAction,
    prompt: &mut dyn UserPrompt,
) -> DispatchOutcome {
    let commands = match plan(editor, action, prompt) {
        Ok(Some(commands)) => commands,
        Ok(None) => return DispatchOutcome::Cancelled,
        Err(err) => {
            warn!("toolbar action rejected: {err}");
            if matches!(err, ToolbarError::InvalidEmbedUrl(_)) {
                prompt.alert(&err.to_string());
            }
            return DispatchOutcome::Rejected(err);
        }
    };

    let result = match commands.as_slice() {
        [single] => editor.dispatch(single.clone()),
        many => editor.dispatch_all(many),
    };
    match result {
        Ok(patch) => DispatchOutcome::Applied {
            version: patch.version,
        },
        Err(err) => DispatchOutcome::Rejected(err.into()),
    }
}

/// Commands for `action`, or `None` when the user cancelled a prompt
fn plan(
    editor: &Editor,
    action: ToolbarAction,
    prompt: &mut dyn UserPrompt,
) -> Result<Option<Vec<Cmd>>, ToolbarError> {
    let commands = match action {
        ToolbarAction::ToggleFormat(format) => vec![Cmd::ToggleFormat(format)],
        ToolbarAction::SetBlockType(target) => block_type_commands(editor, target),
        ToolbarAction::ToggleLink { no_follow } => {
            if editor.read(|state| classify(state).is_link) {
                vec![Cmd::RemoveLink]
            } else {
                let Some(url) = ask(prompt, LINK_PROMPT) else {
                    debug!("link prompt cancelled");
                    return Ok(None);
                };
                let rel = if no_follow {
                    LinkRel::NoFollow
                } else {
                    LinkRel::Default
                };
                vec![Cmd::ApplyLink(LinkAttrs::new_tab(url, rel))]
            }
        }
        ToolbarAction::InsertEmbed => {
            let Some(url) = prompt.prompt(EMBED_PROMPT) else {
                debug!("embed prompt cancelled");
                return Ok(None);
            };
            let id = youtube_video_id(&url).ok_or(ToolbarError::InvalidEmbedUrl(url))?;
            vec![Cmd::InsertEmbed(Embed::youtube(id))]
        }
        ToolbarAction::SetFontFamily(value) => vec![Cmd::SetStyle {
            property: StyleProperty::FontFamily,
            value,
        }],
        ToolbarAction::SetFontSize(value) => vec![Cmd::SetStyle {
            property: StyleProperty::FontSize,
            value,
        }],
        ToolbarAction::SetAlignment(align) => vec![Cmd::SetAlignment(align)],
        ToolbarAction::Undo => vec![Cmd::Undo],
        ToolbarAction::Redo => vec![Cmd::Redo],
    };
    Ok(Some(commands))
}

/// Leaving a list always happens before any other block change, so a
/// block never ends up both a list item and a heading or quote.
fn block_type_commands(editor: &Editor, target: BlockType) -> Vec<Cmd> {
    let current = editor.read(|state| classify(state).block_type);
    match target {
        BlockType::List(kind) if current == target => {
            debug!("selection already in {kind:?} list, toggling it off");
            vec![Cmd::RemoveList]
        }
        BlockType::List(kind) => vec![Cmd::InsertList(kind)],
        BlockType::Paragraph => vec![Cmd::RemoveList, Cmd::SetBlock(BlockTarget::Paragraph)],
        BlockType::Heading(level) => {
            vec![Cmd::RemoveList, Cmd::SetBlock(BlockTarget::Heading(level))]
        }
        BlockType::Quote => vec![Cmd::RemoveList, Cmd::SetBlock(BlockTarget::Quote)],
    }
}

/// Prompt and treat blank input like a cancel
fn ask(prompt: &mut dyn UserPrompt, message: &str) -> Option<String> {
    prompt
        .prompt(message)
        .map(|answer| answer.trim().to_string())
        .filter(|answer| !answer.is_empty())
}
