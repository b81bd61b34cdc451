pub mod change;
pub mod html;

pub use change::ChangeSerializer;
pub use html::{HtmlSerializer, HtmlTheme, to_html};
