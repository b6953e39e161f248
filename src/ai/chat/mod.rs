mod core;
pub mod marker;
pub mod models;
pub mod render;

pub use self::core::{Relay, RelayBuilder};
pub use marker::{Extraction, extract_lead};
pub use models::{Lead, Transcript};
pub use render::{escape_html, render_html};
