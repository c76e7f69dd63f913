pub mod builtin_font;
pub mod card_parser;
pub mod card_renderer;
pub mod font_provider;
pub mod transcript_writer;

pub use card_parser::{CardParser, CARD_CONTAINER_SELECTOR};
pub use card_renderer::{CanvasSpec, CardRenderer, LineLayout};
pub use font_provider::{CardFont, FontProvider, TextMetrics};
pub use transcript_writer::TranscriptWriter;
