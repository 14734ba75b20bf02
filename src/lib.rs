// Export modules for use in tests
pub mod builder;
pub mod chapter;
pub mod highlight;
pub mod overlay;
pub mod panic_handler;
pub mod position;
pub mod reader;
pub mod selection;
pub mod store;
pub mod theme;

pub use builder::{BuildKey, BuiltChapter, build_chapter, highlight_signature};
pub use chapter::{Book, Chapter, Verse};
pub use highlight::{Highlight, HighlightColor};
pub use position::{LogicalPosition, Span, VerseRange};
pub use store::HighlightStore;
