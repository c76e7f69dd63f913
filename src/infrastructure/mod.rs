pub mod page_session;

pub use page_session::{PageFetcher, PageSession};
