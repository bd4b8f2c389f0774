pub mod digest;
pub mod email;
pub mod report;
pub mod terminal;

pub use digest::{escape_html, render_digest, swedish_date, write_preview, Digest};
pub use email::{build_message, send_digest, subject_line};
pub use report::search_report;
pub use terminal::{print_terminal, render_terminal};
