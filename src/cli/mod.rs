pub mod commands;
pub mod ui;
pub mod util;

pub use ui::Output;
pub use util::{DisplayFormat, OutputFormat, build_controller, load_record, load_submission, write_output};
