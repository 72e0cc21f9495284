//! Native message boxes.

use rfd::{MessageButtons, MessageDialog, MessageLevel};

fn message(level: MessageLevel, title: &str, text: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(text)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn error(text: &str) {
    message(MessageLevel::Error, "Error", text);
}

pub fn warning(text: &str) {
    message(MessageLevel::Warning, "Warning", text);
}

pub fn info(title: &str, text: &str) {
    message(MessageLevel::Info, title, text);
}
