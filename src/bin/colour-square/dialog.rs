use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Blocks until the user dismisses the message.
pub fn show_error(title: &str, message: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
