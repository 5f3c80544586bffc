/// Bullet skeleton restored by [`CallNotes::clear`].
pub(crate) const NOTES_TEMPLATE: &str = "• Company: \n• Contact: \n• Title: \n• Phone: \n• Email: \n• Contract expiration: \n• Current provider: \n• Pain points: \n• Interest level: \n• Next steps: \n• Follow-up date: ";

/// Free-text notes the salesperson keeps during a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CallNotes {
    text: String,
}

impl CallNotes {
    pub(crate) fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Adds `line` on its own line.
    pub(crate) fn append(&mut self, line: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    /// Replaces the notes with the empty bullet skeleton.
    pub(crate) fn clear(&mut self) {
        self.text = NOTES_TEMPLATE.to_string();
    }

    /// Empties the notes entirely, as a session reset does.
    pub(crate) fn wipe(&mut self) {
        self.text.clear();
    }
}
