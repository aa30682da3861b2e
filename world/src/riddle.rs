/// Answer typed by the player while driving the highway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RiddleInput {
    buffer: String,
}

impl RiddleInput {
    pub(crate) fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Appends `character` when it is alphanumeric.
    pub(crate) fn push(&mut self, character: char) {
        if character.is_alphanumeric() {
            self.buffer.push(character);
        }
    }

    pub(crate) fn backspace(&mut self) {
        let _ = self.buffer.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Compares the buffer with `expected` ignoring case, then clears it.
    pub(crate) fn submit(&mut self, expected: &str) -> bool {
        let correct = self.buffer.to_lowercase() == expected.to_lowercase();
        self.buffer.clear();
        correct
    }
}
