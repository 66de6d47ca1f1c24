#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// `Player1`, `Player2`, ...
    Capitalized,
    /// `player1`, `player2`, ...
    #[default]
    Lowercase,
}

impl NameStyle {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Capitalized => "Player",
            Self::Lowercase => "player",
        }
    }

    /// The display name for the 1-based client `index`.
    #[must_use]
    pub fn name(self, index: usize) -> String {
        format!("{}{index}", self.prefix())
    }

    pub fn names(self, count: usize) -> impl Iterator<Item = String> {
        (1..=count).map(move |index| self.name(index))
    }
}
