use crate::cli::config::MenuConfig;

/// Labels that mark a widget as a menu entry (matched as lowercase substrings).
pub const MENU_VOCABULARY: &[&str] = &[
    "continue", "new game", "load game", "start game",
    "preferences", "options", "settings",
    "create a club", "fantasy draft",
    "online", "multiplayer",
    "editor", "extras", "credits",
    "exit", "quit",
    "career", "versus", "training",
    "challenges", "play", "manage",
    "fm touch", "fm classic",
    "steam workshop", "community",
    "tutorials", "help", "about",
    "back", "cancel", "ok", "confirm",
    "save", "save game", "save & exit",
];

/// Case-insensitive substring vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(MENU_VOCABULARY.iter().copied())
    }
}

impl Vocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn from_config(config: &MenuConfig) -> Self {
        let mut vocabulary = match &config.vocabulary {
            Some(terms) => Self::new(terms),
            None => Self::default(),
        };
        vocabulary.extend(&config.extra_vocabulary);
        vocabulary
    }

    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in Self::new(terms).terms {
            if !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.terms.iter().any(|t| lower.contains(t.as_str()))
    }
}
