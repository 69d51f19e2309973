//! Board revision detection and classification.
//!
//! The alphax-4chan went through revisions D to F with the legacy
//! on-board MCU layout; revision G moved to the Hellen mega-module, which
//! reshuffled a handful of outputs. Every revision-dependent pin decision in
//! this crate goes through [`RevisionBand`].

use std::fmt;

use hellen_shared::hardware_traits::RevisionSource;

const FIRST_KNOWN_REVISION: char = 'D';
const FIRST_MEGA_MODULE_REVISION: char = 'G';

/// Revisions sharing one pin layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RevisionBand {
    /// Revisions D, E and F.
    Legacy,
    /// Revision G and newer. Also used for anything unrecognised.
    #[default]
    MegaModule,
}

impl RevisionBand {
    pub fn is_f_or_older(&self) -> bool {
        matches!(self, RevisionBand::Legacy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RevisionBand::Legacy => "legacy (rev D/E/F)",
            RevisionBand::MegaModule => "mega-module (rev G+)",
        }
    }
}

impl fmt::Display for RevisionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Detected hardware revision. Read once before board init and never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoardRevision {
    letter: Option<char>,
}

impl BoardRevision {
    pub fn from_letter(letter: char) -> Self {
        let letter = letter.to_ascii_uppercase();
        if letter.is_ascii_uppercase() && letter >= FIRST_KNOWN_REVISION {
            Self { letter: Some(letter) }
        } else {
            Self { letter: None }
        }
    }

    /// Parses a revision code such as `"D"`, `"g"` or `"rev F"`.
    ///
    /// Anything that is not a single known revision letter yields an unknown
    /// revision, which classifies into the default band.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        let code = code
            .strip_prefix("rev")
            .or_else(|| code.strip_prefix("REV"))
            .or_else(|| code.strip_prefix("Rev"))
            .map(str::trim_start)
            .unwrap_or(code);

        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::from_letter(letter),
            _ => Self { letter: None },
        }
    }

    pub fn unknown() -> Self {
        Self { letter: None }
    }

    pub fn detect(source: &impl RevisionSource) -> Self {
        match source.revision_code() {
            Some(code) => {
                let revision = Self::from_code(&code);
                if !revision.is_known() {
                    tracing::warn!(
                        "Unrecognised board revision code '{}', assuming {}",
                        code,
                        RevisionBand::default()
                    );
                }
                revision
            }
            None => {
                tracing::warn!("Board revision not detected, assuming {}", RevisionBand::default());
                Self::unknown()
            }
        }
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn is_known(&self) -> bool {
        self.letter.is_some()
    }

    pub fn band(&self) -> RevisionBand {
        match self.letter {
            Some(letter) if letter < FIRST_MEGA_MODULE_REVISION => RevisionBand::Legacy,
            Some(_) => RevisionBand::MegaModule,
            None => RevisionBand::default(),
        }
    }
}

impl fmt::Display for BoardRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter {
            Some(letter) => f.pad(&format!("rev {}", letter)),
            None => f.pad("rev unknown"),
        }
    }
}

/// Classifies a raw revision code. Total: unknown codes map to the default band.
pub fn classify(code: &str) -> RevisionBand {
    BoardRevision::from_code(code).band()
}

/// Revision source that always reports the same code.
#[derive(Debug, Clone, Default)]
pub struct FixedRevision(pub Option<String>);

impl FixedRevision {
    pub fn new(code: impl Into<String>) -> Self {
        Self(Some(code.into()))
    }
}

impl RevisionSource for FixedRevision {
    fn revision_code(&self) -> Option<String> {
        self.0.clone()
    }
}
