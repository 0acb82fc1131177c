use thiserror::Error;

use crate::core::profile::CardProfile;

/// Width of the zero-padded numeric part of generated identifiers.
pub const ID_DIGITS: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier sequence exhausted after {0}")]
    Exhausted(u64),
    #[error("identifier '{0}' cannot be used as a file name")]
    Unsafe(String),
}

/// Hands out member identifiers for a run of cards.
///
/// Explicit identifiers pass through untouched and never consume a sequence
/// slot, so auto-generated identifiers stay contiguous.
#[derive(Debug, Clone)]
pub struct IdentifierSequencer {
    prefix: String,
    start: u64,
    running_index: u64,
}

impl IdentifierSequencer {
    pub fn new(profile: &CardProfile) -> Self {
        Self {
            prefix: profile.id_prefix.clone(),
            start: profile.start_num,
            running_index: 0,
        }
    }

    /// Resolve the identifier for the next card.
    ///
    /// Fails once the counter would pass `u64::MAX`; the slot is not consumed.
    pub fn next(&mut self, explicit: Option<&str>) -> Result<String, IdentifierError> {
        match explicit {
            Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
            _ => {
                let number = self
                    .start
                    .checked_add(self.running_index)
                    .ok_or(IdentifierError::Exhausted(u64::MAX))?;
                let following = self
                    .running_index
                    .checked_add(1)
                    .ok_or(IdentifierError::Exhausted(number))?;
                self.running_index = following;
                Ok(format_id(&self.prefix, number))
            }
        }
    }

    /// Number of auto-generated identifiers handed out so far.
    pub fn running_index(&self) -> u64 {
        self.running_index
    }
}

/// Identifier a single card would show: its explicit id, else the first sequence value.
pub fn preview_id(profile: &CardProfile) -> String {
    match profile.explicit_member_id() {
        Some(id) => id.to_string(),
        None => format_id(&profile.id_prefix, profile.start_num),
    }
}

/// Reject identifiers that would escape the output directory when used as a
/// file-name stem: path separators, `..`, NUL, or a drive prefix.
pub fn check_identifier(identifier: &str) -> Result<(), IdentifierError> {
    let unsafe_name = identifier.is_empty()
        || identifier.contains(['/', '\\', '\0', ':'])
        || identifier.contains("..");
    if unsafe_name {
        return Err(IdentifierError::Unsafe(identifier.to_string()));
    }
    Ok(())
}

fn format_id(prefix: &str, number: u64) -> String {
    format!("{prefix}{number:0width$}", width = ID_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_ids_never_consume_sequence_slots() {
        let profile = CardProfile {
            id_prefix: "MH".to_string(),
            start_num: 1,
            ..CardProfile::default()
        };
        let mut seq = IdentifierSequencer::new(&profile);
        let rows = [Some("X1"), None, None, Some("X2"), None];
        let ids: Vec<String> = rows.iter().map(|r| seq.next(*r).unwrap()).collect();
        assert_eq!(ids, ["X1", "MH000001", "MH000002", "X2", "MH000003"]);
        assert_eq!(seq.running_index(), 3);
    }

    #[test]
    fn blank_override_uses_sequence() {
        let profile = CardProfile {
            start_num: 41,
            ..CardProfile::default()
        };
        let mut seq = IdentifierSequencer::new(&profile);
        assert_eq!(seq.next(Some("  ")).unwrap(), "MH000041");
        assert_eq!(seq.next(None).unwrap(), "MH000042");
    }

    #[test]
    fn numbers_wider_than_padding_are_kept_whole() {
        let profile = CardProfile {
            id_prefix: "Q".to_string(),
            start_num: 1_234_567,
            ..CardProfile::default()
        };
        assert_eq!(IdentifierSequencer::new(&profile).next(None).unwrap(), "Q1234567");
    }

    #[test]
    fn preview_prefers_explicit_member_id() {
        let profile = CardProfile::default();
        assert_eq!(preview_id(&profile), "MH000001");
        assert_eq!(preview_id(&profile.for_member("Ada", "GOLD-7")), "GOLD-7");
    }

    #[test]
    fn sequence_reports_exhaustion_instead_of_wrapping() {
        let profile = CardProfile {
            start_num: u64::MAX,
            ..CardProfile::default()
        };
        let mut seq = IdentifierSequencer::new(&profile);
        assert_eq!(seq.next(None).unwrap(), format!("MH{}", u64::MAX));
        assert!(matches!(seq.next(None), Err(IdentifierError::Exhausted(_))));
        assert_eq!(seq.next(Some("X9")).unwrap(), "X9");
        assert_eq!(seq.running_index(), 1);
    }

    #[test]
    fn identifiers_with_path_components_are_rejected() {
        for bad in ["../../tmp/pwned", "/etc/cron.d/x", "a\\b", "C:evil", "nul\0byte", "..", ""] {
            assert_eq!(
                check_identifier(bad),
                Err(IdentifierError::Unsafe(bad.to_string())),
                "{bad:?}"
            );
        }
        for good in ["MH000001", "GOLD-7", "x.y_z"] {
            assert_eq!(check_identifier(good), Ok(()));
        }
    }
}
