//! Per-night outcome.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// What happened during one night.
///
/// The report grows as the night resolves: the main pass fills it, and a
/// Ravenkeeper wave (if any) appends its reveal before the day begins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightReport {
    /// Night number.
    pub night: u32,

    /// Players who died tonight, in the order the deaths were applied.
    pub deaths: Vec<PlayerId>,

    /// Kills that protection or immunity stopped, by intended victim.
    pub survived: Vec<PlayerId>,

    /// Minion that inherited the Demon after a self-kill.
    pub promoted: Option<PlayerId>,

    /// Learned information, keyed by the participant who learned it.
    pub info: Vec<(PlayerId, String)>,
}

impl NightReport {
    /// Empty report for a night.
    #[must_use]
    pub fn new(night: u32) -> Self {
        Self {
            night,
            ..Self::default()
        }
    }

    /// Information one participant learned tonight.
    pub fn info_for<'a>(&'a self, participant: &'a PlayerId) -> impl Iterator<Item = &'a str> + 'a {
        self.info
            .iter()
            .filter(move |(who, _)| who == participant)
            .map(|(_, text)| text.as_str())
    }

    /// Did this participant die tonight?
    #[must_use]
    pub fn died(&self, participant: &PlayerId) -> bool {
        self.deaths.contains(participant)
    }
}
