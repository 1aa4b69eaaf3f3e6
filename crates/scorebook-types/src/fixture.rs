use crate::format::overs_from_label;
use crate::ids::PlayerId;
use crate::scoring::{BatsmanStats, BowlerStats, Extras, ScoringState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team1 => write!(f, "team1"),
            Self::Team2 => write!(f, "team2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TossChoice {
    Bat,
    Bowl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    Scheduled,
    Active,
    /// Terminal. No scoring mutation is accepted.
    Completed,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Final figures of a closed innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsSummary {
    pub batting_team: Side,
    pub bowling_team: Side,
    pub total_runs: u32,
    pub total_wickets: u32,
    /// Completed overs, rounded up when the last over was cut short.
    pub total_overs: u32,
    /// Exact legal deliveries bowled.
    pub legal_balls: u32,
    pub extras: Extras,
    pub batsmen_stats: BTreeMap<PlayerId, BatsmanStats>,
    pub bowler_stats: BTreeMap<PlayerId, BowlerStats>,
}

/// The persisted match document.
///
/// The scoring engine owns `status`, `scoring` and `innings`; everything
/// else is read-only context maintained elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    #[serde(default)]
    pub captain1_id: Option<PlayerId>,
    #[serde(default)]
    pub captain2_id: Option<PlayerId>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub toss_winner: Option<Side>,
    #[serde(default)]
    pub toss_choice: Option<TossChoice>,
    pub status: MatchStatus,
    #[serde(default)]
    pub scoring: Option<ScoringState>,
    #[serde(default)]
    pub innings: Vec<InningsSummary>,
    #[serde(default)]
    pub checked_in_players: Vec<PlayerId>,
    #[serde(default)]
    pub on_my_way_players: Vec<PlayerId>,
}

impl Match {
    pub fn new(team1: Vec<PlayerId>, team2: Vec<PlayerId>, format: impl Into<String>) -> Self {
        Self {
            team1,
            team2,
            captain1_id: None,
            captain2_id: None,
            format: format.into(),
            toss_winner: None,
            toss_choice: None,
            status: MatchStatus::Scheduled,
            scoring: None,
            innings: Vec::new(),
            checked_in_players: Vec::new(),
            on_my_way_players: Vec::new(),
        }
    }

    pub fn with_captains(mut self, captain1: Option<PlayerId>, captain2: Option<PlayerId>) -> Self {
        self.captain1_id = captain1;
        self.captain2_id = captain2;
        self
    }

    pub fn with_toss(mut self, winner: Side, choice: TossChoice) -> Self {
        self.toss_winner = Some(winner);
        self.toss_choice = Some(choice);
        self
    }

    pub fn squad(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn captain(&self, side: Side) -> Option<&PlayerId> {
        match side {
            Side::Team1 => self.captain1_id.as_ref(),
            Side::Team2 => self.captain2_id.as_ref(),
        }
    }

    pub fn is_captain(&self, player: &PlayerId) -> bool {
        [Side::Team1, Side::Team2]
            .into_iter()
            .any(|side| self.captain(side) == Some(player))
    }

    pub fn overs_limit(&self) -> u32 {
        overs_from_label(&self.format)
    }

    /// Side batting first according to the toss, if the toss is recorded.
    pub fn first_batting_side(&self) -> Option<Side> {
        let winner = self.toss_winner?;
        match self.toss_choice? {
            TossChoice::Bat => Some(winner),
            TossChoice::Bowl => Some(winner.opposite()),
        }
    }

    /// Squad members who have checked in or are on their way.
    ///
    /// Falls back to the whole squad while no attendance is recorded.
    pub fn available_squad(&self, side: Side) -> Vec<PlayerId> {
        let squad = self.squad(side);
        if self.checked_in_players.is_empty() && self.on_my_way_players.is_empty() {
            return squad.to_vec();
        }
        let present: HashSet<&PlayerId> = self
            .checked_in_players
            .iter()
            .chain(self.on_my_way_players.iter())
            .collect();
        squad
            .iter()
            .filter(|player| present.contains(player))
            .cloned()
            .collect()
    }
}
