use crate::ball::{BallRecord, CreaseSlot, DismissalKind};
use crate::fixture::Side;
use crate::ids::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How and where a batter was dismissed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WicketInfo {
    #[serde(rename = "type")]
    pub kind: DismissalKind,
    pub bowler: Option<PlayerId>,
    pub fielder: Option<PlayerId>,
    pub fielder2: Option<PlayerId>,
    /// Completed overs when the dismissal happened (0-indexed over number).
    pub over: u32,
    /// Legal balls completed in that over plus one.
    pub ball: u32,
    pub was_striker: bool,
}

impl WicketInfo {
    pub fn slot(&self) -> CreaseSlot {
        CreaseSlot::from_was_striker(self.was_striker)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatsmanStats {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket_info: Option<WicketInfo>,
}

impl BatsmanStats {
    pub fn is_out(&self) -> bool {
        self.wicket_info.is_some()
    }

    /// True for a batter who has been seated but not yet faced or scored.
    pub fn is_fresh(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerStats {
    /// Legal deliveries bowled.
    pub balls: u32,
    pub runs: u32,
    pub wickets: u32,
}

/// Runs not credited to any batter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extras {
    /// Wide penalties plus everything run off a wide.
    pub wides: u32,
    /// No-ball penalties only; runs off the bat go to the striker.
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// One innings in progress (or just completed).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringState {
    pub batting_team: Side,
    pub bowling_team: Side,
    pub total_runs: u32,
    pub total_wickets: u32,
    /// Completed overs.
    pub total_overs: u32,
    /// Deliveries of the current over. Survives over completion until the
    /// next bowler is assigned.
    pub this_over: Vec<BallRecord>,
    pub striker_id: Option<PlayerId>,
    pub non_striker_id: Option<PlayerId>,
    pub current_bowler_id: Option<PlayerId>,
    /// Bowler of the last completed over once the next bowler took over.
    #[serde(default)]
    pub last_over_bowler_id: Option<PlayerId>,
    pub batsmen_stats: BTreeMap<PlayerId, BatsmanStats>,
    pub bowler_stats: BTreeMap<PlayerId, BowlerStats>,
    #[serde(default)]
    pub extras: Extras,
    pub current_innings: u8,
}

impl ScoringState {
    /// Fresh innings with nobody at the crease.
    pub fn new(batting_team: Side, current_innings: u8) -> Self {
        Self {
            batting_team,
            bowling_team: batting_team.opposite(),
            total_runs: 0,
            total_wickets: 0,
            total_overs: 0,
            this_over: Vec::new(),
            striker_id: None,
            non_striker_id: None,
            current_bowler_id: None,
            last_over_bowler_id: None,
            batsmen_stats: BTreeMap::new(),
            bowler_stats: BTreeMap::new(),
            extras: Extras::default(),
            current_innings,
        }
    }

    pub fn slot(&self, slot: CreaseSlot) -> Option<&PlayerId> {
        match slot {
            CreaseSlot::Striker => self.striker_id.as_ref(),
            CreaseSlot::NonStriker => self.non_striker_id.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: CreaseSlot) -> &mut Option<PlayerId> {
        match slot {
            CreaseSlot::Striker => &mut self.striker_id,
            CreaseSlot::NonStriker => &mut self.non_striker_id,
        }
    }

    /// Which slot, if any, the player occupies.
    pub fn crease_slot_of(&self, player: &PlayerId) -> Option<CreaseSlot> {
        if self.striker_id.as_ref() == Some(player) {
            Some(CreaseSlot::Striker)
        } else if self.non_striker_id.as_ref() == Some(player) {
            Some(CreaseSlot::NonStriker)
        } else {
            None
        }
    }

    pub fn swap_ends(&mut self) {
        std::mem::swap(&mut self.striker_id, &mut self.non_striker_id);
    }

    /// First empty crease slot, if a batter is awaited.
    pub fn vacant_slot(&self) -> Option<CreaseSlot> {
        if self.striker_id.is_none() {
            Some(CreaseSlot::Striker)
        } else if self.non_striker_id.is_none() {
            Some(CreaseSlot::NonStriker)
        } else {
            None
        }
    }

    /// Whether openers have been chosen.
    pub fn has_started(&self) -> bool {
        !self.batsmen_stats.is_empty()
    }

    pub fn legal_balls_this_over(&self) -> u32 {
        self.this_over.iter().filter(|ball| ball.is_legal()).count() as u32
    }

    /// Whether the last recorded delivery closed the over and no new
    /// bowler has been assigned yet.
    pub fn awaiting_bowler(&self) -> bool {
        self.this_over.last().is_some_and(|ball| ball.completed_over)
    }

    /// Legal balls bowled in the innings.
    pub fn legal_balls(&self, balls_per_over: u32) -> u32 {
        let in_progress = if self.awaiting_bowler() {
            0
        } else {
            self.legal_balls_this_over()
        };
        self.total_overs * balls_per_over + in_progress
    }

    /// Overs in scorecard notation, e.g. `"12.3"`.
    pub fn overs_display(&self, balls_per_over: u32) -> String {
        let balls = self.legal_balls(balls_per_over);
        format!("{}.{}", balls / balls_per_over, balls % balls_per_over)
    }

    /// Number of batters dismissed (retirements included).
    pub fn departed(&self) -> usize {
        self.batsmen_stats.values().filter(|s| s.is_out()).count()
    }
}
