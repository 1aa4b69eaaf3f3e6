use crate::error::DomainError;
use crate::ids::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most runs a single delivery can add through running or a boundary.
pub const MAX_RUNS_PER_BALL: u8 = 6;

/// How a delivery is classified for accounting purposes.
///
/// Every per-kind accounting rule lives on this type so that the forward
/// and reverse paths of the engine read the same table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// Fair delivery, runs off the bat.
    Run,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl DeliveryKind {
    /// Whether the delivery advances the over.
    pub fn is_legal(self) -> bool {
        matches!(self, Self::Run | Self::Bye | Self::LegBye)
    }

    /// Whether the striker is charged with a ball faced.
    ///
    /// A no-ball is faced but does not advance the over.
    pub fn counts_as_faced(self) -> bool {
        !matches!(self, Self::Wide)
    }

    /// Automatic penalty added on top of the runs run.
    pub fn penalty(self) -> u32 {
        match self {
            Self::Wide | Self::NoBall => 1,
            Self::Run | Self::Bye | Self::LegBye => 0,
        }
    }

    /// Whether the runs run are credited to the striker.
    pub fn credits_batter(self) -> bool {
        matches!(self, Self::Run | Self::NoBall)
    }

    /// Whether the runs added are conceded by the bowler.
    pub fn charged_to_bowler(self) -> bool {
        !matches!(self, Self::Bye | Self::LegBye)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    RunOut,
    Lbw,
    Stumped,
    HitWicket,
    Retired,
}

impl DismissalKind {
    /// Whether the bowler is credited with the wicket.
    pub fn credits_bowler(self) -> bool {
        !matches!(self, Self::RunOut | Self::Retired)
    }

    /// Whether the dismissal adds to the team's wicket count.
    pub fn counts_as_wicket(self) -> bool {
        !matches!(self, Self::Retired)
    }

    /// Whether only the striker can be dismissed this way.
    pub fn striker_only(self) -> bool {
        !matches!(self, Self::RunOut | Self::Retired)
    }

    /// Whether this dismissal can happen off the given delivery.
    pub fn possible_on(self, delivery: DeliveryKind) -> bool {
        match delivery {
            DeliveryKind::Wide => matches!(
                self,
                Self::Stumped | Self::RunOut | Self::HitWicket | Self::Retired
            ),
            DeliveryKind::NoBall => matches!(self, Self::RunOut | Self::Retired),
            DeliveryKind::Run | DeliveryKind::Bye | DeliveryKind::LegBye => true,
        }
    }

    /// Scorecard label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bowled => "Bowled",
            Self::Caught => "Caught",
            Self::RunOut => "Run Out",
            Self::Lbw => "LBW",
            Self::Stumped => "Stumped",
            Self::HitWicket => "Hit Wicket",
            Self::Retired => "Retired",
        }
    }
}

/// Dismissal details supplied by the scorer with a ball event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalInput {
    pub kind: DismissalKind,
    pub batter: PlayerId,
    pub fielder: Option<PlayerId>,
    pub fielder2: Option<PlayerId>,
}

impl DismissalInput {
    pub fn new(kind: DismissalKind, batter: impl Into<PlayerId>) -> Self {
        Self {
            kind,
            batter: batter.into(),
            fielder: None,
            fielder2: None,
        }
    }

    pub fn with_fielder(mut self, fielder: impl Into<PlayerId>) -> Self {
        self.fielder = Some(fielder.into());
        self
    }

    pub fn with_second_fielder(mut self, fielder: impl Into<PlayerId>) -> Self {
        self.fielder2 = Some(fielder.into());
        self
    }
}

/// One delivery as reported by the scorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub kind: DeliveryKind,
    /// Runs physically run or scored as a boundary, excluding any penalty.
    pub runs: u8,
    pub dismissal: Option<DismissalInput>,
}

impl BallEvent {
    pub fn new(kind: DeliveryKind, runs: u8) -> Self {
        Self {
            kind,
            runs,
            dismissal: None,
        }
    }

    pub fn runs(runs: u8) -> Self {
        Self::new(DeliveryKind::Run, runs)
    }

    pub fn dot() -> Self {
        Self::runs(0)
    }

    pub fn wide(runs: u8) -> Self {
        Self::new(DeliveryKind::Wide, runs)
    }

    pub fn no_ball(runs: u8) -> Self {
        Self::new(DeliveryKind::NoBall, runs)
    }

    pub fn bye(runs: u8) -> Self {
        Self::new(DeliveryKind::Bye, runs)
    }

    pub fn leg_bye(runs: u8) -> Self {
        Self::new(DeliveryKind::LegBye, runs)
    }

    pub fn with_dismissal(mut self, dismissal: DismissalInput) -> Self {
        self.dismissal = Some(dismissal);
        self
    }

    pub fn is_wicket(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Checks that need no match context: run range, dismissal shape.
    pub fn validate_shape(&self) -> Result<(), DomainError> {
        if self.runs > MAX_RUNS_PER_BALL {
            return Err(DomainError::RunsOutOfRange {
                runs: self.runs,
                max: MAX_RUNS_PER_BALL,
            });
        }
        if let Some(dismissal) = &self.dismissal {
            if !dismissal.kind.possible_on(self.kind) {
                return Err(DomainError::DismissalNotPossible {
                    dismissal: dismissal.kind,
                    delivery: self.kind,
                });
            }
            if dismissal.kind == DismissalKind::Caught && dismissal.fielder.is_none() {
                return Err(DomainError::MissingFielder {
                    kind: dismissal.kind,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreaseSlot {
    Striker,
    NonStriker,
}

impl CreaseSlot {
    pub fn from_was_striker(was_striker: bool) -> Self {
        if was_striker {
            Self::Striker
        } else {
            Self::NonStriker
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Striker => Self::NonStriker,
            Self::NonStriker => Self::Striker,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Four,
    Six,
}

/// The batter who left the crease on a recorded ball.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissedBatter {
    pub batter: PlayerId,
    pub kind: DismissalKind,
    /// Crease slot occupied before the ball's strike rotation.
    pub was_striker: bool,
    /// Forced by the balls-faced retirement threshold.
    pub automatic: bool,
}

/// A recorded delivery in the current over's log.
///
/// Carries everything needed to invert the delivery without re-parsing:
/// who faced, who bowled, what boundary was credited, who left, and
/// whether the ball rotated strike or closed the over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallRecord {
    pub kind: DeliveryKind,
    pub runs: u8,
    pub faced_by: PlayerId,
    pub bowler: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Boundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal: Option<DismissedBatter>,
    pub rotated: bool,
    pub completed_over: bool,
}

impl BallRecord {
    /// Runs added to the team total, penalty included.
    pub fn team_runs(&self) -> u32 {
        u32::from(self.runs) + self.kind.penalty()
    }

    /// Runs credited to the striker.
    pub fn batter_runs(&self) -> u32 {
        if self.kind.credits_batter() {
            u32::from(self.runs)
        } else {
            0
        }
    }

    /// Runs conceded by the bowler.
    pub fn bowler_runs(&self) -> u32 {
        if self.kind.charged_to_bowler() {
            self.team_runs()
        } else {
            0
        }
    }

    pub fn is_legal(&self) -> bool {
        self.kind.is_legal()
    }
}

/// Scorebook label. Wides and no-balls show the runs run; their one-run
/// penalty is implied by the `WD`/`NB` suffix.
impl fmt::Display for BallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            DeliveryKind::Run => self.runs.to_string(),
            DeliveryKind::Wide if self.runs == 0 => "WD".to_string(),
            DeliveryKind::Wide => format!("{}WD", self.runs),
            DeliveryKind::NoBall if self.runs == 0 => "NB".to_string(),
            DeliveryKind::NoBall => format!("{}NB", self.runs),
            DeliveryKind::Bye => format!("{}B", self.runs),
            DeliveryKind::LegBye => format!("{}LB", self.runs),
        };
        let marker = match &self.dismissal {
            Some(d) if d.kind == DismissalKind::Retired => Some("R"),
            Some(_) => Some("W"),
            None => None,
        };
        match marker {
            None => f.write_str(&base),
            Some(marker) if base == "0" => f.write_str(marker),
            Some(marker) => write!(f, "{base}+{marker}"),
        }
    }
}
