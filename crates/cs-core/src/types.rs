use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

macro_rules! state_ids {
    ($($variant:ident => $name:tt),+ $(,)?) => {
        /// Identifier of a node in the call script.
        ///
        /// The set is closed: a script source can only refer to these ids, so a
        /// transition target that does not exist is rejected while parsing.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum StateId {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl StateId {
            pub const ALL: &'static [StateId] = &[$(StateId::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(StateId::$variant => $name,)+
                }
            }

            pub fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $($name => Some(StateId::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

state_ids! {
    Start => "start",
    Dialing => "dialing",
    VoicemailOrHangup => "voicemail_or_hangup",
    Hook => "hook",
    MainScriptStart => "main_script_start",
    GatekeeperIntro => "gatekeeper_intro",
    GatekeeperWhatsAbout => "gatekeeper_whats_about",
    Voicemail => "voicemail",
    PathA => "pathA",
    PathD => "pathD",
    ResStruggle => "resStruggle",
    ResNotRenewed => "resNotRenewed",
    ResLockedIn => "resLockedIn",
    ResShopping => "resShopping",
    ResBroker => "resBroker",
    ResNoThought => "resNoThought",
    Discovery => "discovery",
    ObjHappy => "objHappy",
    ObjHappyRate => "objHappyRate",
    ObjHappyService => "objHappyService",
    ObjHappyBoth => "objHappyBoth",
    ObjNoTime => "objNoTime",
    HandleHesitation => "handleHesitation",
    CloseForAppointment => "closeForAppointment",
    ScheduleAppointment => "scheduleAppointment",
    AppointmentConfirmed => "appointmentConfirmed",
    BillYes => "billYes",
    BillNo => "billNo",
    BillEmailAdvice => "billEmailAdvice",
    BillPhysicalAdvice => "billPhysicalAdvice",
    ConfirmEmail => "confirmEmail",
    GetCorrectEmail => "getCorrectEmail",
    EmailConfirmed => "emailConfirmed",
    BillOptional => "billOptional",
    GetEmail => "getEmail",
    EmailFollowUp => "emailFollowUp",
    SoftClose => "softClose",
    CallSuccess => "callSuccess",
    CallEnd => "callEnd",
    TransferDialing => "transfer_dialing",
}

/// Where every session starts and every reset returns to.
pub const START_STATE: StateId = StateId::Start;
/// Entered from [`START_STATE`] by the begin-call operation, not by a transition.
pub const DIAL_STATE: StateId = StateId::Dialing;

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateId {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| EngineError::NotFound { id: raw.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Neutral,
    Positive,
    Challenging,
    Unsure,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Challenging => "challenging",
            Self::Unsure => "unsure",
        }
    }
}

/// Marker on a transition asking the caller to run an external action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideEffect {
    SaveNotes,
}

impl SideEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaveNotes => "saveNotes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub label: String,
    pub target: StateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<SideEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub text: String,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionView {
    pub index: usize,
    pub label: String,
    pub target: StateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<SideEffect>,
}

/// What the presentation layer needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentView {
    pub state: StateId,
    pub text: String,
    pub mood: Mood,
    pub transitions: Vec<TransitionView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effect: Option<SideEffect>,
    pub can_go_back: bool,
}
