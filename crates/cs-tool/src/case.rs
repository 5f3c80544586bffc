use std::collections::BTreeMap;

use cs_core::{Mood, SideEffect, StateId};
use serde::{Deserialize, Serialize};

use crate::ObservedView;

pub const TESTCASE_SCHEMA_V1: &str = "cs-tool-case.v1";

/// A scripted walk through the call graph plus the views it must produce.
///
/// `expectedViews[0]` describes the start view; every action adds one more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub prospect_query: Option<String>,
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_views: Vec<ExpectedView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Begin,
    Advance { target: String },
    Choose { index: usize },
    Back,
    Reset,
    Set { key: String, value: String },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Advance { .. } => "advance",
            Self::Choose { .. } => "choose",
            Self::Back => "back",
            Self::Reset => "reset",
            Self::Set { .. } => "set",
        }
    }
}

/// Fields left out of the case file are not compared, except `sideEffect`,
/// which must be absent when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedView {
    pub state: StateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<StateId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effect: Option<SideEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_go_back: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_contains: Vec<String>,
}

impl ExpectedView {
    pub fn matches(&self, observed: &ObservedView) -> bool {
        self.state == observed.state
            && self.side_effect == observed.side_effect
            && self.mood.map_or(true, |mood| mood == observed.mood)
            && self
                .targets
                .as_ref()
                .map_or(true, |targets| targets == &observed.targets)
            && self
                .can_go_back
                .map_or(true, |can_go_back| can_go_back == observed.can_go_back)
            && self
                .text_contains
                .iter()
                .all(|fragment| observed.text.contains(fragment.as_str()))
    }
}
