use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use cs_api::ProspectInfo;
use cs_core::CallScriptError;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{map_activity_encode, map_activity_write, ActivityOutcome};

pub(crate) const CALL_NOTE_ACTIVITY: &str = "call_note";

/// One saved set of call notes, appended as a JSON line to the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallNoteActivity {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) description: String,
    pub(crate) note_content: String,
    pub(crate) account_id: String,
    pub(crate) account_name: Option<String>,
    pub(crate) contact_id: String,
    pub(crate) contact_name: Option<String>,
    pub(crate) created_at: String,
}

/// Persists the notes for the prospect's CRM record.
///
/// Never fails: missing identifiers or empty notes skip the write, and write
/// errors are logged.
pub(crate) fn save_call_notes(
    log_path: &Path,
    prospect: &ProspectInfo,
    notes: &str,
) -> ActivityOutcome {
    let (Some(account_id), Some(contact_id)) = (&prospect.account_id, &prospect.contact_id) else {
        warn!("cannot save notes: missing accountId or contactId");
        return ActivityOutcome::MissingIds;
    };
    let note_content = notes.trim();
    if note_content.is_empty() {
        info!("no notes to save");
        return ActivityOutcome::EmptyNotes;
    }

    let activity = CallNoteActivity {
        id: Uuid::new_v4().to_string(),
        kind: CALL_NOTE_ACTIVITY.to_string(),
        description: format!(
            "Call note for {} at {}",
            prospect.contact_name().unwrap_or("unknown contact"),
            prospect.account_name().unwrap_or("unknown account")
        ),
        note_content: note_content.to_string(),
        account_id: account_id.clone(),
        account_name: prospect.account_name().map(str::to_string),
        contact_id: contact_id.clone(),
        contact_name: prospect.contact_name().map(str::to_string),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    match append_activity(log_path, &activity) {
        Ok(()) => {
            info!(id = %activity.id, path = %log_path.display(), "call notes saved");
            ActivityOutcome::Saved { id: activity.id }
        }
        Err(failure) => {
            error!(code = %failure.code, "error saving call notes: {}", failure.message);
            ActivityOutcome::Failed
        }
    }
}

pub(crate) fn append_activity(
    log_path: &Path,
    activity: &CallNoteActivity,
) -> Result<(), CallScriptError> {
    if let Some(parent) = log_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(map_activity_write)?;
    }
    let mut line = serde_json::to_string(activity).map_err(map_activity_encode)?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(map_activity_write)?;
    file.write_all(line.as_bytes()).map_err(map_activity_write)
}
