/// Serializable copy of a session's state, taken between operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub schema_version: String,
    pub current: StateId,
    pub history: Vec<StateId>,
    pub substitutions: SubstitutionTable,
}

impl CallSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            schema_version: SESSION_SNAPSHOT_SCHEMA.to_string(),
            current: self.current,
            history: self.history.clone(),
            substitutions: self.substitutions.clone(),
        }
    }

    pub fn resume(graph: Arc<ScriptGraph>, snapshot: SessionSnapshot) -> Result<Self, EngineError> {
        if snapshot.schema_version != SESSION_SNAPSHOT_SCHEMA {
            return Err(EngineError::SnapshotSchema {
                found: snapshot.schema_version,
            });
        }
        for id in snapshot.history.iter().chain([&snapshot.current]) {
            graph.get(*id)?;
        }
        debug!(
            current = %snapshot.current,
            history = snapshot.history.len(),
            "resuming call session"
        );
        Ok(Self {
            graph,
            current: snapshot.current,
            history: snapshot.history,
            substitutions: snapshot.substitutions,
        })
    }
}
