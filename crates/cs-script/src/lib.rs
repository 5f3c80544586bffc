mod graph;
mod source;
mod validate;

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use cs_core::CallScriptError;
use tracing::debug;

pub use graph::ScriptGraph;
pub use source::{ScriptSource, SCRIPT_SCHEMA_V1};

const BUILTIN_SCRIPT_JSON: &str = include_str!("../scripts/sales_call.json");

static BUILTIN_GRAPH: OnceLock<Arc<ScriptGraph>> = OnceLock::new();

pub fn compile_script_graph_from_json(raw: &str) -> Result<ScriptGraph, CallScriptError> {
    let source = source::parse_script_source(raw)?;
    let states = validate::validate_states(source.states)?;
    debug!(states = states.len(), "compiled call script graph");
    Ok(ScriptGraph::from_validated(states))
}

pub fn load_script_graph_from_file(path: &Path) -> Result<ScriptGraph, CallScriptError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CallScriptError::new(
            "SCRIPT_READ",
            format!("Failed to read call script \"{}\": {}", path.display(), error),
        )
    })?;
    debug!(path = %path.display(), "loading call script from file");
    compile_script_graph_from_json(&raw)
}

/// Raw JSON of the embedded sales script.
pub fn builtin_script_source() -> &'static str {
    BUILTIN_SCRIPT_JSON
}

impl ScriptGraph {
    /// Embedded sales script, compiled once per process.
    pub fn builtin() -> Arc<ScriptGraph> {
        BUILTIN_GRAPH
            .get_or_init(|| {
                let graph = compile_script_graph_from_json(BUILTIN_SCRIPT_JSON)
                    .expect("embedded sales script must compile");
                Arc::new(graph)
            })
            .clone()
    }
}
