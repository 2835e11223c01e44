use crate::output::{print_json, print_table};
use reality_core::checkers::standard_registry;
use reality_core::config::EnvConfig;
use std::path::Path;

/// List registered checkers and whether each is configured to run.
pub fn run(root: &Path, json: bool) -> anyhow::Result<i32> {
    let config = EnvConfig::from_env();
    let registry = standard_registry(root, &config);

    if json {
        let entries: Vec<serde_json::Value> = registry
            .iter()
            .map(|c| {
                let gap = c.ready().err();
                serde_json::json!({
                    "source": c.source(),
                    "configured": gap.is_none(),
                    "gap": gap,
                })
            })
            .collect();
        print_json(&entries)?;
        return Ok(0);
    }

    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|c| {
            let state = match c.ready() {
                Ok(()) => "ready".to_string(),
                Err(reason) => format!("gap: {reason}"),
            };
            vec![c.source().to_string(), state]
        })
        .collect();
    print_table(&["SOURCE", "STATE"], &rows);
    Ok(0)
}
