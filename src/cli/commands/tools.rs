//! Tool listing and invocation commands.

use serde_json::Value;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::tools::{EnhancedToolHandler, ToolHandler, catalog};

use super::{connect, registry};

/// Print every tool with its description
pub fn cmd_tools() -> anyhow::Result<()> {
    let tools = catalog::all();
    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);

    println!("{} tools available:", tools.len());
    println!();
    for tool in tools {
        println!("  {:<width$}  {}", tool.name, tool.description, width = width);
    }
    Ok(())
}

/// Call one tool and print the text result
pub fn cmd_call(
    rt: &Runtime,
    config: &Config,
    tool: &str,
    args: &str,
    raw: bool,
) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let api = connect(config)?;

    let result = rt.block_on(async {
        let base = ToolHandler::new(api.clone());
        if raw {
            base.call_tool(tool, &args).await
        } else {
            let registry = registry(api, config);
            // Start warm-up (if configured) while the tool request is in flight
            registry.acquire();
            let handler = EnhancedToolHandler::new(base, registry);
            handler.call_tool(tool, &args).await
        }
    });

    println!("{}", result.text());
    if result.is_error {
        anyhow::bail!("Tool {} failed", tool);
    }
    Ok(())
}

/// Tool arguments from the command line: a JSON object.
fn parse_args(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(Error::invalid_arguments("--args must be a JSON object"));
    }
    Ok(value)
}
