//! JSON-lines command host.
//!
//! Each input line is `{"id": .., "cmd": "<command>", "args": {..}}` with
//! camelCase argument names. Each output line is the matching
//! [`InvokeResponse`].

use std::io::{BufRead, Write};
use std::sync::Mutex;

use predmarket_sdk::WizardAction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::{self, ListMarketsRequest};
use crate::state::AppStateManager;

#[derive(Debug, Clone, Deserialize)]
pub struct InvokeRequest {
    #[serde(default)]
    pub id: Value,
    pub cmd: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvokeResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: String) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

// ============================================================================
// Command arguments
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkArgs {
    network: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WizardArgs {
    wizard_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionArgs {
    wizard_id: String,
    action: WizardAction,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitArgs {
    wizard_id: String,
    #[serde(default)]
    creator: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    #[serde(default)]
    request: ListMarketsRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketArgs {
    market_id: String,
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| format!("invalid args: {e}"))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("failed to encode response: {e}"))
}

// ============================================================================
// Dispatch
// ============================================================================

fn dispatch(manager: &Mutex<AppStateManager>, cmd: &str, args: Value) -> Result<Value, String> {
    match cmd {
        // Network
        "is_first_launch" => to_value(commands::is_first_launch(manager)?),
        "set_network" => {
            let a: NetworkArgs = parse_args(args)?;
            to_value(commands::set_network(manager, &a.network)?)
        }
        // App state
        "get_app_state" => to_value(commands::get_app_state(manager)?),
        // Wizard
        "open_market_wizard" => to_value(commands::open_market_wizard(manager)?),
        "close_market_wizard" => {
            let a: WizardArgs = parse_args(args)?;
            to_value(commands::close_market_wizard(manager, &a.wizard_id)?)
        }
        "get_market_wizard" => {
            let a: WizardArgs = parse_args(args)?;
            to_value(commands::get_market_wizard(manager, &a.wizard_id)?)
        }
        "dispatch_wizard_action" => {
            let a: ActionArgs = parse_args(args)?;
            to_value(commands::dispatch_wizard_action(
                manager,
                &a.wizard_id,
                a.action,
            )?)
        }
        "submit_market_wizard" => {
            let a: SubmitArgs = parse_args(args)?;
            to_value(commands::submit_market_wizard(
                manager,
                &a.wizard_id,
                a.creator,
            )?)
        }
        // Markets
        "list_markets" => {
            let a: ListArgs = parse_args(args)?;
            to_value(commands::list_markets(manager, a.request)?)
        }
        "get_market" => {
            let a: MarketArgs = parse_args(args)?;
            to_value(commands::get_market(manager, &a.market_id)?)
        }
        other => Err(format!("unknown command: {other}")),
    }
}

pub fn invoke(manager: &Mutex<AppStateManager>, request: InvokeRequest) -> InvokeResponse {
    log::debug!("invoke {}", request.cmd);
    match dispatch(manager, &request.cmd, request.args) {
        Ok(result) => InvokeResponse::success(request.id, result),
        Err(e) => {
            log::warn!("{} failed: {e}", request.cmd);
            InvokeResponse::failure(request.id, e)
        }
    }
}

/// Answer one request per input line until the reader is exhausted.
pub fn serve<R: BufRead, W: Write>(
    manager: &Mutex<AppStateManager>,
    reader: R,
    mut writer: W,
) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<InvokeRequest>(line) {
            Ok(request) => invoke(manager, request),
            Err(e) => InvokeResponse::failure(Value::Null, format!("invalid request: {e}")),
        };
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}
