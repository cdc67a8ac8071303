// SPDX-FileCopyrightText: 2026 Karte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `karte status` command implementation.
//!
//! Probes the backend health endpoint and displays connectivity. Falls back
//! gracefully when the backend is not reachable.

use std::io::IsTerminal;

use karte_api::BackendClient;
use karte_config::{BackendConfig, KarteConfig};
use karte_core::KarteError;
use serde::Serialize;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub reachable: bool,
    pub status: String,
    pub backend_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Run the `karte status` command.
///
/// Probes `/health` on the configured backend. If `--json` is passed,
/// outputs structured JSON for scripting. If `--plain` is passed or stdout
/// is not a TTY, disables colors.
pub async fn run_status(config: &KarteConfig, json: bool, plain: bool) -> Result<(), KarteError> {
    let base_url = config.backend.base_url.trim_end_matches('/').to_string();

    // A short probe timeout regardless of the configured CRUD timeout.
    let probe_config = BackendConfig {
        base_url: base_url.clone(),
        timeout_secs: 3,
        generate_timeout_secs: 3,
    };
    let client = BackendClient::new(&probe_config)?;

    let use_color = !plain && std::io::stdout().is_terminal();

    match client.health().await {
        Ok(health) => {
            if json {
                let status_resp = StatusResponse {
                    reachable: true,
                    status: health.status.clone(),
                    backend_url: base_url,
                    app_name: health.app_name,
                    version: health.version,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&status_resp)
                        .unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                print_status_reachable(&health.status, &base_url, use_color);
            }
        }
        Err(_) => {
            if json {
                let status_resp = StatusResponse {
                    reachable: false,
                    status: "unreachable".to_string(),
                    backend_url: base_url,
                    app_name: None,
                    version: None,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&status_resp)
                        .unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                print_status_unreachable(&base_url, use_color);
            }
        }
    }

    Ok(())
}

/// Print reachable status with optional colors.
fn print_status_reachable(status: &str, base_url: &str, use_color: bool) {
    println!();
    println!("  karte status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!("    Backend:  {} {}", "✓".green(), status.green());
    } else {
        println!("    Backend:  [OK] {status}");
    }

    println!("    Endpoint: {base_url}/health");
    println!();
}

/// Print unreachable status with optional colors.
fn print_status_unreachable(base_url: &str, use_color: bool) {
    println!();
    println!("  karte status");
    println!("  {}", "-".repeat(35));

    if use_color {
        use colored::Colorize;
        println!("    Backend:  {} {}", "✗".red(), "unreachable".red());
    } else {
        println!("    Backend:  [FAIL] unreachable");
    }

    println!("    Endpoint: {base_url}/health");
    println!();
    println!("  Check [backend].base_url in karte.toml");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_serializes() {
        let resp = StatusResponse {
            reachable: true,
            status: "healthy".to_string(),
            backend_url: "http://localhost:8000".to_string(),
            app_name: Some("karte-backend".to_string()),
            version: Some("1.2.0".to_string()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"reachable\":true"));
        assert!(json.contains("\"status\":\"healthy\""));
    }

    #[test]
    fn status_response_unreachable_omits_empty_fields() {
        let resp = StatusResponse {
            reachable: false,
            status: "unreachable".to_string(),
            backend_url: "http://localhost:8000".to_string(),
            app_name: None,
            version: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"reachable\":false"));
        assert!(!json.contains("app_name"));
    }
}
