use std::io::Read;
use std::process::ExitCode;

use textcanvas_editor::command::execute_json_batch;
use textcanvas_editor::harness::EditorHarness;
use textcanvas_editor::state::EditorSettings;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textcanvas=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if std::env::args().any(|arg| arg == "--write-settings") {
        return match EditorSettings::load().save() {
            Some(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            None => {
                tracing::error!("Could not write settings to the config directory");
                ExitCode::FAILURE
            }
        };
    }

    let script = match read_script() {
        Ok(script) => script,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let local = tokio::task::LocalSet::new();
    let result = local.block_on(&runtime, async {
        let harness = EditorHarness::with_settings(EditorSettings::load());
        execute_json_batch(&harness, &script).await
    });

    match result {
        Ok(responses) => {
            let failed = responses.iter().filter(|r| !r.success).count();
            match serde_json::to_string_pretty(&responses) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Failed to encode responses: {e}");
                    return ExitCode::FAILURE;
                }
            }
            if failed > 0 {
                tracing::warn!("{failed} of {} commands failed", responses.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Command script from `--script <path>`, or stdin
fn read_script() -> Result<String, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--script" && i + 1 < args.len() {
            let path = &args[i + 1];
            let script = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read script {path}: {e}"))?;
            tracing::info!("Loaded script from {path}");
            return Ok(script);
        }
        i += 1;
    }

    let mut script = String::new();
    std::io::stdin()
        .read_to_string(&mut script)
        .map_err(|e| format!("Failed to read script from stdin: {e}"))?;
    Ok(script)
}
