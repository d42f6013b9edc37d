use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use phishguard::client::{Analyzer, GeminiClient};
use phishguard::{cli, config, error, render, session};
use phishguard_common::{AnalysisState, EXAMPLE_URLS};
use cli::{Cli, Commands};
use config::Config;
use error::{PhishGuardError, Result};
use session::Session;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?.with_overrides(cli.model.clone(), cli.mode, cli.timeout);

    match cli.command {
        Commands::Analyze { url, json } => {
            let session = Session::new(build_client(&config)?);

            if !json {
                println!("🔍 phishguard - URL解析 ({} / {})\n", config.model, config.mode);
            }

            let state = analyze_once(&session, &url).await;
            report(&state, json)?;
        }

        Commands::Interactive => {
            let session = Session::new(build_client(&config)?);
            println!("🔍 phishguard - 対話モード ({} / {})", config.model, config.mode);
            println!("URLを入力してください。番号でサンプルを選択、空行または q で終了。\n");
            print_examples();

            loop {
                let input: String = Input::new()
                    .with_prompt("URL")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| PhishGuardError::Prompt(e.to_string()))?;

                let url = match input.trim() {
                    "" | "q" | "quit" => break,
                    choice => resolve_example(choice).unwrap_or(choice).to_string(),
                };

                let state = analyze_once(&session, &url).await;
                println!("\n{}", render::render_state(&state));
            }
        }

        Commands::Examples => {
            print_examples();
        }

        Commands::Config { show, set_model, set_mode, set_timeout } => {
            let mut stored = Config::load()?;
            let changed = set_model.is_some() || set_mode.is_some() || set_timeout.is_some();

            if changed {
                stored = stored.with_overrides(set_model, set_mode, set_timeout);
                stored.validate()?;
                stored.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let effective = stored.with_overrides(cli.model, cli.mode, cli.timeout);
                println!("設定:");
                println!("  モデル: {}", effective.model);
                println!("  生成モード: {}", effective.mode);
                println!("  タイムアウト: {}秒", effective.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    if config::api_key_from_env().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

/// APIキー必須。無ければここで起動失敗
fn build_client(config: &Config) -> Result<GeminiClient> {
    let api_key = config::api_key_from_env()?;
    GeminiClient::from_config(api_key, config)
}

/// 1件送信して結果が出るまで待つ（待機中はスピナー表示）
async fn analyze_once<A: Analyzer>(session: &Session<A>, url: &str) -> AnalysisState {
    let Some(handle) = session.submit(url) else {
        return session.state();
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Analyzing URL... This may take a moment.");
    spinner.enable_steady_tick(Duration::from_millis(100));

    if let Err(e) = handle.await {
        log::warn!("analysis task failed: {}", e);
    }

    spinner.finish_and_clear();
    session.state()
}

fn report(state: &AnalysisState, json: bool) -> Result<()> {
    match state {
        AnalysisState::Success(result) if json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        AnalysisState::Failure(message) => Err(PhishGuardError::Analysis(message.clone())),
        _ => {
            print!("{}", render::render_state(state));
            Ok(())
        }
    }
}

fn print_examples() {
    println!("サンプルURL:");
    for (i, example) in EXAMPLE_URLS.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, example.label, example.url);
    }
    println!();
}

fn resolve_example(choice: &str) -> Option<&'static str> {
    let index: usize = choice.parse().ok()?;
    EXAMPLE_URLS.get(index.checked_sub(1)?).map(|e| e.url)
}
