//! Entry point for the rackwatch TUI. Parses args, resolves the backend and runs the App.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use tracing::info;

use rackwatch::app::App;
use rackwatch::config::Settings;
use rackwatch::logging::{default_log_path, init_file_logging};
use rackwatch::nav::Role;
use rackwatch::profiles::{load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile};
use rackwatch::{HttpTransport, OfflineTransport, RefreshCoordinator, TelemetryAdapter};

const DEMO_PORT: u16 = 5055;

struct ParsedArgs {
    url: Option<String>,
    role: Option<String>,
    profile: Option<String>,
    save: bool,
    demo: bool,
    offline: bool,
    interval: Option<u64>,
    log: Option<PathBuf>,
    dry_run: bool,
}

enum CliError {
    Help(String),
    Invalid(String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--role ROLE|-r ROLE] [--profile NAME|-P NAME] [--save] [--demo] [--offline] \
         [--interval SECS|-i SECS] [--log FILE] [--dry-run] [http://HOST:PORT]\n\
         ROLE is one of admin, operator, viewer"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, CliError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "rackwatch".into());
    let mut parsed = ParsedArgs {
        url: None,
        role: None,
        profile: None,
        save: false,
        demo: false,
        offline: false,
        interval: None,
        log: None,
        dry_run: false,
    };

    let parse_secs = |v: Option<String>| -> Result<u64, CliError> {
        v.as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| CliError::Invalid(format!("--interval expects a positive number of seconds\n{}", usage(&prog))))
    };

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(CliError::Help(usage(&prog))),
            "--role" | "-r" => parsed.role = it.next(),
            "--profile" | "-P" => parsed.profile = it.next(),
            "--interval" | "-i" => parsed.interval = Some(parse_secs(it.next())?),
            "--log" => parsed.log = it.next().map(PathBuf::from),
            "--save" => parsed.save = true,
            "--demo" => parsed.demo = true,
            "--offline" => parsed.offline = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.starts_with("--role=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.role = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--interval=") => {
                let v = arg.split_once('=').map(|(_, v)| v.to_string());
                parsed.interval = Some(parse_secs(v)?);
            }
            _ if arg.starts_with('-') => {
                return Err(CliError::Invalid(format!("Unknown option '{arg}'.\n{}", usage(&prog))));
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(CliError::Invalid(format!("Unexpected argument.\n{}", usage(&prog))));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(CliError::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(CliError::Invalid(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let mut settings = Settings::from_env();
    if let Some(secs) = parsed.interval {
        settings.refresh_interval = Duration::from_secs(secs);
    }
    settings.offline = parsed.offline;

    // Demo mode short-circuit (ignores URL and profile lookup)
    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        settings.role = parse_role(parsed.role.as_deref())?.unwrap_or(settings.role);
        return run_demo_mode(settings, &parsed).await;
    }

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        role: parsed.role.clone(),
    };
    let resolved = req.resolve(&profiles_file);

    let mut profiles_mut = profiles_file.clone();
    let (url, role): (String, Option<String>) = match resolved {
        ResolveProfile::Direct(u, r) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    role: r.clone(),
                };
                let write = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing != entry => {
                        parsed.save || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "))
                    }
                    Some(_) => false,
                };
                if write {
                    profiles_mut.profiles.insert(name.clone(), entry);
                    if let Err(e) = save_profiles(&profiles_mut) {
                        eprintln!("could not save profile '{name}': {e}");
                    }
                }
            }
            (u, r)
        }
        ResolveProfile::Loaded(u, r) => (u, r),
        ResolveProfile::PromptSelect(mut names) => {
            // Always add demo option to list
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|idx| (1..=names.len()).contains(idx))
                .map(|idx| names[idx - 1].clone())
            else {
                return Ok(());
            };
            if name == "demo" {
                settings.role = parse_role(parsed.role.as_deref())?.unwrap_or(settings.role);
                return run_demo_mode(settings, &parsed).await;
            }
            match profiles_mut.profiles.get(&name) {
                Some(entry) => (entry.url.clone(), parsed.role.clone().or_else(|| entry.role.clone())),
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            let role = match parsed.role.clone() {
                Some(r) => Some(r),
                None => {
                    let r = prompt_string("Enter role (admin/operator/viewer, blank for admin): ")?;
                    Some(r.trim().to_string()).filter(|r| !r.is_empty())
                }
            };
            profiles_mut.profiles.insert(
                name.clone(),
                ProfileEntry {
                    url: url.trim().to_string(),
                    role: role.clone(),
                },
            );
            if let Err(e) = save_profiles(&profiles_mut) {
                eprintln!("could not save profile '{name}': {e}");
            }
            (url.trim().to_string(), role)
        }
        ResolveProfile::None => (settings.base_url.clone(), parsed.role.clone()),
    };

    settings.base_url = url;
    settings.role = parse_role(role.as_deref())?.unwrap_or(settings.role);

    if parsed.dry_run {
        println!("{settings}");
        return Ok(());
    }
    run_dashboard(settings, parsed.log.clone()).await
}

fn parse_role(role: Option<&str>) -> anyhow::Result<Option<Role>> {
    role.map(|r| r.parse::<Role>().map_err(anyhow::Error::msg))
        .transpose()
}

async fn run_dashboard(settings: Settings, log: Option<PathBuf>) -> anyhow::Result<()> {
    let log_path = log.unwrap_or_else(default_log_path);
    init_file_logging(&log_path).with_context(|| format!("opening log file {}", log_path.display()))?;
    info!(
        backend = %settings.base_url,
        role = %settings.role,
        offline = settings.offline,
        refresh_secs = settings.refresh_interval.as_secs(),
        "starting dashboard"
    );

    if settings.offline {
        let mut app = App::new(&settings, "offline (synthetic data)".into());
        let coordinator = RefreshCoordinator::new(TelemetryAdapter::new(OfflineTransport));
        return app.run(coordinator).await;
    }

    let transport = HttpTransport::new(&settings.base_url, settings.request_timeout)?;
    let mut app = App::new(&settings, transport.base_url().to_string());
    app.run(RefreshCoordinator::new(TelemetryAdapter::new(transport))).await
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

async fn run_demo_mode(mut settings: Settings, parsed: &ParsedArgs) -> anyhow::Result<()> {
    settings.base_url = format!("http://127.0.0.1:{DEMO_PORT}");
    if parsed.dry_run {
        println!("{settings}");
        return Ok(());
    }
    let child = spawn_demo_agent(DEMO_PORT)?;
    // Use select to handle Ctrl-C and normal quit
    tokio::select! {
        res = run_dashboard(settings, parsed.log.clone()) => { drop(child); res }
        _ = tokio::signal::ctrl_c() => {
            // Drop child (kills agent) then return
            drop(child);
            Ok(())
        }
    }
}

/// Kills the demo agent when dropped.
struct DemoGuard(Option<std::process::Child>);

impl Drop for DemoGuard {
    fn drop(&mut self) {
        if let Some(mut ch) = self.0.take() {
            let _ = ch.kill();
            let _ = ch.wait();
        }
    }
}

fn spawn_demo_agent(port: u16) -> anyhow::Result<DemoGuard> {
    let candidate = find_agent_executable();
    let child = std::process::Command::new(&candidate)
        .arg("--port")
        .arg(port.to_string())
        .env("RACKWATCH_AGENT_LOG", "warn")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("starting demo agent {}", candidate.display()))?;
    // Give the agent a brief moment to start
    std::thread::sleep(Duration::from_millis(300));
    Ok(DemoGuard(Some(child)))
}

fn find_agent_executable() -> PathBuf {
    if let Some(parent) = env::current_exe().ok().as_deref().and_then(|exe| exe.parent()) {
        #[cfg(windows)]
        let name = "rackwatch_agent.exe";
        #[cfg(not(windows))]
        let name = "rackwatch_agent";
        let candidate = parent.join(name);
        if candidate.exists() {
            return candidate;
        }
    }
    // Fallback to relying on PATH
    PathBuf::from("rackwatch_agent")
}
