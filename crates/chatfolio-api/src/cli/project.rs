//! Project CLI commands: list, create, history, tokens, check.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatfolio_infra::llm::{create_provider, test_provider_connection};
use chatfolio_types::config::CompletionConfig;
use chatfolio_types::error::ChatError;

use crate::state::AppState;

/// List all projects in a table.
pub async fn list_projects(state: &AppState, json: bool) -> Result<()> {
    let projects = state.chat_service.list_projects().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!();
        println!(
            "  {} No projects yet. Create one with: {}",
            style("i").blue().bold(),
            style("chatfolio create <name>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for project in &projects {
        let turns = state.chat_service.count_turns(project.id).await?;
        table.add_row(vec![
            Cell::new(project.id).fg(Color::DarkGrey),
            Cell::new(&project.name).fg(Color::Cyan),
            Cell::new(turns),
            Cell::new(format_relative_time(&project.created_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} project{}",
        style(projects.len()).bold(),
        if projects.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Create a project from the command line.
pub async fn create_project(state: &AppState, name: &str, json: bool) -> Result<()> {
    let project = match state.chat_service.create_project(name).await {
        Ok(Some(project)) => project,
        Ok(None) => anyhow::bail!("Project name must not be blank"),
        Err(ChatError::Conflict(name)) => {
            anyhow::bail!("A project named '{name}' already exists")
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    println!();
    println!("  {} Project created!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&project.name).cyan());
    println!("  {}    {}", style("ID:").bold(), style(project.id).dim());
    println!();
    println!(
        "  Chat in the browser: {}",
        style(format!("/chat/{}/", project.id)).yellow()
    );
    println!();

    Ok(())
}

/// Print a project's transcript, oldest turn first.
pub async fn show_history(state: &AppState, project_id: i64, json: bool) -> Result<()> {
    let (project, turns) = state.chat_service.transcript(project_id).await?;

    if json {
        let out = serde_json::json!({
            "project": project,
            "conversations": turns,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(&project.name).cyan().bold(),
        style(format!("({} turns)", turns.len())).dim()
    );
    println!();

    if turns.is_empty() {
        println!("  {}", style("No conversation yet.").dim());
        println!();
        return Ok(());
    }

    for turn in &turns {
        println!(
            "  {}",
            style(turn.timestamp.format("%Y-%m-%d %H:%M:%S")).dim()
        );
        println!("  {} {}", style("You:").bold(), turn.user_input);
        println!("  {} {}", style("AI:").green().bold(), turn.chat_response);
        println!();
    }

    Ok(())
}

/// Estimate the token count of a single user message.
pub async fn count_tokens(state: &AppState, text: &str, json: bool) -> Result<()> {
    let count = state.chat_service.count_tokens(text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&count)?);
        return Ok(());
    }

    println!(
        "  {} ~{} tokens ({})",
        style("i").blue().bold(),
        style(count.input_tokens).bold(),
        state.chat_service.completion().model()
    );
    Ok(())
}

/// Send a tiny completion request to verify the backend and key.
///
/// Does not touch the database.
pub async fn check_provider(config: &CompletionConfig, json: bool) -> Result<()> {
    let provider = create_provider(config);

    if !json {
        print!(
            "  Testing connection to {} ({})... ",
            style(provider.name()).cyan(),
            config.model
        );
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }

    match test_provider_connection(&provider, &config.model).await {
        Ok(()) => {
            if json {
                let out = serde_json::json!({
                    "provider": provider.name(),
                    "model": config.model,
                    "connected": true,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", style("connected").green().bold());
            }
            Ok(())
        }
        Err(e) => {
            if json {
                let out = serde_json::json!({
                    "provider": provider.name(),
                    "model": config.model,
                    "connected": false,
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("{}", style("FAILED").red().bold());
            eprintln!("  {} Connection test failed: {}", style("!").red().bold(), e);
            Err(e.into())
        }
    }
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
