use anyhow::Result;
use breadcrumbs::cli::{Cli, Commands};
use breadcrumbs::commands;
use breadcrumbs::output::CliError;
use breadcrumbs::BreadcrumbContext;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            // Structured failures go out as JSON; anything else as prose
            if let Some(cli_err) = err.downcast_ref::<CliError>() {
                eprintln!("{}", cli_err.to_json());
            } else {
                eprintln!("{} {err:#}", "Error:".red().bold());
            }
            1
        }
    };
    process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completion { shell } = &cli.command {
        print_completions(*shell, &mut Cli::command());
        return Ok(0);
    }

    let ctx = BreadcrumbContext::new()?;

    match cli.command {
        Commands::Init { force } => {
            commands::init::execute(&ctx, force)?;
        }
        Commands::Add {
            path,
            message,
            severity,
            source,
            expires,
            ttl,
            session,
            human_only,
            agent_only,
            author,
            force,
        } => {
            commands::add::execute(
                &ctx,
                &path,
                &message,
                commands::add::AddOptions {
                    severity,
                    source,
                    expires,
                    ttl,
                    session,
                    human_only,
                    agent_only,
                    author,
                    force,
                },
            )?;
        }
        Commands::Edit {
            target,
            message,
            append,
            severity,
            expires,
            ttl,
            clear_expiration,
        } => {
            commands::edit::execute(
                &ctx,
                &target,
                &commands::edit::EditOptions {
                    message,
                    append,
                    severity,
                    expires,
                    ttl,
                    clear_expiration,
                },
            )?;
        }
        Commands::Show { path, id, pretty } => {
            commands::show::execute(&ctx, path.as_deref(), id.as_deref(), pretty)?;
        }
        Commands::Rm { path, id } => {
            commands::rm::execute(&ctx, path.as_deref(), id.as_deref())?;
        }
        Commands::Check {
            path,
            recursive,
            audience,
        } => {
            return commands::check::execute(&ctx, &path, recursive, audience);
        }
        Commands::Ls {
            expired,
            severity,
            pretty,
        } => {
            commands::ls::execute(&ctx, expired, severity, pretty)?;
        }
        Commands::Search {
            query,
            regex,
            ignore_case,
            case_sensitive,
            expired,
            severity,
            path,
        } => {
            commands::search::execute(
                &ctx,
                &query,
                &commands::search::SearchOptions {
                    regex,
                    ignore_case,
                    case_sensitive,
                    expired,
                    severity,
                    path,
                },
            )?;
        }
        Commands::Coverage {
            path,
            glob,
            expired,
            show_covered,
            show_uncovered,
            limit,
        } => {
            commands::coverage::execute(
                &ctx,
                &path,
                &commands::coverage::CoverageOptions {
                    glob,
                    expired,
                    show_covered,
                    show_uncovered,
                    limit,
                },
            )?;
        }
        Commands::Status => {
            commands::status::execute(&ctx)?;
        }
        Commands::Prune { dry_run } => {
            commands::prune::execute(&ctx, dry_run)?;
        }
        Commands::Verify {
            path,
            update,
            stale_only,
        } => {
            return commands::verify::execute(&ctx, path.as_deref(), update, stale_only);
        }
        Commands::SessionEnd { session_id } => {
            commands::session_end::execute(&ctx, &session_id)?;
        }
        Commands::Completion { .. } => unreachable!("handled before context setup"),
    }

    Ok(0)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
