// src/cli.rs
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::auth::{ForgotPasswordFlow, LoginForm, RegisterForm, ResetStep};
use crate::client::MasarClient;
use crate::job_tracker::{JobFilter, JobStatus};
use crate::optimization::{CvFile, OptimizationState};
use crate::presentation::render_report;
use crate::types::auth::Role;

#[derive(Parser)]
#[command(name = "masar-client")]
#[command(about = "Career tools client: accounts, CV optimization and job tracking")]
pub struct MasarCli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and keep the session
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        /// Accept the Terms & Privacy policy
        #[arg(long)]
        accept_terms: bool,
    },
    /// Reset a forgotten password with an emailed OTP
    ForgotPassword {
        #[arg(long)]
        email: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Upload a CV (PDF or Word) for optimization
    Optimize {
        file: PathBuf,
        /// Save the optimized document when done
        #[arg(long)]
        download: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show a stored optimization result
    Show { id: i64 },
    /// Download the optimized document of a stored result
    Download {
        id: i64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Track job applications
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// Record a new application
    Add {
        company: String,
        position: String,
        /// Application date (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List applications, most recent first
    List {
        /// all, applied, interviewing or offers
        #[arg(long, default_value = "all")]
        filter: JobFilter,
    },
    /// Change the status of an application (id or id prefix)
    Status { id: String, status: JobStatus },
    /// Stop tracking an application (id or id prefix)
    Remove { id: String },
}

pub async fn handle_command(cli: MasarCli, client: &MasarClient) -> Result<()> {
    match cli.command {
        Command::Login { email, password } => {
            let form = LoginForm {
                email: value_or_prompt(email, "Email")?,
                password: value_or_prompt(password, "Password")?,
            };
            let request = form.validate()?;

            let session = client
                .auth()
                .login(&request.email, &request.password)
                .await
                .map_err(|e| anyhow::anyhow!(e.ui_message()))?;

            println!("✅ Welcome back, {}", display_name(&session.full_name, &session.email));
        }

        Command::Register {
            full_name,
            email,
            password,
            role,
            accept_terms,
        } => {
            let form = RegisterForm {
                full_name: value_or_prompt(full_name, "Full name")?,
                email: value_or_prompt(email, "Email")?,
                password: value_or_prompt(password, "Password")?,
                role,
                terms_accepted: accept_terms,
            };
            let request = form.validate()?;

            let session = client
                .auth()
                .register(&request)
                .await
                .map_err(|e| anyhow::anyhow!(e.ui_message()))?;

            println!("✅ Account created for {}", session.email);
        }

        Command::ForgotPassword { email } => {
            run_forgot_password(client, email).await?;
        }

        Command::Logout => {
            client.auth().logout();
            println!("Signed out");
        }

        Command::Whoami => {
            let user = client.tokens().require_session()?;
            println!("{}", display_name(&user.full_name, &user.email));
            println!("  Email: {}", user.email);
            println!("  User ID: {}", user.user_id);
            if let Some(role) = user.role {
                println!("  Role: {}", role);
            }
            if let Some(expires_at) = client.tokens().expires_at() {
                let note = if client.tokens().is_expired(chrono::Utc::now()) {
                    " (expired)"
                } else {
                    ""
                };
                println!("  Session expires: {}{}", expires_at.to_rfc3339(), note);
            }
        }

        Command::Optimize {
            file,
            download,
            out,
        } => {
            let cv = CvFile::from_path(&file).await?;
            let mut pipeline = client.pipeline();
            pipeline.select_file(cv);

            let outcome = pipeline.optimize_with(draw_progress).await;
            println!();
            let result = outcome?;

            print!("{}", render_report(&result));

            if download {
                let dir = out.unwrap_or_else(|| client.config().download_dir.clone());
                let path = pipeline.download(&dir).await?;
                println!("\n✅ Saved {}", path.display());
            }
        }

        Command::Show { id } => {
            let result = client.optimization().get_optimization(id).await?;
            print!("{}", render_report(&result));
        }

        Command::Download { id, out } => {
            let result = client.optimization().get_optimization(id).await?;
            let mut pipeline = client.pipeline();
            pipeline.set_result(result);

            let dir = out.unwrap_or_else(|| client.config().download_dir.clone());
            let path = pipeline.download(&dir).await?;
            println!("✅ Saved {}", path.display());
        }

        Command::Jobs { command } => handle_jobs_command(command, client).await?,
    }

    Ok(())
}

async fn handle_jobs_command(command: JobsCommand, client: &MasarClient) -> Result<()> {
    let mut tracker = client.load_jobs().await?;

    match command {
        JobsCommand::Add {
            company,
            position,
            date,
            notes,
        } => {
            let applied_on = date.unwrap_or_else(|| Local::now().date_naive());
            let application = tracker.add(&company, &position, applied_on, notes.as_deref())?;
            println!("✅ Tracking {} at {} ({})", application.position, application.company, application.id);
        }

        JobsCommand::List { filter } => {
            let applications = tracker.filter(filter);
            if applications.is_empty() {
                println!("No applications yet");
            }
            for application in applications {
                let id = application.id.to_string();
                println!(
                    "{}  {:<24} {:<28} {:<13} {}",
                    &id[..8],
                    application.company,
                    application.position,
                    application.status,
                    application.applied_on
                );
            }
            return Ok(());
        }

        JobsCommand::Status { id, status } => {
            let id = tracker.resolve(&id)?;
            tracker.update_status(id, status)?;
            println!("Updated to {}", status);
        }

        JobsCommand::Remove { id } => {
            let id = tracker.resolve(&id)?;
            let removed = tracker.remove(id)?;
            println!("Removed {} at {}", removed.position, removed.company);
        }
    }

    client.save_jobs(&tracker).await
}

async fn run_forgot_password(client: &MasarClient, email: Option<String>) -> Result<()> {
    let auth = client.auth();
    let mut flow = ForgotPasswordFlow::new();
    let mut email = email;

    while !flow.is_completed() {
        println!("{}", flow.prompt());

        let outcome = match flow.step() {
            ResetStep::Email => {
                let value = value_or_prompt(email.take(), "Email")?;
                flow.submit_email(auth, value.trim()).await
            }
            ResetStep::Otp => {
                let code = prompt("OTP (or 'back' to change email)")?;
                if code.eq_ignore_ascii_case("back") {
                    flow.back_to_email()?;
                    continue;
                }
                flow.submit_otp(auth, &code).await
            }
            ResetStep::Password => {
                let new_password = prompt("New password")?;
                let confirmation = prompt("Confirm password")?;
                flow.submit_new_password(auth, &new_password, &confirmation)
                    .await
            }
            ResetStep::Completed => break,
        };

        match outcome {
            Ok(()) => {
                if let Some(message) = flow.success_message() {
                    println!("✅ {}", message);
                }
            }
            Err(e) => println!("❌ {}", e.ui_message()),
        }
    }

    info!("Password reset completed for {}", flow.email());
    Ok(())
}

fn draw_progress(state: &OptimizationState) {
    const WIDTH: usize = 30;
    let filled = state.progress as usize * WIDTH / 100;
    let label = crate::optimization::pipeline::status_message(state.status)
        .or(state.error.as_deref())
        .unwrap_or(state.status.as_str());

    print!(
        "\r[{}{}] {:>3}% {:<40}",
        "#".repeat(filled),
        " ".repeat(WIDTH - filled),
        state.progress,
        label
    );
    let _ = io::stdout().flush();
}

fn display_name<'a>(full_name: &'a str, email: &'a str) -> &'a str {
    if full_name.trim().is_empty() {
        email
    } else {
        full_name
    }
}

fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    if read == 0 {
        bail!("Input closed");
    }
    Ok(input.trim().to_string())
}
