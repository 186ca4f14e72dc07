// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course-Admin command line
//!
//! Logs an admin in, creates courses and uploads lesson content against the
//! course-management API.

use anyhow::Context;
use clap::{Parser, Subcommand};
use course_admin::{
    config::Config,
    flow::AbortSignal,
    forms::{CourseForm, LoginForm, UploadForm},
    models::UploadFile,
    services::{CourseListFlow, CreateCourseFlow, LoginFlow, UploadContentFlow},
    AdminClient,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "course-admin",
    about = "Admin client for the course-management platform",
    version
)]
struct Cli {
    /// Backend base URL (overrides COURSE_ADMIN_API_URL).
    #[arg(long, value_name = "url")]
    api_url: Option<String>,
    /// Session file (overrides COURSE_ADMIN_SESSION_FILE).
    #[arg(long, value_name = "path")]
    session_file: Option<PathBuf>,
    /// Emit JSON logs on stderr.
    #[arg(long)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "COURSE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the stored profile.
    Whoami,
    /// Create a course.
    CreateCourse {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        title_suffix: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        syllabus: String,
        /// Price in the smallest currency unit.
        #[arg(long)]
        price: i64,
    },
    /// Upload lesson content for a course.
    Upload {
        #[arg(long)]
        course: String,
        #[arg(long)]
        content_type: String,
        #[arg(long)]
        lesson_title: String,
        #[arg(long, default_value = "")]
        order: String,
        /// Save as draft instead of publishing.
        #[arg(long)]
        draft: bool,
        #[arg(long, value_name = "path")]
        file: PathBuf,
    },
    /// List courses.
    Courses,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url).context("Invalid --api-url")?;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    tracing::debug!(api_url = %config.api_url, session = %config.session_file.display(), "Configuration loaded");

    let client = AdminClient::from_config(config)?;

    // Ctrl-C aborts whatever request is in flight
    let abort = AbortSignal::new();
    {
        let abort = abort.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                abort.abort();
            }
        });
    }

    match cli.command {
        Command::Login { email, password } => {
            let request = LoginForm { email, password }.into_request()?;
            let flow = LoginFlow::new(client.auth.clone());
            flow.login(&request, &abort).await;
            if let Some(error) = flow.state().error() {
                anyhow::bail!(error);
            }
            let data = flow.state().data().and_then(|r| r.data).unwrap_or_default();
            if !data.has_access_token() {
                anyhow::bail!("Login response carried no access token; session not saved");
            }
            let role = data.role.or_else(|| data.profile.and_then(|p| p.role));
            println!(
                "Logged in as {}{}",
                request.email,
                role.map(|r| format!(" ({})", r)).unwrap_or_default()
            );
        }
        Command::Logout => {
            client.auth.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match client.auth.current_session()? {
            Some(session) => {
                let summary = serde_json::json!({
                    "name": session.profile.as_ref().and_then(|p| p.display_name()),
                    "profile": session.profile,
                    "hasAccessToken": session.access_token.is_some(),
                    "hasRefreshToken": session.refresh_token.is_some(),
                    "savedAt": session.saved_at.map(|t| t.to_rfc3339()),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            None => anyhow::bail!("Not logged in"),
        },
        Command::CreateCourse {
            title,
            title_suffix,
            subject,
            syllabus,
            price,
        } => {
            let course = CourseForm {
                title,
                title_suffix,
                subject,
                syllabus,
                price: Some(price),
            }
            .into_course()?;
            let flow = CreateCourseFlow::new(client.courses.clone());
            match flow.create_course(&course, &abort).await {
                Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                None => anyhow::bail!(flow.state().error().unwrap_or_default()),
            }
        }
        Command::Upload {
            course,
            content_type,
            lesson_title,
            order,
            draft,
            file,
        } => {
            let file = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let upload = UploadForm {
                course,
                content_type,
                lesson_title,
                order,
                save_to_draft: draft,
                file: Some(file),
            }
            .into_upload()?;
            let flow = UploadContentFlow::new(client.content.clone());
            match flow.upload(upload, &abort).await {
                Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                None => anyhow::bail!(flow.state().error().unwrap_or_default()),
            }
        }
        Command::Courses => {
            let flow = CourseListFlow::new(client.courses.clone());
            match flow.fetch(&abort).await {
                Some(courses) => println!("{}", serde_json::to_string_pretty(&courses)?),
                None => anyhow::bail!(flow.state().error().unwrap_or_default()),
            }
        }
    }

    Ok(())
}

/// Initialize logging on stderr, JSON or human-readable.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("course_admin=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
