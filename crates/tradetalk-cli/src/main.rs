use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use tradetalk_core::domain::{
    Announcement, Profile, ProfileDraft, Project, ProjectDraft, Role, RolodexSource, Thread, User,
};
use tradetalk_core::impls::StaticAuth;
use tradetalk_core::ports::{Clock, SystemClock};
use tradetalk_core::{AppBuilder, RulesConfig, Stores};

#[derive(Parser, Debug)]
#[command(name = "tradetalk")]
#[command(about = "Runs the TradeTalk messaging rules against an in-memory store")]
struct Args {
    /// JSON seed file (GC, trades, project). Built-in demo data when omitted.
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Overrides TRADETALK_FANOUT_CONCURRENCY.
    #[arg(short, long)]
    concurrency: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Seed {
    gc: ProfileDraft,
    trades: Vec<ProfileDraft>,
    project: ProjectSeed,
}

#[derive(Debug, Deserialize)]
struct ProjectSeed {
    name: String,
    #[serde(default)]
    address: Option<String>,
}

impl Seed {
    fn demo() -> Self {
        let trade = |email: &str, name: &str, category: &str| ProfileDraft {
            email: email.into(),
            role: Role::Trade,
            display_name: name.into(),
            company_name: Some(format!("{name} LLC")),
            trade_category: Some(category.into()),
        };
        Self {
            gc: ProfileDraft {
                email: "pat@ridgeline.example".into(),
                role: Role::Gc,
                display_name: "Pat Ridgeline".into(),
                company_name: Some("Ridgeline Builders".into()),
                trade_category: None,
            },
            trades: vec![
                trade("ops@brightwire.example", "Brightwire Electric", "electrical"),
                trade("office@deepflow.example", "Deepflow Plumbing", "plumbing"),
                trade("crew@toplineroof.example", "Topline Roofing", "roofing"),
            ],
            project: ProjectSeed {
                name: "Maple St. Duplex".into(),
                address: Some("41 Maple St".into()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    gc: Profile,
    project: Project,
    rolodex: Vec<Profile>,
    promoted_thread: Option<Thread>,
    announcement: Announcement,
    unread_before: Vec<(String, usize)>,
    marked_read: usize,
    unread_after: Vec<(String, usize)>,
    inbox: Vec<Thread>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradetalk=info,tradetalk_core=debug".into()),
        )
        // stdout carries the JSON report
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = RulesConfig::from_env()?;
    if let Some(concurrency) = args.concurrency {
        config.fanout_concurrency = concurrency;
    }

    let seed = match &args.seed {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading seed file {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))?
        }
        None => Seed::demo(),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stores = Stores::in_memory(clock.clone());

    let gc = stores.profiles.create(seed.gc).await?;
    let trades = stores.profiles.bulk_create(seed.trades).await?;
    let project = stores
        .projects
        .create(ProjectDraft {
            name: seed.project.name,
            gc_profile_id: gc.id,
            address: seed.project.address,
        })
        .await?;
    info!(gc = %gc.id, trades = trades.len(), project = %project.id, "seeded in-memory store");

    let app = AppBuilder::new()
        .stores(stores)
        .auth(StaticAuth::signed_in(User {
            email: gc.email.clone(),
            full_name: Some(gc.display_name.clone()),
        }))
        .clock(clock)
        .config(config)
        .build()?;

    let me = app
        .current_profile()
        .await?
        .ok_or_else(|| anyhow!("signed-in user has no profile"))?;

    for trade in &trades {
        app.ensure_rolodex_link(Some(me.id), Some(trade.id), RolodexSource::Manual)
            .await?;
        app.link_trade_to_project(project.id, trade.id).await?;
    }
    let rolodex = app.get_linked_trades(me.id).await?;

    // A direct conversation that later moves under the project.
    let first = trades.first().ok_or_else(|| anyhow!("seed has no trades"))?;
    let direct = app.find_or_create_direct_thread(first.id).await?;
    app.post_message(direct.id, me.id, Role::Gc, "Can you quote the panel upgrade?")
        .await?;
    app.post_message(direct.id, first.id, Role::Trade, "Sure, site visit Thursday.")
        .await?;
    let promoted_thread = app
        .move_thread_to_project(direct.id, project.id, first.id)
        .await?;

    let announcements = app.ensure_announcement_thread(project.id).await?;
    let announcement = app
        .create_announcement_for_project(
            project.id,
            &gc.email,
            me.id,
            "Concrete pour Monday 7am. Keep the driveway clear.",
        )
        .await?;
    app.post_message(announcements.id, me.id, Role::Gc, &announcement.body)
        .await?;

    let unread_before = unread_by_trade(&app, &project, &trades).await?;
    let marked_read = app.mark_announcements_read(project.id, first.id).await?;
    let unread_after = unread_by_trade(&app, &project, &trades).await?;

    let inbox = app.list_inbox(false).await?;

    let report = Report {
        gc: me,
        project,
        rolodex,
        promoted_thread,
        announcement,
        unread_before,
        marked_read,
        unread_after,
        inbox,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn unread_by_trade(
    app: &tradetalk_core::App,
    project: &Project,
    trades: &[Profile],
) -> anyhow::Result<Vec<(String, usize)>> {
    let mut counts = Vec::with_capacity(trades.len());
    for trade in trades {
        let unread = app.get_unread_announcement_count(project.id, trade.id).await?;
        counts.push((trade.display_name.clone(), unread));
    }
    Ok(counts)
}
