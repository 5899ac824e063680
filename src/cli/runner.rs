//! CLI runner - executes commands

use crate::api::PortalClient;
use crate::cli::commands::{
    Cli, Commands, DiseasesCommands, EvidenceCommands, FarmersCommands, OutputFormat,
    RoutesCommands, SchedulesCommands,
};
use crate::claims::{group_by_farmer, FarmerEvidenceGroup};
use crate::config::PortalConfig;
use crate::error::{Error, Result};
use crate::models::{ScheduleStats, ScheduleStatus};
use crate::pagination::{token_strip, Pager};
use crate::routes::{decide, RouteDecision};
use crate::session::{FileSessionStore, SessionManager};
use crate::types::OptionStringExt;
use serde_json::{json, Value};
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let portal = PortalClient::with_config(config.client_config());
        let sessions = SessionManager::new(
            portal.auth(),
            Arc::new(FileSessionStore::new(&config.session_file)),
        );

        match &self.cli.command {
            Commands::Login {
                identifier,
                password,
            } => self.login(&sessions, identifier, password).await,
            Commands::Logout => self.logout(&sessions).await,
            Commands::Whoami => self.whoami(&sessions).await,
            Commands::Farmers { command } => match command {
                FarmersCommands::List {
                    search,
                    page,
                    page_size,
                } => {
                    self.list_farmers(
                        &config,
                        &portal,
                        &sessions,
                        search.as_deref(),
                        *page,
                        *page_size,
                    )
                    .await
                }
                FarmersCommands::Show { pcicid } => {
                    self.show_farmer(&portal, &sessions, pcicid).await
                }
            },
            Commands::Schedules { command } => match command {
                SchedulesCommands::List { status, farmer } => {
                    self.list_schedules(&portal, &sessions, status.as_deref(), farmer.as_deref())
                        .await
                }
                SchedulesCommands::Done { id } => {
                    self.mark_schedule_done(&portal, &sessions, id).await
                }
            },
            Commands::Evidence { command } => match command {
                EvidenceCommands::List { farmer, grouped } => {
                    self.list_evidence(&portal, &sessions, farmer.as_deref(), *grouped)
                        .await
                }
            },
            Commands::Diseases { command } => match command {
                DiseasesCommands::List { search } => {
                    self.list_diseases(&portal, &sessions, search.as_deref())
                        .await
                }
            },
            Commands::Routes { command } => match command {
                RoutesCommands::Check { path } => self.check_route(&sessions, path).await,
            },
        }
    }

    /// Load the portal configuration
    fn load_config(&self) -> Result<PortalConfig> {
        match &self.cli.config {
            Some(path) => PortalConfig::load(path),
            None => PortalConfig::from_env(),
        }
    }

    /// Sign in and store the session
    async fn login(
        &self,
        sessions: &SessionManager,
        identifier: &str,
        password: &str,
    ) -> Result<()> {
        let session = sessions.login(identifier, password).await?;

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "session": session })),
            OutputFormat::Table => {
                println!("Signed in as {} ({})", session.display_name, session.role);
            }
        }
        Ok(())
    }

    /// Sign out
    async fn logout(&self, sessions: &SessionManager) -> Result<()> {
        sessions.logout().await?;

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "signed_in": false })),
            OutputFormat::Table => println!("Signed out"),
        }
        Ok(())
    }

    /// Show the signed-in user
    async fn whoami(&self, sessions: &SessionManager) -> Result<()> {
        let session = sessions.current().await?;

        match self.cli.format {
            OutputFormat::Json => match session {
                Some(session) => {
                    self.output_json(&json!({ "signed_in": true, "session": session }));
                }
                None => self.output_json(&json!({ "signed_in": false })),
            },
            OutputFormat::Table => match session {
                Some(session) => {
                    println!("{} ({})", session.display_name, session.role);
                    println!("User id: {}", session.user_id);
                    if let Some(pcic_id) = &session.pcic_id {
                        println!("PCIC ID: {pcic_id}");
                    }
                    if let Some(email) = &session.email {
                        println!("Email:   {email}");
                    }
                    println!(
                        "Signed in since {}",
                        session.issued_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                None => println!("Not signed in"),
            },
        }
        Ok(())
    }

    /// List farmers, one page at a time
    async fn list_farmers(
        &self,
        config: &PortalConfig,
        portal: &PortalClient,
        sessions: &SessionManager,
        search: Option<&str>,
        page: usize,
        page_size: Option<usize>,
    ) -> Result<()> {
        sessions.require().await?;

        let mut farmers = portal.farmers().get_all().await?.items;
        if let Some(query) = search.map(ToString::to_string).none_if_empty() {
            farmers.retain(|f| f.matches(&query));
        }

        let mut pager = Pager::new(farmers)
            .with_page_size(page_size.unwrap_or(config.pagination.page_size));
        pager.set_page(page);

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({
                "items": pager.current_slice(),
                "page": pager.current_page(),
                "total_pages": pager.total_pages(),
                "total_items": pager.len(),
            })),
            OutputFormat::Table => {
                println!("{:<14} {:<28} {}", "PCIC ID", "NAME", "CONTACT");
                for farmer in pager.current_slice() {
                    println!(
                        "{:<14} {:<28} {}",
                        farmer.pcicid,
                        farmer.full_name(),
                        farmer.contact.as_deref().unwrap_or("-")
                    );
                }
                println!();
                println!("{}", pager.item_range());
                println!(
                    "Page {} of {}: {}",
                    pager.current_page(),
                    pager.total_pages().max(1),
                    token_strip(&pager.page_tokens())
                );
            }
        }
        Ok(())
    }

    /// Show one farmer
    async fn show_farmer(
        &self,
        portal: &PortalClient,
        sessions: &SessionManager,
        pcicid: &str,
    ) -> Result<()> {
        sessions.require().await?;
        let farmer = portal.farmers().get_by_id(pcicid).await?;

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "farmer": farmer })),
            OutputFormat::Table => {
                println!("{} ({})", farmer.full_name(), farmer.pcicid);
                if let Some(contact) = &farmer.contact {
                    println!("Contact: {contact}");
                }
                if let Some(address) = &farmer.address {
                    println!("Address: {address}");
                }
            }
        }
        Ok(())
    }

    /// List inspection schedules with an aggregate footer
    async fn list_schedules(
        &self,
        portal: &PortalClient,
        sessions: &SessionManager,
        status: Option<&str>,
        farmer: Option<&str>,
    ) -> Result<()> {
        sessions.require().await?;

        let mut schedules = match status {
            Some(value) => {
                portal
                    .schedules()
                    .get_by_status(parse_status(value)?)
                    .await?
            }
            None => portal.schedules().get_all().await?.items,
        };
        if let Some(farmer_id) = farmer {
            schedules.retain(|s| s.farmer_id == farmer_id);
        }
        let stats = ScheduleStats::from_schedules(&schedules);

        match self.cli.format {
            OutputFormat::Json => {
                self.output_json(&json!({ "items": schedules, "stats": stats }));
            }
            OutputFormat::Table => {
                println!(
                    "{:<12} {:<12} {:<12} {:<28} {}",
                    "ID", "DATE", "STATUS", "FARMER", "NOTES"
                );
                for schedule in &schedules {
                    let farmer_name = schedule
                        .farmer
                        .as_ref()
                        .map_or_else(|| schedule.farmer_id.clone(), |f| f.full_name());
                    println!(
                        "{:<12} {:<12} {:<12} {:<28} {}",
                        schedule.id,
                        schedule.scheduled_date.format("%Y-%m-%d"),
                        schedule.status,
                        farmer_name,
                        schedule.notes.as_deref().unwrap_or("-")
                    );
                }
                println!();
                println!(
                    "{} total: {} pending, {} in progress, {} done",
                    stats.total, stats.pending, stats.in_progress, stats.done
                );
            }
        }
        Ok(())
    }

    /// Mark a schedule as done
    async fn mark_schedule_done(
        &self,
        portal: &PortalClient,
        sessions: &SessionManager,
        id: &str,
    ) -> Result<()> {
        sessions.require().await?;
        portal.schedules().mark_as_done(id).await?;

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "id": id, "status": "done" })),
            OutputFormat::Table => println!("Schedule {id} marked as done"),
        }
        Ok(())
    }

    /// List evidence photos, flat or grouped by farmer
    async fn list_evidence(
        &self,
        portal: &PortalClient,
        sessions: &SessionManager,
        farmer: Option<&str>,
        grouped: bool,
    ) -> Result<()> {
        sessions.require().await?;

        let evidences = match farmer {
            Some(farmer_id) => portal.evidence().get_by_farmer(farmer_id).await?.items,
            None => portal.evidence().get_all().await?.items,
        };

        if grouped {
            let groups = group_by_farmer(evidences);
            self.output_evidence_groups(&groups);
            return Ok(());
        }

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "items": evidences })),
            OutputFormat::Table => {
                println!(
                    "{:<12} {:<12} {:<28} {}",
                    "ID", "CAPTURED", "FARMER", "LOCATION"
                );
                for evidence in &evidences {
                    let farmer_name = evidence
                        .farmer
                        .as_ref()
                        .map(|f| f.full_name())
                        .or_else(|| evidence.farmer_id.clone())
                        .unwrap_or_else(|| "-".to_string());
                    let location = evidence
                        .address
                        .clone()
                        .or_else(|| evidence.map_url())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<12} {:<12} {:<28} {}",
                        evidence.id,
                        evidence.captured_at.format("%Y-%m-%d"),
                        farmer_name,
                        location
                    );
                }
            }
        }
        Ok(())
    }

    fn output_evidence_groups(&self, groups: &[FarmerEvidenceGroup]) {
        match self.cli.format {
            OutputFormat::Json => {
                let items: Vec<Value> = groups
                    .iter()
                    .map(|group| {
                        json!({
                            "farmer": group.farmer,
                            "photo_count": group.photo_count(),
                            "schedule": group.schedule,
                            "evidences": group.evidences,
                        })
                    })
                    .collect();
                self.output_json(&json!({ "groups": items }));
            }
            OutputFormat::Table => {
                for group in groups {
                    let schedule_line = group.schedule.as_ref().map_or_else(
                        || "no schedule".to_string(),
                        |s| format!("{} ({})", s.scheduled_date.format("%Y-%m-%d"), s.status),
                    );
                    println!(
                        "{:<28} {:>3} photos   {}",
                        group.farmer.full_name(),
                        group.photo_count(),
                        schedule_line
                    );
                }
                println!();
                println!("{} farmers with evidence", groups.len());
            }
        }
    }

    /// List the rice disease reference
    async fn list_diseases(
        &self,
        portal: &PortalClient,
        sessions: &SessionManager,
        search: Option<&str>,
    ) -> Result<()> {
        sessions.require().await?;

        let diseases = match search.map(ToString::to_string).none_if_empty() {
            Some(term) => portal.diseases().search(&term).await?.items,
            None => portal.diseases().get_all().await?.items,
        };

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({ "items": diseases })),
            OutputFormat::Table => {
                for disease in &diseases {
                    println!("{}", disease.name);
                    if let Some(description) = &disease.description {
                        println!("  {description}");
                    }
                    if let Some(solution) = &disease.solution {
                        println!("  Treatment: {solution}");
                    }
                }
                println!();
                println!("{} diseases", diseases.len());
            }
        }
        Ok(())
    }

    /// Check where a portal path leads for the current session
    async fn check_route(&self, sessions: &SessionManager, path: &str) -> Result<()> {
        let session = sessions.current().await?;
        let decision = decide(path, session.as_ref());

        match self.cli.format {
            OutputFormat::Json => self.output_json(&json!({
                "path": path,
                "role": session.as_ref().map(|s| s.role.as_str()),
                "allowed": decision.is_allowed(),
                "redirect": decision.redirect_target(),
            })),
            OutputFormat::Table => {
                let viewer = session
                    .as_ref()
                    .map_or_else(|| "signed out".to_string(), |s| s.role.to_string());
                match decision {
                    RouteDecision::Allow => println!("{path} ({viewer}): allowed"),
                    RouteDecision::Redirect(target) => {
                        println!("{path} ({viewer}): redirect -> {target}");
                    }
                }
            }
        }
        Ok(())
    }

    /// Print a JSON value
    fn output_json(&self, value: &Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}

/// Parse a schedule status filter
fn parse_status(value: &str) -> Result<ScheduleStatus> {
    match value {
        "pending" => Ok(ScheduleStatus::Pending),
        "in-progress" => Ok(ScheduleStatus::InProgress),
        "done" => Ok(ScheduleStatus::Done),
        other => Err(Error::config(format!(
            "Unknown status '{other}', expected pending, in-progress or done"
        ))),
    }
}
