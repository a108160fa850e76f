mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use claims_console::config::{env_keys, parse_page_size};
use claims_console::currency::{Currency, format_compact, format_currency};
use claims_console::models::{
    ClaimType, DamageCode, FnolPayload, FraudRule, MasterEntity, PricingConfig, PricingValueType,
    ProcessClaimResponse,
};
use claims_console::optimistic::{Notification, apply_created, apply_deleted};
use claims_console::projection::project_detail;
use claims_console::screens::{ClaimsTable, MasterTable, PermissionsTable, RolesTable, UsersTable};
use claims_console::{
    ApiClient, ConsoleConfig, ConsoleError, FileSessionStore, LoadState, LoadTracker, Session,
    SessionStore, SortDirection, StatusContext, TableSpec, TableState, fetch_dashboard_inputs,
    fixtures, project_claims, validation,
};
use render::{active_label, or_placeholder, print_fields, print_page_footer, print_table};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "claims-console", version, about = "Terminal console for the vehicle claims automation backend")]
struct Cli {
    /// Backend API root, e.g. http://localhost:8000/api
    #[arg(long, global = true, env = env_keys::API_BASE_URL)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

const NO_CLAIMS_MESSAGE: &str =
    "No claims found. Submit the first one with `claims-console intake submit --file <fnol.json>` or `--demo`.";

#[derive(Subcommand)]
enum Command {
    /// Authenticate and store the session token
    Login {
        #[arg(long, env = "CLAIMS_USERNAME")]
        username: Option<String>,
        #[arg(long, env = "CLAIMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user, role and permissions
    Whoami,
    Claims {
        #[command(subcommand)]
        action: ClaimsCommand,
    },
    /// Headline figures, trend and fraud alerts
    Dashboard,
    /// Claims flagged by fraud detection
    Fraud,
    Intake {
        #[command(subcommand)]
        action: IntakeCommand,
    },
    Masters {
        #[command(subcommand)]
        kind: MastersCommand,
    },
    Users {
        #[command(subcommand)]
        action: ListOnly,
    },
    Roles {
        #[command(subcommand)]
        action: ListOnly,
    },
    Permissions {
        #[command(subcommand)]
        action: ListOnly,
    },
}

/// Search, filter, sort and paging shared by every list.
#[derive(Args, Debug, Clone)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    /// Status filter; `all` removes the screen's default filter
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    desc: bool,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, value_parser = parse_page_size)]
    page_size: Option<usize>,
}

#[derive(Subcommand)]
enum ClaimsCommand {
    List(ListArgs),
    Show { id: String },
    /// Latest evaluation, optionally re-running fraud detection first
    Evaluate {
        id: String,
        #[arg(long)]
        rerun: bool,
    },
}

#[derive(Subcommand)]
enum IntakeCommand {
    /// Save a new FNOL and optionally run the assessment on it
    Submit {
        #[arg(long, conflicts_with = "demo", required_unless_present = "demo")]
        file: Option<PathBuf>,
        /// Generate a plausible demo payload instead of reading a file
        #[arg(long)]
        demo: bool,
        #[arg(long)]
        process: bool,
    },
}

#[derive(Subcommand)]
enum ListOnly {
    List(ListArgs),
}

#[derive(Subcommand)]
enum MastersCommand {
    DamageCodes {
        #[command(subcommand)]
        action: DamageCodeAction,
    },
    ClaimTypes {
        #[command(subcommand)]
        action: ClaimTypeAction,
    },
    FraudRules {
        #[command(subcommand)]
        action: FraudRuleAction,
    },
    Pricing {
        #[command(subcommand)]
        action: PricingAction,
    },
}

#[derive(Subcommand)]
enum DamageCodeAction {
    List(ListArgs),
    Create {
        #[arg(long)]
        damage_type: String,
        /// Severity percentage, 0-100
        #[arg(long)]
        severity: String,
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum ClaimTypeAction {
    List(ListArgs),
    Create {
        #[arg(long)]
        name: String,
        /// Risk percentage, 0-100
        #[arg(long)]
        risk: String,
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum FraudRuleAction {
    List(ListArgs),
    Create {
        #[arg(long)]
        rule_type: String,
        #[arg(long, default_value = "")]
        group: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        expression: String,
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum PricingAction {
    List(ListArgs),
    Create {
        #[arg(long)]
        key: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        value: String,
        /// string, number, decimal, boolean or json
        #[arg(long = "type", default_value = "string")]
        value_type: PricingValueType,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        inactive: bool,
    },
    Delete { id: String },
}

/// Initialize tracing on stderr; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "claims_console=info,claims_console_cli=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(err) = &result {
        if let Some(hint) = err.downcast_ref::<ConsoleError>().and_then(ConsoleError::hint) {
            eprintln!("hint: {hint}");
        }
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConsoleConfig::from_env().context("Invalid console configuration")?;
    if let Some(url) = cli.api_base_url.as_deref() {
        config = config.with_api_base_url(url)?;
    }
    let console = Console::new(config)?;

    match cli.command {
        Command::Login { username, password } => console.login(username, password).await,
        Command::Logout => console.logout().await,
        Command::Whoami => console.whoami().await,
        Command::Claims { action } => match action {
            ClaimsCommand::List(args) => console.list_claims(&args).await,
            ClaimsCommand::Show { id } => console.show_claim(&id).await,
            ClaimsCommand::Evaluate { id, rerun } => console.evaluate_claim(&id, rerun).await,
        },
        Command::Dashboard => console.dashboard().await,
        Command::Fraud => console.fraud().await,
        Command::Intake {
            action: IntakeCommand::Submit { file, demo, process },
        } => console.submit_intake(file, demo, process).await,
        Command::Masters { kind } => console.masters(kind).await,
        Command::Users {
            action: ListOnly::List(args),
        } => console.list_users(&args).await,
        Command::Roles {
            action: ListOnly::List(args),
        } => console.list_roles(&args).await,
        Command::Permissions {
            action: ListOnly::List(args),
        } => console.list_permissions(&args).await,
    }
}

struct Console {
    config: ConsoleConfig,
    client: ApiClient,
    store: FileSessionStore,
    tracker: LoadTracker,
}

impl Console {
    fn new(config: ConsoleConfig) -> anyhow::Result<Self> {
        let client = ApiClient::new(&config)?;
        let store = FileSessionStore::new(config.session_file.clone());
        Ok(Self {
            config,
            client,
            store,
            tracker: LoadTracker::new(),
        })
    }

    /// Restore the stored session and check it grants `permission`.
    async fn session(&self, permission: Option<&str>) -> anyhow::Result<Session> {
        let session = self
            .store
            .load()
            .await?
            .ok_or_else(|| ConsoleError::Unauthorized("no stored session".to_string()))?;
        self.client.restore(&session).await;
        if let Some(code) = permission {
            session.require(code)?;
        }
        debug!(user = %session.username, "Session restored");
        Ok(session)
    }

    async fn login(&self, username: Option<String>, password: Option<String>) -> anyhow::Result<()> {
        let username = match username {
            Some(u) => u,
            None => prompt("Username")?,
        };
        let password = match password {
            Some(p) => p,
            None => prompt("Password")?,
        };
        let mut form = validation::FormErrors::new();
        form.require("Username", &username);
        form.require("Password", &password);
        form.finish()?;

        let session = self.client.login(username.trim(), &password).await.context("Login failed")?;
        self.store.save(&session).await?;
        println!("Logged in as {}", session.username);
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.client.logout().await;
        self.store.clear().await?;
        info!(path = %self.store.path().display(), "Session cleared");
        println!("Logged out");
        Ok(())
    }

    async fn whoami(&self) -> anyhow::Result<()> {
        let session = self.session(None).await?;
        let me = self.client.current_user().await.context("Failed to load current user")?;
        let session = session.with_user(me);
        self.store.save(&session).await?;

        let Some(user) = session.user.as_ref() else {
            bail!("No user details available");
        };
        print_fields(&[
            ("Username", user.username.clone()),
            ("Name", user.display_name()),
            ("Email", or_placeholder(Some(&user.email))),
            ("Role", or_placeholder(user.role.as_ref().map(|r| &r.name))),
            ("Admin", session.is_admin().to_string()),
            ("Permissions", session.permission_codes().join(", ")),
        ]);
        Ok(())
    }

    async fn list_claims(&self, args: &ListArgs) -> anyhow::Result<()> {
        self.session(Some("claims.view")).await?;

        let mut slot = LoadState::Loading;
        let ticket = self.tracker.begin("claims");
        let result = self
            .client
            .list_claims()
            .await
            .map(|records| project_claims(&records, StatusContext::ClaimsList));
        self.tracker.commit(&ticket, &mut slot, LoadState::from_list(result));

        let rows = match slot {
            LoadState::Loaded(rows) => rows,
            LoadState::Failed(message) => bail!("Failed to load claims: {message}"),
            _ => {
                println!("{NO_CLAIMS_MESSAGE}");
                return Ok(());
            }
        };

        let state = table_state::<ClaimsTable>(args, self.config.page_size)?;
        let page = state.apply(&rows);
        if page.meta.total_count == 0 {
            println!("No claims match the current search or status filter");
            return Ok(());
        }
        let table: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.claim_number.clone(),
                    row.customer_name.clone(),
                    row.vehicle.clone(),
                    row.claim_type.clone(),
                    row.incident_date.clone(),
                    format_currency(row.amount, Currency::Thb),
                    row.status.label().to_string(),
                ]
            })
            .collect();
        print_table(
            &["Claim", "Customer", "Vehicle", "Type", "Incident", "Amount", "Status"],
            &table,
        );
        print_page_footer(&page.meta, "claims");
        Ok(())
    }

    async fn show_claim(&self, id: &str) -> anyhow::Result<()> {
        self.session(Some("claims.view")).await?;
        let record = self
            .client
            .get_claim(id)
            .await
            .with_context(|| format!("Failed to load claim {id}"))?;
        let detail = project_detail(&record, StatusContext::ClaimsList);
        let row = &detail.row;

        print_fields(&[
            ("Claim", row.claim_number.clone()),
            ("Status", row.status.label().to_string()),
            ("Customer", row.customer_name.clone()),
            ("Policy", row.policy_number.clone()),
            ("Policy status", detail.policy_status.clone()),
            ("Coverage", detail.coverage_type.clone()),
            ("Policy period", detail.policy_period.clone()),
            ("Vehicle", row.vehicle.clone()),
            ("Registration", detail.registration_number.clone()),
            ("Claim type", row.claim_type.clone()),
            ("Incident", row.incident_date.clone()),
            ("Location", detail.incident_location.clone()),
            ("Description", detail.loss_description.clone()),
            ("Amount", format_currency(row.amount, Currency::Thb)),
            ("Previous claims", or_placeholder(detail.previous_claims)),
            ("Damage severity", detail.damage_severity.clone()),
            ("Detected damages", or_placeholder(Some(detail.detected_damages.join(", ")))),
            ("Photos", detail.damage_photos.len().to_string()),
        ]);

        println!();
        let documents: Vec<Vec<String>> = detail
            .documents
            .iter()
            .map(|(name, uploaded)| {
                vec![
                    name.clone(),
                    if *uploaded { "Uploaded" } else { "Missing" }.to_string(),
                ]
            })
            .collect();
        print_table(&["Document", "State"], &documents);
        Ok(())
    }

    async fn evaluate_claim(&self, id: &str, rerun: bool) -> anyhow::Result<()> {
        self.session(Some("claims.view")).await?;
        if rerun {
            let assessment = self
                .client
                .run_fraud_detection(id)
                .await
                .with_context(|| format!("Fraud detection failed for {id}"))?;
            print_assessment(&assessment);
            println!();
        }

        let evaluation = self
            .client
            .get_claim_evaluation(id)
            .await
            .with_context(|| format!("Failed to load evaluation for {id}"))?;
        print_fields(&[
            ("Claim", or_placeholder(evaluation.complaint_id.as_ref())),
            ("Decision", or_placeholder(evaluation.decision.as_ref())),
            ("Status", or_placeholder(evaluation.claim_status.as_ref())),
            ("Claim type", or_placeholder(evaluation.claim_type.as_ref())),
            ("Damage confidence", or_placeholder(evaluation.damage_confidence)),
            ("Threshold", or_placeholder(evaluation.threshold_value)),
            (
                "Estimated amount",
                or_placeholder(evaluation.estimated_amount.map(|a| format_currency(a, Currency::Thb))),
            ),
            (
                "Claim amount",
                or_placeholder(evaluation.claim_amount.map(|a| format_currency(a, Currency::Thb))),
            ),
            ("Severity", or_placeholder(evaluation.llm_severity.as_ref())),
            (
                "Damages",
                or_placeholder(evaluation.llm_damages.as_ref().map(|d| d.join(", "))),
            ),
            ("Reason", or_placeholder(evaluation.reason.as_ref())),
            ("Evaluated", or_placeholder(evaluation.created_date.as_ref())),
        ]);
        Ok(())
    }

    async fn dashboard(&self) -> anyhow::Result<()> {
        self.session(Some("dashboard.view")).await?;
        let inputs = fetch_dashboard_inputs(&self.client)
            .await
            .context("Failed to load dashboard")?;
        let summary = inputs.summarize();

        print_fields(&[
            ("Total claims", summary.total_claims.to_string()),
            ("Pending review", summary.pending_review.to_string()),
            ("Approved", summary.approved.to_string()),
            ("Validation failed", summary.business_validation_failed.to_string()),
            ("Fraud flagged", summary.fraud_flagged.to_string()),
            ("Total settlement", format_currency(summary.total_settlement, Currency::Thb)),
            ("STP rate", format!("{}%", summary.stp_rate)),
            ("Automation rate", format!("{}%", summary.automation_rate)),
        ]);

        println!("\nDaily trend");
        let trend: Vec<Vec<String>> = summary
            .trend
            .iter()
            .map(|p| vec![p.date.to_string(), p.claims.to_string(), p.approved.to_string()])
            .collect();
        print_table(&["Date", "Claims", "Approved"], &trend);

        println!("\nClaims by type");
        let by_type: Vec<Vec<String>> = summary
            .by_type
            .iter()
            .map(|t| vec![t.claim_type.clone(), t.count.to_string(), format!("{}%", t.percentage)])
            .collect();
        print_table(&["Type", "Count", "Share"], &by_type);

        println!("\nRecent claims");
        let recent: Vec<Vec<String>> = summary
            .recent_claims
            .iter()
            .map(|r| {
                vec![
                    r.claim_number.clone(),
                    r.customer_name.clone(),
                    format_compact(r.amount, Currency::Thb),
                    r.status.label().to_string(),
                ]
            })
            .collect();
        print_table(&["Claim", "Customer", "Amount", "Status"], &recent);

        println!(
            "\nFraud: {} total, {} under review, {} confirmed, {} cleared, detection rate {}%",
            summary.fraud.total,
            summary.fraud.under_review,
            summary.fraud.confirmed,
            summary.fraud.cleared,
            summary.fraud.detection_rate
        );
        let alerts: Vec<Vec<String>> = summary
            .fraud
            .alerts
            .iter()
            .map(|a| {
                vec![
                    or_placeholder(a.claim_number.as_ref()),
                    format!("{:.0}", a.risk_score),
                    or_placeholder(a.reason.as_ref()),
                ]
            })
            .collect();
        print_table(&["Claim", "Risk", "Reason"], &alerts);
        Ok(())
    }

    async fn fraud(&self) -> anyhow::Result<()> {
        self.session(Some("fraud.view")).await?;
        let items = self
            .client
            .list_fraud_claims()
            .await
            .context("Failed to load fraud claims")?;
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                vec![
                    item.complaint_id.clone(),
                    or_placeholder(item.customer.as_ref()),
                    format!("{:.0}", item.risk_score),
                    format_currency(item.amount, Currency::Thb),
                    item.status.label().to_string(),
                    or_placeholder(item.detected_at.as_ref()),
                    item.indicators.join(", "),
                ]
            })
            .collect();
        print_table(
            &["Claim", "Customer", "Risk", "Amount", "Status", "Detected", "Indicators"],
            &rows,
        );
        Ok(())
    }

    async fn submit_intake(&self, file: Option<PathBuf>, demo: bool, process: bool) -> anyhow::Result<()> {
        self.session(None).await?;
        let payload: FnolPayload = match file {
            Some(path) if !demo => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("{} is not a valid FNOL payload", path.display()))?
            }
            _ => fixtures::demo_fnol_payload(&mut rand::rng()),
        };
        validation::validate_fnol(&payload)?;

        let saved = self.client.save_fnol(&payload).await.context("Failed to save FNOL")?;
        println!("Saved claim {} (id {}): {}", payload.claim_id, saved.id, saved.message);

        if process {
            let assessment = self
                .client
                .process_claim(&payload)
                .await
                .context("Claim assessment failed")?;
            println!();
            print_assessment(&assessment);
        }
        Ok(())
    }

    async fn masters(&self, kind: MastersCommand) -> anyhow::Result<()> {
        match kind {
            MastersCommand::DamageCodes { action } => match action {
                DamageCodeAction::List(args) => self.list_master::<DamageCode>(&args).await,
                DamageCodeAction::Create {
                    damage_type,
                    severity,
                    inactive,
                } => {
                    self.create_master::<DamageCode>(validation::damage_code_draft(
                        &damage_type,
                        &severity,
                        !inactive,
                    ))
                    .await
                }
                DamageCodeAction::Delete { id } => self.delete_master::<DamageCode>(&id).await,
            },
            MastersCommand::ClaimTypes { action } => match action {
                ClaimTypeAction::List(args) => self.list_master::<ClaimType>(&args).await,
                ClaimTypeAction::Create { name, risk, inactive } => {
                    self.create_master::<ClaimType>(validation::claim_type_draft(&name, &risk, !inactive))
                        .await
                }
                ClaimTypeAction::Delete { id } => self.delete_master::<ClaimType>(&id).await,
            },
            MastersCommand::FraudRules { action } => match action {
                FraudRuleAction::List(args) => self.list_master::<FraudRule>(&args).await,
                FraudRuleAction::Create {
                    rule_type,
                    group,
                    description,
                    expression,
                    inactive,
                } => {
                    self.create_master::<FraudRule>(validation::fraud_rule_draft(
                        &rule_type,
                        &group,
                        &description,
                        &expression,
                        !inactive,
                    ))
                    .await
                }
                FraudRuleAction::Delete { id } => self.delete_master::<FraudRule>(&id).await,
            },
            MastersCommand::Pricing { action } => match action {
                PricingAction::List(args) => self.list_master::<PricingConfig>(&args).await,
                PricingAction::Create {
                    key,
                    name,
                    value,
                    value_type,
                    description,
                    inactive,
                } => {
                    self.create_master::<PricingConfig>(validation::pricing_config_draft(
                        &key,
                        &name,
                        &value,
                        value_type,
                        &description,
                        !inactive,
                    ))
                    .await
                }
                PricingAction::Delete { id } => self.delete_master::<PricingConfig>(&id).await,
            },
        }
    }

    async fn list_master<E: MasterEntity>(&self, args: &ListArgs) -> anyhow::Result<()> {
        self.session(Some(&format!("{}.view", E::PERMISSION_MODULE))).await?;
        let items = self
            .client
            .list_masters::<E>()
            .await
            .with_context(|| format!("Failed to load {} list", E::LABEL.to_lowercase()))?;
        print_masters(&items, &table_state::<MasterTable<E>>(args, self.config.page_size)?);
        Ok(())
    }

    async fn create_master<E: MasterEntity>(&self, draft: Result<E::Draft, ConsoleError>) -> anyhow::Result<()> {
        self.session(Some(&format!("{}.update", E::PERMISSION_MODULE))).await?;
        let draft = draft?;
        let mut items = self.client.list_masters::<E>().await?;
        let outcome = self.client.create_master::<E>(&draft).await;
        let note = apply_created(&mut items, outcome);
        report(&note)?;
        print_masters(&items, &TableState::<MasterTable<E>>::new().with_page_size(self.config.page_size));
        Ok(())
    }

    async fn delete_master<E: MasterEntity>(&self, id: &str) -> anyhow::Result<()> {
        self.session(Some(&format!("{}.delete", E::PERMISSION_MODULE))).await?;
        let mut items = self.client.list_masters::<E>().await?;
        let outcome = self.client.delete_master::<E>(id).await;
        let note = apply_deleted(&mut items, id, outcome);
        report(&note)?;
        print_masters(&items, &TableState::<MasterTable<E>>::new().with_page_size(self.config.page_size));
        Ok(())
    }

    async fn list_users(&self, args: &ListArgs) -> anyhow::Result<()> {
        self.session(Some("users.view")).await?;
        let users = self.client.list_users().await.context("Failed to load users")?;
        let state = table_state::<UsersTable>(args, self.config.page_size)?;
        let page = state.apply(&users);
        let rows: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|u| {
                vec![
                    u.id.clone(),
                    u.username.clone(),
                    u.display_name(),
                    u.email.clone(),
                    or_placeholder(Some(&u.role)),
                    active_label(u.is_active()),
                    or_placeholder(u.last_login.as_ref()),
                ]
            })
            .collect();
        print_table(&["ID", "Username", "Name", "Email", "Role", "Status", "Last login"], &rows);
        print_page_footer(&page.meta, "users");
        Ok(())
    }

    async fn list_roles(&self, args: &ListArgs) -> anyhow::Result<()> {
        self.session(Some("roles.view")).await?;
        let roles = self.client.list_roles().await.context("Failed to load roles")?;
        let state = table_state::<RolesTable>(args, self.config.page_size)?;
        let page = state.apply(&roles);
        let rows: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.name.clone(),
                    or_placeholder(Some(&r.description)),
                    or_placeholder(r.permission_count),
                    active_label(r.is_active),
                    or_placeholder(r.created_date.as_ref()),
                ]
            })
            .collect();
        print_table(&["ID", "Name", "Description", "Permissions", "Status", "Created"], &rows);
        print_page_footer(&page.meta, "roles");
        Ok(())
    }

    async fn list_permissions(&self, args: &ListArgs) -> anyhow::Result<()> {
        self.session(Some("role_permissions.view")).await?;
        let permissions = self
            .client
            .list_permissions()
            .await
            .context("Failed to load permissions")?;
        let state = table_state::<PermissionsTable>(args, self.config.page_size)?;
        let page = state.apply(&permissions);
        let rows: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.codename.clone(),
                    or_placeholder(Some(&p.name)),
                    or_placeholder(Some(&p.module)),
                    active_label(p.is_active),
                    or_placeholder(p.created_date.as_ref()),
                ]
            })
            .collect();
        print_table(&["ID", "Code", "Name", "Module", "Status", "Created"], &rows);
        print_page_footer(&page.meta, "permissions");
        Ok(())
    }
}

/// Apply list arguments on top of a screen's defaults.
fn table_state<S>(args: &ListArgs, default_page_size: usize) -> anyhow::Result<TableState<S>>
where
    S: TableSpec,
    S::SortKey: FromStr<Err = ConsoleError>,
    S::Filter: FromStr<Err = ConsoleError>,
{
    let mut state = TableState::<S>::new().with_page_size(args.page_size.unwrap_or(default_page_size));
    if let Some(search) = args.search.as_deref() {
        state.set_search(search);
    }
    match args.status.as_deref() {
        Some(status) if status.trim().eq_ignore_ascii_case("all") => state.set_filter(None),
        Some(status) => state.set_filter(Some(status.parse()?)),
        None => {}
    }
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    match args.sort.as_deref() {
        Some(key) => state.set_sort(key.parse()?, direction),
        None if args.desc => {
            let (key, _) = state.sort();
            state.set_sort(key, direction);
        }
        None => {}
    }
    state.set_page(args.page);
    Ok(state)
}

fn print_masters<E: MasterEntity>(items: &[E], state: &TableState<MasterTable<E>>) {
    let page = state.apply(items);
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|item| {
            vec![
                item.id().to_string(),
                item.natural_key().to_string(),
                item.value_text(),
                or_placeholder(item.description()),
                active_label(item.is_active()),
                or_placeholder(item.created_date()),
            ]
        })
        .collect();
    print_table(&["ID", "Key", "Value", "Description", "Status", "Created"], &rows);
    print_page_footer(&page.meta, &format!("{}s", E::LABEL.to_lowercase()));
}

fn print_assessment(assessment: &ProcessClaimResponse) {
    print_fields(&[
        ("Claim", or_placeholder(assessment.claim_id.as_ref())),
        ("Decision", or_placeholder(assessment.decision.as_ref())),
        ("Status", or_placeholder(assessment.claim_status.as_ref())),
        ("Claim type", or_placeholder(assessment.claim_type.as_ref())),
        ("Damage confidence", or_placeholder(assessment.damage_confidence)),
        ("Fraud score", or_placeholder(assessment.fraud_score.as_ref())),
        ("Evaluation score", or_placeholder(assessment.evaluation_score)),
        ("Threshold", or_placeholder(assessment.threshold)),
        ("Reason", or_placeholder(assessment.reason.as_ref())),
    ]);
}

/// Print a success notification; turn an error notification into a failure.
fn report(note: &Notification) -> anyhow::Result<()> {
    if note.is_error() {
        return Err(anyhow!(
            "{}: {}",
            note.title,
            note.detail.as_deref().unwrap_or_default()
        ));
    }
    println!("{}\n", note.title);
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label.to_lowercase()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_console::StatusKey;
    use claims_console::screens::{ClaimSortKey, RoleSortKey};

    fn list_args(argv: &[&str]) -> ListArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        Wrapper::parse_from(full).args
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn list_args_override_screen_defaults() {
        let args = list_args(&[
            "--search", "camry", "--status", "pending", "--sort", "amount", "--page", "2",
            "--page-size", "20",
        ]);
        let state = table_state::<ClaimsTable>(&args, 10).unwrap();
        assert_eq!(state.search(), "camry");
        assert_eq!(state.filter(), Some(&StatusKey::Pending));
        assert_eq!(state.sort(), (ClaimSortKey::Amount, SortDirection::Asc));
        assert_eq!(state.page(), 2);
        assert_eq!(state.page_size(), 20);
    }

    #[test]
    fn status_all_clears_default_filter() {
        let state = table_state::<RolesTable>(&list_args(&[]), 10).unwrap();
        assert!(state.filter().is_some());

        let state = table_state::<RolesTable>(&list_args(&["--status", "all", "--desc"]), 10).unwrap();
        assert!(state.filter().is_none());
        assert_eq!(state.sort(), (RoleSortKey::Name, SortDirection::Desc));
    }

    #[test]
    fn empty_claims_message_names_a_working_command() {
        assert!(NO_CLAIMS_MESSAGE.contains("claims-console intake submit"));
        assert!(Cli::try_parse_from(["claims-console", "intake", "submit", "--demo"]).is_ok());
        assert!(
            Cli::try_parse_from(["claims-console", "intake", "submit", "--file", "fnol.json"]).is_ok()
        );
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let args = list_args(&["--sort", "colour"]);
        assert!(table_state::<ClaimsTable>(&args, 10).is_err());
    }

    #[test]
    fn invalid_page_size_is_rejected_by_the_parser() {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        assert!(Wrapper::try_parse_from(["test", "--page-size", "7"]).is_err());
    }
}
