use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use greentic_sso_app_core::{
    ApplicationRecord, BetaMapping, build_payload, duplicate_positions, schema, validate,
};
use greentic_sso_app_provider::{
    ClientHandle, ConfigLayer, ProviderConfig, apply_and_store, lifecycle, load_record,
    store_record, telemetry::init_tracing,
};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "greentic-sso-app", version)]
struct Cli {
    /// TOML or JSON settings file; environment and flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    org_id: Option<String>,
    /// How the `beta` attribute maps onto the wire field (direct, inverted-active)
    #[arg(long)]
    beta_mapping: Option<BetaMapping>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct StateArgs {
    /// JSON file holding the application record; rewritten after the operation
    #[arg(long)]
    state: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resource schema and the JSON Schema of the state file
    Schema,
    Validate(StateArgs),
    /// Print the payload that create or update would send
    Plan(StateArgs),
    Create(StateArgs),
    Read(StateArgs),
    Update(StateArgs),
    Delete(StateArgs),
    /// Adopt an existing application into a new state file
    Import {
        id: String,
        #[command(flatten)]
        target: StateArgs,
    },
}

impl Cli {
    fn flag_layer(&self) -> ConfigLayer {
        ConfigLayer {
            api_url: self.api_url.clone(),
            org_id: self.org_id.clone(),
            beta_mapping: self.beta_mapping,
            ..ConfigLayer::default()
        }
    }

    fn settings(&self) -> anyhow::Result<ConfigLayer> {
        let file = match &self.config {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        let env = ConfigLayer::from_env()?;
        Ok(file.merge(env).merge(self.flag_layer()))
    }

    fn connect(&self) -> anyhow::Result<ClientHandle> {
        let config = ProviderConfig::resolve(self.settings()?)?;
        config
            .connect()
            .context("failed to build application API client")
    }
}

fn load_valid_record(path: &Path) -> anyhow::Result<ApplicationRecord> {
    let record = load_record(path)?;
    validate(&record).with_context(|| format!("invalid record in {}", path.display()))?;
    Ok(record)
}

fn warn_duplicate_positions() {
    for (position, fields) in duplicate_positions() {
        let names: Vec<_> = fields.iter().map(|field| field.attribute()).collect();
        warn!(position, fields = ?names, "config fields share a display position");
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.cmd {
        Command::Schema => {
            let report = serde_json::json!({
                "resource": schema::schema(),
                "record": schema::record_json_schema()?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Validate(args) => {
            load_valid_record(&args.state)?;
            warn_duplicate_positions();
            println!("{} is valid", args.state.display());
        }
        Command::Plan(args) => {
            let record = load_valid_record(&args.state)?;
            let beta = cli.settings()?.beta_mapping.unwrap_or_default();
            warn_duplicate_positions();
            let payload = build_payload(&record, beta);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Create(args) => {
            let mut record = load_valid_record(&args.state)?;
            if record.state.is_present() {
                bail!(
                    "record in {} is already bound to application {}",
                    args.state.display(),
                    record.id().unwrap_or_default()
                );
            }
            let client = cli.connect()?;
            apply_and_store(&args.state, &mut record, |r| lifecycle::create(r, &client))
                .context("create failed")?;
            println!("created {}", record.id().unwrap_or_default());
        }
        Command::Read(args) => {
            let mut record = load_record(&args.state)?;
            let client = cli.connect()?;
            apply_and_store(&args.state, &mut record, |r| lifecycle::read(r, &client))
                .context("read failed")?;
            println!("{}", record.state.as_str());
        }
        Command::Update(args) => {
            let mut record = load_valid_record(&args.state)?;
            let client = cli.connect()?;
            apply_and_store(&args.state, &mut record, |r| lifecycle::update(r, &client))
                .context("update failed")?;
            println!("updated {}", record.id().unwrap_or_default());
        }
        Command::Delete(args) => {
            let mut record = load_record(&args.state)?;
            let client = cli.connect()?;
            apply_and_store(&args.state, &mut record, |r| lifecycle::delete(r, &client))
                .context("delete failed")?;
            println!("deleted");
        }
        Command::Import { id, target } => {
            if target.state.exists() {
                bail!("refusing to overwrite existing state file {}", target.state.display());
            }
            let client = cli.connect()?;
            let record = lifecycle::import(id, &client).context("import failed")?;
            store_record(&target.state, &record)?;
            println!("imported {id}");
        }
    }

    Ok(())
}
