//! Interactive wizard for step-by-step config generation.

use std::path::PathBuf;

use console::style;
use dialoguer::{Confirm, Input, Password, Select};

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::features::FeatureDecl;
use crate::config::validation::validate;
use crate::config::Settings;
use crate::error::PatchbayError;

use super::serialize::serialize_document;
use super::template::starter_settings;

/// Map a `dialoguer::Error` to a `PatchbayError`.
fn map_prompt_err(e: dialoguer::Error) -> PatchbayError {
    PatchbayError::Io(std::io::Error::other(e.to_string()))
}

pub fn run(args: &InitArgs) -> Result<(), PatchbayError> {
    // Ensure we're running in an interactive terminal
    if !console::Term::stdout().is_term() {
        return Err(PatchbayError::Io(std::io::Error::other(
            "interactive mode requires a terminal (TTY). Use patchbay init without -i for non-interactive mode.",
        )));
    }

    println!(
        "\n  {} Config Wizard\n  {}\n",
        style("Patchbay").cyan().bold(),
        style("─────────────────────────").dim()
    );

    // Step 1: Output settings
    println!("  {}\n", style("Step 1: Output").bold());
    let format = prompt_format(args)?;
    let output = prompt_output(args, &format)?;

    let mut settings = starter_settings();

    // Step 2: Object storage
    println!("\n  {}\n", style("Step 2: Object storage").bold());
    let storage = prompt_storage(&mut settings)?;

    // Step 3: Database
    println!("\n  {}\n", style("Step 3: Database").bold());
    let (database, migration) = prompt_database(&mut settings)?;

    // Step 4: Extras
    println!("\n  {}\n", style("Step 4: Extras").bold());
    let extras = prompt_extras(&mut settings)?;

    apply_feature_defaults(&mut settings, storage, database, migration, &extras);

    // The wizard's default suite must validate before it is written.
    let suite = settings.features.activate(&[], false)?;
    if let Err(errors) = validate(&settings, &suite) {
        eprintln!(
            "\n  {} Config has validation errors:",
            style("!").red().bold()
        );
        for e in &errors {
            eprintln!("    {e}");
        }
        return Err(PatchbayError::ConfigValidation { errors });
    }

    // Step 5: Review
    println!("\n  {}\n", style("Step 5: Review").bold());
    print_summary(&suite.names().join(", "), &format, &output);

    let confirm = Confirm::new()
        .with_prompt(format!("Write config to {}?", output.display()))
        .default(true)
        .interact()
        .map_err(map_prompt_err)?;

    if !confirm {
        println!("  Aborted.");
        return Ok(());
    }

    // Handle existing file
    if output.exists() {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", output.display()))
            .default(false)
            .interact()
            .map_err(map_prompt_err)?;
        if !overwrite {
            println!("  Aborted.");
            return Ok(());
        }
    }

    let content = serialize_document(&settings, &format)?;
    std::fs::write(&output, content)?;
    println!(
        "\n  {} Created {}",
        style("✓").green().bold(),
        output.display()
    );
    Ok(())
}

fn prompt_format(args: &InitArgs) -> Result<ConfigFormat, PatchbayError> {
    let formats = &["yaml", "json", "toml"];
    let default_idx = match args.format {
        ConfigFormat::Yaml => 0,
        ConfigFormat::Json => 1,
        ConfigFormat::Toml => 2,
    };

    let selection = Select::new()
        .with_prompt("Config format")
        .items(formats)
        .default(default_idx)
        .interact()
        .map_err(map_prompt_err)?;

    Ok(match selection {
        1 => ConfigFormat::Json,
        2 => ConfigFormat::Toml,
        _ => ConfigFormat::Yaml,
    })
}

fn prompt_output(args: &InitArgs, format: &ConfigFormat) -> Result<PathBuf, PatchbayError> {
    let default = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("patchbay.{}", format.extension())));

    let path: String = Input::new()
        .with_prompt("Output file")
        .default(default.display().to_string())
        .interact_text()
        .map_err(map_prompt_err)?;

    Ok(PathBuf::from(path))
}

#[derive(Clone, Copy)]
enum StorageChoice {
    Local,
    Minio,
    S3,
}

fn prompt_storage(settings: &mut Settings) -> Result<StorageChoice, PatchbayError> {
    let backends = &["LocalOSS (local disk)", "MinIO", "S3"];
    let selection = Select::new()
        .with_prompt("Storage backend")
        .items(backends)
        .default(0)
        .interact()
        .map_err(map_prompt_err)?;

    match selection {
        1 => {
            settings.minio.endpoint = Input::new()
                .with_prompt("MinIO endpoint")
                .default(settings.minio.endpoint.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.minio.access_key = Input::new()
                .with_prompt("MinIO access key")
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.minio.secret_key = Password::new()
                .with_prompt("MinIO secret key")
                .interact()
                .map_err(map_prompt_err)?;
            Ok(StorageChoice::Minio)
        }
        2 => {
            settings.s3.region = Input::new()
                .with_prompt("S3 region")
                .default(settings.s3.region.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.s3.bucket = Input::new()
                .with_prompt("S3 bucket")
                .default(settings.s3.bucket.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.s3.access_key = Input::new()
                .with_prompt("S3 access key")
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.s3.secret_key = Password::new()
                .with_prompt("S3 secret key")
                .interact()
                .map_err(map_prompt_err)?;
            Ok(StorageChoice::S3)
        }
        _ => {
            let save_path: String = Input::new()
                .with_prompt("Save path")
                .default(settings.local_oss.save_path.display().to_string())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.local_oss.save_path = PathBuf::from(save_path);
            settings.local_oss.domain = Input::new()
                .with_prompt("Public domain")
                .default(settings.local_oss.domain.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            Ok(StorageChoice::Local)
        }
    }
}

#[derive(Clone, Copy)]
enum DatabaseChoice {
    MySql,
    Postgres,
    Sqlite,
}

fn prompt_database(settings: &mut Settings) -> Result<(DatabaseChoice, bool), PatchbayError> {
    let drivers = &["MySQL", "Postgres", "Sqlite3"];
    let selection = Select::new()
        .with_prompt("SQL driver")
        .items(drivers)
        .default(0)
        .interact()
        .map_err(map_prompt_err)?;

    let choice = match selection {
        1 => {
            settings.postgres.host = Input::new()
                .with_prompt("Postgres host")
                .default(settings.postgres.host.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.postgres.password = Password::new()
                .with_prompt("Postgres password")
                .allow_empty_password(true)
                .interact()
                .map_err(map_prompt_err)?;
            DatabaseChoice::Postgres
        }
        2 => {
            let path: String = Input::new()
                .with_prompt("Sqlite3 database path")
                .default(settings.sqlite3.path.display().to_string())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.sqlite3.path = PathBuf::from(path);
            DatabaseChoice::Sqlite
        }
        _ => {
            settings.mysql.host = Input::new()
                .with_prompt("MySQL host")
                .default(settings.mysql.host.clone())
                .interact_text()
                .map_err(map_prompt_err)?;
            settings.mysql.password = Password::new()
                .with_prompt("MySQL password")
                .allow_empty_password(true)
                .interact()
                .map_err(map_prompt_err)?;
            DatabaseChoice::MySql
        }
    };

    let migration = Confirm::new()
        .with_prompt("Enable the Migration feature (apply schema on startup)?")
        .default(true)
        .interact()
        .map_err(map_prompt_err)?;

    Ok((choice, migration))
}

struct Extras {
    sms: bool,
    search: Option<&'static str>,
}

fn prompt_extras(settings: &mut Settings) -> Result<Extras, PatchbayError> {
    let sms = Confirm::new()
        .with_prompt("Enable SMS delivery (Juhe)?")
        .default(false)
        .interact()
        .map_err(map_prompt_err)?;
    if sms {
        settings.sms_juhe.key = Password::new()
            .with_prompt("Juhe API key")
            .interact()
            .map_err(map_prompt_err)?;
        settings.sms_juhe.tpl_id = Input::new()
            .with_prompt("Juhe template id")
            .interact_text()
            .map_err(map_prompt_err)?;
    }

    let engines = &["none", "Zinc", "Meili"];
    let selection = Select::new()
        .with_prompt("Search backend")
        .items(engines)
        .default(0)
        .interact()
        .map_err(map_prompt_err)?;
    let search = match selection {
        1 => {
            settings.zinc.password = Password::new()
                .with_prompt("Zinc admin password")
                .allow_empty_password(true)
                .interact()
                .map_err(map_prompt_err)?;
            Some("Zinc")
        }
        2 => {
            settings.meili.api_key = Password::new()
                .with_prompt("Meili API key")
                .allow_empty_password(true)
                .interact()
                .map_err(map_prompt_err)?;
            Some("Meili")
        }
        _ => None,
    };

    Ok(Extras { sms, search })
}

fn apply_feature_defaults(
    settings: &mut Settings,
    storage: StorageChoice,
    database: DatabaseChoice,
    migration: bool,
    extras: &Extras,
) {
    let on = FeatureDecl {
        default: true,
        value: None,
    };
    let off = FeatureDecl::default();

    settings.features.declare(
        "LocalOSS",
        if matches!(storage, StorageChoice::Local) {
            on.clone()
        } else {
            off.clone()
        },
    );
    settings.features.declare(
        "MinIO",
        if matches!(storage, StorageChoice::Minio) {
            on.clone()
        } else {
            off.clone()
        },
    );
    settings.features.declare(
        "S3",
        if matches!(storage, StorageChoice::S3) {
            on.clone()
        } else {
            off.clone()
        },
    );

    settings.features.declare(
        "MySQL",
        if matches!(database, DatabaseChoice::MySql) {
            on.clone()
        } else {
            off.clone()
        },
    );
    settings.features.declare(
        "Postgres",
        if matches!(database, DatabaseChoice::Postgres) {
            on.clone()
        } else {
            off.clone()
        },
    );
    settings.features.declare(
        "Sqlite3",
        if matches!(database, DatabaseChoice::Sqlite) {
            on.clone()
        } else {
            off.clone()
        },
    );

    settings.features.declare(
        "Migration",
        if migration { on.clone() } else { off.clone() },
    );

    settings.features.declare(
        "Sms",
        FeatureDecl {
            default: extras.sms,
            value: Some("SmsJuhe".into()),
        },
    );

    settings
        .features
        .declare("Zinc", if extras.search == Some("Zinc") { on.clone() } else { off.clone() });
    settings
        .features
        .declare("Meili", if extras.search == Some("Meili") { on } else { off });
}

fn print_summary(suite: &str, format: &ConfigFormat, output: &std::path::Path) {
    println!("  format:        {}", format.extension());
    println!("  output:        {}", output.display());
    println!("  default suite: {suite}");
}
