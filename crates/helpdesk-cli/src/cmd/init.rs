use super::Ctx;
use anyhow::Context;
use helpdesk_core::{config::Config, io, paths};

pub fn run(ctx: &Ctx, name: Option<&str>) -> anyhow::Result<()> {
    let root = &ctx.root;
    let name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "helpdesk".to_string())
    });

    if !ctx.json {
        println!("Initializing helpdesk in: {}", root.display());
    }

    let dir = paths::helpdesk_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut created = Vec::new();
    if !paths::config_path(root).exists() {
        Config::new(&name)
            .save(root)
            .context("failed to write config.yaml")?;
        created.push(paths::CONFIG_FILE);
    }
    for file in [
        paths::TICKETS_FILE,
        paths::PRODUCTS_FILE,
        paths::USERS_FILE,
        paths::ACTIVITY_FILE,
    ] {
        if io::write_if_missing(&root.join(file), b"[]\n")? {
            created.push(file);
        }
    }

    if ctx.json {
        crate::output::print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "name": name,
            "created": created,
        }))?;
        return Ok(());
    }
    for file in [
        paths::CONFIG_FILE,
        paths::TICKETS_FILE,
        paths::PRODUCTS_FILE,
        paths::USERS_FILE,
        paths::ACTIVITY_FILE,
    ] {
        let tag = if created.contains(&file) { "created:" } else { "exists: " };
        println!("  {tag} {file}");
    }
    println!("\nNext: helpdesk product create <slug> --name <name>");
    Ok(())
}
