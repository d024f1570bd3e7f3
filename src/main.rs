mod cli;

use menunav::config::{self, NavConfig};
use menunav_pci::{compose, find_button, HighlightKind, PciSnapshot, PlaceholderColors};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // check-config reports load failures itself
    let config = match cli.command {
        Commands::CheckConfig { .. } => NavConfig::default(),
        _ => config::load_config_or_default(cli.config.as_deref())?,
    };

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "menunav=trace,menunav_pci=trace".to_string()
        } else {
            config.logging.filter.clone()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { file, json } => inspect(&file, json),
        Commands::Hit { file, x, y } => hit(&file, x, y),
        Commands::Highlight { file, button, json } => highlight(&file, button, json, &config),
        Commands::CheckConfig {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            check_config(path.as_deref())
        }
    }
}

fn read_snapshot(file: &Path) -> Result<PciSnapshot> {
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read PCI file: {:?}", file))?;

    let snapshot = PciSnapshot::parse(&data)
        .with_context(|| format!("Failed to decode PCI packet: {:?}", file))?;

    tracing::debug!(
        bytes = data.len(),
        buttons = snapshot.button_count(),
        "Decoded PCI packet"
    );
    Ok(snapshot)
}

fn inspect(file: &Path, json: bool) -> Result<()> {
    let snapshot = read_snapshot(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let general = &snapshot.general;
    println!("Highlight status: {}", general.status);
    println!(
        "Presentation: {} - {} (select until {})",
        general.start_ptm, general.end_ptm, general.button_select_end_ptm
    );
    if general.forced_select != 0 {
        println!("Forced select: {}", general.forced_select);
    }
    if general.forced_action != 0 {
        println!("Forced action: {}", general.forced_action);
    }

    println!("\nColour groups:");
    for (i, [selection, action]) in snapshot.color_table.iter().enumerate() {
        println!("  [{}] selection {:08X}  action {:08X}", i + 1, selection, action);
    }

    println!("\nButtons: {}", snapshot.button_count());
    for button in &snapshot.buttons {
        let g = &button.geometry;
        print!(
            "  [{}] ({}, {}) - ({}, {})  up {} down {} left {} right {}",
            button.index,
            g.x_start,
            g.y_start,
            g.x_end,
            g.y_end,
            button.up,
            button.down,
            button.left,
            button.right
        );
        if button.auto_action {
            print!(" [auto]");
        }
        if button.color_index != 0 {
            print!(" colour {}", button.color_index);
        }
        println!();
    }

    Ok(())
}

fn hit(file: &Path, x: i32, y: i32) -> Result<()> {
    let snapshot = read_snapshot(file)?;

    match find_button(&snapshot, x, y) {
        Some(index) => println!("Button {}", index),
        None => println!("No button at ({}, {})", x, y),
    }

    Ok(())
}

fn highlight(file: &Path, index: u16, json: bool, config: &NavConfig) -> Result<()> {
    let snapshot = read_snapshot(file)?;

    let Some(button) = snapshot.button(index) else {
        anyhow::bail!(
            "Button {} out of range (menu has {} buttons)",
            index,
            snapshot.button_count()
        );
    };

    let colors = PlaceholderColors::new(config.highlight.placeholder_clut);
    let descriptor = compose(button, &snapshot, HighlightKind::Action, &colors);

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    let region = &descriptor.region;
    println!(
        "Region: ({}, {}) - ({}, {})",
        region.x_start, region.y_start, region.x_end, region.y_end
    );
    for (i, entry) in descriptor.palette.iter().enumerate() {
        println!(
            "  [{}] Y {:02X} U {:02X} V {:02X} alpha {:02X}",
            i, entry.y, entry.u, entry.v, entry.alpha
        );
    }

    Ok(())
}

fn check_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            NavConfig::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        for warning in &warnings {
            println!("⚠ {}", warning);
        }
    }
    println!("  Event thread: {}", config.events.thread_name);
    println!("  Placeholder CLUT: {:#08x}", config.highlight.placeholder_clut);
    println!("  Log filter: {}", config.logging.filter);

    Ok(())
}
