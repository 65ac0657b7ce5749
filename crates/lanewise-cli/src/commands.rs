//! Subcommand handlers.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use lanewise_core::{capability, generic, harness, Comparison, ElementKind, LanewiseConfig, Op, Vector};

/// `lanewise caps`
pub fn caps(json: bool) -> Result<()> {
    let hardware = capability::hardware();
    let detected = capability::detected();

    if json {
        let report = serde_json::json!({
            "arch": std::env::consts::ARCH,
            "hardware": hardware,
            "effective": detected,
            "level": detected.level(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", "SIMD Capabilities".bold().underline());
    println!("  {} {}", "Architecture:".cyan(), std::env::consts::ARCH);
    println!("  {} {}", "Hardware:".cyan(), hardware.to_string().green());
    println!("  {} {}", "Effective:".cyan(), detected.to_string().green());
    println!("  {} {}", "Dispatch path:".cyan(), detected.level().to_string().green());
    if detected != hardware {
        println!(
            "  {}",
            "Some extensions are disabled by configuration.".yellow()
        );
    }
    println!();
    Ok(())
}

/// `lanewise eval`
pub fn eval(op: Op, kind: ElementKind, lhs: &[String], rhs: &[String], json: bool) -> Result<()> {
    let lhs = Vector::parse(kind, lhs).context("invalid --lhs")?;

    if op.as_reduce().is_some() {
        if !rhs.is_empty() {
            bail!("'{op}' is a reduction and takes no --rhs");
        }
        let value = generic::reduce(op, lhs.as_ref())?;
        if json {
            println!("{}", serde_json::to_string(&value)?);
        } else {
            println!("{value}");
        }
        return Ok(());
    }

    if rhs.is_empty() {
        bail!("'{op}' needs --rhs");
    }
    let rhs = Vector::parse(kind, rhs).context("invalid --rhs")?;
    let out = generic::apply(op, lhs.as_ref(), rhs.as_ref())?;
    if json {
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("{out}");
    }
    Ok(())
}

/// `lanewise bench`
pub fn bench(
    kind: Option<ElementKind>,
    op: Option<Op>,
    size: usize,
    iterations: usize,
    json: bool,
) -> Result<()> {
    if iterations == 0 {
        bail!("--iterations must be at least 1");
    }
    let kinds: Vec<ElementKind> = kind.map_or_else(|| ElementKind::ALL.to_vec(), |k| vec![k]);
    let ops: Vec<Op> = op.map_or_else(|| Op::ALL.to_vec(), |o| vec![o]);

    lanewise_core::warmup();
    let mut results = Vec::with_capacity(kinds.len() * ops.len());
    for &kind in &kinds {
        for &op in &ops {
            results.push(harness::compare(kind, op, size, iterations)?);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_comparisons(&results);
    }
    Ok(())
}

fn print_comparisons(results: &[Comparison]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Kind",
            "Op",
            "Size",
            "Scalar p50",
            "Accelerated p50",
            "Speedup",
            "Path",
        ]);

    for c in results {
        table.add_row(vec![
            Cell::new(c.kind),
            Cell::new(c.op),
            Cell::new(c.size),
            Cell::new(format_latency(c.scalar.p50)),
            Cell::new(format_latency(c.accelerated.p50)),
            Cell::new(format!("{:.2}x", c.speedup)),
            Cell::new(c.level),
        ]);
    }

    println!("{table}");
}

fn format_latency(latency: Duration) -> String {
    let nanos = latency.as_nanos();
    if nanos < 10_000 {
        format!("{nanos} ns")
    } else {
        format!("{:.1} µs", latency.as_secs_f64() * 1e6)
    }
}

/// `lanewise config`
pub fn config(config: &LanewiseConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
