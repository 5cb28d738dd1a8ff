//! SQL script emission.
//!
//! The script targets MySQL and is meant to be read by an operator before it
//! is run: every section carries a comment explaining what it does, and the
//! staged-rename tail includes the manual rollback procedure. Output is
//! fully deterministic; nothing run-varying (timestamps, hostnames) is
//! embedded, so identical input produces a byte-identical script.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::{cli::Strategy, region::Region};

pub struct EmitOptions<'a> {
    /// Live table name. The shadow table is `<table>_new`, the backup after
    /// a swap is `<table>_old`.
    pub table: &'a str,
    pub strategy: Strategy,
    pub batch_size: usize,
    pub max_level: u8,
}

pub fn write_script(output: &Path, regions: &[Region], opts: &EmitOptions) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("Creating output file {output:?}"))?;
    let mut writer = BufWriter::new(file);
    render_script(&mut writer, regions, opts)
        .and_then(|()| writer.flush().map_err(Into::into))
        .with_context(|| format!("Writing SQL script to {output:?}"))
}

pub fn render_script<W: Write>(w: &mut W, regions: &[Region], opts: &EmitOptions) -> Result<()> {
    let table = opts.table;
    let shadow = format!("{table}_new");
    let backup = format!("{table}_old");
    let staged = opts.strategy == Strategy::StagedRename;

    writeln!(w, "-- ==========================================")?;
    writeln!(w, "-- Region seed data (generated)")?;
    writeln!(w, "-- Source: 법정동 code registry export")?;
    writeln!(w, "-- Records: {}", regions.len())?;
    writeln!(w, "-- Max level: {}", opts.max_level)?;
    if staged {
        writeln!(w, "-- Strategy: shadow table + RENAME (zero downtime)")?;
    } else {
        writeln!(w, "-- Strategy: direct replace (DELETE + INSERT)")?;
    }
    writeln!(w, "-- ==========================================")?;
    writeln!(w)?;

    let target = if staged {
        writeln!(w, "-- Step 1: build the shadow table")?;
        writeln!(w, "DROP TABLE IF EXISTS {shadow};")?;
        writeln!(w)?;
        writeln!(w, "-- Copies the live column structure; the migration tool")?;
        writeln!(w, "-- owns that structure. Foreign keys are NOT duplicated.")?;
        writeln!(w, "CREATE TABLE {shadow} LIKE {table};")?;
        writeln!(w)?;
        writeln!(w, "-- Step 2: load the shadow table")?;
        writeln!(w)?;
        shadow.as_str()
    } else {
        writeln!(w, "-- Destructive replace: clears the live table in place.")?;
        writeln!(w, "-- Downtime is possible while the reload runs.")?;
        writeln!(w, "SET FOREIGN_KEY_CHECKS = 0;")?;
        writeln!(w)?;
        writeln!(w, "DELETE FROM {table} WHERE 1=1;")?;
        writeln!(w)?;
        writeln!(w, "SET FOREIGN_KEY_CHECKS = 1;")?;
        writeln!(w)?;
        table
    };

    let total_batches = regions.len().div_ceil(opts.batch_size);
    for (batch_idx, batch) in regions.chunks(opts.batch_size).enumerate() {
        writeln!(w, "-- Batch {}/{}", batch_idx + 1, total_batches)?;
        writeln!(w, "INSERT INTO {target} (code, name, parent_code, level)")?;
        writeln!(w, "VALUES")?;
        let values = batch.iter().map(render_row).join(",\n");
        writeln!(w, "{values};")?;
        writeln!(w)?;
    }

    if staged {
        writeln!(w, "-- Step 3: atomic swap (completes in under a millisecond)")?;
        writeln!(w, "RENAME TABLE")?;
        writeln!(w, "    {table} TO {backup},")?;
        writeln!(w, "    {shadow} TO {table};")?;
        writeln!(w)?;
        writeln!(w, "-- Step 4: manual follow-up, run only after verification")?;
        writeln!(w, "-- Rollback if the new data is wrong:")?;
        writeln!(
            w,
            "--   RENAME TABLE {table} TO {shadow}, {backup} TO {table};"
        )?;
        writeln!(w, "-- Drop the backup once the swap is verified:")?;
        writeln!(w, "--   DROP TABLE IF EXISTS {backup};")?;
    }
    Ok(())
}

fn render_row(region: &Region) -> String {
    match &region.parent_code {
        Some(parent) => format!(
            "  ('{}', '{}', '{}', {})",
            region.code, region.name, parent, region.level
        ),
        None => format!(
            "  ('{}', '{}', NULL, {})",
            region.code, region.name, region.level
        ),
    }
}
