//! Output formatting and logging utilities

use crate::lattice::{Spin, Structure};
use color_eyre::eyre::{Result, WrapErr};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        // HH:MM:SS
        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup log output to a file or stdout
pub fn setup_output(output_path: Option<&String>, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match output_path {
        Some(path) => {
            let log = File::create(path)
                .wrap_err_with(|| format!("Could not create output file: {}", path))?;
            let file_layer = layer()
                .with_writer(Mutex::new(log))
                .with_timer(SecondPrecisionTimer)
                .with_ansi(false);
            Registry::default()
                .with(level)
                .with(file_layer)
                .try_init()
                .wrap_err("Failed to install log subscriber")?;
            info!("Output will be written to: {}", path);
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default()
                .with(level)
                .with(stdout_layer)
                .try_init()
                .wrap_err("Failed to install log subscriber")?;
            info!("Output will be printed to stdout");
        }
    }
    Ok(())
}

/// Write the structure as extended XYZ: atom count, a comment line describing
/// the lattice and columns, then one line per atom with spin label, position,
/// spin value and cached energy
pub fn write_snapshot<W: Write>(writer: &mut W, structure: &Structure) -> Result<()> {
    let geometry = structure.geometry();
    writeln!(writer, "{}", structure.len())?;
    writeln!(
        writer,
        "Lattice=\"{} {}x{}x{}\" spacing={} bonds={} Properties=species:S:1:pos:R:3:spin:I:1:energy:R:1",
        geometry.structure_type,
        geometry.dimensions.x,
        geometry.dimensions.y,
        geometry.dimensions.z,
        geometry.spacing,
        structure.bond_count()
    )?;
    for atom in structure {
        let label = match atom.spin() {
            Spin::Up => "U",
            Spin::Down => "D",
        };
        let position = atom.position();
        writeln!(
            writer,
            "{} {:.6} {:.6} {:.6} {:2} {:.6}",
            label,
            position.x,
            position.y,
            position.z,
            atom.spin().value(),
            atom.energy()
        )?;
    }
    Ok(())
}

/// Write a snapshot to `path`
pub fn save_snapshot(path: &str, structure: &Structure) -> Result<()> {
    let mut file =
        File::create(path).wrap_err_with(|| format!("Could not create snapshot file: {}", path))?;
    write_snapshot(&mut file, structure)?;
    info!("Snapshot of {} atoms written to: {}", structure.len(), path);
    Ok(())
}
